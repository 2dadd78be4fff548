//! Random expressions of one variable built from a small grammar of function families.
//!
//! An expression is a sum of terms. A term is `a * g(u)^b` where `g` is one of the
//! [`FunctionFamily`] wrappers, `a` and `b` are drawn from the configured integer ranges and
//! `u` is either the variable or, with probability `p_compose`, another term (composition).
//! All draws come from the caller's RNG, so a seeded RNG reproduces the same expressions.
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;
use strum_macros::{Display, EnumIter};

/// Wrappers applied to the inner argument of a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FunctionFamily {
    /// the argument itself
    Poly,
    /// `e^u` or `a^u`
    Exponent,
    /// `ln(u)`
    Log,
    /// `u^(1/2)` or `u^(1/n)`
    Root,
    /// `u^(-1)`
    Reciprocal,
    /// `sin(u)`, `cos(u)` or `tg(u)`
    Trig,
    /// `sinh(u)` or `cosh(u)`
    HyperTrig,
}

impl FunctionFamily {
    /// Families that wrap the argument in `exp`, `ln`, a trigonometric or a hyperbolic function.
    pub fn is_transcendental(&self) -> bool {
        matches!(
            self,
            FunctionFamily::Exponent
                | FunctionFamily::Log
                | FunctionFamily::Trig
                | FunctionFamily::HyperTrig
        )
    }

    pub fn all() -> Vec<FunctionFamily> {
        use strum::IntoEnumIterator;
        FunctionFamily::iter().collect()
    }
}

/// Probabilities and ranges of the grammar
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// cumulative thresholds: below `.0` sin, below `.1` cos, otherwise tg
    pub p_trig: (f64, f64),
    /// below: sinh, otherwise cosh
    pub p_hyper_trig: f64,
    /// below: e^u, otherwise a^u with a from `exp_range`
    pub p_exponent: f64,
    /// below: square root, otherwise a root of degree from `root_degree_range`
    pub p_root: f64,
    /// probability that a term wraps another term instead of the variable
    pub p_compose: f64,
    pub exp_range: (i64, i64),
    pub root_degree_range: (i64, i64),
    pub coeff_range: (i64, i64),
    pub power_range: (i64, i64),
    pub function_choice: Vec<FunctionFamily>,
    /// upper bound on transcendental wrappers per expression, `None` for no bound
    pub max_transcendental: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            p_trig: (0.4, 0.7),
            p_hyper_trig: 0.5,
            p_exponent: 0.9,
            p_root: 0.7,
            p_compose: 0.3,
            exp_range: (2, 5),
            root_degree_range: (3, 5),
            coeff_range: (1, 5),
            power_range: (0, 5),
            function_choice: FunctionFamily::all(),
            max_transcendental: None,
        }
    }
}

impl GeneratorConfig {
    /// Grammar shared by the derivative and Taylor problems: coefficients 1..=5, powers
    /// 1..=4, no reciprocals and at most one transcendental wrapper per expression.
    pub fn base_grammar() -> Self {
        Self {
            coeff_range: (1, 5),
            power_range: (1, 4),
            function_choice: FunctionFamily::all()
                .into_iter()
                .filter(|family| *family != FunctionFamily::Reciprocal)
                .collect(),
            max_transcendental: Some(1),
            ..Self::default()
        }
    }
}

pub struct ExpressionGenerator {
    var: String,
    config: GeneratorConfig,
}

impl ExpressionGenerator {
    pub fn new(var: &str, config: GeneratorConfig) -> Self {
        Self {
            var: var.to_string(),
            config,
        }
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Wraps `arg` according to `family`.
    pub fn apply_family<R: Rng + ?Sized>(&self, family: FunctionFamily, arg: Expr, rng: &mut R) -> Expr {
        let cfg = &self.config;
        match family {
            FunctionFamily::Poly => arg,
            FunctionFamily::Exponent => {
                if rng.random_bool(cfg.p_exponent) {
                    arg.exp()
                } else {
                    let base = rng.random_range(cfg.exp_range.0..=cfg.exp_range.1);
                    Expr::Const(base as f64).pow(arg)
                }
            }
            FunctionFamily::Log => arg.ln(),
            FunctionFamily::Root => {
                let degree = if rng.random_bool(cfg.p_root) {
                    2
                } else {
                    rng.random_range(cfg.root_degree_range.0..=cfg.root_degree_range.1)
                };
                arg.pow(Expr::Const(1.0) / Expr::Const(degree as f64))
            }
            FunctionFamily::Reciprocal => arg.powf(-1.0),
            FunctionFamily::Trig => {
                let p: f64 = rng.random();
                if p < cfg.p_trig.0 {
                    arg.sin()
                } else if p < cfg.p_trig.1 {
                    arg.cos()
                } else {
                    arg.tg()
                }
            }
            FunctionFamily::HyperTrig => {
                if rng.random_bool(cfg.p_hyper_trig) {
                    arg.sinh()
                } else {
                    arg.cosh()
                }
            }
        }
    }

    /// `a * family(arg)^b`, simplified.
    pub fn element<R: Rng + ?Sized>(&self, family: FunctionFamily, arg: Expr, rng: &mut R) -> Expr {
        let cfg = &self.config;
        let wrapped = self.apply_family(family, arg, rng);
        let a = rng.random_range(cfg.coeff_range.0..=cfg.coeff_range.1);
        let b = rng.random_range(cfg.power_range.0..=cfg.power_range.1);
        (Expr::Const(a as f64) * wrapped.powf(b as f64)).simplify()
    }

    fn choose_family<R: Rng + ?Sized>(&self, transcendental_left: &mut Option<usize>, rng: &mut R) -> FunctionFamily {
        let allowed: Vec<FunctionFamily> = match transcendental_left {
            Some(0) => self
                .config
                .function_choice
                .iter()
                .copied()
                .filter(|family| !family.is_transcendental())
                .collect(),
            _ => self.config.function_choice.clone(),
        };
        let family = allowed.choose(rng).copied().unwrap_or(FunctionFamily::Poly);
        if family.is_transcendental() {
            if let Some(left) = transcendental_left.as_mut() {
                *left = left.saturating_sub(1);
            }
        }
        family
    }

    /// One term: an element of the variable, or with probability `p_compose` an element of an element.
    pub fn term<R: Rng + ?Sized>(&self, transcendental_left: &mut Option<usize>, rng: &mut R) -> Expr {
        let x = Expr::var(&self.var);
        let family = self.choose_family(transcendental_left, rng);
        if rng.random_bool(self.config.p_compose) {
            let inner = self.element(family, x, rng);
            let outer_family = self.choose_family(transcendental_left, rng);
            self.element(outer_family, inner, rng)
        } else {
            self.element(family, x, rng)
        }
    }

    /// Sum of a random number of terms, the count drawn from `length_range` inclusive.
    pub fn expression<R: Rng + ?Sized>(&self, length_range: (usize, usize), rng: &mut R) -> Expr {
        let length = rng.random_range(length_range.0..=length_range.1);
        let mut transcendental_left = self.config.max_transcendental;
        let mut expr: Option<Expr> = None;
        for _ in 0..length {
            let term = self.term(&mut transcendental_left, rng);
            expr = Some(match expr {
                Some(acc) => acc + term,
                None => term,
            });
        }
        let expr = expr.unwrap_or(Expr::Const(0.0)).simplify();
        debug!("generated expression {}", expr);
        expr
    }
}
