use crate::errors::GenerationError;
use crate::generators::derivatives::MAX_FUNCTION_DEPTH;
use crate::generators::expression_generator::{ExpressionGenerator, GeneratorConfig};
use crate::generators::{LatexPair, Problem, ProblemGenerator, ProblemKind};
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use rand::rngs::StdRng;

pub const MAX_ATTEMPTS: usize = 100;

#[derive(Debug, Clone)]
pub struct TaylorConfig {
    /// expansion point
    pub center: f64,
    pub term_range: (usize, usize),
    /// decimals of the printed coefficients
    pub decimals: i32,
    /// coefficients beyond this magnitude make unreadable answers
    pub max_coefficient: f64,
}

impl Default for TaylorConfig {
    fn default() -> Self {
        Self {
            center: 1.0,
            term_range: (1, 2),
            decimals: 2,
            max_coefficient: 1e4,
        }
    }
}

/// "Expand f(x) to second order around a"
pub struct TaylorGenerator {
    generator: ExpressionGenerator,
    config: TaylorConfig,
}

impl Default for TaylorGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::base_grammar(), TaylorConfig::default())
    }
}

impl TaylorGenerator {
    pub fn new(generator_config: GeneratorConfig, config: TaylorConfig) -> Self {
        Self {
            generator: ExpressionGenerator::new("x", generator_config),
            config,
        }
    }

    pub fn with_center(center: f64) -> Self {
        Self::new(
            GeneratorConfig::base_grammar(),
            TaylorConfig {
                center,
                ..TaylorConfig::default()
            },
        )
    }

    /// Exact and rounded second order polynomial of `f`, or the reason to reject it.
    pub fn expand(&self, f: &Expr) -> Result<(Expr, Expr), String> {
        let x = self.generator.var();
        let center = self.config.center;
        if !f.contains_variable(x) {
            return Err(format!("{} does not depend on {}", f, x));
        }
        if f.function_depth() > MAX_FUNCTION_DEPTH {
            return Err(format!("{} is nested too deeply", f));
        }
        if f.is_polynomial_up_to_degree(x, 2) {
            return Err(format!("{} already is a polynomial of degree <= 2", f));
        }
        let coefficients = f
            .taylor_coefficients(x, center, 2)
            .map_err(|e| format!("{} cannot be expanded around {}: {}", f, center, e))?;
        if let Some(c) = coefficients
            .iter()
            .find(|c| c.abs() > self.config.max_coefficient)
        {
            return Err(format!("coefficient {} of {} is too large", c, f));
        }
        let exact = Expr::polynomial_around(x, center, &coefficients);
        let rounded = exact.round_constants(self.config.decimals);
        if !rounded.contains_variable(x) {
            return Err(format!("expansion of {} rounds to a constant", f));
        }
        Ok((exact, rounded))
    }
}

impl ProblemGenerator for TaylorGenerator {
    fn kind(&self) -> ProblemKind {
        ProblemKind::Taylor
    }

    fn generate(&self, rng: &mut StdRng) -> Result<Problem, GenerationError> {
        let mut last_reason = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            let f = self.generator.expression(self.config.term_range, rng);
            match self.expand(&f) {
                Ok((exact, rounded)) => {
                    debug!(
                        "taylor: accepted {} after {} attempts, exact expansion {}",
                        f, attempt, exact
                    );
                    return Ok(Problem {
                        kind: ProblemKind::Taylor,
                        statement: f.render(),
                        answer: rounded.render(),
                        latex: Some(LatexPair {
                            statement: f.to_latex(),
                            answer: rounded.to_latex(),
                        }),
                        graph: None,
                    });
                }
                Err(reason) => {
                    debug!("taylor: attempt {} rejected: {}", attempt, reason);
                    last_reason = reason;
                }
            }
        }
        Err(GenerationError::new(ProblemKind::Taylor, MAX_ATTEMPTS, last_reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_expand_exp() {
        let generator = TaylorGenerator::default();
        let (exact, rounded) = generator.expand(&x().exp()).unwrap();
        let e = std::f64::consts::E;
        assert_relative_eq!(exact.eval1D("x", 1.0).unwrap(), e, epsilon = 1e-12);
        assert_eq!(rounded.render(), "2.72 + 2.72*(x - 1) + 1.36*(x - 1)^2");
    }

    #[test]
    fn test_rejections() {
        let generator = TaylorGenerator::default();
        // undefined at the center
        assert!(generator.expand(&(x() - Expr::Const(1.0)).ln()).is_err());
        assert!(generator.expand(&(x() - Expr::Const(1.0)).powf(-1.0)).is_err());
        // already quadratic
        let quadratic = Expr::Const(3.0) * x().powf(2.0) + x();
        assert!(generator.expand(&quadratic).is_err());
        assert!(generator.expand(&Expr::Const(5.0)).is_err());
        let deep = x().sin().exp().ln().cos();
        assert!(generator.expand(&deep).is_err());
    }

    #[test]
    fn test_generated_problems() {
        let generator = TaylorGenerator::with_center(0.5);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..20 {
            let problem = generator.generate(&mut rng).unwrap();
            assert_eq!(problem.kind, ProblemKind::Taylor);
            assert!(problem.answer.contains('x'), "{}", problem.answer);
        }
    }

    #[test]
    fn test_generated_functions_have_one_wrapper_at_most() {
        let generator = TaylorGenerator::default();
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..200 {
            let f = generator.generator.expression(generator.config.term_range, &mut rng);
            assert!(f.wrapper_count() <= 1, "{}", f);
            assert!(!f.contains_division(), "{}", f);
        }
        for _ in 0..20 {
            generator.generate(&mut rng).unwrap();
        }
    }
}
