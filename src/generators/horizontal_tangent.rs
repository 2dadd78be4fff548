use crate::errors::GenerationError;
use crate::generators::expression_generator::{ExpressionGenerator, FunctionFamily, GeneratorConfig};
use crate::generators::{LatexPair, Problem, ProblemGenerator, ProblemKind};
use crate::numerical::root_finding::ScalarRootFinder;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::format_decimal;
use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;

pub const MAX_ATTEMPTS: usize = 100;

#[derive(Debug, Clone)]
pub struct HorizontalTangentConfig {
    /// interval searched for roots of f'
    pub window: (f64, f64),
    /// functions with more horizontal tangents on the window are rejected
    pub max_roots: usize,
    pub decimals: usize,
}

impl Default for HorizontalTangentConfig {
    fn default() -> Self {
        Self {
            window: (-5.0, 5.0),
            max_roots: 6,
            decimals: 1,
        }
    }
}

/// "Find all x where f has a horizontal tangent": roots of f' found numerically.
pub struct HorizontalTangentGenerator {
    generator: ExpressionGenerator,
    config: HorizontalTangentConfig,
    finder: ScalarRootFinder,
}

impl Default for HorizontalTangentGenerator {
    fn default() -> Self {
        Self::new(HorizontalTangentConfig::default())
    }
}

impl HorizontalTangentGenerator {
    pub fn new(config: HorizontalTangentConfig) -> Self {
        let generator_config = GeneratorConfig {
            power_range: (2, 4),
            p_trig: (0.3, 0.7),
            p_compose: 0.2,
            function_choice: vec![FunctionFamily::Poly, FunctionFamily::Trig, FunctionFamily::Root],
            ..GeneratorConfig::default()
        };
        Self {
            generator: ExpressionGenerator::new("x", generator_config),
            config,
            finder: ScalarRootFinder::new(),
        }
    }

    /// Searches the given interval instead of the default window.
    pub fn with_window(window: (f64, f64)) -> Self {
        Self::new(HorizontalTangentConfig {
            window,
            ..HorizontalTangentConfig::default()
        })
    }

    /// Sorted roots of `f'` on the window, or the reason to reject `f`.
    pub fn tangent_points(&self, f: &Expr) -> Result<Vec<f64>, String> {
        let x = self.generator.var();
        if !f.contains_variable(x) {
            return Err(format!("{} does not depend on {}", f, x));
        }
        let derivative = f.diff(x).simplify();
        if !derivative.contains_variable(x) {
            return Err(format!("derivative of {} is constant", f));
        }
        let second = derivative.diff(x).simplify();
        let (a, b) = self.config.window;
        let roots = self
            .finder
            .find_all_roots_with_derivative(
                &|t| derivative.eval1D(x, t),
                &|t| second.eval1D(x, t),
                a,
                b,
            )
            .map_err(|e| format!("roots of {} not found: {}", derivative, e))?;
        if roots.is_empty() {
            return Err(format!("{} has no horizontal tangent on [{}, {}]", f, a, b));
        }
        if roots.len() > self.config.max_roots {
            return Err(format!("{} has {} horizontal tangents", f, roots.len()));
        }
        Ok(roots)
    }

    /// `x = r1, r2, ...` with duplicates after rounding removed
    pub fn format_answer(&self, roots: &[f64]) -> String {
        let printed = roots
            .iter()
            .map(|root| format_decimal(*root, self.config.decimals))
            .unique()
            .join(", ");
        format!("x = {}", printed)
    }
}

impl ProblemGenerator for HorizontalTangentGenerator {
    fn kind(&self) -> ProblemKind {
        ProblemKind::HorizontalTangent
    }

    fn generate(&self, rng: &mut StdRng) -> Result<Problem, GenerationError> {
        let mut last_reason = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            let f = self.generator.expression((1, 1), rng);
            match self.tangent_points(&f) {
                Ok(roots) => {
                    debug!("horizontal tangent: {} has roots {:?}", f, roots);
                    let answer = self.format_answer(&roots);
                    return Ok(Problem {
                        kind: ProblemKind::HorizontalTangent,
                        statement: f.render(),
                        latex: Some(LatexPair {
                            statement: f.to_latex(),
                            answer: answer.clone(),
                        }),
                        answer,
                        graph: None,
                    });
                }
                Err(reason) => {
                    debug!("horizontal tangent: attempt {} rejected: {}", attempt, reason);
                    last_reason = reason;
                }
            }
        }
        Err(GenerationError::new(
            ProblemKind::HorizontalTangent,
            MAX_ATTEMPTS,
            last_reason,
        ))
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
    fn test_parabola_vertex() {
        let generator = HorizontalTangentGenerator::default();
        let f = x().powf(2.0) - Expr::Const(4.0) * x();
        let roots = generator.tangent_points(&f).unwrap();
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 2.0, epsilon = 1e-8);
        assert_eq!(generator.format_answer(&roots), "x = 2.0");
    }

    #[test]
    fn test_sine_extrema() {
        let generator = HorizontalTangentGenerator::default();
        let roots = generator.tangent_points(&x().sin()).unwrap();
        assert_eq!(generator.format_answer(&roots), "x = -4.7, -1.6, 1.6, 4.7");
    }

    #[test]
    fn test_double_roots_of_derivative() {
        let generator = HorizontalTangentGenerator::default();
        // f' = 3 tg(x)^2 / cos(x)^2 touches zero at 0 and ±pi
        let roots = generator.tangent_points(&x().tg().powf(3.0)).unwrap();
        assert_eq!(generator.format_answer(&roots), "x = -3.1, 0.0, 3.1");
        // f' = 3x^2, no sample lands on 0
        let shifted = HorizontalTangentGenerator::with_window((-4.0, 5.0));
        let roots = shifted.tangent_points(&x().powf(3.0)).unwrap();
        assert_eq!(shifted.format_answer(&roots), "x = 0.0");
        // 0, ±pi, ±pi/2 and ±3pi/2 are seven tangent points
        let cubed_cosine = Expr::Const(3.0) * x().cos().powf(3.0);
        assert!(generator.tangent_points(&cubed_cosine).is_err());
        let wide = HorizontalTangentGenerator::new(HorizontalTangentConfig {
            max_roots: 10,
            ..HorizontalTangentConfig::default()
        });
        let roots = wide.tangent_points(&cubed_cosine).unwrap();
        assert_eq!(
            wide.format_answer(&roots),
            "x = -4.7, -3.1, -1.6, 0.0, 1.6, 3.1, 4.7"
        );
    }

    #[test]
    fn test_rejections() {
        let generator = HorizontalTangentGenerator::default();
        assert!(generator.tangent_points(&(Expr::Const(3.0) * x())).is_err());
        assert!(generator.tangent_points(&x().exp()).is_err());
        // sin(x^2) oscillates too often on [-5, 5]
        assert!(generator.tangent_points(&x().powf(2.0).sin()).is_err());
        let narrow = HorizontalTangentGenerator::with_window((3.0, 4.0));
        assert!(narrow.tangent_points(&x().sin()).is_err());
    }

    #[test]
    fn test_generated_problems() {
        let generator = HorizontalTangentGenerator::default();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..10 {
            let problem = generator.generate(&mut rng).unwrap();
            assert!(problem.answer.starts_with("x = "), "{}", problem.answer);
        }
    }
}
