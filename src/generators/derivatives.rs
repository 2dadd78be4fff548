use crate::errors::GenerationError;
use crate::generators::expression_generator::{ExpressionGenerator, GeneratorConfig};
use crate::generators::{LatexPair, Problem, ProblemGenerator, ProblemKind};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::linspace;
use log::debug;
use rand::rngs::StdRng;

pub const MAX_ATTEMPTS: usize = 100;
/// deepest allowed nesting of named functions
pub const MAX_FUNCTION_DEPTH: usize = 3;

/// "Differentiate f(x)": a sum of 2 to 4 terms, answer is the simplified derivative.
pub struct DerivativesGenerator {
    generator: ExpressionGenerator,
    term_range: (usize, usize),
}

impl Default for DerivativesGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::base_grammar(), (2, 4))
    }
}

impl DerivativesGenerator {
    pub fn new(config: GeneratorConfig, term_range: (usize, usize)) -> Self {
        Self {
            generator: ExpressionGenerator::new("x", config),
            term_range,
        }
    }

    /// Accepts `f` or tells why it is rejected; on success returns the simplified derivative.
    pub fn check_candidate(&self, f: &Expr) -> Result<Expr, String> {
        let x = self.generator.var();
        if !f.contains_variable(x) {
            return Err(format!("{} does not depend on {}", f, x));
        }
        if f.contains_division() {
            return Err(format!("{} contains a division", f));
        }
        if f.function_depth() > MAX_FUNCTION_DEPTH {
            return Err(format!("{} is nested too deeply", f));
        }
        let derivative = f.diff(x).simplify();
        if derivative.is_zero() {
            return Err(format!("derivative of {} is zero", f));
        }
        // the simplifier does not catch every cancellation, look at actual values too
        let values: Vec<f64> = linspace(0.5, 3.0, 11)
            .into_iter()
            .filter_map(|t| derivative.eval1D(x, t).ok())
            .collect();
        if values.is_empty() {
            return Err(format!("derivative of {} is undefined on the sample points", f));
        }
        if values.iter().all(|v| v.abs() < 1e-12) {
            return Err(format!("derivative of {} vanishes on the sample points", f));
        }
        Ok(derivative)
    }
}

impl ProblemGenerator for DerivativesGenerator {
    fn kind(&self) -> ProblemKind {
        ProblemKind::Derivatives
    }

    fn generate(&self, rng: &mut StdRng) -> Result<Problem, GenerationError> {
        let mut last_reason = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            let f = self.generator.expression(self.term_range, rng);
            match self.check_candidate(&f) {
                Ok(derivative) => {
                    debug!("derivatives: accepted {} after {} attempts", f, attempt);
                    return Ok(Problem {
                        kind: ProblemKind::Derivatives,
                        statement: f.render(),
                        answer: derivative.render(),
                        latex: Some(LatexPair {
                            statement: f.to_latex(),
                            answer: derivative.to_latex(),
                        }),
                        graph: None,
                    });
                }
                Err(reason) => {
                    debug!("derivatives: attempt {} rejected: {}", attempt, reason);
                    last_reason = reason;
                }
            }
        }
        Err(GenerationError::new(ProblemKind::Derivatives, MAX_ATTEMPTS, last_reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_generated_problems_are_valid() {
        let generator = DerivativesGenerator::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..30 {
            let problem = generator.generate(&mut rng).unwrap();
            assert_eq!(problem.kind, ProblemKind::Derivatives);
            assert!(!problem.statement.is_empty());
            assert!(!problem.answer.is_empty());
            assert_ne!(problem.answer, "0");
            assert!(problem.latex.is_some());
            assert!(problem.graph.is_none());
        }
    }

    #[test]
    fn test_statements_have_no_negative_powers() {
        let generator = DerivativesGenerator::default();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let problem = generator.generate(&mut rng).unwrap();
            assert!(!problem.statement.contains("^(-"), "{}", problem.statement);
        }
    }

    #[test]
    fn test_answer_matches_numerical_derivative() {
        let generator = DerivativesGenerator::default();
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..10 {
            let f = generator.generator.expression((2, 4), &mut rng);
            if let Ok(derivative) = generator.check_candidate(&f) {
                for t in linspace(0.6, 2.4, 7) {
                    let (Ok(analytical), Ok(forward), Ok(backward)) = (
                        derivative.eval1D("x", t),
                        f.eval1D("x", t + 1e-6),
                        f.eval1D("x", t - 1e-6),
                    ) else {
                        continue;
                    };
                    let numerical = (forward - backward) / 2e-6;
                    assert!(
                        (analytical - numerical).abs() <= 1e-4 * analytical.abs().max(1.0),
                        "{} at {}: {} vs {}",
                        f,
                        t,
                        analytical,
                        numerical
                    );
                }
            }
        }
    }

    #[test]
    fn test_rejections() {
        let generator = DerivativesGenerator::default();
        let x = Expr::var("x");
        assert!(generator.check_candidate(&Expr::Const(4.0)).is_err());
        assert!(generator.check_candidate(&(Expr::Const(1.0) / x.clone())).is_err());
        assert!(generator.check_candidate(&(Expr::Const(5.0) * x.clone().powf(-1.0))).is_err());
        let deep = x.clone().sin().exp().ln().cos();
        assert!(generator.check_candidate(&deep).is_err());
        // x - x survives simplification of f but not of f'
        assert!(generator.check_candidate(&(x.clone() - x.clone())).is_err());
        let derivative = generator
            .check_candidate(&(Expr::Const(3.0) * x.clone().powf(2.0)))
            .unwrap();
        assert_eq!(derivative.render(), "6*x");
    }
}
