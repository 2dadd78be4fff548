//! # Problem generators
//!
//! One generator per problem type. Each draws random candidates from the shared expression
//! grammar (or a random payoff table for `nash`), rejects degenerate draws and returns a
//! [`Problem`] with its statement and answer. Rejection loops are bounded by a `MAX_ATTEMPTS`
//! constant per generator; running out of attempts is a [`GenerationError`].
//!
//! The set of problem types is closed, so the generators are dispatched through the
//! [`Generator`] enum (`enum_dispatch`) rather than trait objects.
//!
//! ## Example
//! ```
//! use RustedWorksheets::generators::{Generator, ProblemGenerator, ProblemKind};
//! use RustedWorksheets::generators::derivatives::DerivativesGenerator;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! let generator: Generator = DerivativesGenerator::default().into();
//! let mut rng = StdRng::seed_from_u64(2024);
//! let problem = generator.generate(&mut rng).unwrap();
//! assert_eq!(problem.kind, ProblemKind::Derivatives);
//! assert!(!problem.statement.is_empty() && !problem.answer.is_empty());
//! ```
use crate::errors::GenerationError;
use crate::numerical::volumes::CurveGraph;
use enum_dispatch::enum_dispatch;
use rand::rngs::StdRng;
use strum_macros::{Display, EnumIter, EnumString};

/// random expressions from function families, shared by the calculus generators
pub mod expression_generator;
/// differentiate a random sum of terms
pub mod derivatives;
/// horizontal tangents: solve f'(x) = 0 numerically
pub mod horizontal_tangent;
/// 2x2 games: pure and mixed Nash equilibria
pub mod nash;
/// second order Taylor polynomials around a center
pub mod taylor;
/// volumes of revolution of a generated curve
pub mod volumes;

use derivatives::DerivativesGenerator;
use horizontal_tangent::HorizontalTangentGenerator;
use nash::NashGenerator;
use taylor::TaylorGenerator;
use volumes::VolumesGenerator;

/// Problem type of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ProblemKind {
    Derivatives,
    Volumes,
    Taylor,
    Nash,
    HorizontalTangent,
}

/// Difficulty level, only the volume generator looks at it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Simple,
    Hard,
    Extreme,
}

/// Typesetting-ready statement and answer
#[derive(Debug, Clone, PartialEq)]
pub struct LatexPair {
    pub statement: String,
    pub answer: String,
}

/// A generated exercise with its answer
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub statement: String,
    pub answer: String,
    pub latex: Option<LatexPair>,
    /// graph of the generating curve (volumes only)
    pub graph: Option<CurveGraph>,
}

#[enum_dispatch]
pub trait ProblemGenerator {
    fn kind(&self) -> ProblemKind;
    /// Draws one problem. All randomness comes from `rng`.
    fn generate(&self, rng: &mut StdRng) -> Result<Problem, GenerationError>;
}

#[enum_dispatch(ProblemGenerator)]
pub enum Generator {
    DerivativesGenerator,
    VolumesGenerator,
    TaylorGenerator,
    NashGenerator,
    HorizontalTangentGenerator,
}
