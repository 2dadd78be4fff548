//! Error types shared by the symbolic engine, the generators and the grid builder.
//!
//! - `DomainError` - an expression was evaluated where it is undefined; generators
//!   recover from it locally by drawing a new expression
//! - `GenerationError` - a generator ran out of attempts; fatal for the whole grid
//! - `ConfigurationError` - the grid request itself is invalid; raised before any generation
//! - `WorksheetError` - umbrella type returned by the grid build entry points
use crate::generators::ProblemKind;
use std::fmt;

/// Evaluation of an expression hit an undefined point.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    DivisionByZero { x: f64 },
    LogOfNonPositive { argument: f64, x: f64 },
    InvalidPower { base: f64, exponent: f64, x: f64 },
    NonFinite { operation: &'static str, x: f64 },
    UnboundVariable { name: String },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DomainError::DivisionByZero { x } => write!(f, "division by zero at x = {}", x),
            DomainError::LogOfNonPositive { argument, x } => {
                write!(f, "logarithm of non-positive value {} at x = {}", argument, x)
            }
            DomainError::InvalidPower { base, exponent, x } => {
                write!(f, "{}^{} is undefined (at x = {})", base, exponent, x)
            }
            DomainError::NonFinite { operation, x } => {
                write!(f, "{} produced a non-finite value at x = {}", operation, x)
            }
            DomainError::UnboundVariable { name } => {
                write!(f, "variable '{}' has no value", name)
            }
        }
    }
}

impl std::error::Error for DomainError {}

/// A generator exhausted its retry budget.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationError {
    pub kind: ProblemKind,
    /// Position of the failing problem in the grid, set by the grid builder.
    pub index: Option<usize>,
    pub attempts: usize,
    /// Why the last draw was rejected.
    pub reason: String,
}

impl GenerationError {
    pub fn new(kind: ProblemKind, attempts: usize, reason: impl Into<String>) -> Self {
        GenerationError {
            kind,
            index: None,
            attempts,
            reason: reason.into(),
        }
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.index {
            Some(index) => write!(
                f,
                "failed to generate {} problem #{} after {} attempts (last rejection: {})",
                self.kind,
                index + 1,
                self.attempts,
                self.reason
            ),
            None => write!(
                f,
                "failed to generate {} problem after {} attempts (last rejection: {})",
                self.kind, self.attempts, self.reason
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

/// The grid request is invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    UnknownProblemType(String),
    UnknownDifficulty(String),
    ProblemCountOutOfRange { n: i64, max: usize },
    InvalidRegion { x_left: f64, x_right: f64 },
    NegativeMargin { name: &'static str, value: f64 },
    ZeroColumns,
    MissingKey(String),
    InvalidValue { key: String, value: String },
    PageTooSmall { cell_width: f64, cell_height: f64 },
    Parse(String),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigurationError::UnknownProblemType(kind) => write!(
                f,
                "unsupported problem type '{}' (expected one of derivatives, volumes, taylor, nash, horizontal_tangent)",
                kind
            ),
            ConfigurationError::UnknownDifficulty(level) => write!(
                f,
                "unsupported difficulty '{}' (expected simple, hard or extreme)",
                level
            ),
            ConfigurationError::ProblemCountOutOfRange { n, max } => {
                write!(f, "problem count n = {} is outside 1..={}", n, max)
            }
            ConfigurationError::InvalidRegion { x_left, x_right } => write!(
                f,
                "region [{}, {}] is empty or not finite",
                x_left, x_right
            ),
            ConfigurationError::NegativeMargin { name, value } => {
                write!(f, "margin {} = {} must not be negative", name, value)
            }
            ConfigurationError::ZeroColumns => write!(f, "grid needs at least one column"),
            ConfigurationError::MissingKey(key) => write!(f, "required key '{}' is missing", key),
            ConfigurationError::InvalidValue { key, value } => {
                write!(f, "invalid value '{}' for key '{}'", value, key)
            }
            ConfigurationError::PageTooSmall {
                cell_width,
                cell_height,
            } => write!(
                f,
                "page leaves no room for the grid (cell {} x {})",
                cell_width, cell_height
            ),
            ConfigurationError::Parse(msg) => write!(f, "task document error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Any failure of a grid build.
#[derive(Debug, Clone, PartialEq)]
pub enum WorksheetError {
    Domain(DomainError),
    Generation(GenerationError),
    Configuration(ConfigurationError),
}

impl fmt::Display for WorksheetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WorksheetError::Domain(e) => write!(f, "domain error: {}", e),
            WorksheetError::Generation(e) => write!(f, "generation error: {}", e),
            WorksheetError::Configuration(e) => write!(f, "configuration error: {}", e),
        }
    }
}

impl std::error::Error for WorksheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorksheetError::Domain(e) => Some(e),
            WorksheetError::Generation(e) => Some(e),
            WorksheetError::Configuration(e) => Some(e),
        }
    }
}

impl From<DomainError> for WorksheetError {
    fn from(e: DomainError) -> Self {
        WorksheetError::Domain(e)
    }
}

impl From<GenerationError> for WorksheetError {
    fn from(e: GenerationError) -> Self {
        WorksheetError::Generation(e)
    }
}

impl From<ConfigurationError> for WorksheetError {
    fn from(e: ConfigurationError) -> Self {
        WorksheetError::Configuration(e)
    }
}
