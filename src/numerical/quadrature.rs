//! Adaptive Gauss-Legendre quadrature.
//!
//! Every panel is integrated twice, with a low and a high order Gauss-Legendre rule. A panel is
//! accepted when both estimates agree; otherwise it is bisected. Panels that reach the maximal
//! depth are accepted as they are and their disagreement is added to the error estimate, which
//! decides whether the whole integral met the requested relative tolerance.
//!
//! The integrand returns `Result<f64, DomainError>`, so a point where the integrand is undefined
//! aborts the integration instead of silently poisoning the sum with `NaN`.
use crate::errors::DomainError;
use gauss_quad::GaussLegendre;
use log::debug;
use std::cell::Cell;
use std::fmt;

/// Error types for the adaptive integrator
#[derive(Debug, Clone, PartialEq)]
pub enum QuadratureError {
    /// gauss-quad refused to build the rule
    RuleConstruction(String),
    InvalidInterval { a: f64, b: f64 },
    /// the integrand is undefined or not finite somewhere on the interval
    Domain(DomainError),
    /// estimated relative error stayed above the target
    ToleranceNotMet { value: f64, relative_error: f64 },
}

impl fmt::Display for QuadratureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuadratureError::RuleConstruction(msg) => {
                write!(f, "failed to create Gauss-Legendre rule: {}", msg)
            }
            QuadratureError::InvalidInterval { a, b } => {
                write!(f, "invalid integration interval [{}, {}]", a, b)
            }
            QuadratureError::Domain(e) => write!(f, "integrand undefined: {}", e),
            QuadratureError::ToleranceNotMet {
                value,
                relative_error,
            } => write!(
                f,
                "integral {} did not converge (estimated relative error {:.2e})",
                value, relative_error
            ),
        }
    }
}

impl std::error::Error for QuadratureError {}

impl From<DomainError> for QuadratureError {
    fn from(e: DomainError) -> Self {
        QuadratureError::Domain(e)
    }
}

/// Configuration of the adaptive integrator
#[derive(Debug, Clone)]
pub struct QuadratureConfig {
    /// nodes of the coarse rule
    pub low_degree: usize,
    /// nodes of the fine rule
    pub high_degree: usize,
    /// a panel is accepted when the two rules agree to this relative difference
    pub panel_tolerance: f64,
    /// required relative accuracy of the whole integral
    pub target_relative_error: f64,
    pub max_depth: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            low_degree: 10,
            high_degree: 20,
            panel_tolerance: 1e-10,
            target_relative_error: 1e-6,
            max_depth: 40,
        }
    }
}

/// Result of an adaptive integration
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureResult {
    pub value: f64,
    /// sum of |high - low| over the accepted panels
    pub error_estimate: f64,
    pub panels: usize,
}

impl QuadratureResult {
    pub fn relative_error(&self) -> f64 {
        if self.value == 0.0 {
            self.error_estimate
        } else {
            self.error_estimate / self.value.abs()
        }
    }
}

pub struct AdaptiveGaussLegendre {
    low: GaussLegendre,
    high: GaussLegendre,
    config: QuadratureConfig,
}

impl AdaptiveGaussLegendre {
    /// Integrator with the default 10/20 node pair.
    pub fn new() -> Result<Self, QuadratureError> {
        Self::with_config(QuadratureConfig::default())
    }

    pub fn with_config(config: QuadratureConfig) -> Result<Self, QuadratureError> {
        let low = GaussLegendre::new(config.low_degree)
            .map_err(|e| QuadratureError::RuleConstruction(format!("{:?}", e)))?;
        let high = GaussLegendre::new(config.high_degree)
            .map_err(|e| QuadratureError::RuleConstruction(format!("{:?}", e)))?;
        Ok(Self { low, high, config })
    }

    pub fn config(&self) -> &QuadratureConfig {
        &self.config
    }

    /// Integrates `f` over `[a, b]`.
    ///
    /// # Errors
    /// `Domain` if `f` fails or returns a non-finite value at any node, `ToleranceNotMet` if the
    /// estimated relative error of the result exceeds the configured target.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> Result<QuadratureResult, QuadratureError>
    where
        F: Fn(f64) -> Result<f64, DomainError>,
    {
        if !a.is_finite() || !b.is_finite() || a > b {
            return Err(QuadratureError::InvalidInterval { a, b });
        }
        if a == b {
            return Ok(QuadratureResult {
                value: 0.0,
                error_estimate: 0.0,
                panels: 0,
            });
        }
        // gauss-quad wants a plain f64 integrand, the first failure is parked here
        let failure: Cell<Option<DomainError>> = Cell::new(None);
        let integrand = |x: f64| -> f64 {
            match f(x) {
                Ok(y) if y.is_finite() => y,
                Ok(_) => {
                    record_failure(&failure, DomainError::NonFinite { operation: "integrand", x });
                    0.0
                }
                Err(e) => {
                    record_failure(&failure, e);
                    0.0
                }
            }
        };

        let mut result = QuadratureResult {
            value: 0.0,
            error_estimate: 0.0,
            panels: 0,
        };
        let coarse = self.high.integrate(a, b, &integrand);
        self.refine(&integrand, a, b, coarse, 0, &mut result);
        if let Some(e) = failure.take() {
            return Err(QuadratureError::Domain(e));
        }
        if !result.value.is_finite() {
            return Err(QuadratureError::Domain(DomainError::NonFinite {
                operation: "quadrature",
                x: b,
            }));
        }
        debug!(
            "quadrature over [{}, {}]: {} with {} panels, estimated relative error {:.2e}",
            a,
            b,
            result.value,
            result.panels,
            result.relative_error()
        );
        if result.relative_error() > self.config.target_relative_error {
            return Err(QuadratureError::ToleranceNotMet {
                value: result.value,
                relative_error: result.relative_error(),
            });
        }
        Ok(result)
    }

    // `whole` is the high order estimate over [a, b], passed down to avoid recomputing it
    fn refine<F>(&self, f: &F, a: f64, b: f64, whole: f64, depth: usize, acc: &mut QuadratureResult)
    where
        F: Fn(f64) -> f64,
    {
        let low = self.low.integrate(a, b, f);
        let difference = (whole - low).abs();
        let converged = difference <= self.config.panel_tolerance * whole.abs()
            || difference <= f64::EPSILON * (b - a);
        if converged || depth >= self.config.max_depth || !difference.is_finite() {
            acc.value += whole;
            acc.error_estimate += difference;
            acc.panels += 1;
            return;
        }
        let mid = 0.5 * (a + b);
        let left = self.high.integrate(a, mid, f);
        let right = self.high.integrate(mid, b, f);
        self.refine(f, a, mid, left, depth + 1, acc);
        self.refine(f, mid, b, right, depth + 1, acc);
    }
}

fn record_failure(slot: &Cell<Option<DomainError>>, error: DomainError) {
    let first = slot.take();
    slot.set(first.or(Some(error)));
}
