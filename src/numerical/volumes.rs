//! Volume/graph engine for solids of revolution.
//!
//! Given a generated curve `y = f(x)` it
//! 1) finds a rotation region, either the one requested by the grid or a sub-interval of the
//!    curve's natural domain inside the sampling window,
//! 2) checks that the curve is renderable and rotatable there (defined, positive, bounded, no jumps),
//! 3) integrates `π ∫ f(x)² dx` with the adaptive Gauss-Legendre rule,
//! 4) samples `(x, y)` points for the graph.
use crate::errors::DomainError;
use crate::numerical::quadrature::{AdaptiveGaussLegendre, QuadratureError};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::linspace;
use log::debug;
use rand::Rng;
use std::f64::consts::PI;
use std::fmt;

/// Parameters of curve validation and sampling
#[derive(Debug, Clone)]
pub struct VolumeConfig {
    /// where the natural domain is searched when the grid gives no region
    pub window: (f64, f64),
    /// largest |f(x)| a curve may reach on its region
    pub magnitude_bound: f64,
    /// largest change of f between neighbouring validation samples
    pub max_jump: f64,
    pub validation_points: usize,
    pub plot_points: usize,
    /// significant digits of the printed volume
    pub significant_digits: u32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            window: (1.0, 15.0),
            magnitude_bound: 1e2,
            max_jump: 25.0,
            validation_points: 401,
            plot_points: 200,
            significant_digits: 6,
        }
    }
}

/// Why a curve cannot be used on a region
#[derive(Debug, Clone, PartialEq)]
pub enum CurveRejection {
    Undefined(DomainError),
    NonPositive { x: f64, y: f64 },
    TooLarge { x: f64, y: f64 },
    Jump { x: f64, dy: f64 },
    /// no integer interval of positive length fits into the natural domain
    EmptyDomain,
}

impl fmt::Display for CurveRejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CurveRejection::Undefined(e) => write!(f, "curve undefined: {}", e),
            CurveRejection::NonPositive { x, y } => {
                write!(f, "curve is not positive at x = {} (y = {})", x, y)
            }
            CurveRejection::TooLarge { x, y } => {
                write!(f, "curve exceeds the magnitude bound at x = {} (y = {})", x, y)
            }
            CurveRejection::Jump { x, dy } => {
                write!(f, "curve jumps by {} near x = {}", dy, x)
            }
            CurveRejection::EmptyDomain => write!(f, "natural domain too short for a region"),
        }
    }
}

impl From<DomainError> for CurveRejection {
    fn from(e: DomainError) -> Self {
        CurveRejection::Undefined(e)
    }
}

/// Graph data handed over to the plotting side: curve label, region, sampled points
#[derive(Debug, Clone, PartialEq)]
pub struct CurveGraph {
    pub label: String,
    pub region: (f64, f64),
    pub points: Vec<(f64, f64)>,
}

impl CurveGraph {
    pub fn new(curve: &Expr, var: &str, region: (f64, f64), num_points: usize) -> Result<Self, DomainError> {
        Ok(CurveGraph {
            label: curve.render(),
            region,
            points: sample_curve(curve, var, region, num_points)?,
        })
    }

    /// y-range of the sampled points
    pub fn y_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
                (lo.min(y), hi.max(y))
            })
    }
}

fn is_acceptable(y: f64, config: &VolumeConfig) -> bool {
    y.is_finite() && y > 0.0 && y.abs() <= config.magnitude_bound
}

/// Longest run of acceptable samples of `curve` over `window`.
pub fn natural_domain(
    curve: &Expr,
    var: &str,
    window: (f64, f64),
    config: &VolumeConfig,
) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    let mut current: Option<(f64, f64)> = None;
    for (x, y) in curve.eval_on_linspace(var, window.0, window.1, config.validation_points) {
        match y {
            Ok(y) if is_acceptable(y, config) => {
                current = Some(match current {
                    Some((start, _)) => (start, x),
                    None => (x, x),
                });
            }
            _ => current = None,
        }
        if let Some((start, end)) = current {
            if best.is_none_or(|(b_start, b_end)| end - start > b_end - b_start) {
                best = Some((start, end));
            }
        }
    }
    best
}

/// Draws integer bounds `a < b` inside `domain`.
pub fn draw_integer_region<R: Rng + ?Sized>(domain: (f64, f64), rng: &mut R) -> Option<(f64, f64)> {
    let lo = domain.0.ceil() as i64;
    let hi = domain.1.floor() as i64;
    if hi - lo < 1 {
        return None;
    }
    let a = rng.random_range(lo..hi);
    let b = rng.random_range(a + 1..=hi);
    Some((a as f64, b as f64))
}

/// Checks the curve on `region`: defined everywhere, positive, within the magnitude bound,
/// and without jumps between neighbouring samples.
pub fn validate_curve(
    curve: &Expr,
    var: &str,
    region: (f64, f64),
    config: &VolumeConfig,
) -> Result<(), CurveRejection> {
    let mut previous: Option<f64> = None;
    for x in linspace(region.0, region.1, config.validation_points) {
        let y = curve.eval1D(var, x)?;
        if y <= 0.0 {
            return Err(CurveRejection::NonPositive { x, y });
        }
        if y.abs() > config.magnitude_bound {
            return Err(CurveRejection::TooLarge { x, y });
        }
        if let Some(prev) = previous {
            let dy = (y - prev).abs();
            if dy > config.max_jump {
                return Err(CurveRejection::Jump { x, dy });
            }
        }
        previous = Some(y);
    }
    Ok(())
}

/// `num_points` evenly spaced `(x, f(x))` pairs over `region`.
pub fn sample_curve(
    curve: &Expr,
    var: &str,
    region: (f64, f64),
    num_points: usize,
) -> Result<Vec<(f64, f64)>, DomainError> {
    linspace(region.0, region.1, num_points)
        .into_iter()
        .map(|x| Ok((x, curve.eval1D(var, x)?)))
        .collect()
}

/// Disk-method volume `π ∫_a^b f(x)² dx`.
pub fn rotation_volume(
    curve: &Expr,
    var: &str,
    region: (f64, f64),
    quad: &AdaptiveGaussLegendre,
) -> Result<f64, QuadratureError> {
    let result = quad.integrate(
        |x| {
            let y = curve.eval1D(var, x)?;
            Ok(y * y)
        },
        region.0,
        region.1,
    )?;
    let volume = PI * result.value;
    debug!(
        "volume of {} on [{}, {}] = {} ({} panels)",
        curve, region.0, region.1, volume, result.panels
    );
    Ok(volume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_cylinder_and_cone() {
        let quad = AdaptiveGaussLegendre::new().unwrap();
        let cylinder = rotation_volume(&Expr::Const(2.0), "x", (0.0, 3.0), &quad).unwrap();
        assert_relative_eq!(cylinder, PI * 4.0 * 3.0, max_relative = 1e-12);
        let cone = rotation_volume(&x(), "x", (0.0, 3.0), &quad).unwrap();
        assert_relative_eq!(cone, PI * 9.0, max_relative = 1e-12);
    }

    #[test]
    fn test_volume_split_interval_additivity() {
        let quad = AdaptiveGaussLegendre::new().unwrap();
        let curve = x().sin() + Expr::Const(2.0) + x().ln();
        let whole = rotation_volume(&curve, "x", (0.5, 4.0), &quad).unwrap();
        let left = rotation_volume(&curve, "x", (0.5, 2.2), &quad).unwrap();
        let right = rotation_volume(&curve, "x", (2.2, 4.0), &quad).unwrap();
        assert_relative_eq!(whole, left + right, max_relative = 1e-6);
    }

    #[test]
    fn test_volume_of_undefined_curve_is_an_error() {
        let quad = AdaptiveGaussLegendre::new().unwrap();
        let curve = x().ln().powf(0.5);
        assert!(rotation_volume(&curve, "x", (0.5, 2.0), &quad).is_err());
    }

    #[test]
    fn test_natural_domain() {
        let config = VolumeConfig::default();
        // ln(x) is not positive at x = 1
        let (start, end) = natural_domain(&x().ln(), "x", (1.0, 15.0), &config).unwrap();
        assert!(start > 1.0 && start < 1.1);
        assert_eq!(end, 15.0);
        // sqrt(x - 3) starts right after 3
        let curve = (x() - Expr::Const(3.0)).powf(0.5);
        let (start, _) = natural_domain(&curve, "x", (1.0, 15.0), &config).unwrap();
        assert!(start > 3.0 && start < 3.1);
        // never positive
        assert_eq!(natural_domain(&(-x()), "x", (1.0, 15.0), &config), None);
    }

    #[test]
    fn test_draw_integer_region() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let (a, b) = draw_integer_region((1.2, 9.7), &mut rng).unwrap();
            assert!(a >= 2.0 && b <= 9.0 && a < b);
            assert_eq!(a.fract(), 0.0);
            assert_eq!(b.fract(), 0.0);
        }
        assert_eq!(draw_integer_region((1.2, 1.9), &mut rng), None);
    }

    #[test]
    fn test_validate_curve() {
        let config = VolumeConfig::default();
        assert_eq!(validate_curve(&(x() + Expr::Const(1.0)), "x", (0.0, 5.0), &config), Ok(()));
        assert!(matches!(
            validate_curve(&(x() - Expr::Const(2.0)), "x", (0.0, 5.0), &config),
            Err(CurveRejection::NonPositive { .. })
        ));
        assert!(matches!(
            validate_curve(&x().exp(), "x", (0.0, 10.0), &config),
            Err(CurveRejection::TooLarge { .. })
        ));
        assert!(matches!(
            validate_curve(&x().ln(), "x", (-1.0, 2.0), &config),
            Err(CurveRejection::Undefined(_))
        ));
        let strict = VolumeConfig {
            max_jump: 0.01,
            ..VolumeConfig::default()
        };
        assert!(matches!(
            validate_curve(&(Expr::Const(10.0) * x()), "x", (0.1, 1.0), &strict),
            Err(CurveRejection::Jump { .. })
        ));
    }

    #[test]
    fn test_curve_graph() {
        let graph = CurveGraph::new(&(x().powf(2.0) + Expr::Const(1.0)), "x", (0.0, 2.0), 200).unwrap();
        assert_eq!(graph.points.len(), 200);
        assert_eq!(graph.points[0], (0.0, 1.0));
        assert_eq!(graph.points[199], (2.0, 5.0));
        assert_eq!(graph.label, "x^2 + 1");
        assert_eq!(graph.y_range(), (1.0, 5.0));
    }
}
