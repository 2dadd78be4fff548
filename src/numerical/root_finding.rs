use crate::errors::DomainError;
use crate::symbolic::utils::linspace;
use log::debug;
use std::fmt;

/// Error types for root finding methods
#[derive(Debug, Clone, PartialEq)]
pub enum RootFindingError {
    MaxIterationsReached,
    InvalidInterval { a: f64, b: f64 },
    /// f(a) and f(b) have the same sign
    NoSignChange { a: f64, b: f64 },
    Domain(DomainError),
}

impl fmt::Display for RootFindingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RootFindingError::MaxIterationsReached => write!(f, "Maximum iterations reached"),
            RootFindingError::InvalidInterval { a, b } => {
                write!(f, "Invalid interval [{}, {}] for bisection method", a, b)
            }
            RootFindingError::NoSignChange { a, b } => {
                write!(f, "Function does not change sign on [{}, {}]", a, b)
            }
            RootFindingError::Domain(e) => write!(f, "Function undefined: {}", e),
        }
    }
}

impl std::error::Error for RootFindingError {}

impl From<DomainError> for RootFindingError {
    fn from(e: DomainError) -> Self {
        RootFindingError::Domain(e)
    }
}

/// Configuration for root finding methods
#[derive(Debug, Clone)]
pub struct RootFindingConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
    /// number of sample points of the sign-change scan
    pub scan_points: usize,
    /// largest |f| at a critical point that still counts as a touching root
    pub touch_tolerance: f64,
}

impl Default for RootFindingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            scan_points: 2001,
            touch_tolerance: 1e-9,
        }
    }
}

pub struct ScalarRootFinder {
    config: RootFindingConfig,
}

impl ScalarRootFinder {
    pub fn new() -> Self {
        Self {
            config: RootFindingConfig::default(),
        }
    }

    pub fn with_config(config: RootFindingConfig) -> Self {
        Self { config }
    }

    /// Bisection method, requires f(a) and f(b) of opposite signs
    pub fn bisection<F>(&self, f: &F, mut a: f64, mut b: f64) -> Result<f64, RootFindingError>
    where
        F: Fn(f64) -> Result<f64, DomainError> + ?Sized,
    {
        if !(a.is_finite() && b.is_finite()) || a == b {
            return Err(RootFindingError::InvalidInterval { a, b });
        }
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        let mut fa = f(a)?;
        let fb = f(b)?;
        if fa == 0.0 {
            return Ok(a);
        }
        if fb == 0.0 {
            return Ok(b);
        }
        if fa.signum() == fb.signum() {
            return Err(RootFindingError::NoSignChange { a, b });
        }
        for _ in 0..self.config.max_iterations {
            let c = 0.5 * (a + b);
            let fc = f(c)?;
            if fc == 0.0 || 0.5 * (b - a) < self.config.tolerance {
                return Ok(c);
            }
            if fa.signum() == fc.signum() {
                a = c;
                fa = fc;
            } else {
                b = c;
            }
        }
        Err(RootFindingError::MaxIterationsReached)
    }

    /// All roots of `f` on `[a, b]` found by scanning for sign changes between neighbouring
    /// sample points and refining each bracket by bisection. Samples where `f` is undefined
    /// break the scan, so brackets never straddle a gap of the domain. Exact zeros at sample
    /// points are reported as roots. Roots closer than the tolerance are merged.
    ///
    /// Roots where `f` touches zero without changing sign are missed, use
    /// [`ScalarRootFinder::find_all_roots_with_derivative`] for those.
    pub fn find_all_roots<F>(&self, f: &F, a: f64, b: f64) -> Result<Vec<f64>, RootFindingError>
    where
        F: Fn(f64) -> Result<f64, DomainError>,
    {
        self.scan(f, None, a, b)
    }

    /// Same scan as [`ScalarRootFinder::find_all_roots`], plus roots of even multiplicity:
    /// at every interior local minimum of `|f|` without a sign change the critical point
    /// is bracketed by a sign change of `df` and refined by bisection. It is a root when
    /// `|f|` there is below `touch_tolerance`.
    pub fn find_all_roots_with_derivative<F, G>(
        &self,
        f: &F,
        df: &G,
        a: f64,
        b: f64,
    ) -> Result<Vec<f64>, RootFindingError>
    where
        F: Fn(f64) -> Result<f64, DomainError>,
        G: Fn(f64) -> Result<f64, DomainError>,
    {
        self.scan(f, Some(df as &dyn Fn(f64) -> Result<f64, DomainError>), a, b)
    }

    fn scan<F>(
        &self,
        f: &F,
        df: Option<&dyn Fn(f64) -> Result<f64, DomainError>>,
        a: f64,
        b: f64,
    ) -> Result<Vec<f64>, RootFindingError>
    where
        F: Fn(f64) -> Result<f64, DomainError>,
    {
        if !(a.is_finite() && b.is_finite()) || a >= b {
            return Err(RootFindingError::InvalidInterval { a, b });
        }
        let samples: Vec<(f64, Option<f64>)> = linspace(a, b, self.config.scan_points)
            .into_iter()
            .map(|x| (x, f(x).ok()))
            .collect();

        let mut roots: Vec<f64> = Vec::new();
        for window in samples.windows(2) {
            let (x0, y0) = window[0];
            let (x1, y1) = window[1];
            let (Some(y0), Some(y1)) = (y0, y1) else {
                continue;
            };
            if y0 == 0.0 {
                roots.push(x0);
            } else if y1 != 0.0 && y0.signum() != y1.signum() {
                // a pole also flips the sign; accept only brackets where |f| shrinks to zero
                let refined = self
                    .bisection(f, x0, x1)
                    .and_then(|root| Ok((root, f(root)?)));
                match refined {
                    Ok((root, value)) if value.abs() <= y0.abs().max(y1.abs()) => roots.push(root),
                    Ok(_) => debug!("sign change on [{}, {}] is a pole, skipped", x0, x1),
                    Err(e) => debug!("bracket [{}, {}] skipped: {}", x0, x1, e),
                }
            }
        }
        if let Some((x_last, Some(y_last))) = samples.last() {
            if *y_last == 0.0 {
                roots.push(*x_last);
            }
        }
        if let Some(df) = df {
            for window in samples.windows(3) {
                let (x0, y0) = window[0];
                let (_, y1) = window[1];
                let (x2, y2) = window[2];
                let (Some(y0), Some(y1), Some(y2)) = (y0, y1, y2) else {
                    continue;
                };
                let same_sign = y1 != 0.0 && y0.signum() == y1.signum() && y1.signum() == y2.signum();
                if !same_sign || y1.abs() > y0.abs() || y1.abs() >= y2.abs() {
                    continue;
                }
                match self.bisection(df, x0, x2).and_then(|c| Ok((c, f(c)?))) {
                    Ok((c, value)) if value.abs() <= self.config.touch_tolerance => roots.push(c),
                    Ok(_) => {}
                    Err(e) => debug!("minimum of |f| on [{}, {}] skipped: {}", x0, x2, e),
                }
            }
        }
        roots.sort_by(|lhs, rhs| lhs.total_cmp(rhs));
        let mut merged: Vec<f64> = Vec::with_capacity(roots.len());
        for root in roots {
            push_root(&mut merged, root, self.config.tolerance);
        }
        Ok(merged)
    }
}

impl Default for ScalarRootFinder {
    fn default() -> Self {
        Self::new()
    }
}

fn push_root(roots: &mut Vec<f64>, root: f64, tolerance: f64) {
    let duplicate = roots
        .last()
        .is_some_and(|last| (root - last).abs() <= 1e3 * tolerance);
    if !duplicate {
        roots.push(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;

    #[test]
    fn test_bisection() {
        let finder = ScalarRootFinder::new();
        let root = finder.bisection(&|x: f64| Ok(x * x - 2.0), 0.0, 2.0).unwrap();
        assert_relative_eq!(root, 2f64.sqrt(), epsilon = 1e-9);
        assert_eq!(
            finder.bisection(&|x: f64| Ok(x * x + 1.0), -1.0, 2.0),
            Err(RootFindingError::NoSignChange { a: -1.0, b: 2.0 })
        );
    }

    #[test]
    fn test_all_roots_of_cubic() {
        // (x + 2)(x - 0.5)(x - 3)
        let finder = ScalarRootFinder::new();
        let f = |x: f64| Ok((x + 2.0) * (x - 0.5) * (x - 3.0));
        let roots = finder.find_all_roots(&f, -5.0, 5.0).unwrap();
        assert_eq!(roots.len(), 3);
        for (root, expected) in roots.iter().zip([-2.0, 0.5, 3.0]) {
            assert_relative_eq!(*root, expected, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_roots_of_symbolic_derivative() {
        // horizontal tangents of sin(x) on [-5, 5]: ±pi/2, ±3pi/2
        let x = Expr::var("x");
        let derivative = x.sin().diff("x");
        let finder = ScalarRootFinder::new();
        let roots = finder
            .find_all_roots(&|t| derivative.eval1D("x", t), -5.0, 5.0)
            .unwrap();
        let half_pi = std::f64::consts::FRAC_PI_2;
        let expected = [-3.0 * half_pi, -half_pi, half_pi, 3.0 * half_pi];
        assert_eq!(roots.len(), 4);
        for (root, expected) in roots.iter().zip(expected) {
            assert_relative_eq!(*root, expected, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_touching_roots() {
        // f = (x - 1)^2 (x + 2): double root at 1, simple root at -2
        let finder = ScalarRootFinder::new();
        let f = |x: f64| Ok((x - 1.0).powi(2) * (x + 2.0));
        let df = |x: f64| Ok(2.0 * (x - 1.0) * (x + 2.0) + (x - 1.0).powi(2));
        assert_eq!(finder.find_all_roots(&f, -3.3, 3.1).unwrap().len(), 1);
        let roots = finder.find_all_roots_with_derivative(&f, &df, -3.3, 3.1).unwrap();
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], -2.0, epsilon = 1e-8);
        assert_relative_eq!(roots[1], 1.0, epsilon = 1e-8);
        // x^2 + 1 has a minimum but no root
        let roots = finder
            .find_all_roots_with_derivative(&|x: f64| Ok(x * x + 1.0), &|x: f64| Ok(2.0 * x), -3.3, 3.1)
            .unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn test_poles_are_not_roots() {
        let finder = ScalarRootFinder::new();
        // tan has poles at ±pi/2 and a root at 0
        let roots = finder.find_all_roots(&|x: f64| Ok(x.tan()), -2.0, 2.0).unwrap();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].abs() < 1e-8);
        // 1/x is undefined at the sample x = 0
        let roots = finder
            .find_all_roots(
                &|x: f64| {
                    if x == 0.0 {
                        Err(DomainError::DivisionByZero { x })
                    } else {
                        Ok(1.0 / x)
                    }
                },
                -1.0,
                1.0,
            )
            .unwrap();
        assert!(roots.is_empty());
    }
}
