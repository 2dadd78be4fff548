//! # Numerical engine
//!
//! Numeric side of the worksheet generators.
//!
//! ## Example
//! ```
//! use RustedWorksheets::numerical::quadrature::AdaptiveGaussLegendre;
//! use RustedWorksheets::numerical::volumes::rotation_volume;
//! use RustedWorksheets::symbolic::symbolic_engine::Expr;
//! // rotating y = x around the x axis on [0, 3] gives a cone of volume 9*pi
//! let quad = AdaptiveGaussLegendre::new().unwrap();
//! let volume = rotation_volume(&Expr::var("x"), "x", (0.0, 3.0), &quad).unwrap();
//! assert!((volume - 9.0 * std::f64::consts::PI).abs() < 1e-9);
//! ```

/// adaptive Gauss-Legendre quadrature (10 vs 20 nodes per panel) built on gauss-quad
pub mod quadrature;
/// sign-change scan and bisection, used to find horizontal tangents
pub mod root_finding;
/// regions, validation, sampling and rotation volume of generated curves
pub mod volumes;
