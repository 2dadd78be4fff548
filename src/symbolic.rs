#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) builds symbolic expressions of one variable
/// 2) differentiates them exactly and expands them into Taylor polynomials
/// 3) evaluates them with domain checks
/// 4) turns them into plain text and LaTeX for the worksheets
///# Example#
/// ```
/// use RustedWorksheets::symbolic::symbolic_engine::Expr;
/// let x = Expr::var("x");
/// // f(x) = 3*x^2 + sin(2*x)
/// let f = Expr::Const(3.0) * x.clone().powf(2.0) + (Expr::Const(2.0) * x.clone()).sin();
/// let df_dx = f.diff("x").simplify();
/// assert_eq!(df_dx.render(), "6*x + 2*cos(2*x)");
/// let value = df_dx.eval1D("x", 0.0).unwrap();
/// assert_eq!(value, 2.0);
/// let taylor = f.taylor2("x", 1.0).unwrap();
/// assert!((taylor.eval1D("x", 1.0).unwrap() - f.eval1D("x", 1.0).unwrap()).abs() < 1e-12);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
/// differentiation, checked evaluation, Taylor polynomials
pub mod symbolic_engine_derivatives;
/// plain text and LaTeX rendering
pub mod symbolic_render;
/// algebraic clean-up of generated expressions
pub mod symbolic_simplify;
/// small numeric helpers: linspace, central differences, rounding
pub mod utils;
mod symbolic_engine_tests;
