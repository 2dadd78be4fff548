//! # Symbolic Engine Derivatives Module
//!
//! Differentiation, checked evaluation and Taylor expansion of single variable expressions.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var)` - exact analytical derivative
//! - `n_th_derivative1D(var, n)` - repeated differentiation with simplification
//!
//! ### Evaluation
//! - `eval1D(var, x)` - evaluation with domain checks, `Err(DomainError)` where undefined
//! - `lambdify1D(var)` - closure returning `NaN` where undefined, for quadrature and sampling
//!
//! ### Numerical Analysis
//! - `compare_num1D()` - analytical derivative versus central difference
//! - `taylor2()` / `taylor_series1D()` - Taylor polynomials from exact derivative values
//!
//! ## Interesting Code Features
//!
//! 1. **Power rule in three flavours**: constant exponent, constant base, and logarithmic
//!    differentiation when both depend on the variable
//! 2. **Fail-fast evaluation**: every intermediate result is checked, so a `NaN` never
//!    leaks out of `eval1D`

use crate::errors::DomainError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{central_difference, linspace};

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// - Power rule: d/dx(u^n) = n*u^(n-1)*u'
    /// - Exponential rule: d/dx(a^v) = a^v*ln(a)*v'
    /// - General power: d/dx(u^v) = u^v*(v'*ln(u) + v*u'/u)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule for every named function
    ///
    /// The result is not simplified; call `simplify()` for printing.
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) => {
                let base_depends = base.contains_variable(var);
                let exp_depends = exp.contains_variable(var);
                match (base_depends, exp_depends) {
                    (_, false) => {
                        let lowered = match exp.as_ref() {
                            Expr::Const(n) => Expr::Const(n - 1.0),
                            _ => Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0))),
                        };
                        Expr::Mul(
                            Box::new(Expr::Mul(
                                exp.clone(),
                                Box::new(Expr::Pow(base.clone(), Box::new(lowered))),
                            )),
                            Box::new(base.diff(var)),
                        )
                    }
                    (false, true) => Expr::Mul(
                        Box::new(Expr::Mul(Box::new(self.clone()), Box::new(Expr::Ln(base.clone())))),
                        Box::new(exp.diff(var)),
                    ),
                    (true, true) => Expr::Mul(
                        Box::new(self.clone()),
                        Box::new(Expr::Add(
                            Box::new(Expr::Mul(Box::new(exp.diff(var)), Box::new(Expr::Ln(base.clone())))),
                            Box::new(Expr::Div(
                                Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                                base.clone(),
                            )),
                        )),
                    ),
                }
            }
            Expr::Neg(expr) => Expr::Neg(Box::new(expr.diff(var))),
            Expr::Exp(expr) => Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var))),
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var))),
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Neg(Box::new(Expr::sin(expr.clone())))),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::cos(expr.clone())),
                    Box::new(Expr::Const(2.0)),
                )),
            ),
            Expr::sinh(expr) => Expr::Mul(Box::new(Expr::cosh(expr.clone())), Box::new(expr.diff(var))),
            Expr::cosh(expr) => Expr::Mul(Box::new(Expr::sinh(expr.clone())), Box::new(expr.diff(var))),
        }
    } // end of diff

    /// Computes the nth derivative, simplifying after every step.
    pub fn n_th_derivative1D(&self, var_name: &str, n: usize) -> Expr {
        let mut expr = self.clone();
        for _ in 0..n {
            expr = expr.diff(var_name).simplify();
        }
        expr
    }

    /// DIRECT EXPRESSION EVALUATION

    /// Evaluates the expression at `var = x`.
    ///
    /// # Errors
    /// `DomainError` when any subexpression is undefined at `x`: division by zero, logarithm of a
    /// non-positive number, negative base with a non-integer exponent, zero to a negative power,
    /// a variable other than `var`, or any intermediate overflow/NaN.
    pub fn eval1D(&self, var: &str, x: f64) -> Result<f64, DomainError> {
        fn finite(value: f64, operation: &'static str, x: f64) -> Result<f64, DomainError> {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(DomainError::NonFinite { operation, x })
            }
        }

        match self {
            Expr::Var(name) => {
                if name == var {
                    finite(x, "variable", x)
                } else {
                    Err(DomainError::UnboundVariable { name: name.clone() })
                }
            }
            Expr::Const(val) => finite(*val, "constant", x),
            Expr::Add(lhs, rhs) => finite(lhs.eval1D(var, x)? + rhs.eval1D(var, x)?, "addition", x),
            Expr::Sub(lhs, rhs) => finite(lhs.eval1D(var, x)? - rhs.eval1D(var, x)?, "subtraction", x),
            Expr::Mul(lhs, rhs) => {
                finite(lhs.eval1D(var, x)? * rhs.eval1D(var, x)?, "multiplication", x)
            }
            Expr::Div(lhs, rhs) => {
                let numerator = lhs.eval1D(var, x)?;
                let denominator = rhs.eval1D(var, x)?;
                if denominator == 0.0 {
                    return Err(DomainError::DivisionByZero { x });
                }
                finite(numerator / denominator, "division", x)
            }
            Expr::Pow(base, exp) => {
                let base_val = base.eval1D(var, x)?;
                let exp_val = exp.eval1D(var, x)?;
                if base_val < 0.0 && exp_val.fract() != 0.0 {
                    return Err(DomainError::InvalidPower {
                        base: base_val,
                        exponent: exp_val,
                        x,
                    });
                }
                if base_val == 0.0 && exp_val < 0.0 {
                    return Err(DomainError::InvalidPower {
                        base: base_val,
                        exponent: exp_val,
                        x,
                    });
                }
                let value = if exp_val.fract() == 0.0 && exp_val.abs() <= i32::MAX as f64 {
                    base_val.powi(exp_val as i32)
                } else {
                    base_val.powf(exp_val)
                };
                finite(value, "power", x)
            }
            Expr::Neg(expr) => Ok(-expr.eval1D(var, x)?),
            Expr::Exp(expr) => finite(expr.eval1D(var, x)?.exp(), "exp", x),
            Expr::Ln(expr) => {
                let argument = expr.eval1D(var, x)?;
                if argument <= 0.0 {
                    return Err(DomainError::LogOfNonPositive { argument, x });
                }
                finite(argument.ln(), "ln", x)
            }
            Expr::sin(expr) => finite(expr.eval1D(var, x)?.sin(), "sin", x),
            Expr::cos(expr) => finite(expr.eval1D(var, x)?.cos(), "cos", x),
            Expr::tg(expr) => {
                let argument = expr.eval1D(var, x)?;
                if argument.cos() == 0.0 {
                    return Err(DomainError::DivisionByZero { x });
                }
                finite(argument.tan(), "tg", x)
            }
            Expr::sinh(expr) => finite(expr.eval1D(var, x)?.sinh(), "sinh", x),
            Expr::cosh(expr) => finite(expr.eval1D(var, x)?.cosh(), "cosh", x),
        }
    } // end of eval1D

    /// Converts the expression into a closure of one variable.
    /// Points where the expression is undefined map to `f64::NAN`.
    pub fn lambdify1D<'a>(&'a self, var: &'a str) -> impl Fn(f64) -> f64 + 'a {
        move |x| self.eval1D(var, x).unwrap_or(f64::NAN)
    }

    /// Evaluates the expression over `num_values` evenly spaced points of `[start, end]`.
    /// Undefined points are kept as `Err` so the caller decides how to treat them.
    pub fn eval_on_linspace(
        &self,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
    ) -> Vec<(f64, Result<f64, DomainError>)> {
        linspace(start, end, num_values)
            .into_iter()
            .map(|x| (x, self.eval1D(var, x)))
            .collect()
    }

    /// Validates the analytical derivative against a central difference over `[start, end]`.
    ///
    /// Returns the largest absolute deviation over the points where both the expression and
    /// its derivative are defined, together with the verdict `deviation < max_norm`.
    pub fn compare_num1D(
        &self,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> (f64, bool) {
        let derivative = self.diff(var);
        let step = 1e-5;
        let mut worst: f64 = 0.0;
        for x in linspace(start, end, num_values) {
            let analytical = match derivative.eval1D(var, x) {
                Ok(val) => val,
                Err(_) => continue,
            };
            let numerical = match central_difference(|t| self.eval1D(var, t), x, step) {
                Ok(val) => val,
                Err(_) => continue,
            };
            let scale = analytical.abs().max(1.0);
            worst = worst.max((analytical - numerical).abs() / scale);
        }
        (worst, worst < max_norm)
    }

    /// TAYLOR SERIES EXPANSION

    /// Coefficients `f^(k)(center) / k!` for `k = 0..=order`, each from exact evaluation
    /// of the symbolic derivative at the center.
    pub fn taylor_coefficients(
        &self,
        var: &str,
        center: f64,
        order: usize,
    ) -> Result<Vec<f64>, DomainError> {
        let mut coefficients = Vec::with_capacity(order + 1);
        let mut derivative = self.clone();
        let mut factorial = 1.0;
        for k in 0..=order {
            if k > 0 {
                derivative = derivative.diff(var).simplify();
                factorial *= k as f64;
            }
            coefficients.push(derivative.eval1D(var, center)? / factorial);
        }
        Ok(coefficients)
    }

    /// Taylor polynomial of the given order about `center`, written in powers of `(var - center)`.
    pub fn taylor_series1D(&self, var: &str, center: f64, order: usize) -> Result<Expr, DomainError> {
        let coefficients = self.taylor_coefficients(var, center, order)?;
        Ok(Expr::polynomial_around(var, center, &coefficients))
    }

    /// Second order Taylor polynomial `f(c) + f'(c)(x - c) + f''(c)/2 (x - c)^2`.
    ///
    /// # Errors
    /// `DomainError` if `f`, `f'` or `f''` is undefined at the center.
    pub fn taylor2(&self, var: &str, center: f64) -> Result<Expr, DomainError> {
        self.taylor_series1D(var, center, 2)
    }

    /// Builds `Σ coefficients[k] * (var - center)^k`, skipping zero coefficients.
    pub fn polynomial_around(var: &str, center: f64, coefficients: &[f64]) -> Expr {
        let x = Expr::var(var);
        let shift = if center == 0.0 {
            x
        } else if center < 0.0 {
            x + Expr::Const(-center)
        } else {
            x - Expr::Const(center)
        };

        let mut result: Option<Expr> = None;
        for (k, &coefficient) in coefficients.iter().enumerate() {
            if coefficient == 0.0 {
                continue;
            }
            let magnitude = coefficient.abs();
            let power = match k {
                0 => None,
                1 => Some(shift.clone()),
                _ => Some(shift.clone().powf(k as f64)),
            };
            let term = match power {
                None => Expr::Const(magnitude),
                Some(p) if magnitude == 1.0 => p,
                Some(p) => Expr::Const(magnitude) * p,
            };
            result = Some(match result {
                None if coefficient < 0.0 => -term,
                None => term,
                Some(acc) if coefficient < 0.0 => acc - term,
                Some(acc) => acc + term,
            });
        }
        result.unwrap_or(Expr::Const(0.0))
    }

    /// True if the expression is a polynomial in `var` of degree at most `degree`,
    /// judged by its `(degree + 1)`-th derivative simplifying to zero.
    pub fn is_polynomial_up_to_degree(&self, var: &str, degree: usize) -> bool {
        self.n_th_derivative1D(var, degree + 1).is_zero()
    }
}
