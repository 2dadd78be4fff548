//! # Symbolic Engine Module
//!
//! Core symbolic expression type used by every worksheet generator. Expressions are
//! built programmatically by the random generators (never parsed from user input),
//! differentiated exactly, evaluated with domain checks and rendered for print.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - the free symbol, usually "x"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Neg`, `Exp`, `Ln`, `sin`, `cos`, `tg`, `sinh`, `cosh`
//!
//! ### Key Methods
//! - `diff(var)` - analytical differentiation (see `symbolic_engine_derivatives`)
//! - `eval1D(var, x)` - checked evaluation returning `DomainError` on undefined points
//! - `render()` / `to_latex()` - printable forms (see `symbolic_render`)
//! - `simplify()` - constant folding and neutral elements (see `symbolic_simplify`)
//! - `taylor2(var, c)` - second order Taylor polynomial
//!
//! ## Interesting Code Features
//!
//! 1. **Operator Overloading**: `std::ops` traits give natural syntax `x.clone() * x + Expr::Const(1.0)`
//! 2. **Structural queries**: `function_depth`, `contains_division` and `contains_variable`
//!    are what the generators use to accept or reject random draws
//! 3. **Non-standard Function Names**: the tangent is `tg` as in the rest of the engine

#![allow(non_camel_case_types)]

use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use RustedWorksheets::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Negation: -x
    Neg(Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Hyperbolic sine: sinh(x)
    sinh(Box<Expr>),
    /// Hyperbolic cosine: cosh(x)
    cosh(Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Expr::Const(0.0));
        *self = Expr::Add(Box::new(lhs), Box::new(rhs));
    }
}

impl std::ops::SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Expr::Const(0.0));
        *self = Expr::Sub(Box::new(lhs), Box::new(rhs));
    }
}

impl std::ops::MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Expr::Const(0.0));
        *self = Expr::Mul(Box::new(lhs), Box::new(rhs));
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Neg(self.boxed())
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Shorthand for `Expr::Var(name.to_string())`.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    pub fn sin(self) -> Expr {
        Expr::sin(self.boxed())
    }

    pub fn cos(self) -> Expr {
        Expr::cos(self.boxed())
    }

    pub fn tg(self) -> Expr {
        Expr::tg(self.boxed())
    }

    pub fn sinh(self) -> Expr {
        Expr::sinh(self.boxed())
    }

    pub fn cosh(self) -> Expr {
        Expr::cosh(self.boxed())
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Raises to a numeric power, `self ^ n`.
    pub fn powf(self, n: f64) -> Expr {
        Expr::Pow(self.boxed(), Box::new(Expr::Const(n)))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 1.0)
    }

    /// Returns the single argument of a unary node, `None` for leaves and binary nodes.
    pub fn unary_arg(&self) -> Option<&Expr> {
        match self {
            Expr::Neg(arg)
            | Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg)
            | Expr::sinh(arg)
            | Expr::cosh(arg) => Some(arg),
            _ => None,
        }
    }

    /// Returns both operands of a binary node.
    pub fn binary_args(&self) -> Option<(&Expr, &Expr)> {
        match self {
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => Some((lhs, rhs)),
            _ => None,
        }
    }

    /// Rebuilds a unary node of the same kind around a new argument.
    /// Leaves and binary nodes are returned unchanged.
    pub fn with_unary_arg(&self, arg: Expr) -> Expr {
        let arg = arg.boxed();
        match self {
            Expr::Neg(_) => Expr::Neg(arg),
            Expr::Exp(_) => Expr::Exp(arg),
            Expr::Ln(_) => Expr::Ln(arg),
            Expr::sin(_) => Expr::sin(arg),
            Expr::cos(_) => Expr::cos(arg),
            Expr::tg(_) => Expr::tg(arg),
            Expr::sinh(_) => Expr::sinh(arg),
            Expr::cosh(_) => Expr::cosh(arg),
            _ => self.clone(),
        }
    }

    /// Rebuilds a binary node of the same kind around new operands.
    /// Leaves and unary nodes are returned unchanged.
    pub fn with_binary_args(&self, lhs: Expr, rhs: Expr) -> Expr {
        let (lhs, rhs) = (lhs.boxed(), rhs.boxed());
        match self {
            Expr::Add(_, _) => Expr::Add(lhs, rhs),
            Expr::Sub(_, _) => Expr::Sub(lhs, rhs),
            Expr::Mul(_, _) => Expr::Mul(lhs, rhs),
            Expr::Div(_, _) => Expr::Div(lhs, rhs),
            Expr::Pow(_, _) => Expr::Pow(lhs, rhs),
            _ => self.clone(),
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }

    /// Replaces every occurrence of `var` with a copy of `expr`.
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            _ => {
                if let Some((lhs, rhs)) = self.binary_args() {
                    self.with_binary_args(
                        lhs.substitute_variable(var, expr),
                        rhs.substitute_variable(var, expr),
                    )
                } else if let Some(arg) = self.unary_arg() {
                    self.with_unary_arg(arg.substitute_variable(var, expr))
                } else {
                    self.clone()
                }
            }
        }
    }

    /// Checks whether `var_name` occurs anywhere in the tree.
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            _ => {
                if let Some((lhs, rhs)) = self.binary_args() {
                    lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
                } else {
                    self.unary_arg()
                        .is_some_and(|arg| arg.contains_variable(var_name))
                }
            }
        }
    }

    /// True if the tree divides by something that depends on a variable, either as a
    /// `Div` node or as a negative constant power such as `x^(-1)`.
    /// Constant ratios such as the `1/3` of a cube root do not count.
    pub fn contains_division(&self) -> bool {
        match self {
            Expr::Div(_, rhs) if !rhs.is_constant() => true,
            Expr::Pow(base, exp)
                if !base.is_constant()
                    && exp.is_constant()
                    && exp.eval1D("x", 0.0).is_ok_and(|power| power < 0.0) =>
            {
                true
            }
            Expr::Var(_) | Expr::Const(_) => false,
            _ => {
                if let Some((lhs, rhs)) = self.binary_args() {
                    lhs.contains_division() || rhs.contains_division()
                } else {
                    self.unary_arg().is_some_and(|arg| arg.contains_division())
                }
            }
        }
    }

    /// Nesting depth of named functions (`exp`, `ln`, trigonometric, hyperbolic) and
    /// of powers whose exponent depends on a variable. Arithmetic does not count, so
    /// `3*x^2 + sin(2*x)` has depth 1 and `exp(sin(x))` has depth 2.
    pub fn function_depth(&self) -> usize {
        match self {
            Expr::Var(_) | Expr::Const(_) => 0,
            Expr::Neg(arg) => arg.function_depth(),
            Expr::Pow(base, exp) => {
                let inner = base.function_depth().max(exp.function_depth());
                if exp.is_constant() { inner } else { inner + 1 }
            }
            Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) | Expr::Mul(lhs, rhs) | Expr::Div(lhs, rhs) => {
                lhs.function_depth().max(rhs.function_depth())
            }
            _ => self
                .unary_arg()
                .map(|arg| arg.function_depth() + 1)
                .unwrap_or(0),
        }
    }

    /// Number of transcendental wrappers: `exp`, `ln`, trigonometric and hyperbolic
    /// functions, and powers whose exponent depends on a variable.
    pub fn wrapper_count(&self) -> usize {
        let own = match self {
            Expr::Exp(_)
            | Expr::Ln(_)
            | Expr::sin(_)
            | Expr::cos(_)
            | Expr::tg(_)
            | Expr::sinh(_)
            | Expr::cosh(_) => 1,
            Expr::Pow(_, exp) if !exp.is_constant() => 1,
            _ => 0,
        };
        let children = match self.binary_args() {
            Some((lhs, rhs)) => lhs.wrapper_count() + rhs.wrapper_count(),
            None => self.unary_arg().map_or(0, |arg| arg.wrapper_count()),
        };
        own + children
    }

    /// True when the tree contains no variables at all.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Var(_) => false,
            Expr::Const(_) => true,
            _ => {
                if let Some((lhs, rhs)) = self.binary_args() {
                    lhs.is_constant() && rhs.is_constant()
                } else {
                    self.unary_arg().is_none_or(|arg| arg.is_constant())
                }
            }
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Var(_) | Expr::Const(_) => 1,
            _ => {
                if let Some((lhs, rhs)) = self.binary_args() {
                    1 + lhs.node_count() + rhs.node_count()
                } else {
                    1 + self.unary_arg().map(|arg| arg.node_count()).unwrap_or(0)
                }
            }
        }
    }

    /// Collects all constants of the tree, left to right.
    pub fn constants(&self) -> Vec<f64> {
        let mut acc = Vec::new();
        self.collect_constants(&mut acc);
        acc
    }

    fn collect_constants(&self, acc: &mut Vec<f64>) {
        match self {
            Expr::Const(val) => acc.push(*val),
            Expr::Var(_) => {}
            _ => {
                if let Some((lhs, rhs)) = self.binary_args() {
                    lhs.collect_constants(acc);
                    rhs.collect_constants(acc);
                } else if let Some(arg) = self.unary_arg() {
                    arg.collect_constants(acc);
                }
            }
        }
    }
}
