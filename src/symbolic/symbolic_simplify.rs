//! # Symbolic Expression Simplification Module
//!
//! Light-weight algebraic clean-up of generated expressions and their derivatives, so that the
//! printed answers read like something a person would write.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic on numerical constants is evaluated
//! 2. **Algebraic Identities**: `x + 0 = x`, `x * 1 = x`, `x * 0 = 0`, `x^1 = x`, `x^0 = 1`, `--x = x`
//! 3. **Coefficient Collection**: constant factors move to the front of products and merge
//! 4. **Sign Normalisation**: `a + (-b)` becomes `a - b`, `a - (-b)` becomes `a + b`
//! 5. **Power Merging**: `x * x^n = x^(n+1)`
//! 6. **Exact Ratios**: `1/3` stays a ratio of integers instead of `0.333...`, so root
//!    exponents like `x^(1/3 - 1)` fold to `x^(-2/3)`
//!
//! Every rule preserves the value of the expression wherever the input is defined. Named
//! functions of constants are only folded when the result is exact (`ln(1)`, `exp(0)`, `sin(0)`,
//! `cos(0)`), so `ln(2)` stays symbolic.

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Recursively simplifies the expression bottom-up.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => simplify_add(lhs.simplify(), rhs.simplify()),
            Expr::Sub(lhs, rhs) => simplify_sub(lhs.simplify(), rhs.simplify()),
            Expr::Mul(lhs, rhs) => simplify_mul(lhs.simplify(), rhs.simplify()),
            Expr::Div(lhs, rhs) => simplify_div(lhs.simplify(), rhs.simplify()),
            Expr::Pow(base, exp) => simplify_pow(base.simplify(), exp.simplify()),
            Expr::Neg(expr) => simplify_neg(expr.simplify()),
            Expr::Exp(expr) => match expr.simplify() {
                Expr::Const(val) if val == 0.0 => Expr::Const(1.0),
                Expr::Ln(inner) => *inner,
                arg => Expr::Exp(Box::new(arg)),
            },
            Expr::Ln(expr) => match expr.simplify() {
                Expr::Const(val) if val == 1.0 => Expr::Const(0.0),
                Expr::Exp(inner) => *inner,
                arg => Expr::Ln(Box::new(arg)),
            },
            Expr::sin(expr) | Expr::tg(expr) | Expr::sinh(expr) => match expr.simplify() {
                Expr::Const(val) if val == 0.0 => Expr::Const(0.0),
                arg => self.with_unary_arg(arg),
            },
            Expr::cos(expr) | Expr::cosh(expr) => match expr.simplify() {
                Expr::Const(val) if val == 0.0 => Expr::Const(1.0),
                arg => self.with_unary_arg(arg),
            },
        }
    }

    /// Rounds every constant of the tree to `decimals` places, then re-simplifies so that
    /// coefficients rounded to zero disappear.
    pub fn round_constants(&self, decimals: i32) -> Expr {
        let factor = 10f64.powi(decimals);
        fn walk(expr: &Expr, factor: f64) -> Expr {
            match expr {
                Expr::Const(val) => {
                    let rounded = (val * factor).round() / factor;
                    // avoid printing -0
                    Expr::Const(if rounded == 0.0 { 0.0 } else { rounded })
                }
                Expr::Var(_) => expr.clone(),
                _ => {
                    if let Some((lhs, rhs)) = expr.binary_args() {
                        expr.with_binary_args(walk(lhs, factor), walk(rhs, factor))
                    } else if let Some(arg) = expr.unary_arg() {
                        expr.with_unary_arg(walk(arg, factor))
                    } else {
                        expr.clone()
                    }
                }
            }
        }
        walk(self, factor).simplify()
    }
}

/// Exact ratio of two constants: `Const(c)` is `c/1`, `Div(Const(p), Const(q))` is `p/q`.
/// Integral ratios are kept reduced with the sign on the numerator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rational {
    num: f64,
    den: f64,
}

impl Rational {
    const ONE: Rational = Rational { num: 1.0, den: 1.0 };

    pub(crate) fn new(num: f64, den: f64) -> Rational {
        let (mut num, mut den) = if den < 0.0 { (-num, -den) } else { (num, den) };
        if is_integral(num) && is_integral(den) && den != 0.0 {
            let g = gcd(num.abs(), den);
            if g > 1.0 {
                num /= g;
                den /= g;
            }
        }
        Rational { num, den }
    }

    pub(crate) fn of(expr: &Expr) -> Option<Rational> {
        match expr {
            Expr::Const(val) => Some(Rational::new(*val, 1.0)),
            Expr::Div(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
                (Expr::Const(p), Expr::Const(q)) if *q != 0.0 => Some(Rational::new(*p, *q)),
                _ => None,
            },
            _ => None,
        }
    }

    fn add(self, other: Rational) -> Rational {
        if self.den == 1.0 && other.den == 1.0 {
            Rational::new(self.num + other.num, 1.0)
        } else {
            Rational::new(
                self.num * other.den + other.num * self.den,
                self.den * other.den,
            )
        }
    }

    fn mul(self, other: Rational) -> Rational {
        Rational::new(self.num * other.num, self.den * other.den)
    }

    fn neg(self) -> Rational {
        Rational::new(-self.num, self.den)
    }

    fn recip(self) -> Rational {
        Rational::new(self.den, self.num)
    }

    fn is_zero(&self) -> bool {
        self.num == 0.0
    }

    fn is_one(&self) -> bool {
        self.num == self.den
    }

    fn is_negative(&self) -> bool {
        self.num < 0.0
    }

    pub(crate) fn to_expr(self) -> Expr {
        if self.den == 1.0 {
            Expr::Const(if self.num == 0.0 { 0.0 } else { self.num })
        } else if is_integral(self.num) && is_integral(self.den) {
            Expr::Div(Box::new(Expr::Const(self.num)), Box::new(Expr::Const(self.den)))
        } else {
            Expr::Const(self.num / self.den)
        }
    }
}

fn is_integral(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() < 1e15
}

fn gcd(mut a: f64, mut b: f64) -> f64 {
    while b != 0.0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Splits a product into its rational coefficient and the remaining factor.
fn split_coefficient(expr: Expr) -> (Rational, Option<Expr>) {
    if let Some(r) = Rational::of(&expr) {
        return (r, None);
    }
    match expr {
        Expr::Neg(inner) => {
            let (c, rest) = split_coefficient(*inner);
            (c.neg(), rest)
        }
        Expr::Mul(lhs, rhs) => match Rational::of(&lhs) {
            Some(c) => (c, Some(*rhs)),
            None => (Rational::ONE, Some(Expr::Mul(lhs, rhs))),
        },
        other => (Rational::ONE, Some(other)),
    }
}

fn attach_coefficient(coefficient: Rational, rest: Option<Expr>) -> Expr {
    match rest {
        None => coefficient.to_expr(),
        Some(rest) if coefficient.is_one() => rest,
        Some(rest) if coefficient.neg().is_one() => Expr::Neg(Box::new(rest)),
        Some(rest) => Expr::Mul(Box::new(coefficient.to_expr()), Box::new(rest)),
    }
}

/// For a term with a visible minus sign returns the term without it.
fn strip_minus(expr: &Expr) -> Option<Expr> {
    if let Some(r) = Rational::of(expr) {
        return r.is_negative().then(|| r.neg().to_expr());
    }
    match expr {
        Expr::Neg(inner) => Some(inner.as_ref().clone()),
        Expr::Mul(lhs, rhs) => match Rational::of(lhs) {
            Some(c) if c.is_negative() => Some(attach_coefficient(c.neg(), Some(rhs.as_ref().clone()))),
            _ => None,
        },
        _ => None,
    }
}

fn simplify_neg(expr: Expr) -> Expr {
    if let Some(r) = Rational::of(&expr) {
        return r.neg().to_expr();
    }
    match expr {
        Expr::Neg(inner) => *inner,
        Expr::Sub(lhs, rhs) => simplify_sub(*rhs, *lhs),
        Expr::Mul(lhs, rhs) => match Rational::of(&lhs) {
            Some(c) => attach_coefficient(c.neg(), Some(*rhs)),
            None => Expr::Neg(Box::new(Expr::Mul(lhs, rhs))),
        },
        other => Expr::Neg(Box::new(other)),
    }
}

fn simplify_add(lhs: Expr, rhs: Expr) -> Expr {
    if let (Some(a), Some(b)) = (Rational::of(&lhs), Rational::of(&rhs)) {
        return a.add(b).to_expr();
    }
    if lhs.is_zero() {
        return rhs;
    }
    if rhs.is_zero() {
        return lhs;
    }
    if let Some(positive) = strip_minus(&rhs) {
        return simplify_sub(lhs, positive);
    }
    match lhs {
        Expr::Neg(inner) => simplify_sub(rhs, *inner),
        lhs => Expr::Add(Box::new(lhs), Box::new(rhs)),
    }
}

fn simplify_sub(lhs: Expr, rhs: Expr) -> Expr {
    if let (Some(a), Some(b)) = (Rational::of(&lhs), Rational::of(&rhs)) {
        return a.add(b.neg()).to_expr();
    }
    if rhs.is_zero() {
        return lhs;
    }
    if lhs.is_zero() {
        return simplify_neg(rhs);
    }
    if let Some(positive) = strip_minus(&rhs) {
        return simplify_add(lhs, positive);
    }
    if lhs == rhs {
        return Expr::Const(0.0);
    }
    Expr::Sub(Box::new(lhs), Box::new(rhs))
}

fn simplify_mul(lhs: Expr, rhs: Expr) -> Expr {
    let (lhs_coefficient, lhs_rest) = split_coefficient(lhs);
    let (rhs_coefficient, rhs_rest) = split_coefficient(rhs);
    // constants lead
    let coefficient = lhs_coefficient.mul(rhs_coefficient);
    if coefficient.is_zero() {
        return Expr::Const(0.0);
    }
    let rest = match (lhs_rest, rhs_rest) {
        (None, None) => None,
        (Some(factor), None) | (None, Some(factor)) => Some(factor),
        (Some(a), Some(b)) => Some(merge_factors(a, b)),
    };
    attach_coefficient(coefficient, rest)
}

// x*x = x^2, x^n*x = x*x^n = x^(n+1)
fn merge_factors(lhs: Expr, rhs: Expr) -> Expr {
    if lhs == rhs {
        return Expr::Pow(Box::new(lhs), Box::new(Expr::Const(2.0)));
    }
    match (lhs, rhs) {
        (Expr::Pow(base, exp), rhs) if *base == rhs && Rational::of(&exp).is_some() => {
            let n = Rational::of(&exp).unwrap_or(Rational::ONE);
            simplify_pow(rhs, n.add(Rational::ONE).to_expr())
        }
        (lhs, Expr::Pow(base, exp)) if *base == lhs && Rational::of(&exp).is_some() => {
            let n = Rational::of(&exp).unwrap_or(Rational::ONE);
            simplify_pow(lhs, n.add(Rational::ONE).to_expr())
        }
        (lhs, rhs) => Expr::Mul(Box::new(lhs), Box::new(rhs)),
    }
}

fn simplify_div(lhs: Expr, rhs: Expr) -> Expr {
    if let (Some(a), Some(b)) = (Rational::of(&lhs), Rational::of(&rhs)) {
        if !b.is_zero() {
            return a.mul(b.recip()).to_expr();
        }
    }
    match (lhs, rhs) {
        (lhs, rhs) if lhs.is_zero() && !rhs.is_zero() => Expr::Const(0.0),
        (lhs, rhs) if rhs.is_one() => lhs,
        (Expr::Neg(lhs), rhs) => simplify_neg(simplify_div(*lhs, rhs)),
        (lhs, rhs) => Expr::Div(Box::new(lhs), Box::new(rhs)),
    }
}

fn simplify_pow(base: Expr, exp: Expr) -> Expr {
    if exp.is_zero() {
        return Expr::Const(1.0);
    }
    if exp.is_one() {
        return base;
    }
    if let (Some(b), Expr::Const(n)) = (Rational::of(&base), &exp) {
        let n = *n;
        if n.fract() == 0.0 && n.abs() <= 64.0 && !(b.is_zero() && n < 0.0) {
            let b = if n < 0.0 { b.recip() } else { b };
            let power = Rational::new(b.num.powi(n.abs() as i32), b.den.powi(n.abs() as i32));
            if power.num.is_finite() && power.den.is_finite() && is_integral(power.num) {
                return power.to_expr();
            }
        }
    }
    match (base, exp) {
        // (u^m)^n = u^(m*n) for integer n
        (Expr::Pow(inner, m), Expr::Const(n)) if n.fract() == 0.0 && Rational::of(&m).is_some() => {
            let m = Rational::of(&m).unwrap_or(Rational::ONE);
            simplify_pow(*inner, m.mul(Rational::new(n, 1.0)).to_expr())
        }
        (base, exp) => Expr::Pow(Box::new(base), Box::new(exp)),
    }
}
