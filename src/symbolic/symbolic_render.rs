//! # Rendering of symbolic expressions
//!
//! Two printable forms:
//! - `render()` - plain infix text, e.g. `3*x^2 - sin(2*x)`. Parentheses are inserted only
//!   where precedence or associativity requires them, so reading the text back with the usual
//!   rules (`^` right associative and binding tighter than unary minus, `*` `/` `+` `-` left
//!   associative) yields the very same tree.
//! - `to_latex()` - typesetting-ready LaTeX for the worksheet pages.
//!
//! Both are pure functions of the tree, hence deterministic.

use crate::symbolic::symbolic_engine::Expr;

const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_UNARY_MINUS: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

/// Prints a constant: integral values without a fractional part, others in the shortest
/// form that reads back to the same `f64`.
pub fn format_constant(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_, _) | Expr::Sub(_, _) => PREC_SUM,
            Expr::Mul(_, _) | Expr::Div(_, _) => PREC_PRODUCT,
            Expr::Neg(_) => PREC_UNARY_MINUS,
            Expr::Const(val) if *val < 0.0 => PREC_UNARY_MINUS,
            Expr::Pow(_, _) => PREC_POWER,
            _ => PREC_ATOM,
        }
    }

    fn function_name(&self) -> Option<&'static str> {
        match self {
            Expr::Exp(_) => Some("exp"),
            Expr::Ln(_) => Some("ln"),
            Expr::sin(_) => Some("sin"),
            Expr::cos(_) => Some("cos"),
            Expr::tg(_) => Some("tg"),
            Expr::sinh(_) => Some("sinh"),
            Expr::cosh(_) => Some("cosh"),
            _ => None,
        }
    }

    /// Human readable infix form with minimal parentheses.
    pub fn render(&self) -> String {
        match self {
            Expr::Var(name) => name.clone(),
            Expr::Const(val) => format_constant(*val),
            Expr::Add(lhs, rhs) => self.render_binary(lhs, rhs, " + "),
            Expr::Sub(lhs, rhs) => self.render_binary(lhs, rhs, " - "),
            Expr::Mul(lhs, rhs) => self.render_binary(lhs, rhs, "*"),
            Expr::Div(lhs, rhs) => self.render_binary(lhs, rhs, "/"),
            Expr::Pow(base, exp) => {
                let base_str = wrap_if(base.render(), base.precedence() <= PREC_POWER);
                let exp_str = wrap_if(exp.render(), exp.precedence() < PREC_POWER);
                format!("{}^{}", base_str, exp_str)
            }
            Expr::Neg(expr) => {
                format!("-{}", wrap_if(expr.render(), expr.precedence() <= PREC_UNARY_MINUS))
            }
            _ => {
                let name = self.function_name().unwrap_or("?");
                let arg = self.unary_arg().map(|a| a.render()).unwrap_or_default();
                format!("{}({})", name, arg)
            }
        }
    }

    // left-associative binary operator: the right operand needs parentheses on equal precedence
    fn render_binary(&self, lhs: &Expr, rhs: &Expr, op: &str) -> String {
        let prec = self.precedence();
        let lhs_str = wrap_if(lhs.render(), lhs.precedence() < prec);
        let rhs_str = wrap_if(
            rhs.render(),
            rhs.precedence() <= prec || rhs.precedence() == PREC_UNARY_MINUS,
        );
        format!("{}{}{}", lhs_str, op, rhs_str)
    }

    /// LaTeX form, e.g. `3 x^{2} - \sin\left(2 x\right)`.
    pub fn to_latex(&self) -> String {
        match self {
            Expr::Var(name) => name.clone(),
            Expr::Const(val) => format_constant(*val),
            Expr::Add(lhs, rhs) => format!(
                "{} + {}",
                lhs.latex_operand(PREC_SUM, false),
                rhs.latex_operand(PREC_SUM, true)
            ),
            Expr::Sub(lhs, rhs) => format!(
                "{} - {}",
                lhs.latex_operand(PREC_SUM, false),
                rhs.latex_operand(PREC_SUM, true)
            ),
            Expr::Mul(lhs, rhs) => {
                let lhs_str = lhs.latex_operand(PREC_PRODUCT, false);
                let rhs_str = rhs.latex_operand(PREC_PRODUCT, true);
                // juxtapose a numeric coefficient with a non-numeric factor
                if matches!(lhs.as_ref(), Expr::Const(_)) && !matches!(rhs.as_ref(), Expr::Const(_)) {
                    format!("{} {}", lhs_str, rhs_str)
                } else {
                    format!("{} \\cdot {}", lhs_str, rhs_str)
                }
            }
            Expr::Div(lhs, rhs) => format!("\\frac{{{}}}{{{}}}", lhs.to_latex(), rhs.to_latex()),
            Expr::Pow(base, exp) => {
                match root_degree(exp) {
                    Some(2) => return format!("\\sqrt{{{}}}", base.to_latex()),
                    Some(n) => return format!("\\sqrt[{}]{{{}}}", n, base.to_latex()),
                    None => {}
                }
                let base_str = match base.as_ref() {
                    Expr::Var(_) => base.to_latex(),
                    Expr::Const(val) if *val >= 0.0 => base.to_latex(),
                    _ => format!("\\left({}\\right)", base.to_latex()),
                };
                format!("{}^{{{}}}", base_str, exp.to_latex())
            }
            Expr::Neg(expr) => format!("-{}", expr.latex_operand(PREC_UNARY_MINUS, true)),
            Expr::Exp(expr) => format!("e^{{{}}}", expr.to_latex()),
            _ => {
                let command = match self {
                    Expr::Ln(_) => "\\ln",
                    Expr::sin(_) => "\\sin",
                    Expr::cos(_) => "\\cos",
                    Expr::tg(_) => "\\tan",
                    Expr::sinh(_) => "\\sinh",
                    _ => "\\cosh",
                };
                let arg = self.unary_arg().map(|a| a.to_latex()).unwrap_or_default();
                format!("{}\\left({}\\right)", command, arg)
            }
        }
    }

    fn latex_operand(&self, parent_prec: u8, right: bool) -> String {
        // \frac and function calls delimit themselves
        let prec = match self {
            Expr::Div(_, _) => PREC_ATOM,
            _ => self.precedence(),
        };
        let needs_parens = if right {
            prec <= parent_prec || prec == PREC_UNARY_MINUS
        } else {
            prec < parent_prec
        };
        if needs_parens {
            format!("\\left({}\\right)", self.to_latex())
        } else {
            self.to_latex()
        }
    }
}

// `1/n` exponents, written either as a ratio or as a decimal constant
fn root_degree(exp: &Expr) -> Option<i64> {
    let degree = match exp {
        Expr::Const(n) if *n > 0.0 && *n <= 0.5 => 1.0 / n,
        Expr::Div(p, q) => match (p.as_ref(), q.as_ref()) {
            (Expr::Const(p), Expr::Const(q)) if *p == 1.0 && *q >= 2.0 => *q,
            _ => return None,
        },
        _ => return None,
    };
    (degree.fract() == 0.0).then_some(degree as i64)
}

fn wrap_if(s: String, condition: bool) -> String {
    if condition { format!("({})", s) } else { s }
}
