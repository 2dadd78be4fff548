//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::errors::DomainError;
    use crate::symbolic::symbolic_engine::Expr;
    use crate::symbolic::utils::{central_difference, linspace};
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::var("x")
    }

    fn c(val: f64) -> Expr {
        Expr::Const(val)
    }

    /// A handful of trees covering every node kind.
    fn sample_expressions() -> Vec<Expr> {
        vec![
            c(3.0) * x().powf(4.0) - c(2.0) * x() + c(7.0),
            (c(2.0) * x()).sin() * x().powf(2.0),
            (x().powf(2.0) + c(1.0)).ln(),
            (c(3.0) * x()).exp() / (x().powf(2.0) + c(1.0)),
            x().cos().exp(),
            x().tg() + x().sinh() - x().cosh(),
            c(2.0).pow(x()),
            x().pow(x()),
            x().powf(0.5) * c(4.0),
            -(x().sin().powf(3.0)),
        ]
    }

    #[test]
    fn test_add_assign() {
        let mut expr = x();
        expr += c(2.0);
        assert_eq!(expr, Expr::Add(Box::new(x()), Box::new(c(2.0))));
    }

    #[test]
    fn test_sub_and_mul_assign() {
        let mut expr = x();
        expr -= c(2.0);
        expr *= c(3.0);
        let expected = Expr::Mul(
            Box::new(Expr::Sub(Box::new(x()), Box::new(c(2.0)))),
            Box::new(c(3.0)),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_neg() {
        assert_eq!(-x(), Expr::Neg(Box::new(x())));
    }

    #[test]
    fn test_set_variable() {
        let expr = x().powf(2.0) + x().sin();
        let substituted = expr.set_variable("x", 0.0);
        assert!(!substituted.contains_variable("x"));
        assert_eq!(substituted.eval1D("x", 123.0).unwrap(), 0.0);
    }

    #[test]
    fn test_structure_queries() {
        let expr = c(3.0) * x().powf(2.0) + (c(2.0) * x()).sin();
        assert_eq!(expr.function_depth(), 1);
        assert!(!expr.contains_division());
        assert_eq!(x().sin().exp().function_depth(), 2);
        assert_eq!(c(2.0).pow(x().sin()).function_depth(), 2);
        assert!((c(1.0) / x()).contains_division());
        assert!(x().powf(-1.0).contains_division());
        assert!((c(3.0) * x().sin().powf(-2.0)).contains_division());
        assert!(!x().pow(c(1.0) / c(3.0)).contains_division());
        assert!(!c(2.0).powf(-1.0).contains_division());
        assert_eq!(expr.wrapper_count(), 1);
        assert_eq!(x().sin().exp().wrapper_count(), 2);
        assert_eq!((c(2.0).pow(x()) + x().powf(3.0)).wrapper_count(), 1);
        assert!(c(2.0).ln().is_constant());
        assert!(!x().is_constant());
        assert_eq!(expr.node_count(), 10);
        assert_eq!(expr.constants(), vec![3.0, 2.0, 2.0]);
    }

    #[test]
    fn test_diff_basic_rules() {
        assert_eq!(x().diff("x"), c(1.0));
        assert_eq!(Expr::var("y").diff("x"), c(0.0));
        assert_eq!(c(5.0).diff("x"), c(0.0));
        let derivative = (x().powf(3.0)).diff("x").simplify();
        assert_eq!(derivative, c(3.0) * x().powf(2.0));
        let derivative = x().exp().diff("x").simplify();
        assert_eq!(derivative, x().exp());
        let derivative = x().cos().diff("x").simplify();
        assert_eq!(derivative, -(x().sin()));
    }

    #[test]
    fn test_diff_matches_central_difference() {
        for expr in sample_expressions() {
            let derivative = expr.diff("x");
            for t in linspace(0.3, 1.4, 12) {
                let analytical = derivative.eval1D("x", t).unwrap();
                let numerical = central_difference(|s| expr.eval1D("x", s), t, 1e-5).unwrap();
                let scale = analytical.abs().max(1.0);
                assert!(
                    (analytical - numerical).abs() / scale < 1e-4,
                    "d/dx {} at {}: {} vs {}",
                    expr,
                    t,
                    analytical,
                    numerical
                );
            }
        }
    }

    #[test]
    fn test_compare_num1D() {
        for expr in sample_expressions() {
            let (norm, ok) = expr.compare_num1D("x", 0.2, 1.5, 50, 1e-4);
            assert!(ok, "{} deviates by {}", expr, norm);
        }
    }

    #[test]
    fn test_logarithmic_differentiation() {
        // d/dx x^x = x^x (ln x + 1)
        let derivative = x().pow(x()).diff("x");
        for &t in &[0.5f64, 1.0, 2.0, 3.0] {
            let expected = t.powf(t) * (t.ln() + 1.0);
            assert_relative_eq!(derivative.eval1D("x", t).unwrap(), expected, epsilon = 1e-10);
        }
        // d/dx 2^x = 2^x ln 2
        let derivative = c(2.0).pow(x()).diff("x");
        assert_relative_eq!(
            derivative.eval1D("x", 3.0).unwrap(),
            8.0 * 2f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_eval_domain_errors() {
        let reciprocal = c(1.0) / x();
        assert_eq!(
            reciprocal.eval1D("x", 0.0),
            Err(DomainError::DivisionByZero { x: 0.0 })
        );
        assert!(matches!(
            x().ln().eval1D("x", -1.0),
            Err(DomainError::LogOfNonPositive { .. })
        ));
        assert!(matches!(
            x().powf(0.5).eval1D("x", -4.0),
            Err(DomainError::InvalidPower { .. })
        ));
        assert!(matches!(
            x().powf(-2.0).eval1D("x", 0.0),
            Err(DomainError::InvalidPower { .. })
        ));
        assert!(matches!(
            x().exp().exp().eval1D("x", 10.0),
            Err(DomainError::NonFinite { .. })
        ));
        assert!(matches!(
            Expr::var("y").eval1D("x", 1.0),
            Err(DomainError::UnboundVariable { .. })
        ));
        // integer powers of negative numbers are fine
        assert_eq!(x().powf(3.0).eval1D("x", -2.0).unwrap(), -8.0);
    }

    #[test]
    fn test_lambdify1D_maps_errors_to_nan() {
        let expr = x().ln();
        let f = expr.lambdify1D("x");
        assert!(f(-1.0).is_nan());
        assert_relative_eq!(f(std::f64::consts::E), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_render_is_deterministic() {
        for expr in sample_expressions() {
            let derivative = expr.diff("x").simplify();
            assert_eq!(expr.render(), expr.clone().render());
            assert_eq!(derivative.render(), derivative.render());
            assert_eq!(derivative.to_latex(), derivative.to_latex());
        }
    }

    #[test]
    fn test_taylor2_matches_function_at_center() {
        let center = 1.0;
        for expr in sample_expressions() {
            let taylor = expr.taylor2("x", center).unwrap();
            let f = expr.eval1D("x", center).unwrap();
            let df = expr.diff("x").eval1D("x", center).unwrap();
            let d2f = expr.diff("x").diff("x").eval1D("x", center).unwrap();

            assert_eq!(taylor.eval1D("x", center).unwrap(), f);
            assert_relative_eq!(
                taylor.diff("x").eval1D("x", center).unwrap(),
                df,
                epsilon = 1e-12,
                max_relative = 1e-12
            );
            assert_relative_eq!(
                taylor.diff("x").diff("x").eval1D("x", center).unwrap(),
                d2f,
                epsilon = 1e-9,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_taylor2_of_exp() {
        // e^x about 0: 1 + x + x^2/2
        let taylor = x().exp().taylor2("x", 0.0).unwrap();
        assert_eq!(taylor, c(1.0) + x() + c(0.5) * x().powf(2.0));
        assert_eq!(taylor.render(), "1 + x + 0.5*x^2");
    }

    #[test]
    fn test_taylor2_shift_and_signs() {
        // cos(x) about 1 has negative linear and quadratic coefficients
        let taylor = x().cos().taylor2("x", 1.0).unwrap();
        let rendered = taylor.render();
        assert!(rendered.contains("(x - 1)"), "{}", rendered);
        assert!(rendered.contains(" - "), "{}", rendered);
        // about a negative center the shift is written as x + |c|
        let taylor = x().powf(3.0).taylor2("x", -2.0).unwrap();
        assert!(taylor.render().contains("x + 2"));
    }

    #[test]
    fn test_taylor2_undefined_at_center() {
        let expr = (x() - c(1.0)).ln();
        assert!(expr.taylor2("x", 1.0).is_err());
    }

    #[test]
    fn test_polynomial_degree_check() {
        let quadratic = c(3.0) * x().powf(2.0) - c(5.0) * x() + c(1.0);
        assert!(quadratic.is_polynomial_up_to_degree("x", 2));
        let cubic = x().powf(3.0) + x();
        assert!(!cubic.is_polynomial_up_to_degree("x", 2));
        assert!(!x().sin().is_polynomial_up_to_degree("x", 2));
    }
}
