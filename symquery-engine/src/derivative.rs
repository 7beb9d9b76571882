//! Symbolic differentiation.
//!
//! Covers the sum, product, power, and chain rules over the function set the parser
//! accepts. Forms outside that set (`x^x`, unknown functions) produce
//! [`EngineError::Unsupported`] instead of a wrong answer.

use crate::error::EngineError;
use crate::expr::{Atom, Expr};
use crate::simplify::simplify;

/// Accumulates the factors of a product, short-circuiting on zero and skipping ones.
#[derive(Default)]
struct ProductBuilder(Vec<Expr>);

impl ProductBuilder {
    fn push(&mut self, expr: Expr) {
        if expr.is_zero() || self.0.first().map_or(false, |first| first.is_zero()) {
            self.0 = vec![Expr::int(0)];
            return;
        }

        if !expr.is_one() {
            self.0.push(expr);
        }
    }
}

impl From<ProductBuilder> for Expr {
    fn from(builder: ProductBuilder) -> Self {
        Expr::Mul(builder.0).downgrade()
    }
}

/// Accumulates the terms of a sum, skipping zeros.
#[derive(Default)]
struct SumBuilder(Vec<Expr>);

impl SumBuilder {
    fn push(&mut self, expr: Expr) {
        if !expr.is_zero() {
            self.0.push(expr);
        }
    }
}

impl From<SumBuilder> for Expr {
    fn from(builder: SumBuilder) -> Self {
        Expr::Add(builder.0).downgrade()
    }
}

/// Differentiates the expression with respect to `var` and simplifies the result.
pub fn differentiate(expr: &Expr, var: &str) -> Result<Expr, EngineError> {
    Ok(simplify(&derivative(expr, var)?))
}

/// Produces the raw (unsimplified) derivative of the expression with respect to `var`.
fn derivative(expr: &Expr, var: &str) -> Result<Expr, EngineError> {
    if !expr.contains_sym(var) {
        return Ok(Expr::int(0));
    }

    match expr {
        Expr::Atom(Atom::Int(_) | Atom::Float(_)) => Ok(Expr::int(0)),
        Expr::Atom(Atom::Sym(sym)) => {
            Ok(if sym == var { Expr::int(1) } else { Expr::int(0) })
        },
        Expr::Atom(Atom::Call(name, args)) => call_derivative(name, args, var),
        Expr::Add(terms) => {
            let mut sum = SumBuilder::default();
            for term in terms {
                sum.push(derivative(term, var)?);
            }
            Ok(sum.into())
        },
        Expr::Mul(factors) => product_rule(factors, var),
        Expr::Pow(base, exp) => power_rule(base, exp, var),
    }
}

/// The product rule, generalized to any number of factors:
/// `(fgh)' = f'gh + fg'h + fgh'`.
fn product_rule(factors: &[Expr], var: &str) -> Result<Expr, EngineError> {
    let mut outer = SumBuilder::default();

    for derived in 0..factors.len() {
        let mut inner = ProductBuilder::default();
        for (i, factor) in factors.iter().enumerate() {
            if i == derived {
                inner.push(derivative(factor, var)?);
            } else {
                inner.push(factor.clone());
            }
        }
        outer.push(inner.into());
    }

    Ok(outer.into())
}

/// Differentiates `base^exp`.
///
/// - Exponent free of `var`: generalized power rule, `c * u^(c-1) * u'`.
/// - Base free of `var`: exponential rule, `a^u * ln(a) * u'`.
/// - Both containing `var` (e.g. `x^x`): unsupported.
fn power_rule(base: &Expr, exp: &Expr, var: &str) -> Result<Expr, EngineError> {
    let base_varies = base.contains_sym(var);
    let exp_varies = exp.contains_sym(var);

    match (base_varies, exp_varies) {
        (true, false) => {
            let mut product = ProductBuilder::default();
            product.push(derivative(base, var)?);
            product.push(exp.clone());
            product.push(Expr::Pow(
                Box::new(base.clone()),
                Box::new(exp.clone() + Expr::int(-1)),
            ));
            Ok(product.into())
        },
        (false, true) => {
            let mut product = ProductBuilder::default();
            product.push(derivative(exp, var)?);
            product.push(Expr::call("ln", vec![base.clone()]));
            product.push(Expr::Pow(Box::new(base.clone()), Box::new(exp.clone())));
            Ok(product.into())
        },
        _ => Err(EngineError::Unsupported(format!(
            "cannot differentiate a power whose base and exponent both depend on {}",
            var,
        ))),
    }
}

/// The chain rule through the supported function set.
fn call_derivative(name: &str, args: &[Expr], var: &str) -> Result<Expr, EngineError> {
    if args.len() != 1 {
        return Err(EngineError::Unsupported(format!(
            "cannot differentiate a call to {} with {} arguments",
            name,
            args.len(),
        )));
    }

    let arg = &args[0];
    let mut product = ProductBuilder::default();
    product.push(derivative(arg, var)?);

    match name {
        "sin" => product.push(Expr::call("cos", vec![arg.clone()])),
        "cos" => {
            product.push(Expr::int(-1));
            product.push(Expr::call("sin", vec![arg.clone()]));
        },
        "tan" => {
            // 1 / cos(u)^2
            product.push(Expr::Pow(
                Box::new(Expr::call("cos", vec![arg.clone()])),
                Box::new(Expr::int(-2)),
            ));
        },
        "asin" => product.push(inverse_sqrt_one_minus_square(arg)),
        "acos" => {
            product.push(Expr::int(-1));
            product.push(inverse_sqrt_one_minus_square(arg));
        },
        "atan" => {
            // 1 / (1 + u^2)
            product.push(
                (Expr::int(1) + Expr::Pow(Box::new(arg.clone()), Box::new(Expr::int(2))))
                    .recip(),
            );
        },
        "sinh" => product.push(Expr::call("cosh", vec![arg.clone()])),
        "cosh" => product.push(Expr::call("sinh", vec![arg.clone()])),
        "tanh" => {
            // 1 / cosh(u)^2
            product.push(Expr::Pow(
                Box::new(Expr::call("cosh", vec![arg.clone()])),
                Box::new(Expr::int(-2)),
            ));
        },
        "exp" => product.push(Expr::call("exp", vec![arg.clone()])),
        "ln" => product.push(arg.clone().recip()),
        "log" => {
            // log base 10: 1 / (u * ln(10))
            product.push(arg.clone().recip());
            product.push(Expr::call("ln", vec![Expr::int(10)]).recip());
        },
        "sqrt" => {
            // u^(1/2) -> 1/2 * u^(-1/2)
            return derivative(
                &Expr::Pow(
                    Box::new(arg.clone()),
                    Box::new(Expr::frac(Expr::int(1), Expr::int(2))),
                ),
                var,
            );
        },
        _ => {
            return Err(EngineError::Unsupported(format!(
                "cannot differentiate {}",
                name,
            )));
        },
    }

    Ok(product.into())
}

/// `(1 - u^2)^(-1/2)`, shared by the inverse sine and cosine rules.
fn inverse_sqrt_one_minus_square(arg: &Expr) -> Expr {
    let square = Expr::Pow(Box::new(arg.clone()), Box::new(Expr::int(2)));
    Expr::Pow(
        Box::new(Expr::int(1) + Expr::int(-1) * square),
        Box::new(Expr::frac(Expr::int(-1), Expr::int(2))),
    )
}

#[cfg(test)]
mod tests {
    use crate::eval;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use super::*;

    fn diff(input: &str) -> Expr {
        differentiate(&parse(input).unwrap(), "x").unwrap()
    }

    /// Evaluates the expression with `x` bound to the given value.
    fn eval_at(expr: &Expr, x: f64) -> f64 {
        let substituted = substitute(expr, x);
        eval::eval(&substituted).unwrap()
    }

    fn substitute(expr: &Expr, x: f64) -> Expr {
        match expr {
            Expr::Atom(Atom::Sym(sym)) if sym == "x" => Expr::float(x),
            Expr::Atom(Atom::Call(name, args)) => {
                Expr::call(name.clone(), args.iter().map(|arg| substitute(arg, x)).collect())
            },
            Expr::Atom(atom) => Expr::Atom(atom.clone()),
            Expr::Add(terms) => Expr::Add(terms.iter().map(|term| substitute(term, x)).collect()),
            Expr::Mul(factors) => {
                Expr::Mul(factors.iter().map(|factor| substitute(factor, x)).collect())
            },
            Expr::Pow(base, exp) => Expr::Pow(
                Box::new(substitute(base, x)),
                Box::new(substitute(exp, x)),
            ),
        }
    }

    /// Checks the symbolic derivative against a finite-difference approximation at a
    /// handful of points.
    fn check_against_finite_difference(input: &str, points: impl IntoIterator<Item = f64>) {
        const DX: f64 = 1e-6;
        const TOL: f64 = 1e-3;

        let expr = parse(input).unwrap();
        let symbolic = differentiate(&expr, "x").unwrap();

        for point in points {
            let computed = eval_at(&symbolic, point);
            let approximate = (eval_at(&expr, point + DX) - eval_at(&expr, point - DX)) / (2.0 * DX);
            assert!(
                (computed - approximate).abs() < TOL,
                "for \"{input}\" at x={point}: symbolic {computed} vs finite difference {approximate}",
            );
        }
    }

    #[test]
    fn power_rule() {
        assert_eq!(diff("x^2").to_string(), "2*x");
        assert_eq!(diff("x^2 + x + 1").to_string(), "2*x + 1");
    }

    #[test]
    fn constants_vanish() {
        assert_eq!(diff("42"), Expr::int(0));
        assert_eq!(diff("y"), Expr::int(0));
    }

    #[test]
    fn product_rule_matches_finite_difference() {
        check_against_finite_difference("x^2 sin(x)", [0.5, 1.0, 2.0]);
    }

    #[test]
    fn chain_rule_matches_finite_difference() {
        check_against_finite_difference("sin(x^2)", [0.3, 1.1, 2.0]);
        check_against_finite_difference("exp(2x)", [0.0, 0.5, 1.0]);
        check_against_finite_difference("ln(x^2 + 1)", [0.5, 1.5, 3.0]);
        check_against_finite_difference("sqrt(x)", [0.5, 1.0, 4.0]);
    }

    #[test]
    fn inverse_trig_matches_finite_difference() {
        check_against_finite_difference("asin(x)", [-0.5, 0.0, 0.5]);
        check_against_finite_difference("acos(x)", [-0.5, 0.0, 0.5]);
        check_against_finite_difference("atan(x)", [-1.0, 0.0, 2.0]);
    }

    #[test]
    fn hyperbolic_matches_finite_difference() {
        check_against_finite_difference("sinh(x)", [-1.0, 0.0, 1.0]);
        check_against_finite_difference("cosh(x)", [-1.0, 0.0, 1.0]);
        check_against_finite_difference("tanh(x)", [-1.0, 0.0, 1.0]);
    }

    #[test]
    fn exponential_base() {
        check_against_finite_difference("2^x", [0.0, 1.0, 2.0]);
    }

    #[test]
    fn unsupported_tower() {
        let expr = parse("x^x").unwrap();
        assert!(matches!(
            differentiate(&expr, "x"),
            Err(EngineError::Unsupported(_)),
        ));
    }
}
