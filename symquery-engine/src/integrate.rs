//! Symbolic integration.
//!
//! Table-driven antiderivatives: constants, sums, constant multiples, the power rule
//! (including `x^-1 -> ln(x)`), and `sin` / `cos` / `exp` of arguments linear in the
//! integration variable. Anything else is [`EngineError::Unsupported`]; this engine
//! does not attempt integration by parts or substitution.

use crate::error::EngineError;
use crate::expr::{Atom, Expr};
use crate::poly;
use crate::simplify::simplify;

/// Integrates the expression with respect to `var` and simplifies the result. The
/// constant of integration is omitted.
pub fn integrate(expr: &Expr, var: &str) -> Result<Expr, EngineError> {
    Ok(simplify(&antiderivative(expr, var)?))
}

fn unsupported(expr: &Expr) -> EngineError {
    EngineError::Unsupported(format!("cannot integrate {}", expr))
}

fn antiderivative(expr: &Expr, var: &str) -> Result<Expr, EngineError> {
    // constant with respect to `var`: c -> c*var
    if !expr.contains_sym(var) {
        return Ok(expr.clone() * Expr::sym(var));
    }

    match expr {
        Expr::Atom(Atom::Sym(_)) => {
            // the symbol must be `var` itself here: x -> x^2/2
            Ok(Expr::frac(
                Expr::Pow(Box::new(Expr::sym(var)), Box::new(Expr::int(2))),
                Expr::int(2),
            ))
        },
        Expr::Atom(Atom::Call(..)) | Expr::Pow(..) => varying_factor(expr, var),
        Expr::Add(terms) => {
            let mut sum = Vec::with_capacity(terms.len());
            for term in terms {
                sum.push(antiderivative(term, var)?);
            }
            Ok(Expr::Add(sum).downgrade())
        },
        Expr::Mul(factors) => {
            // pull factors free of `var` out of the integral
            let (constant, varying): (Vec<_>, Vec<_>) = factors
                .iter()
                .cloned()
                .partition(|factor| !factor.contains_sym(var));

            let varying = Expr::Mul(varying).downgrade();
            let integrated = match &varying {
                Expr::Mul(_) => {
                    // a genuine product of varying factors: only polynomials make it
                    // past this point
                    let coeffs = poly::coefficients(&varying, var).ok_or_else(|| unsupported(expr))?;
                    polynomial_antiderivative(&coeffs, var)
                },
                single => antiderivative(single, var)?,
            };

            Ok(Expr::Mul(constant).downgrade() * integrated)
        },
        Expr::Atom(_) => Err(unsupported(expr)),
    }
}

/// Integrates a single varying factor: a power of `var` or a supported function call
/// with a linear argument.
fn varying_factor(expr: &Expr, var: &str) -> Result<Expr, EngineError> {
    match expr {
        Expr::Pow(base, exp) => {
            if base.as_sym() == Some(var) && !exp.contains_sym(var) {
                // power rule: x^n -> x^(n+1)/(n+1), with the n = -1 special case
                if exp.as_int() == Some(-1) {
                    return Ok(Expr::call("ln", vec![(**base).clone()]));
                }
                let next = simplify(&((**exp).clone() + Expr::int(1)));
                return Ok(Expr::frac(
                    Expr::Pow(base.clone(), Box::new(next.clone())),
                    next,
                ));
            }
            // powers of compound bases are only handled as expanded polynomials
            let coeffs = poly::coefficients(expr, var).ok_or_else(|| unsupported(expr))?;
            Ok(polynomial_antiderivative(&coeffs, var))
        },
        Expr::Atom(Atom::Call(name, args)) if args.len() == 1 => {
            let arg = &args[0];
            let (slope, _) = poly::linear_parts(arg, var).ok_or_else(|| unsupported(expr))?;

            let inner = match name.as_str() {
                // sin(u) -> -cos(u)/a
                "sin" => Expr::int(-1) * Expr::call("cos", vec![arg.clone()]),
                // cos(u) -> sin(u)/a
                "cos" => Expr::call("sin", vec![arg.clone()]),
                // exp(u) -> exp(u)/a
                "exp" => Expr::call("exp", vec![arg.clone()]),
                _ => return Err(unsupported(expr)),
            };
            Ok(Expr::frac(inner, slope))
        },
        _ => Err(unsupported(expr)),
    }
}

/// Termwise power rule over a coefficient list.
fn polynomial_antiderivative(coeffs: &[Expr], var: &str) -> Expr {
    let mut terms = Vec::with_capacity(coeffs.len());
    for (degree, coeff) in coeffs.iter().enumerate() {
        if coeff.is_zero() {
            continue;
        }
        let power = Expr::Pow(
            Box::new(Expr::sym(var)),
            Box::new(Expr::int(degree as i64 + 1)),
        );
        terms.push(Expr::frac(coeff.clone() * power, Expr::int(degree as i64 + 1)));
    }
    Expr::Add(terms).downgrade()
}

#[cfg(test)]
mod tests {
    use crate::derivative::differentiate;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use super::*;

    fn integral(input: &str) -> Expr {
        integrate(&parse(input).unwrap(), "x").unwrap()
    }

    #[test]
    fn power_rule() {
        assert_eq!(integral("x^2").to_string(), "x^3/3");
        assert_eq!(integral("x").to_string(), "x^2/2");
    }

    #[test]
    fn constants() {
        assert_eq!(integral("3").to_string(), "3*x");
        assert_eq!(integral("y").to_string(), "x*y");
    }

    #[test]
    fn reciprocal() {
        assert_eq!(integral("1/x").to_string(), "ln(x)");
    }

    #[test]
    fn trig_linear_argument() {
        assert_eq!(integral("sin(x)").to_string(), "-cos(x)");
        assert_eq!(integral("cos(2x)").to_string(), "sin(2*x)/2");
    }

    #[test]
    fn unsupported_forms() {
        for input in ["sin(x^2)", "ln(x)", "2^x"] {
            let expr = parse(input).unwrap();
            assert!(
                matches!(integrate(&expr, "x"), Err(EngineError::Unsupported(_))),
                "expected unsupported: {input}",
            );
        }
    }

    /// Differentiating the antiderivative must give back something numerically equal
    /// to the integrand.
    #[test]
    fn round_trips_through_derivative() {
        for input in ["x^2 + 3x + 1", "2x^5", "sin(x)", "exp(3x)", "(x + 1)(x + 2)"] {
            let expr = parse(input).unwrap();
            let antiderivative = integrate(&expr, "x").unwrap();
            let back = differentiate(&antiderivative, "x").unwrap();

            for point in [0.25, 1.0, 1.75] {
                let expected = eval_at(&expr, point);
                let actual = eval_at(&back, point);
                assert!(
                    (expected - actual).abs() < 1e-9,
                    "d/dx integral of {input} at {point}: {actual} != {expected}",
                );
            }
        }
    }

    fn eval_at(expr: &Expr, x: f64) -> f64 {
        fn substitute(expr: &Expr, x: f64) -> Expr {
            match expr {
                Expr::Atom(crate::expr::Atom::Sym(sym)) if sym == "x" => Expr::float(x),
                Expr::Atom(crate::expr::Atom::Call(name, args)) => Expr::call(
                    name.clone(),
                    args.iter().map(|arg| substitute(arg, x)).collect(),
                ),
                Expr::Atom(atom) => Expr::Atom(atom.clone()),
                Expr::Add(terms) => {
                    Expr::Add(terms.iter().map(|term| substitute(term, x)).collect())
                },
                Expr::Mul(factors) => {
                    Expr::Mul(factors.iter().map(|factor| substitute(factor, x)).collect())
                },
                Expr::Pow(base, exp) => Expr::Pow(
                    Box::new(substitute(base, x)),
                    Box::new(substitute(exp, x)),
                ),
            }
        }

        crate::eval::eval(&substitute(expr, x)).unwrap()
    }
}
