//! Polynomial coefficient extraction.
//!
//! [`coefficients`] views an expression as a polynomial in one variable and returns the
//! coefficient expressions by ascending degree. The solver and the integrator both sit
//! on top of this: the solver to read off linear / quadratic coefficients, the
//! integrator to recognize linear inner arguments for the chain rule.

use crate::expr::{Atom, Expr};
use crate::simplify::simplify;

/// Degrees above this are rejected; nothing downstream can use them.
const MAX_DEGREE: usize = 16;

/// Extracts the coefficients of the expression viewed as a polynomial in `var`, lowest
/// degree first. Coefficients are simplified and free of `var`.
///
/// Returns `None` if the expression is not polynomial in `var` (the variable appears
/// inside a function call, a non-constant exponent, or a denominator).
pub fn coefficients(expr: &Expr, var: &str) -> Option<Vec<Expr>> {
    let raw = extract(expr, var)?;
    let mut coeffs: Vec<Expr> = raw.iter().map(simplify).collect();

    while coeffs.len() > 1 && coeffs.last().map_or(false, Expr::is_zero) {
        coeffs.pop();
    }

    Some(coeffs)
}

/// The degree of the polynomial described by a coefficient list.
pub fn degree(coeffs: &[Expr]) -> usize {
    coeffs.len().saturating_sub(1)
}

fn constant(expr: &Expr) -> Vec<Expr> {
    vec![expr.clone()]
}

fn extract(expr: &Expr, var: &str) -> Option<Vec<Expr>> {
    if !expr.contains_sym(var) {
        return Some(constant(expr));
    }

    match expr {
        Expr::Atom(Atom::Sym(sym)) if sym == var => Some(vec![Expr::int(0), Expr::int(1)]),
        // the variable inside a call is not polynomial
        Expr::Atom(_) => None,
        Expr::Add(terms) => {
            let mut sum: Vec<Expr> = Vec::new();
            for term in terms {
                let term_coeffs = extract(term, var)?;
                if term_coeffs.len() > sum.len() {
                    sum.resize(term_coeffs.len(), Expr::int(0));
                }
                for (i, coeff) in term_coeffs.into_iter().enumerate() {
                    sum[i] = std::mem::replace(&mut sum[i], Expr::int(0)) + coeff;
                }
            }
            Some(sum)
        },
        Expr::Mul(factors) => {
            let mut product = constant(&Expr::int(1));
            for factor in factors {
                let factor_coeffs = extract(factor, var)?;
                product = multiply(&product, &factor_coeffs)?;
            }
            Some(product)
        },
        Expr::Pow(base, exp) => {
            if exp.contains_sym(var) {
                return None;
            }
            let n = exp.as_int()?;
            if !(0..=MAX_DEGREE as i64).contains(&n) {
                // negative exponents put the variable in a denominator
                return None;
            }
            let base_coeffs = extract(base, var)?;
            let mut result = constant(&Expr::int(1));
            for _ in 0..n {
                result = multiply(&result, &base_coeffs)?;
            }
            Some(result)
        },
    }
}

/// Multiplies two coefficient lists (polynomial convolution).
fn multiply(lhs: &[Expr], rhs: &[Expr]) -> Option<Vec<Expr>> {
    let result_len = lhs.len() + rhs.len() - 1;
    if result_len > MAX_DEGREE + 1 {
        return None;
    }

    let mut result = vec![Expr::int(0); result_len];
    for (i, lhs_coeff) in lhs.iter().enumerate() {
        if lhs_coeff.is_zero() {
            continue;
        }
        for (j, rhs_coeff) in rhs.iter().enumerate() {
            if rhs_coeff.is_zero() {
                continue;
            }
            let product = lhs_coeff.clone() * rhs_coeff.clone();
            result[i + j] = std::mem::replace(&mut result[i + j], Expr::int(0)) + product;
        }
    }
    Some(result)
}

/// If the expression is linear in `var` (`a*var + b`), returns `(a, b)` with `a`
/// nonzero.
pub fn linear_parts(expr: &Expr, var: &str) -> Option<(Expr, Expr)> {
    let coeffs = coefficients(expr, var)?;
    match coeffs.len() {
        2 => Some((coeffs[1].clone(), coeffs[0].clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use super::*;

    fn coeffs(input: &str) -> Vec<String> {
        coefficients(&parse(input).unwrap(), "x")
            .unwrap()
            .iter()
            .map(|coeff| coeff.to_string())
            .collect()
    }

    #[test]
    fn quadratic() {
        assert_eq!(coeffs("x^2 - 4"), vec!["-4", "0", "1"]);
        assert_eq!(coeffs("2x^2 + 3x + 1"), vec!["1", "3", "2"]);
    }

    #[test]
    fn expanded_product() {
        assert_eq!(coeffs("(x + 1)(x - 1)"), vec!["-1", "0", "1"]);
    }

    #[test]
    fn symbolic_coefficients() {
        assert_eq!(coeffs("a*x + b"), vec!["b", "a"]);
    }

    #[test]
    fn trailing_zero_degrees_trimmed() {
        assert_eq!(coeffs("x^2 - x^2 + x"), vec!["0", "1"]);
    }

    #[test]
    fn not_polynomial() {
        assert!(coefficients(&parse("sin(x)").unwrap(), "x").is_none());
        assert!(coefficients(&parse("1/x").unwrap(), "x").is_none());
        assert!(coefficients(&parse("2^x").unwrap(), "x").is_none());
    }

    #[test]
    fn linear() {
        let (a, b) = linear_parts(&parse("3x + 2").unwrap(), "x").unwrap();
        assert_eq!(a.to_string(), "3");
        assert_eq!(b.to_string(), "2");
    }
}
