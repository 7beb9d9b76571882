//! Simplification rules for products, including combining like factors and reducing
//! integer fractions.

use crate::expr::Expr;
use super::{do_multiply, Number};

/// Splices the factors of nested products into the outer product.
pub fn flatten(expr: &Expr) -> Option<Expr> {
    do_multiply(expr, |factors| {
        if !factors.iter().any(|factor| matches!(factor, Expr::Mul(_))) {
            return None;
        }

        let mut new_factors = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                Expr::Mul(inner) => new_factors.extend(inner.iter().cloned()),
                other => new_factors.push(other.clone()),
            }
        }
        Some(Expr::Mul(new_factors).downgrade())
    })
}

/// `0*a = 0`
pub fn mul_zero(expr: &Expr) -> Option<Expr> {
    do_multiply(expr, |factors| {
        if factors.iter().any(|factor| factor.is_zero()) {
            Some(Expr::int(0))
        } else {
            None
        }
    })
}

/// `1*a = a`
pub fn mul_one(expr: &Expr) -> Option<Expr> {
    do_multiply(expr, |factors| {
        let new_factors: Vec<_> = factors.iter().filter(|factor| !factor.is_one()).cloned().collect();
        if new_factors.len() == factors.len() {
            None
        } else {
            Some(Expr::Mul(new_factors).downgrade())
        }
    })
}

/// Folds all numeric factors of a product into one number: `2 * x * 3 = 6x`.
pub fn fold_numbers(expr: &Expr) -> Option<Expr> {
    do_multiply(expr, |factors| {
        let numeric = factors.iter().filter_map(Number::from_expr).count();
        if numeric < 2 {
            return None;
        }

        let mut product = Number::Int(1);
        let mut new_factors = Vec::with_capacity(factors.len() - numeric + 1);
        for factor in factors {
            match Number::from_expr(factor) {
                Some(number) => product = product.mul(number),
                None => new_factors.push(factor.clone()),
            }
        }
        if !product.is_one() || new_factors.is_empty() {
            new_factors.insert(0, product.into_expr());
        }
        Some(Expr::Mul(new_factors).downgrade())
    })
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.abs()
}

/// Reduces the integer fraction carried by a product: `6 * 4^-1 = 3 * 2^-1`,
/// `4 * 2^-1 = 2`.
pub fn reduce_int_fraction(expr: &Expr) -> Option<Expr> {
    do_multiply(expr, |factors| {
        let mut numerator: i64 = 1;
        let mut denominator: i64 = 1;
        let mut rest = Vec::with_capacity(factors.len());

        for factor in factors {
            if let Some(n) = factor.as_int() {
                numerator = numerator.checked_mul(n)?;
            } else if let Some(n) = factor.as_int_recip() {
                denominator = denominator.checked_mul(n)?;
            } else {
                rest.push(factor.clone());
            }
        }

        let g = gcd(numerator, denominator);
        if g <= 1 || denominator == 0 {
            return None;
        }

        let (numerator, denominator) = (numerator / g, denominator / g);
        if numerator != 1 || rest.is_empty() {
            rest.insert(0, Expr::int(numerator));
        }
        if denominator != 1 {
            rest.push(Expr::int(denominator).recip());
        }
        Some(Expr::Mul(rest).downgrade())
    })
}

/// Extracts the base and numeric exponent of a factor: `x^2` -> `(x, 2)`, `x` -> `(x, 1)`.
fn base_and_exponent(factor: &Expr) -> (&Expr, Option<Number>) {
    match factor {
        Expr::Pow(base, exp) => (base, Number::from_expr(exp)),
        other => (other, Some(Number::Int(1))),
    }
}

/// Combines factors with strictly equal bases by adding their numeric exponents.
///
/// `x*x = x^2`
/// `x*x^2 = x^3`
/// `x*x^-1 = x^0` (reduced to 1 by the power rules)
pub fn combine_like_factors(expr: &Expr) -> Option<Expr> {
    do_multiply(expr, |factors| {
        let mut new_factors = factors.to_vec();
        let mut current = 0;
        let mut changed = false;

        while current < new_factors.len() {
            let (base, exp) = base_and_exponent(&new_factors[current]);
            let (base, mut exp) = match exp {
                // numbers are the fraction rules' job, not ours
                Some(_) if base.as_number().is_some() => {
                    current += 1;
                    continue;
                },
                Some(exp) => (base.clone(), exp),
                None => {
                    current += 1;
                    continue;
                },
            };

            let mut combined = false;
            let mut next = current + 1;
            while next < new_factors.len() {
                let (next_base, next_exp) = base_and_exponent(&new_factors[next]);
                match next_exp {
                    Some(next_exp) if *next_base == base => {
                        exp = exp.add(next_exp);
                        new_factors.swap_remove(next);
                        combined = true;
                    },
                    _ => next += 1,
                }
            }

            if combined {
                new_factors[current] = if exp.is_one() {
                    base
                } else {
                    Expr::Pow(Box::new(base), Box::new(exp.into_expr()))
                };
                changed = true;
            }
            current += 1;
        }

        if changed {
            Some(Expr::Mul(new_factors).downgrade())
        } else {
            None
        }
    })
}

/// Applies all multiplication rules.
pub fn all(expr: &Expr) -> Option<Expr> {
    flatten(expr)
        .or_else(|| mul_zero(expr))
        .or_else(|| mul_one(expr))
        .or_else(|| fold_numbers(expr))
        .or_else(|| reduce_int_fraction(expr))
        .or_else(|| combine_like_factors(expr))
}
