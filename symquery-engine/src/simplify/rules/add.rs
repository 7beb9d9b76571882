//! Simplification rules for sums, including combining like terms.

use crate::expr::Expr;
use super::{do_add, Number};

/// Splices the terms of nested sums into the outer sum.
pub fn flatten(expr: &Expr) -> Option<Expr> {
    do_add(expr, |terms| {
        if !terms.iter().any(|term| matches!(term, Expr::Add(_))) {
            return None;
        }

        let mut new_terms = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Expr::Add(inner) => new_terms.extend(inner.iter().cloned()),
                other => new_terms.push(other.clone()),
            }
        }
        Some(Expr::Add(new_terms).downgrade())
    })
}

/// `a+0 = a`
pub fn add_zero(expr: &Expr) -> Option<Expr> {
    do_add(expr, |terms| {
        let new_terms: Vec<_> = terms.iter().filter(|term| !term.is_zero()).cloned().collect();
        if new_terms.len() == terms.len() {
            None
        } else {
            Some(Expr::Add(new_terms).downgrade())
        }
    })
}

/// Folds all numeric terms of a sum into one number: `1 + x + 2 = x + 3`.
pub fn fold_numbers(expr: &Expr) -> Option<Expr> {
    do_add(expr, |terms| {
        let numeric = terms.iter().filter_map(Number::from_expr).count();
        if numeric < 2 {
            return None;
        }

        let mut sum = Number::Int(0);
        let mut new_terms = Vec::with_capacity(terms.len() - numeric + 1);
        for term in terms {
            match Number::from_expr(term) {
                Some(number) => sum = sum.add(number),
                None => new_terms.push(term.clone()),
            }
        }
        if !sum.is_zero() || new_terms.is_empty() {
            new_terms.push(sum.into_expr());
        }
        Some(Expr::Add(new_terms).downgrade())
    })
}

/// Extracts the numeric coefficient and the remaining factors of a term.
///
/// - `5` -> `(5, 1)`
/// - `3*a` -> `(3, a)`
/// - `a` -> `(1, a)`
/// - `x*y^2` -> `(1, x*y^2)`
fn coefficient(term: &Expr) -> (Number, Expr) {
    match term {
        Expr::Mul(factors) => {
            let mut coeff = Number::Int(1);
            let mut rest = Vec::with_capacity(factors.len());
            for factor in factors {
                match Number::from_expr(factor) {
                    Some(number) => coeff = coeff.mul(number),
                    None => rest.push(factor.clone()),
                }
            }
            (coeff, Expr::Mul(rest).downgrade())
        },
        other => match Number::from_expr(other) {
            Some(number) => (number, Expr::int(1)),
            None => (Number::Int(1), other.clone()),
        },
    }
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `2a+3a = 5a`
/// `3x^2y - 2x^2y = x^2y`
pub fn combine_like_terms(expr: &Expr) -> Option<Expr> {
    do_add(expr, |terms| {
        let mut new_terms = terms.to_vec();
        let mut current = 0;

        // O(n^2): every term scans the terms after it for a matching factor part
        while current < new_terms.len() {
            let (mut coeff, factors) = coefficient(&new_terms[current]);
            let mut combined = false;

            let mut next = current + 1;
            while next < new_terms.len() {
                let (next_coeff, next_factors) = coefficient(&new_terms[next]);
                if factors == next_factors {
                    coeff = coeff.add(next_coeff);
                    new_terms.swap_remove(next);
                    combined = true;
                } else {
                    next += 1;
                }
            }

            if combined {
                new_terms[current] = if coeff.is_one() {
                    factors
                } else {
                    coeff.into_expr() * factors
                };
            }
            current += 1;
        }

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(Expr::Add(new_terms).downgrade())
        }
    })
}

/// Applies all addition rules.
pub fn all(expr: &Expr) -> Option<Expr> {
    flatten(expr)
        .or_else(|| add_zero(expr))
        .or_else(|| fold_numbers(expr))
        .or_else(|| combine_like_terms(expr))
}
