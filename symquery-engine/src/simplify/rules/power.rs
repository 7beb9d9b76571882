//! Simplification rules for powers.

use crate::expr::Expr;
use super::{do_power, Number};

/// `a^0 = 1`, `a^1 = a`
pub fn trivial_exponent(expr: &Expr) -> Option<Expr> {
    do_power(expr, |base, exp| {
        if exp.is_zero() {
            Some(Expr::int(1))
        } else if exp.is_one() {
            Some(base.clone())
        } else {
            None
        }
    })
}

/// `1^a = 1`; `0^a = 0` for positive numeric `a`
pub fn trivial_base(expr: &Expr) -> Option<Expr> {
    do_power(expr, |base, exp| {
        if base.is_one() {
            Some(Expr::int(1))
        } else if base.is_zero() && exp.as_number().map_or(false, |n| n > 0.0) {
            Some(Expr::int(0))
        } else {
            None
        }
    })
}

/// Folds numeric powers: `2^10 = 1024`, `2.0^2 = 4.0`.
///
/// Negative integer exponents are left alone so they keep printing as fractions, and
/// integer bases only fold while the result fits in an `i64`.
pub fn fold_numbers(expr: &Expr) -> Option<Expr> {
    do_power(expr, |base, exp| {
        let base = Number::from_expr(base)?;
        let exp = Number::from_expr(exp)?;

        match (base, exp) {
            (Number::Int(base), Number::Int(exp)) if (0..=63).contains(&exp) => {
                base.checked_pow(exp as u32).map(Expr::int)
            },
            (Number::Int(_), Number::Int(_)) => None,
            (base, exp) => {
                let value = base.as_f64().powf(exp.as_f64());
                value.is_finite().then(|| Expr::float(value))
            },
        }
    })
}

/// `(a^b)^c = a^(b*c)` for numeric `b` and `c`.
pub fn flatten_nested(expr: &Expr) -> Option<Expr> {
    do_power(expr, |base, exp| {
        if let Expr::Pow(inner_base, inner_exp) = base {
            let combined = Number::from_expr(inner_exp)?.mul(Number::from_expr(exp)?);
            return Some(Expr::Pow(inner_base.clone(), Box::new(combined.into_expr())));
        }
        None
    })
}

/// Applies all power rules.
pub fn all(expr: &Expr) -> Option<Expr> {
    trivial_exponent(expr)
        .or_else(|| trivial_base(expr))
        .or_else(|| fold_numbers(expr))
        .or_else(|| flatten_nested(expr))
}
