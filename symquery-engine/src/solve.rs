//! Equation solving for polynomials up to degree two.
//!
//! `solve(lhs, rhs, var)` moves everything to one side and reads the linear / quadratic
//! coefficients off with [`crate::poly`]. Roots of equations with integer coefficients
//! come out exact (integers or reduced fractions) whenever they are rational; otherwise
//! floats. Symbolic coefficients produce the quadratic formula symbolically.

use crate::error::EngineError;
use crate::expr::Expr;
use crate::poly;
use crate::simplify::simplify;
use std::ops::Neg;

/// One variable-to-value assignment, e.g. `x = -1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The variable being assigned.
    pub variable: String,

    /// The value assigned to it.
    pub value: Expr,
}

/// Solves `lhs = rhs`.
///
/// With an explicit target variable, solves for it and errors if that is not possible.
/// Without one, solves for every free symbol of the equation in sorted order, collecting
/// all solutions; an error is only reported if no symbol could be solved for.
pub fn solve(lhs: &Expr, rhs: &Expr, var: Option<&str>) -> Result<Vec<Solution>, EngineError> {
    let expr = simplify(&(lhs.clone() + rhs.clone().neg()));

    if let Some(var) = var {
        let roots = solve_single(&expr, var)?;
        return Ok(roots
            .into_iter()
            .map(|value| Solution { variable: var.to_string(), value })
            .collect());
    }

    let symbols = expr.free_symbols();
    if symbols.is_empty() {
        // no unknowns: `2 = 2` and `2 = 3` both have an empty solution set
        return Ok(Vec::new());
    }

    let mut solutions = Vec::new();
    let mut first_error = None;
    for symbol in &symbols {
        match solve_single(&expr, symbol) {
            Ok(roots) => solutions.extend(roots.into_iter().map(|value| Solution {
                variable: symbol.clone(),
                value,
            })),
            Err(err) => {
                first_error.get_or_insert(err);
            },
        }
    }

    if solutions.is_empty() {
        if let Some(err) = first_error {
            return Err(err);
        }
    }
    Ok(solutions)
}

/// Solves `expr = 0` for a single variable, returning the roots in ascending order
/// where the order is defined.
fn solve_single(expr: &Expr, var: &str) -> Result<Vec<Expr>, EngineError> {
    let coeffs = poly::coefficients(expr, var).ok_or_else(|| {
        EngineError::Unsupported(format!("cannot solve for {}: not a polynomial equation", var))
    })?;

    match poly::degree(&coeffs) {
        // a constant equation constrains nothing
        0 => Ok(Vec::new()),
        1 => solve_linear(&coeffs[1], &coeffs[0]),
        2 => solve_quadratic(&coeffs[2], &coeffs[1], &coeffs[0]),
        n => Err(EngineError::Unsupported(format!(
            "cannot solve a degree-{} equation for {}",
            n, var,
        ))),
    }
}

/// `a*x + b = 0` -> `x = -b/a`.
fn solve_linear(a: &Expr, b: &Expr) -> Result<Vec<Expr>, EngineError> {
    if let (Some(a), Some(b)) = (a.as_int(), b.as_int()) {
        if let Some(root) = rational_i128(-(b as i128), a as i128) {
            return Ok(vec![root]);
        }
    }
    if let (Some(a), Some(b)) = (a.as_number(), b.as_number()) {
        return Ok(vec![Expr::float(-b / a)]);
    }
    Ok(vec![simplify(&Expr::frac(b.clone().neg(), a.clone()))])
}

/// `a*x^2 + b*x + c = 0` via the quadratic formula.
fn solve_quadratic(a: &Expr, b: &Expr, c: &Expr) -> Result<Vec<Expr>, EngineError> {
    if let (Some(a), Some(b), Some(c)) = (a.as_int(), b.as_int(), c.as_int()) {
        return Ok(integer_quadratic(a, b, c));
    }

    if let (Some(a), Some(b), Some(c)) = (a.as_number(), b.as_number(), c.as_number()) {
        return Ok(float_quadratic(a, b, c));
    }

    // symbolic coefficients: emit the quadratic formula itself
    let disc = Expr::Pow(Box::new(b.clone()), Box::new(Expr::int(2)))
        + Expr::int(-4) * a.clone() * c.clone();
    let sqrt_disc = Expr::call("sqrt", vec![simplify(&disc)]);
    let denominator = Expr::int(2) * a.clone();
    Ok(vec![
        simplify(&Expr::frac(b.clone().neg() + sqrt_disc.clone().neg(), denominator.clone())),
        simplify(&Expr::frac(b.clone().neg() + sqrt_disc, denominator)),
    ])
}

/// Exact roots for integer coefficients: rational when the discriminant is a perfect
/// square, float otherwise, none when it is negative. Coefficients large enough that
/// the exact arithmetic would overflow fall back to the float formula.
fn integer_quadratic(a: i64, b: i64, c: i64) -> Vec<Expr> {
    let disc = (b as i128).checked_mul(b as i128).and_then(|bb| {
        (a as i128)
            .checked_mul(c as i128)
            .and_then(|ac| ac.checked_mul(4))
            .and_then(|ac4| bb.checked_sub(ac4))
    });
    let disc = match disc {
        Some(disc) => disc,
        None => return float_quadratic(a as f64, b as f64, c as f64),
    };
    if disc < 0 {
        return Vec::new();
    }

    if let Some(root) = perfect_sqrt(disc) {
        let low = rational_i128(-(b as i128) - root, 2 * a as i128);
        let high = rational_i128(-(b as i128) + root, 2 * a as i128);
        if let (Some(low), Some(high)) = (low, high) {
            let mut roots = vec![low];
            if root != 0 {
                roots.push(high);
            }
            roots.sort_by(|lhs, rhs| {
                let lhs = rational_value(lhs);
                let rhs = rational_value(rhs);
                lhs.partial_cmp(&rhs).unwrap_or(std::cmp::Ordering::Equal)
            });
            return roots;
        }
    }

    float_quadratic(a as f64, b as f64, c as f64)
}

/// The quadratic formula in `f64`, with the roots in ascending order.
fn float_quadratic(a: f64, b: f64, c: f64) -> Vec<Expr> {
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sqrt = disc.sqrt();
    let mut roots = [(-b - sqrt) / (2.0 * a), (-b + sqrt) / (2.0 * a)];
    roots.sort_by(|lhs, rhs| lhs.partial_cmp(rhs).unwrap_or(std::cmp::Ordering::Equal));
    if roots[0] == roots[1] {
        return vec![Expr::float(roots[0])];
    }
    vec![Expr::float(roots[0]), Expr::float(roots[1])]
}

/// Integer square root if `n` is a perfect square.
fn perfect_sqrt(n: i128) -> Option<i128> {
    if n < 0 {
        return None;
    }
    let root = (n as f64).sqrt().round() as i128;
    for candidate in root.saturating_sub(1)..=root.saturating_add(1) {
        if candidate.checked_mul(candidate) == Some(n) {
            return Some(candidate);
        }
    }
    None
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.abs()
}

/// A reduced rational as an expression: an integer when the division is exact, a
/// reduced fraction otherwise. `None` when either reduced part is out of `i64` range;
/// callers fall back to floats.
fn rational_i128(numerator: i128, denominator: i128) -> Option<Expr> {
    let g = gcd(numerator, denominator).max(1);
    let (mut numerator, mut denominator) = (numerator / g, denominator / g);
    if denominator < 0 {
        numerator = -numerator;
        denominator = -denominator;
    }
    let numerator = i64::try_from(numerator).ok()?;
    if denominator == 1 {
        Some(Expr::int(numerator))
    } else {
        let denominator = i64::try_from(denominator).ok()?;
        Some(Expr::frac(Expr::int(numerator), Expr::int(denominator)))
    }
}

/// Approximate numeric value of the expressions [`rational_i128`] produces, for root
/// ordering only.
fn rational_value(expr: &Expr) -> f64 {
    crate::eval::eval(expr).unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use super::*;

    fn roots_of(lhs: &str, rhs: &str, var: Option<&str>) -> Vec<String> {
        solve(&parse(lhs).unwrap(), &parse(rhs).unwrap(), var)
            .unwrap()
            .into_iter()
            .map(|solution| format!("{} = {}", solution.variable, solution.value))
            .collect()
    }

    #[test]
    fn linear() {
        assert_eq!(roots_of("2x + 4", "0", Some("x")), vec!["x = -2"]);
        assert_eq!(roots_of("3x", "2", Some("x")), vec!["x = 2/3"]);
    }

    #[test]
    fn quadratic_exact() {
        assert_eq!(roots_of("x^2 - 1", "0", Some("x")), vec!["x = -1", "x = 1"]);
        assert_eq!(roots_of("x^2 - 4", "0", Some("x")), vec!["x = -2", "x = 2"]);
        assert_eq!(
            roots_of("x^2 + 5x + 6", "0", Some("x")),
            vec!["x = -3", "x = -2"],
        );
    }

    #[test]
    fn quadratic_double_root() {
        assert_eq!(roots_of("x^2 - 2x + 1", "0", Some("x")), vec!["x = 1"]);
    }

    #[test]
    fn quadratic_irrational() {
        let roots = solve(&parse("x^2 - 2").unwrap(), &parse("0").unwrap(), Some("x")).unwrap();
        assert_eq!(roots.len(), 2);
        let values: Vec<f64> = roots
            .iter()
            .map(|solution| crate::eval::eval(&solution.value).unwrap())
            .collect();
        assert!((values[0] + 2f64.sqrt()).abs() < 1e-12);
        assert!((values[1] - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn no_real_roots() {
        assert_eq!(roots_of("x^2 + 1", "0", Some("x")), Vec::<String>::new());
    }

    #[test]
    fn huge_coefficients_overflow_to_floats() {
        // exact discriminant of i64::MAX coefficients exceeds i128
        assert_eq!(
            roots_of("9223372036854775807x^2 + 9223372036854775807", "0", Some("x")),
            Vec::<String>::new(),
        );

        let roots = integer_quadratic(i64::MAX, 0, -i64::MAX);
        assert_eq!(roots, vec![Expr::float(-1.0), Expr::float(1.0)]);
    }

    #[test]
    fn out_of_range_rationals_are_rejected() {
        assert_eq!(rational_i128(i64::MAX as i128 + 1, 1), None);
        assert_eq!(rational_i128(1, i64::MAX as i128 + 1), None);
        assert_eq!(rational_i128(-6, 4), Some(Expr::frac(Expr::int(-3), Expr::int(2))));
    }

    #[test]
    fn equation_with_nonzero_rhs() {
        assert_eq!(roots_of("x^2", "9", Some("x")), vec!["x = -3", "x = 3"]);
    }

    #[test]
    fn all_free_symbols() {
        // `x + y = 0` solved for each symbol in sorted order
        assert_eq!(roots_of("x + y", "0", None), vec!["x = -y", "y = -x"]);
    }

    #[test]
    fn unsupported_equation() {
        let err = solve(&parse("sin(x)").unwrap(), &parse("0").unwrap(), Some("x")).unwrap_err();
        assert!(matches!(err, EngineError::Unsupported(_)));
    }

    #[test]
    fn cubic_rejected() {
        let err = solve(&parse("x^3 - 1").unwrap(), &parse("0").unwrap(), Some("x")).unwrap_err();
        assert!(matches!(err, EngineError::Unsupported(_)));
    }
}
