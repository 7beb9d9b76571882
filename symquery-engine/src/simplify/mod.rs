//! Expression simplification.
//!
//! Simplification reduces an expression toward a canonical low-complexity form by
//! repeatedly applying a set of rewrite rules. Each rule is a function that takes the
//! expression and returns `Some(expr)` if it applies, or `None` if it does not; the
//! current set lives in [`rules`] and covers dropping additive / multiplicative
//! identities, folding numeric terms and factors, combining like terms and like
//! factors, and the basic power laws.
//!
//! Rules are applied bottom-up: the children of a node are simplified before the node
//! itself, and whole-tree passes repeat until a pass changes nothing. The final pass
//! sorts the children of sums and products into a canonical order so that equal inputs
//! always display identically.

pub mod rules;

use crate::expr::{Atom, Expr};

/// Hard cap on whole-tree passes. Rules strictly reduce the expression, so this is
/// never hit in practice.
const MAX_PASSES: usize = 100;

/// Simplifies the given expression.
pub fn simplify(expr: &Expr) -> Expr {
    let mut current = expr.clone();
    for _ in 0..MAX_PASSES {
        let next = simplify_node(&current);
        if next == current {
            current = next;
            break;
        }
        current = next;
    }
    sort_canonical(current)
}

/// Simplifies one node: children first, then this node's rules to a fixed point.
fn simplify_node(expr: &Expr) -> Expr {
    let mut expr = match expr {
        Expr::Atom(Atom::Call(name, args)) => {
            Expr::call(name.clone(), args.iter().map(simplify_node).collect())
        },
        Expr::Atom(atom) => Expr::Atom(atom.clone()),
        Expr::Add(terms) => Expr::Add(terms.iter().map(simplify_node).collect()).downgrade(),
        Expr::Mul(factors) => Expr::Mul(factors.iter().map(simplify_node).collect()).downgrade(),
        Expr::Pow(base, exp) => Expr::Pow(
            Box::new(simplify_node(base)),
            Box::new(simplify_node(exp)),
        ),
    };

    while let Some(next) = rules::all(&expr) {
        expr = next;
    }

    expr
}

/// Recursively sorts the children of sums and products into canonical order.
///
/// Products sort ascending (numbers first, so `2*x`), sums descending (powers first, so
/// `x^2 + 2*x + 1`).
fn sort_canonical(expr: Expr) -> Expr {
    match expr {
        Expr::Atom(Atom::Call(name, args)) => {
            Expr::call(name, args.into_iter().map(sort_canonical).collect())
        },
        Expr::Atom(atom) => Expr::Atom(atom),
        Expr::Add(terms) => {
            let mut terms: Vec<_> = terms.into_iter().map(sort_canonical).collect();
            terms.sort_by(|lhs, rhs| {
                term_degree(rhs)
                    .partial_cmp(&term_degree(lhs))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| lhs.canonical_cmp(rhs))
            });
            Expr::Add(terms)
        },
        Expr::Mul(factors) => {
            let mut factors: Vec<_> = factors.into_iter().map(sort_canonical).collect();
            factors.sort_by(|lhs, rhs| lhs.canonical_cmp(rhs));
            Expr::Mul(factors)
        },
        Expr::Pow(base, exp) => Expr::Pow(
            Box::new(sort_canonical(*base)),
            Box::new(sort_canonical(*exp)),
        ),
    }
}

/// A rough total degree of a term, used to order the terms of a sum highest power
/// first. Only a display heuristic, not a polynomial degree in any strict sense.
fn term_degree(expr: &Expr) -> f64 {
    match expr {
        Expr::Atom(Atom::Int(_) | Atom::Float(_)) => 0.0,
        Expr::Atom(Atom::Sym(_)) => 1.0,
        Expr::Atom(Atom::Call(..)) => 1.0,
        Expr::Add(terms) => terms.iter().map(|term| term_degree(term)).fold(0.0, f64::max),
        Expr::Mul(factors) => factors.iter().map(|factor| term_degree(factor)).sum(),
        Expr::Pow(base, exp) => match exp.as_number() {
            Some(n) => term_degree(base) * n,
            None => term_degree(base) + 1.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use super::*;

    fn simplified(input: &str) -> String {
        simplify(&parse(input).unwrap()).to_string()
    }

    #[test]
    fn combine_like_terms() {
        assert_eq!(simplified("x + x"), "2*x");
        assert_eq!(simplified("x + x + x"), "3*x");
        assert_eq!(simplified("2a + 3a"), "5*a");
    }

    #[test]
    fn fold_numbers() {
        assert_eq!(simplified("2 + 2"), "4");
        assert_eq!(simplified("2 * 3 * 4"), "24");
        assert_eq!(simplified("2^10"), "1024");
    }

    #[test]
    fn identities() {
        assert_eq!(simplified("x + 0"), "x");
        assert_eq!(simplified("1 * x"), "x");
        assert_eq!(simplified("x^1"), "x");
        assert_eq!(simplified("x^0"), "1");
        assert_eq!(simplified("0 * x"), "0");
    }

    #[test]
    fn like_factors() {
        assert_eq!(simplified("x * x"), "x^2");
        assert_eq!(simplified("x * x^2"), "x^3");
        assert_eq!(simplified("x / x"), "1");
    }

    #[test]
    fn fraction_reduction() {
        assert_eq!(simplified("6/4"), "3/2");
        assert_eq!(simplified("4/2"), "2");
        assert_eq!(simplified("2x/2"), "x");
    }

    #[test]
    fn canonical_term_order() {
        assert_eq!(simplified("1 + 2x + x^2"), "x^2 + 2*x + 1");
    }

    #[test]
    fn cancellation_to_zero() {
        assert_eq!(simplified("x - x"), "0");
    }

    #[test]
    fn mixed_terms_left_alone() {
        assert_eq!(simplified("x + y"), "x + y");
    }

    #[test]
    fn idempotent() {
        let once = simplify(&parse("3x^2y - 2x^2y + x").unwrap());
        let twice = simplify(&once);
        assert_eq!(once, twice);
    }
}
