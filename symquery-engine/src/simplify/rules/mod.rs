//! The simplification rule set.
//!
//! Each rule takes the expression to simplify and returns `Some(expr)` with the
//! rewritten expression if the rule applies, or `None` if it does not. Rules must only
//! return `Some` when they actually changed something; the driver applies them to a
//! fixed point.

pub mod add;
pub mod multiply;
pub mod power;

use crate::expr::{Atom, Expr};

/// If the expression is a sum, calls the given transformation function with the terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_add(expr: &Expr, f: impl Fn(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Add(terms) = expr {
        f(terms)
    } else {
        None
    }
}

/// If the expression is a product, calls the given transformation function with the
/// factors.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_multiply(expr: &Expr, f: impl Fn(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Mul(factors) = expr {
        f(factors)
    } else {
        None
    }
}

/// If the expression is a power, calls the given transformation function with the base
/// and exponent.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_power(expr: &Expr, f: impl Fn(&Expr, &Expr) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Pow(base, exp) = expr {
        f(base, exp)
    } else {
        None
    }
}

/// A numeric value during rule evaluation: exact while both operands are integers,
/// float as soon as either side is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn from_expr(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Atom(Atom::Int(n)) => Some(Self::Int(*n)),
            Expr::Atom(Atom::Float(n)) => Some(Self::Float(*n)),
            _ => None,
        }
    }

    pub(crate) fn into_expr(self) -> Expr {
        match self {
            Self::Int(n) => Expr::int(n),
            Self::Float(n) => Expr::float(n),
        }
    }

    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(n) => n,
        }
    }

    pub(crate) fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }

    pub(crate) fn is_one(self) -> bool {
        self.as_f64() == 1.0
    }

    /// Adds two numbers, falling back to float on integer overflow.
    pub(crate) fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Int(lhs), Self::Int(rhs)) => match lhs.checked_add(rhs) {
                Some(sum) => Self::Int(sum),
                None => Self::Float(lhs as f64 + rhs as f64),
            },
            (lhs, rhs) => Self::Float(lhs.as_f64() + rhs.as_f64()),
        }
    }

    /// Multiplies two numbers, falling back to float on integer overflow.
    pub(crate) fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Int(lhs), Self::Int(rhs)) => match lhs.checked_mul(rhs) {
                Some(product) => Self::Int(product),
                None => Self::Float(lhs as f64 * rhs as f64),
            },
            (lhs, rhs) => Self::Float(lhs.as_f64() * rhs.as_f64()),
        }
    }
}

/// Applies all rules.
pub fn all(expr: &Expr) -> Option<Expr> {
    add::all(expr)
        .or_else(|| multiply::all(expr))
        .or_else(|| power::all(expr))
}
