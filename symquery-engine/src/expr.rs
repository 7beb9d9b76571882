//! A flattened representation of mathematical expressions, built for algebraic
//! manipulation rather than parsing.
//!
//! The expression `x + (y + z)` is stored as a single [`Expr::Add`] node with *three*
//! children. Flattening makes the common simplification steps (combining like terms,
//! folding numeric factors) a matter of scanning one list instead of rotating a binary
//! tree. Division never appears as its own node: `a / b` is stored as `a * b^-1`, and
//! subtraction as `a + -1 * b`.
//!
//! # Strict equality
//!
//! Deciding whether two expressions are *mathematically* equal is as hard as simplifying
//! them, so the [`PartialEq`] implementation here deliberately checks a much cheaper
//! relation: **strict equality**. Two expressions are strictly equal when they have the
//! same shape, with [`Expr::Add`] and [`Expr::Mul`] children matched as multisets (order
//! does not matter). Strict equality never reports a false positive, which is exactly
//! what the like-term simplification rules need.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::{Add, Mul, Neg};

/// Symbol names that are known constants rather than free variables.
pub const CONSTANTS: &[&str] = &["pi"];

/// A single indivisible term or factor: a number, variable, or function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// An integer, such as `2` or `144`.
    Int(i64),

    /// A floating-point number, such as `3.14` or `0.5`.
    Float(f64),

    /// A variable or named constant, such as `x` or `pi`.
    Sym(String),

    /// A function call, such as `sin(x)`.
    Call(String, Vec<Expr>),
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Sym(sym) => write!(f, "{}", sym),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

/// A mathematical expression, flattened into sums of products.
///
/// See the [module-level documentation](self) for the representation invariants.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A single term or factor.
    Atom(Atom),

    /// Multiple terms added together.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together.
    Mul(Vec<Expr>),

    /// An expression raised to a power.
    Pow(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// An integer expression.
    pub fn int(n: i64) -> Self {
        Self::Atom(Atom::Int(n))
    }

    /// A float expression.
    pub fn float(n: f64) -> Self {
        Self::Atom(Atom::Float(n))
    }

    /// A symbol expression.
    pub fn sym(name: impl Into<String>) -> Self {
        Self::Atom(Atom::Sym(name.into()))
    }

    /// A function call expression.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Atom(Atom::Call(name.into(), args))
    }

    /// The multiplicative inverse of `self`, i.e. `self^-1`. No simplification is done.
    pub fn recip(self) -> Self {
        Self::Pow(Box::new(self), Box::new(Self::int(-1)))
    }

    /// Builds the fraction `numerator / denominator`, represented as
    /// `numerator * denominator^-1`, flattening any [`Expr::Mul`] operands.
    pub fn frac(numerator: Expr, denominator: Expr) -> Self {
        numerator * denominator.recip()
    }

    /// If the expression is an [`Atom::Int`], returns the contained integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Atom(Atom::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// If the expression is a numeric atom, returns it as a float.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Atom(Atom::Int(n)) => Some(*n as f64),
            Self::Atom(Atom::Float(n)) => Some(*n),
            _ => None,
        }
    }

    /// If the expression is an [`Atom::Sym`], returns the symbol name.
    pub fn as_sym(&self) -> Option<&str> {
        match self {
            Self::Atom(Atom::Sym(sym)) => Some(sym),
            _ => None,
        }
    }

    /// Returns true if the expression is literally the integer / float zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Atom(Atom::Int(0)))
            || matches!(self, Self::Atom(Atom::Float(n)) if *n == 0.0)
    }

    /// Returns true if the expression is literally the integer / float one.
    pub fn is_one(&self) -> bool {
        matches!(self, Self::Atom(Atom::Int(1)))
            || matches!(self, Self::Atom(Atom::Float(n)) if *n == 1.0)
    }

    /// If the expression is an integer raised to the power of -1, returns the contained
    /// integer (the denominator of the fraction).
    pub fn as_int_recip(&self) -> Option<i64> {
        if let Self::Pow(base, exp) = self {
            if exp.as_int() == Some(-1) {
                return base.as_int();
            }
        }

        None
    }

    /// Returns true if the symbol `var` occurs anywhere in the expression.
    pub fn contains_sym(&self, var: &str) -> bool {
        match self {
            Self::Atom(Atom::Sym(sym)) => sym == var,
            Self::Atom(Atom::Call(_, args)) => args.iter().any(|arg| arg.contains_sym(var)),
            Self::Atom(_) => false,
            Self::Add(terms) => terms.iter().any(|term| term.contains_sym(var)),
            Self::Mul(factors) => factors.iter().any(|factor| factor.contains_sym(var)),
            Self::Pow(base, exp) => base.contains_sym(var) || exp.contains_sym(var),
        }
    }

    /// Collects the free symbols of the expression in sorted order.
    ///
    /// Known constants (see [`CONSTANTS`]) are not free symbols. The sorted order is
    /// what makes "resolve the variable from the first free symbol" deterministic.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        fn walk(expr: &Expr, out: &mut BTreeSet<String>) {
            match expr {
                Expr::Atom(Atom::Sym(sym)) => {
                    if !CONSTANTS.contains(&sym.as_str()) {
                        out.insert(sym.clone());
                    }
                },
                Expr::Atom(Atom::Call(_, args)) => args.iter().for_each(|arg| walk(arg, out)),
                Expr::Atom(_) => {},
                Expr::Add(children) | Expr::Mul(children) => {
                    children.iter().for_each(|child| walk(child, out));
                },
                Expr::Pow(base, exp) => {
                    walk(base, out);
                    walk(exp, out);
                },
            }
        }

        let mut out = BTreeSet::new();
        walk(self, &mut out);
        out
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Rules that remove terms / factors can leave an [`Expr::Add`] or [`Expr::Mul`]
    /// with zero or one children; this collapses those into the child itself, or the
    /// additive / multiplicative identity.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::int(0)
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::int(1)
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// A total, deterministic ordering used to canonicalize the children of
    /// [`Expr::Add`] and [`Expr::Mul`] before display.
    ///
    /// The ordering is purely syntactic: numbers sort before symbols, symbols sort
    /// alphabetically, and compound expressions sort after atoms. [`Expr::Add`] uses the
    /// reverse of this ordering so that `x^2 + 2*x + 1` prints highest power first.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        fn rank(expr: &Expr) -> u8 {
            match expr {
                Expr::Atom(Atom::Int(_)) | Expr::Atom(Atom::Float(_)) => 0,
                Expr::Atom(Atom::Sym(_)) => 1,
                Expr::Atom(Atom::Call(..)) => 2,
                Expr::Pow(..) => 3,
                Expr::Mul(_) => 4,
                Expr::Add(_) => 5,
            }
        }

        rank(self).cmp(&rank(other)).then_with(|| match (self, other) {
            (Expr::Atom(Atom::Int(lhs)), Expr::Atom(Atom::Int(rhs))) => lhs.cmp(rhs),
            (lhs @ Expr::Atom(Atom::Float(_) | Atom::Int(_)), rhs) => {
                // mixed int / float comparison only happens within rank 0
                let lhs = lhs.as_number().unwrap_or(0.0);
                let rhs = rhs.as_number().unwrap_or(0.0);
                lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal)
            },
            (Expr::Atom(Atom::Sym(lhs)), Expr::Atom(Atom::Sym(rhs))) => lhs.cmp(rhs),
            (Expr::Atom(Atom::Call(lhs_name, lhs_args)), Expr::Atom(Atom::Call(rhs_name, rhs_args))) => {
                lhs_name.cmp(rhs_name).then_with(|| {
                    for (lhs, rhs) in lhs_args.iter().zip(rhs_args) {
                        match lhs.canonical_cmp(rhs) {
                            Ordering::Equal => continue,
                            other => return other,
                        }
                    }
                    lhs_args.len().cmp(&rhs_args.len())
                })
            },
            (Expr::Pow(lhs_base, lhs_exp), Expr::Pow(rhs_base, rhs_exp)) => {
                lhs_base.canonical_cmp(rhs_base).then_with(|| lhs_exp.canonical_cmp(rhs_exp))
            },
            (Expr::Add(lhs), Expr::Add(rhs)) | (Expr::Mul(lhs), Expr::Mul(rhs)) => {
                for (lhs, rhs) in lhs.iter().zip(rhs) {
                    match lhs.canonical_cmp(rhs) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
                lhs.len().cmp(&rhs.len())
            },
            _ => Ordering::Equal,
        })
    }
}

/// Checks if two expressions are **strictly** equal; see the
/// [module-level documentation](self).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Atom(lhs), Self::Atom(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                // multiset equality: every child must be matched exactly once
                if lhs.len() != rhs.len() {
                    return false;
                }
                let mut used = vec![false; rhs.len()];
                lhs.iter().all(|lhs_child| {
                    rhs.iter().enumerate().any(|(i, rhs_child)| {
                        if !used[i] && lhs_child == rhs_child {
                            used[i] = true;
                            true
                        } else {
                            false
                        }
                    })
                })
            },
            (Self::Pow(lhs_base, lhs_exp), Self::Pow(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

/// Adds two expressions together. No simplification is done, except that operands which
/// are already [`Expr::Add`] contribute their terms to one flat list.
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) => {
                terms.push(other);
                Self::Add(terms)
            },
            (other, Self::Add(mut terms)) => {
                terms.insert(0, other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

/// Multiplies two expressions together. No simplification is done, except that operands
/// which are already [`Expr::Mul`] contribute their factors to one flat list.
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Mul(mut factors), Self::Mul(rhs_factors)) => {
                factors.extend(rhs_factors);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(mut factors)) => {
                factors.insert(0, other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

/// Multiplies the expression by -1, negating numeric atoms directly.
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Atom(Atom::Int(n)) => Self::int(-n),
            Self::Atom(Atom::Float(n)) => Self::float(-n),
            expr => Self::int(-1) * expr,
        }
    }
}

/// Splits the factors of a product into numerator and denominator parts for display.
///
/// A factor of the form `e^-1` goes to the denominator as `e`; `e^-n` goes to the
/// denominator as `e^n`. Everything else stays in the numerator.
fn split_fraction(factors: &[Expr]) -> (Vec<Expr>, Vec<Expr>) {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();

    for factor in factors {
        if let Expr::Pow(base, exp) = factor {
            if let Some(n) = exp.as_int() {
                if n == -1 {
                    denominator.push((**base).clone());
                    continue;
                } else if n < 0 {
                    denominator.push(Expr::Pow(base.clone(), Box::new(Expr::int(-n))));
                    continue;
                }
            }
        }
        numerator.push(factor.clone());
    }

    (numerator, denominator)
}

/// If the term would print with a leading minus sign, returns its positive form.
///
/// Covers negative numeric atoms and products with a negative numeric factor; used to
/// render `a + -3*b` as `a - 3*b`.
fn negated_form(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Atom(Atom::Int(n)) if *n < 0 => Some(Expr::int(-n)),
        Expr::Atom(Atom::Float(n)) if *n < 0.0 => Some(Expr::float(-n)),
        Expr::Mul(factors) => {
            let negative = factors
                .iter()
                .position(|factor| factor.as_number().map_or(false, |n| n < 0.0))?;
            let mut factors = factors.clone();
            factors[negative] = factors[negative].clone().neg();
            if factors[negative].is_one() {
                factors.remove(negative);
            }
            Some(Expr::Mul(factors).downgrade())
        },
        _ => None,
    }
}

/// Returns true if the expression needs parentheses when printed as a factor.
fn parenthesize_factor(expr: &Expr) -> bool {
    matches!(expr, Expr::Add(_)) || matches!(expr, Expr::Atom(Atom::Int(n)) if *n < 0)
}

fn fmt_factor_list(f: &mut std::fmt::Formatter<'_>, factors: &[Expr]) -> std::fmt::Result {
    let mut iter = factors.iter();
    if let Some(factor) = iter.next() {
        if parenthesize_factor(factor) {
            write!(f, "({})", factor)?;
        } else {
            write!(f, "{}", factor)?;
        }
        for factor in iter {
            if parenthesize_factor(factor) {
                write!(f, "*({})", factor)?;
            } else {
                write!(f, "*{}", factor)?;
            }
        }
    }
    Ok(())
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Atom(atom) => write!(f, "{}", atom),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        // render `+ -3*x` as `- 3*x`
                        match negated_form(term) {
                            Some(positive) => write!(f, " - {}", positive)?,
                            None => write!(f, " + {}", term)?,
                        }
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                // print a negative product as `-` followed by its positive form
                if let Some(positive) = negated_form(self) {
                    return write!(f, "-{}", positive);
                }
                let (numerator, denominator) = split_fraction(factors);
                if numerator.is_empty() {
                    write!(f, "1")?;
                } else {
                    fmt_factor_list(f, &numerator)?;
                }
                if !denominator.is_empty() {
                    write!(f, "/")?;
                    if denominator.len() > 1 || parenthesize_factor(&denominator[0]) {
                        write!(f, "(")?;
                        fmt_factor_list(f, &denominator)?;
                        write!(f, ")")?;
                    } else {
                        fmt_factor_list(f, &denominator)?;
                    }
                }
                Ok(())
            },
            Self::Pow(base, exp) => {
                if let Some(n) = exp.as_int() {
                    if n < 0 {
                        // print `x^-1` as `1/x`, `x^-2` as `1/x^2`
                        let positive = if n == -1 {
                            (**base).clone()
                        } else {
                            Expr::Pow(base.clone(), Box::new(Expr::int(-n)))
                        };
                        return if parenthesize_factor(&positive) {
                            write!(f, "1/({})", positive)
                        } else {
                            write!(f, "1/{}", positive)
                        };
                    }
                }
                if matches!(&**base, Self::Atom(Atom::Int(n)) if *n >= 0)
                    || matches!(&**base, Self::Atom(Atom::Float(n)) if *n >= 0.0)
                    || matches!(&**base, Self::Atom(Atom::Sym(_) | Atom::Call(..)))
                {
                    write!(f, "{}^", base)?;
                } else {
                    write!(f, "({})^", base)?;
                }
                if matches!(&**exp, Self::Atom(Atom::Int(n)) if *n >= 0)
                    || matches!(&**exp, Self::Atom(Atom::Sym(_) | Atom::Call(..)))
                {
                    write!(f, "{}", exp)
                } else {
                    write!(f, "({})", exp)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn strict_equality_ignores_order() {
        let a = Expr::Add(vec![Expr::sym("x"), Expr::sym("y"), Expr::int(2)]);
        let b = Expr::Add(vec![Expr::int(2), Expr::sym("y"), Expr::sym("x")]);
        assert_eq!(a, b);
    }

    #[test]
    fn strict_equality_is_multiset() {
        // [x, x, y] and [x, y, y] contain each other's elements but are not equal
        let a = Expr::Add(vec![Expr::sym("x"), Expr::sym("x"), Expr::sym("y")]);
        let b = Expr::Add(vec![Expr::sym("x"), Expr::sym("y"), Expr::sym("y")]);
        assert_ne!(a, b);
    }

    #[test]
    fn free_symbols_sorted_and_constant_free() {
        let expr = Expr::Mul(vec![
            Expr::sym("y"),
            Expr::sym("pi"),
            Expr::call("sin", vec![Expr::sym("a")]),
        ]);
        let symbols: Vec<_> = expr.free_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["a".to_string(), "y".to_string()]);
    }

    #[test]
    fn display_fraction() {
        let expr = Expr::Mul(vec![
            Expr::Pow(Box::new(Expr::sym("x")), Box::new(Expr::int(3))),
            Expr::int(3).recip(),
        ]);
        assert_eq!(expr.to_string(), "x^3/3");
    }

    #[test]
    fn display_subtraction() {
        let expr = Expr::Add(vec![
            Expr::sym("x"),
            Expr::Mul(vec![Expr::int(-3), Expr::sym("y")]),
        ]);
        assert_eq!(expr.to_string(), "x - 3*y");
    }

    #[test]
    fn downgrade_collapses_singletons() {
        assert_eq!(Expr::Add(vec![Expr::sym("x")]).downgrade(), Expr::sym("x"));
        assert_eq!(Expr::Mul(vec![]).downgrade(), Expr::int(1));
        assert_eq!(Expr::Add(vec![]).downgrade(), Expr::int(0));
    }
}
