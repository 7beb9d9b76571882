//! LaTeX rendering of expressions, used for the display form in result payloads.

use crate::expr::{Atom, Expr};

/// Function names that have a LaTeX operator of their own (`\sin`, `\ln`, ...).
const OPERATOR_NAMES: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "exp", "ln", "log",
];

/// Renders the expression as LaTeX.
pub fn latex(expr: &Expr) -> String {
    let mut out = String::new();
    render(expr, &mut out);
    out
}

fn render(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Atom(atom) => render_atom(atom, out),
        Expr::Add(terms) => {
            let mut iter = terms.iter();
            if let Some(term) = iter.next() {
                render(term, out);
                for term in iter {
                    match negated(term) {
                        Some(positive) => {
                            out.push_str(" - ");
                            render(&positive, out);
                        },
                        None => {
                            out.push_str(" + ");
                            render(term, out);
                        },
                    }
                }
            }
        },
        Expr::Mul(factors) => render_product(factors, out),
        Expr::Pow(base, exp) => {
            if is_sqrt_exponent(exp) {
                // u^(1/2) renders as \sqrt{u}
                out.push_str("\\sqrt{");
                render(base, out);
                out.push('}');
                return;
            }
            if let Some(n) = exp.as_int() {
                if n < 0 {
                    // u^-n renders as \frac{1}{u^n}
                    out.push_str("\\frac{1}{");
                    let positive = if n == -1 {
                        (**base).clone()
                    } else {
                        Expr::Pow(base.clone(), Box::new(Expr::int(-n)))
                    };
                    render(&positive, out);
                    out.push('}');
                    return;
                }
            }
            render_grouped(base, out, needs_parens(base));
            out.push_str("^{");
            render(exp, out);
            out.push('}');
        },
    }
}

fn render_atom(atom: &Atom, out: &mut String) {
    match atom {
        Atom::Int(n) => out.push_str(&n.to_string()),
        Atom::Float(n) => out.push_str(&n.to_string()),
        Atom::Sym(sym) => match sym.as_str() {
            "pi" => out.push_str("\\pi"),
            _ if sym.len() == 1 => out.push_str(sym),
            _ => {
                out.push_str("\\mathrm{");
                out.push_str(sym);
                out.push('}');
            },
        },
        Atom::Call(name, args) => {
            if name == "sqrt" && args.len() == 1 {
                out.push_str("\\sqrt{");
                render(&args[0], out);
                out.push('}');
                return;
            }
            if name == "abs" && args.len() == 1 {
                out.push_str("\\left|");
                render(&args[0], out);
                out.push_str("\\right|");
                return;
            }

            if OPERATOR_NAMES.contains(&name.as_str()) {
                out.push('\\');
                out.push_str(name);
            } else {
                out.push_str("\\mathrm{");
                out.push_str(name);
                out.push('}');
            }
            out.push_str("\\left(");
            let mut iter = args.iter();
            if let Some(arg) = iter.next() {
                render(arg, out);
                for arg in iter {
                    out.push_str(", ");
                    render(arg, out);
                }
            }
            out.push_str("\\right)");
        },
    }
}

/// Renders a product, splitting reciprocal-power factors into a `\frac`.
fn render_product(factors: &[Expr], out: &mut String) {
    if let Some(positive) = negated(&Expr::Mul(factors.to_vec())) {
        out.push('-');
        render(&positive, out);
        return;
    }

    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for factor in factors {
        match reciprocal(factor) {
            Some(inner) => denominator.push(inner),
            None => numerator.push(factor.clone()),
        }
    }

    if denominator.is_empty() {
        render_factor_list(&numerator, out);
    } else {
        out.push_str("\\frac{");
        if numerator.is_empty() {
            out.push('1');
        } else {
            render_factor_list(&numerator, out);
        }
        out.push_str("}{");
        render_factor_list(&denominator, out);
        out.push('}');
    }
}

fn render_factor_list(factors: &[Expr], out: &mut String) {
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            out.push_str(" \\cdot ");
        }
        render_grouped(factor, out, needs_parens(factor));
    }
}

fn render_grouped(expr: &Expr, out: &mut String, parens: bool) {
    if parens {
        out.push_str("\\left(");
        render(expr, out);
        out.push_str("\\right)");
    } else {
        render(expr, out);
    }
}

fn needs_parens(expr: &Expr) -> bool {
    matches!(expr, Expr::Add(_)) || matches!(expr, Expr::Atom(Atom::Int(n)) if *n < 0)
}

/// If the factor is a reciprocal power, returns the denominator form.
fn reciprocal(factor: &Expr) -> Option<Expr> {
    if let Expr::Pow(base, exp) = factor {
        if let Some(n) = exp.as_int() {
            if n == -1 {
                return Some((**base).clone());
            } else if n < 0 {
                return Some(Expr::Pow(base.clone(), Box::new(Expr::int(-n))));
            }
        }
    }
    None
}

/// True if the exponent is the fraction 1/2 (in either of its flattened spellings).
fn is_sqrt_exponent(exp: &Expr) -> bool {
    if let Expr::Mul(factors) = exp {
        if factors.len() == 2 {
            return factors.iter().any(|factor| factor.as_int() == Some(1))
                && factors.iter().any(|factor| factor.as_int_recip() == Some(2));
        }
        if factors.len() == 1 {
            return is_sqrt_exponent(&factors[0]);
        }
    }
    exp.as_int_recip() == Some(2)
}

/// Positive form of a term that would print with a leading minus, mirroring the plain
/// text display.
fn negated(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Atom(Atom::Int(n)) if *n < 0 => Some(Expr::int(-n)),
        Expr::Atom(Atom::Float(n)) if *n < 0.0 => Some(Expr::float(-n)),
        Expr::Mul(factors) => {
            let negative = factors
                .iter()
                .position(|factor| factor.as_number().map_or(false, |n| n < 0.0))?;
            let mut factors = factors.to_vec();
            let flipped = std::mem::replace(&mut factors[negative], Expr::int(1));
            factors[negative] = -flipped;
            if factors[negative].is_one() {
                factors.remove(negative);
            }
            Some(Expr::Mul(factors).downgrade())
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::simplify::simplify;
    use pretty_assertions::assert_eq;
    use super::*;

    fn tex(input: &str) -> String {
        latex(&simplify(&parse(input).unwrap()))
    }

    #[test]
    fn powers_and_fractions() {
        assert_eq!(tex("x^2"), "x^{2}");
        assert_eq!(tex("x/3"), "\\frac{x}{3}");
    }

    #[test]
    fn functions() {
        assert_eq!(tex("sin(x)"), "\\sin\\left(x\\right)");
        assert_eq!(tex("sqrt(x)"), "\\sqrt{x}");
    }

    #[test]
    fn sums_with_signs() {
        assert_eq!(tex("x^2 - 4"), "x^{2} - 4");
    }

    #[test]
    fn constants_and_names() {
        assert_eq!(tex("2pi*r"), "2 \\cdot \\pi \\cdot r");
        assert_eq!(tex("velocity"), "\\mathrm{velocity}");
    }
}
