//! Numeric evaluation of closed expressions.

use crate::error::EngineError;
use crate::expr::{Atom, Expr};

/// Numerically evaluates the expression.
///
/// Fails on residual free symbols (only known constants evaluate), unknown functions,
/// and non-finite results such as division by zero.
pub fn eval(expr: &Expr) -> Result<f64, EngineError> {
    let value = eval_inner(expr)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::Eval("result is not a finite number".into()))
    }
}

fn eval_inner(expr: &Expr) -> Result<f64, EngineError> {
    match expr {
        Expr::Atom(Atom::Int(n)) => Ok(*n as f64),
        Expr::Atom(Atom::Float(n)) => Ok(*n),
        Expr::Atom(Atom::Sym(sym)) => match sym.as_str() {
            "pi" => Ok(std::f64::consts::PI),
            _ => Err(EngineError::Eval(format!("free symbol {} has no value", sym))),
        },
        Expr::Atom(Atom::Call(name, args)) => {
            let args = args
                .iter()
                .map(eval_inner)
                .collect::<Result<Vec<_>, _>>()?;
            apply(name, &args)
        },
        Expr::Add(terms) => terms.iter().try_fold(0.0, |sum, term| {
            Ok(sum + eval_inner(term)?)
        }),
        Expr::Mul(factors) => factors.iter().try_fold(1.0, |product, factor| {
            Ok(product * eval_inner(factor)?)
        }),
        Expr::Pow(base, exp) => {
            let base = eval_inner(base)?;
            let exp = eval_inner(exp)?;
            Ok(base.powf(exp))
        },
    }
}

fn apply(name: &str, args: &[f64]) -> Result<f64, EngineError> {
    let unary = |f: fn(f64) -> f64| -> Result<f64, EngineError> {
        match args {
            [arg] => Ok(f(*arg)),
            _ => Err(EngineError::Eval(format!(
                "{} takes exactly one argument, got {}",
                name,
                args.len(),
            ))),
        }
    };

    match name {
        "sin" => unary(f64::sin),
        "cos" => unary(f64::cos),
        "tan" => unary(f64::tan),
        "asin" => unary(f64::asin),
        "acos" => unary(f64::acos),
        "atan" => unary(f64::atan),
        "sinh" => unary(f64::sinh),
        "cosh" => unary(f64::cosh),
        "tanh" => unary(f64::tanh),
        "exp" => unary(f64::exp),
        "ln" => unary(f64::ln),
        "log" => unary(f64::log10),
        "sqrt" => unary(f64::sqrt),
        "abs" => unary(f64::abs),
        _ => Err(EngineError::Eval(format!("unknown function {}", name))),
    }
}

/// Formats an evaluated value the way a calculator would: integral results print
/// without a trailing `.0`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
