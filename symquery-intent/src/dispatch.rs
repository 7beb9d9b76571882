//! The dispatch router: `(mode, text)` in, result payload out.
//!
//! Each mode branch extracts its operand, hands the cleaned expression to the engine,
//! and shapes the output. The match over [`Mode`] is exhaustive, so adding a mode
//! without a branch is a compile-time error rather than a silent runtime fallthrough.
//!
//! Dispatch is a two-stage pipeline: if the primary attempt fails with a recoverable
//! error and the text mentions `solve`, a secondary "solve ... for ..." extraction
//! runs before the original failure is reported.

use crate::classify::{classify, Mode};
use crate::envelope::{Envelope, EquationSolutions, Payload, SolutionMap};
use crate::error::QueryError;
use crate::extract;
use symquery_engine::{self as engine, Expr, Solution};
use tracing::debug;

/// The variable used when a query names none and the expression has no free symbols.
const DEFAULT_VARIABLE: &str = "x";

/// Processes a raw query into a response envelope. Total; never fails or panics.
///
/// This is the crate's top-level entry point: validation, classification, extraction,
/// dispatch, and formatting in one call. Stateless; every invocation works on fresh
/// local data.
pub fn respond(query: &str) -> Envelope {
    let text = query.trim();
    if text.is_empty() {
        return Envelope::failure(&QueryError::EmptyQuery);
    }

    let mode = classify(text);
    debug!(%mode, query = %text, "classified query");

    let outcome = match dispatch(mode, text) {
        Ok(payload) => Ok(payload),
        Err(err) if err.is_recoverable() && text.to_lowercase().contains("solve") => {
            debug!(%mode, error = %err, "primary dispatch failed, attempting solve fallback");
            // the secondary attempt failing means the original failure is the one worth
            // reporting
            solve_fallback(text).map_err(|_| err)
        },
        Err(err) => Err(err),
    };

    match outcome {
        Ok(payload) => Envelope::success(text, mode, payload),
        Err(err) => {
            debug!(%mode, error = %err, "query failed");
            Envelope::failure(&err)
        },
    }
}

/// Routes the classified query to the engine capability for its mode.
pub fn dispatch(mode: Mode, text: &str) -> Result<Payload, QueryError> {
    match mode {
        Mode::Equation => solve_equations(text),
        Mode::Differentiate => differentiate(text),
        Mode::Integrate => integrate(text),
        Mode::Simplify => simplify(text),
        Mode::Evaluate | Mode::Auto => evaluate(text),
    }
}

/// Parses expression text, logging the full diagnostic report server-side.
fn parse(source: &str) -> Result<Expr, QueryError> {
    engine::parse(source).map_err(|err| {
        debug!("parse failure:\n{}", err.report(source));
        QueryError::from(engine::EngineError::from(err))
    })
}

/// Resolves the variable of interest: explicit, else the first free symbol of the
/// expression, else the canonical default.
fn resolve_variable(explicit: Option<String>, expr: &Expr) -> String {
    explicit
        .or_else(|| expr.free_symbols().into_iter().next())
        .unwrap_or_else(|| DEFAULT_VARIABLE.to_string())
}

fn solution_maps(solutions: Vec<Solution>) -> Vec<SolutionMap> {
    solutions
        .into_iter()
        .map(|solution| {
            let mut map = SolutionMap::new();
            map.insert(solution.variable, solution.value.to_string());
            map
        })
        .collect()
}

/// Equation mode: each segment is solved independently, in input order.
fn solve_equations(text: &str) -> Result<Payload, QueryError> {
    let specs = extract::equations(text);
    if specs.is_empty() {
        return Err(QueryError::EmptyOperand);
    }

    let mut records = Vec::with_capacity(specs.len());
    for spec in specs {
        let lhs = parse(&spec.lhs)?;
        let rhs = parse(&spec.rhs)?;
        let solutions = engine::solve(&lhs, &rhs, None)?;
        records.push(EquationSolutions {
            equation: spec.source,
            solutions: solution_maps(solutions),
        });
    }
    Ok(Payload::Equations(records))
}

fn differentiate(text: &str) -> Result<Payload, QueryError> {
    let operand = extract::differentiate(text);
    let expr = parse(&operand.expr)?;
    let variable = resolve_variable(operand.variable, &expr);
    let derivative = engine::differentiate(&expr, &variable)?;

    Ok(Payload::Derivative {
        input_expr: expr.to_string(),
        variable,
        derivative: derivative.to_string(),
        latex: engine::latex(&derivative),
    })
}

fn integrate(text: &str) -> Result<Payload, QueryError> {
    let operand = extract::integrate(text);
    let expr = parse(&operand.expr)?;
    let variable = resolve_variable(operand.variable, &expr);
    let integral = engine::integrate(&expr, &variable)?;

    Ok(Payload::Integral {
        input_expr: expr.to_string(),
        variable,
        integral: integral.to_string(),
        latex: engine::latex(&integral),
    })
}

fn simplify(text: &str) -> Result<Payload, QueryError> {
    let operand = extract::simplify(text);
    let expr = parse(&operand.expr)?;
    let simplified = engine::simplify(&expr);

    Ok(Payload::Simplified {
        input: expr.to_string(),
        simplified: simplified.to_string(),
        latex: engine::latex(&simplified),
    })
}

/// The evaluate / auto path: numeric for closed expressions, symbolic simplification
/// otherwise.
fn evaluate(text: &str) -> Result<Payload, QueryError> {
    let expr = parse(text)?;
    if expr.free_symbols().is_empty() {
        let value = engine::eval(&expr)?;
        Ok(Payload::numeric(engine::format_number(value)))
    } else {
        let simplified = engine::simplify(&expr);
        Ok(Payload::symbolic(simplified.to_string()))
    }
}

fn solve_fallback(text: &str) -> Result<Payload, QueryError> {
    let (spec, variable) = extract::solve_fallback(text);
    let lhs = parse(&spec.lhs)?;
    let rhs = parse(&spec.rhs)?;
    let solutions = engine::solve(&lhs, &rhs, variable.as_deref())?;
    Ok(Payload::Solutions(solution_maps(solutions)))
}
