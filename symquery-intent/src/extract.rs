//! Operand extraction: mode-specific text surgery that isolates the expression and the
//! variable of interest from natural-language noise.
//!
//! Every function here is total and fail-soft. Extraction can produce an empty or
//! nonsensical expression string; that is caught at parse time in the dispatcher, never
//! here.

use once_cell::sync::Lazy;
use regex::Regex;

/// `wrt x` — a with-respect-to variable cue.
static WRT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bwrt\s*([a-zA-Z])\b").unwrap());

/// `for x` — the target-variable cue of the solve fallback.
static FOR_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bfor\s+([a-zA-Z])\b").unwrap());

/// `d/dx` — the compact derivative notation with its variable.
static D_OVER_D: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bd/d([a-zA-Z])").unwrap());

static DIFF_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:differentiate|derivative)\b").unwrap());
static INTEGRATE_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:integrate|integral)\b").unwrap());
static SIMPLIFY_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsimplify\b").unwrap());
static SOLVE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsolve\b").unwrap());

/// The expression text and optional explicit variable isolated from a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    /// The cleaned expression text, ready for parsing.
    pub expr: String,

    /// The explicitly named variable, if the query had one. `None` defers resolution
    /// to the dispatcher (first free symbol, then the canonical default).
    pub variable: Option<String>,
}

/// One equation segment: `lhs = rhs` plus the original segment text for echoing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationSpec {
    pub lhs: String,
    pub rhs: String,
    pub source: String,
}

/// Splits equation-mode text into specs: segments on `;`, each split at the *first*
/// `=`, with a missing right side implicitly zero. Empty segments are dropped, so the
/// returned list never contains empty strings; it can itself be empty.
pub fn equations(text: &str) -> Vec<EquationSpec> {
    text.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((lhs, rhs)) => EquationSpec {
                lhs: lhs.trim().to_string(),
                rhs: rhs.trim().to_string(),
                source: segment.to_string(),
            },
            None => EquationSpec {
                lhs: segment.to_string(),
                rhs: "0".to_string(),
                source: segment.to_string(),
            },
        })
        .collect()
}

/// Extracts the operand for differentiation.
///
/// Variable cues in priority order: a literal `d/d<sym>` token, a `wrt <sym>` pattern,
/// and finally a trailing comma-separated single-letter segment. The matched cue and
/// the operation keywords are removed from the expression text.
pub fn differentiate(text: &str) -> Operand {
    let mut remaining = text.to_string();
    let mut variable = None;

    // (a) d/dx
    if let Some(captures) = D_OVER_D.captures(&remaining) {
        variable = Some(captures[1].to_string());
        if let Some(whole) = captures.get(0) {
            let range = whole.range();
            remaining.replace_range(range, " ");
        }
    }

    // (b) wrt x — always stripped so it never reaches the parser, but only assigns the
    // variable if the d/d form did not
    strip_wrt(&mut remaining, &mut variable);

    // (c) trailing `, x`
    if variable.is_none() {
        split_trailing_variable(&mut remaining, &mut variable);
    }

    remove_words(&mut remaining, &DIFF_WORDS);

    Operand { expr: remaining.trim().to_string(), variable }
}

/// Extracts the operand for integration: the same `wrt` / trailing-comma variable cues
/// as differentiation, with no `d/d` form.
pub fn integrate(text: &str) -> Operand {
    let mut remaining = text.replace('∫', " ");
    let mut variable = None;

    strip_wrt(&mut remaining, &mut variable);
    if variable.is_none() {
        split_trailing_variable(&mut remaining, &mut variable);
    }

    remove_words(&mut remaining, &INTEGRATE_WORDS);

    Operand { expr: remaining.trim().to_string(), variable }
}

/// Extracts the operand for simplification: strip the keyword, parse the rest.
pub fn simplify(text: &str) -> Operand {
    let mut remaining = text.to_string();
    remove_words(&mut remaining, &SIMPLIFY_WORD);
    Operand { expr: remaining.trim().to_string(), variable: None }
}

/// The secondary "solve ... for ..." heuristic used when the auto path fails.
///
/// Strips the word `solve`, recovers a target variable from a `for <sym>` pattern
/// (removing it from the text), and splits the remainder at the first `=`, defaulting
/// the right side to zero.
pub fn solve_fallback(text: &str) -> (EquationSpec, Option<String>) {
    let mut remaining = text.to_string();
    remove_words(&mut remaining, &SOLVE_WORD);

    let mut variable = None;
    if let Some(captures) = FOR_VAR.captures(&remaining) {
        variable = Some(captures[1].to_lowercase());
        let range = captures.get(0).map(|m| m.range());
        if let Some(range) = range {
            remaining.replace_range(range, " ");
        }
    }

    let remaining = remaining.trim();
    let spec = match remaining.split_once('=') {
        Some((lhs, rhs)) => EquationSpec {
            lhs: lhs.trim().to_string(),
            rhs: rhs.trim().to_string(),
            source: remaining.to_string(),
        },
        None => EquationSpec {
            lhs: remaining.to_string(),
            rhs: "0".to_string(),
            source: remaining.to_string(),
        },
    };
    (spec, variable)
}

/// Captures and removes a `wrt <sym>` pattern, assigning the variable if unset.
fn strip_wrt(remaining: &mut String, variable: &mut Option<String>) {
    if let Some(captures) = WRT.captures(remaining) {
        if variable.is_none() {
            *variable = Some(captures[1].to_string());
        }
        if let Some(whole) = captures.get(0) {
            let range = whole.range();
            remaining.replace_range(range, " ");
        }
    }
}

/// If the final comma-separated segment is exactly one letter, takes it as the variable
/// and rejoins the remainder as the expression.
fn split_trailing_variable(remaining: &mut String, variable: &mut Option<String>) {
    if !remaining.contains(',') {
        return;
    }

    let parts: Vec<&str> = remaining.split(',').map(str::trim).collect();
    let last = match parts.last() {
        Some(last) => *last,
        None => return,
    };
    if parts.len() >= 2 && last.len() == 1 && last.chars().all(|c| c.is_ascii_alphabetic()) {
        *variable = Some(last.to_string());
        *remaining = parts[..parts.len() - 1].join(",");
    }
}

/// Removes every occurrence of the given keyword pattern.
fn remove_words(remaining: &mut String, words: &Regex) {
    *remaining = words.replace_all(remaining, " ").into_owned();
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn equation_segments() {
        let specs = equations("x=1;y=2");
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0], EquationSpec {
            lhs: "x".into(),
            rhs: "1".into(),
            source: "x=1".into(),
        });
        assert_eq!(specs[1], EquationSpec {
            lhs: "y".into(),
            rhs: "2".into(),
            source: "y=2".into(),
        });
    }

    #[test]
    fn equation_without_equals_is_implicitly_zero() {
        let specs = equations("x^2-4=0; x+1");
        assert_eq!(specs[1].lhs, "x+1");
        assert_eq!(specs[1].rhs, "0");
    }

    #[test]
    fn equation_splits_at_first_equals() {
        let specs = equations("x=y=2");
        assert_eq!(specs[0].lhs, "x");
        assert_eq!(specs[0].rhs, "y=2");
    }

    #[test]
    fn empty_segments_dropped() {
        assert_eq!(equations("; ;x=1;"), equations("x=1"));
        assert!(equations("  ;  ").is_empty());
    }

    #[test]
    fn d_over_dx_form() {
        let operand = differentiate("d/dx x^2");
        assert_eq!(operand.variable.as_deref(), Some("x"));
        assert_eq!(operand.expr, "x^2");
    }

    #[test]
    fn wrt_form() {
        let operand = differentiate("differentiate sin(x) wrt x");
        assert_eq!(operand.variable.as_deref(), Some("x"));
        assert_eq!(operand.expr, "sin(x)");
    }

    #[test]
    fn trailing_comma_form() {
        let operand = differentiate("derivative x*y, y");
        assert_eq!(operand.variable.as_deref(), Some("y"));
        assert_eq!(operand.expr, "x*y");
    }

    #[test]
    fn d_over_dx_wins_over_trailing_comma() {
        let operand = differentiate("d/dt t^3, x");
        assert_eq!(operand.variable.as_deref(), Some("t"));
    }

    #[test]
    fn no_variable_cue_defers_resolution() {
        let operand = differentiate("differentiate x^2 + 1");
        assert_eq!(operand.variable, None);
        assert_eq!(operand.expr, "x^2 + 1");
    }

    #[test]
    fn integrate_strips_keywords_and_glyph() {
        assert_eq!(integrate("integrate x^2").expr, "x^2");
        assert_eq!(integrate("∫ x^2").expr, "x^2");
        let operand = integrate("integrate x*y, y");
        assert_eq!(operand.variable.as_deref(), Some("y"));
        assert_eq!(operand.expr, "x*y");
    }

    #[test]
    fn integrate_wrt() {
        let operand = integrate("integral of... is stripped at parse time wrt t");
        assert_eq!(operand.variable.as_deref(), Some("t"));
    }

    #[test]
    fn simplify_strips_keyword() {
        assert_eq!(simplify("simplify x+x").expr, "x+x");
        assert_eq!(simplify("Simplify (x+1)^2").expr, "(x+1)^2");
    }

    #[test]
    fn solve_fallback_extraction() {
        let (spec, variable) = solve_fallback("solve x^2-1=0 for x");
        assert_eq!(variable.as_deref(), Some("x"));
        assert_eq!(spec.lhs, "x^2-1");
        assert_eq!(spec.rhs, "0");
    }

    #[test]
    fn solve_fallback_without_equals_or_variable() {
        let (spec, variable) = solve_fallback("solve 2x+4");
        assert_eq!(variable, None);
        assert_eq!(spec.lhs, "2x+4");
        assert_eq!(spec.rhs, "0");
    }

    #[test]
    fn extraction_never_panics_on_noise() {
        for text in ["", ",", "wrt", "d/d", "solve for", "∫∫∫"] {
            let _ = differentiate(text);
            let _ = integrate(text);
            let _ = simplify(text);
            let _ = solve_fallback(text);
            let _ = equations(text);
        }
    }
}
