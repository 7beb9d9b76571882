//! Intent classification: free text to an operation [`Mode`].
//!
//! Classification is a single ordered table of `(predicate, mode)` pairs; the first
//! predicate that matches wins and [`Mode::Auto`] is the catch-all, which makes
//! classification total and deterministic. The ordering encodes priority when cues
//! co-occur: `differentiate x=y` is a differentiation request, not an equation, because
//! later entries are strictly more general fallbacks. Do not reorder the table.

use serde::Serialize;

/// The operation a query is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Solve one or more equations.
    Equation,

    /// Differentiate an expression.
    Differentiate,

    /// Integrate an expression.
    Integrate,

    /// Simplify an expression.
    Simplify,

    /// Numerically evaluate an expression.
    Evaluate,

    /// No explicit cue; evaluate if closed, simplify otherwise.
    Auto,
}

impl Mode {
    /// The wire name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equation => "equation",
            Self::Differentiate => "differentiate",
            Self::Integrate => "integrate",
            Self::Simplify => "simplify",
            Self::Evaluate => "evaluate",
            Self::Auto => "auto",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classification predicate over `(raw text, lowercased text)`.
///
/// Keyword cues check the lowercased copy; glyph and operator cues check the raw text.
type Predicate = fn(&str, &str) -> bool;

fn differentiation_cue(_raw: &str, lower: &str) -> bool {
    lower.contains("deriv") || lower.contains("d/d") || lower.contains("differentiate")
}

fn integration_cue(raw: &str, lower: &str) -> bool {
    lower.contains("integral") || lower.contains("integrate") || raw.contains('∫')
}

fn simplification_cue(_raw: &str, lower: &str) -> bool {
    lower.contains("simplify")
}

/// An equals sign means an equation, unless it is part of `==` or `=>`.
fn equation_cue(raw: &str, _lower: &str) -> bool {
    raw.contains('=') && !raw.contains("==") && !raw.contains("=>")
}

fn evaluation_cue(_raw: &str, lower: &str) -> bool {
    lower.starts_with("eval") || lower.contains("calculate")
}

/// The classification table. First match wins; order is load-bearing.
const CLASSIFIER: &[(Predicate, Mode)] = &[
    (differentiation_cue, Mode::Differentiate),
    (integration_cue, Mode::Integrate),
    (simplification_cue, Mode::Simplify),
    (equation_cue, Mode::Equation),
    (evaluation_cue, Mode::Evaluate),
];

/// Classifies the query text into a [`Mode`]. Total; never fails.
pub fn classify(text: &str) -> Mode {
    let lower = text.to_lowercase();
    for (predicate, mode) in CLASSIFIER {
        if predicate(text, &lower) {
            return *mode;
        }
    }
    Mode::Auto
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn plain_arithmetic_is_auto() {
        assert_eq!(classify("2+2"), Mode::Auto);
        assert_eq!(classify("x + y"), Mode::Auto);
    }

    #[test]
    fn keyword_cues() {
        assert_eq!(classify("differentiate x^2"), Mode::Differentiate);
        assert_eq!(classify("derivative of x^2"), Mode::Differentiate);
        assert_eq!(classify("d/dx x^2"), Mode::Differentiate);
        assert_eq!(classify("integrate x^2 dx"), Mode::Integrate);
        assert_eq!(classify("what is the integral of x"), Mode::Integrate);
        assert_eq!(classify("∫ x^2"), Mode::Integrate);
        assert_eq!(classify("simplify x+x"), Mode::Simplify);
        assert_eq!(classify("evaluate 2^10"), Mode::Evaluate);
        assert_eq!(classify("calculate 3*7"), Mode::Evaluate);
    }

    #[test]
    fn equations() {
        assert_eq!(classify("x^2-4=0"), Mode::Equation);
        assert_eq!(classify("x=1;y=2"), Mode::Equation);
    }

    #[test]
    fn comparison_operators_are_not_equations() {
        assert_eq!(classify("x == y"), Mode::Auto);
        assert_eq!(classify("a => b"), Mode::Auto);
    }

    #[test]
    fn cue_priority_over_equals() {
        // a differentiation cue wins over the equals sign
        assert_eq!(classify("differentiate x=y"), Mode::Differentiate);
        assert_eq!(classify("integrate f=x^2"), Mode::Integrate);
        assert_eq!(classify("simplify x=x"), Mode::Simplify);
    }

    #[test]
    fn case_insensitive_keywords() {
        assert_eq!(classify("Differentiate X^2"), Mode::Differentiate);
        assert_eq!(classify("SIMPLIFY x+x"), Mode::Simplify);
    }

    #[test]
    fn classification_is_total() {
        for text in ["", "?!\u{1F600}", "solve", "the meaning of life"] {
            // no panic, and a mode always comes out
            let _ = classify(text);
        }
    }
}
