//! The uniform result envelope and its mode-shaped payloads.

use crate::classify::Mode;
use crate::error::QueryError;
use serde::Serialize;
use std::collections::BTreeMap;

/// One variable-to-value assignment, e.g. `{"x": "-1"}`.
pub type SolutionMap = BTreeMap<String, String>;

/// Solutions for one equation segment.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EquationSolutions {
    /// The segment as the user wrote it.
    pub equation: String,

    /// The solutions found, one map per root.
    pub solutions: Vec<SolutionMap>,
}

/// The mode-specific result payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Payload {
    /// Equation mode: one record per segment, in input order.
    Equations(Vec<EquationSolutions>),

    /// Differentiate mode.
    Derivative {
        input_expr: String,
        variable: String,
        derivative: String,
        latex: String,
    },

    /// Integrate mode.
    Integral {
        input_expr: String,
        variable: String,
        integral: String,
        latex: String,
    },

    /// Simplify mode.
    Simplified {
        input: String,
        simplified: String,
        latex: String,
    },

    /// Evaluate / auto mode, closed expression.
    Numeric {
        #[serde(rename = "type")]
        kind: &'static str,
        value: String,
    },

    /// Evaluate / auto mode, open expression.
    Symbolic {
        #[serde(rename = "type")]
        kind: &'static str,
        simplified: String,
    },

    /// The solve fallback of the auto path: a bare solution list.
    Solutions(Vec<SolutionMap>),
}

impl Payload {
    pub fn numeric(value: String) -> Self {
        Self::Numeric { kind: "numeric", value }
    }

    pub fn symbolic(simplified: String) -> Self {
        Self::Symbolic { kind: "symbolic", simplified }
    }
}

/// The uniform response envelope: `{ok, input, mode, result}` on success,
/// `{ok, error, detail}` on failure.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Payload>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Envelope {
    /// A success envelope echoing the raw input and resolved mode.
    pub fn success(input: &str, mode: Mode, result: Payload) -> Self {
        Self {
            ok: true,
            input: Some(input.to_string()),
            mode: Some(mode),
            result: Some(result),
            error: None,
            detail: None,
        }
    }

    /// A failure envelope with the sanitized message and detail.
    pub fn failure(err: &QueryError) -> Self {
        Self {
            ok: false,
            input: None,
            mode: None,
            result: None,
            error: Some(err.to_string()),
            detail: Some(err.detail()),
        }
    }
}
