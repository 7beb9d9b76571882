//! The pipeline's error taxonomy.
//!
//! Extraction is fail-soft and never produces errors; everything here comes from
//! validation, parsing, or the engine. The [`Display`](std::fmt::Display) messages are
//! the sanitized, client-facing text. Full diagnostic detail (ariadne reports, error
//! chains) is logged server-side by the dispatcher and never put in an envelope.

use symquery_engine::EngineError;
use thiserror::Error;

/// Guidance returned when a query strips down to nothing parseable.
pub const GUIDANCE: &str = "could not determine an operation to perform; try clearer math \
syntax, e.g. 'integrate x^2', 'differentiate sin(x) wrt x', or 'solve x^2-1=0'";

/// Any failure a query can produce.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query was empty after trimming. Reported before any classification.
    #[error("empty query")]
    EmptyQuery,

    /// The cleaned expression is not syntactically valid math.
    #[error("{message}")]
    Parse {
        /// Sanitized one-line message.
        message: String,

        /// Short positional hint, safe to return to the client.
        detail: String,
    },

    /// The engine failed while computing (unsupported operation, non-finite result).
    #[error("{0}")]
    Computation(String),

    /// The query held no usable operand at all (e.g. equation mode with zero
    /// segments). Carries guidance text rather than a raw failure.
    #[error("{GUIDANCE}")]
    EmptyOperand,
}

impl QueryError {
    /// A short, client-safe detail string for the failure envelope.
    pub fn detail(&self) -> String {
        match self {
            Self::EmptyQuery => "the query text must be non-empty".to_string(),
            Self::Parse { detail, .. } => detail.clone(),
            Self::Computation(_) => "the expression parsed but could not be computed".to_string(),
            Self::EmptyOperand => "no expression remained after removing operation keywords".to_string(),
        }
    }

    /// Returns true if a secondary extraction attempt may recover from this failure.
    ///
    /// Only parse and computation failures are recoverable; validation failures are
    /// final.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Computation(_))
    }
}

impl From<EngineError> for QueryError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Parse(parse) => QueryError::Parse {
                message: parse.kind.to_string(),
                detail: format!("at offset {} of the cleaned expression", parse.span.start),
            },
            EngineError::Unsupported(message) | EngineError::Eval(message) => {
                QueryError::Computation(message)
            },
        }
    }
}
