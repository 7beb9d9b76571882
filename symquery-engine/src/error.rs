//! Error types shared by every engine operation.

use crate::parser::error::ParseError;
use thiserror::Error;

/// Any error an engine operation can produce.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The expression text is not syntactically valid math.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The operation is valid but this engine cannot carry it out symbolically.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Numeric evaluation failed: residual free symbols, unknown functions, or a
    /// non-finite result.
    #[error("cannot evaluate: {0}")]
    Eval(String),
}
