//! The symbolic math engine backing symquery.
//!
//! The engine exposes a small capability surface consumed by the query pipeline:
//!
//! - [`parse`] — expression text to [`Expr`], with implicit multiplication (`2x`)
//! - [`simplify`] — rewrite toward a canonical low-complexity form
//! - [`differentiate`] / [`integrate`] — calculus over the supported function set
//! - [`solve`] — polynomial equations up to degree two
//! - [`eval`] — numeric evaluation of closed expressions
//! - [`latex`] — the display form; [`Expr`]'s `Display` impl is the plain-text form
//!
//! Every operation is a pure function over immutable expression trees; nothing in this
//! crate holds state across calls, so concurrent queries cannot interfere.

pub mod derivative;
pub mod error;
pub mod eval;
pub mod expr;
pub mod integrate;
pub mod latex;
pub mod parser;
pub mod poly;
pub mod simplify;
pub mod solve;
pub mod tokenizer;

pub use derivative::differentiate;
pub use error::EngineError;
pub use eval::{eval, format_number};
pub use expr::{Atom, Expr};
pub use integrate::integrate;
pub use latex::latex;
pub use parser::error::ParseError;
pub use parser::parse;
pub use simplify::simplify;
pub use solve::{solve, Solution};
