//! Free-form math query understanding.
//!
//! A query like `solve x^2-1=0 for x` or `d/dx sin(x)` goes through four stages:
//!
//! 1. **Classification** ([`classify`]): ordered keyword/pattern cues assign exactly one
//!    [`Mode`] to the text, with [`Mode::Auto`] as the catch-all.
//! 2. **Extraction** ([`extract`]): mode-specific heuristics strip operation keywords,
//!    pick out an optional explicit variable, and leave a clean expression string.
//! 3. **Dispatch** ([`respond`]): the expression is parsed and handed to the symbolic
//!    engine capability for the mode, with a secondary "solve ... for ..." attempt when
//!    the primary one fails recoverably.
//! 4. **Formatting** ([`Envelope`]): success or failure is wrapped into a uniform
//!    serializable envelope.
//!
//! The whole pipeline is stateless and total: [`respond`] never panics and never
//! returns anything but an envelope.

pub mod classify;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod extract;

pub use classify::{classify, Mode};
pub use dispatch::respond;
pub use envelope::{Envelope, EquationSolutions, Payload};
pub use error::QueryError;
