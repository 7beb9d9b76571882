//! Parse errors, with spans into the source expression and [`ariadne`] report
//! rendering for server-side diagnostics.

use ariadne::{Color, Label, Report, ReportKind, Source};
use std::ops::Range;
use thiserror::Error;

/// The color used to highlight the offending region of the expression.
const HIGHLIGHT: Color = Color::RGB(52, 235, 152);

/// An error produced while tokenizing or parsing an expression.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} (at offset {})", span.start)]
pub struct ParseError {
    /// The region of the source expression that this error originated from.
    pub span: Range<usize>,

    /// The kind of error that occurred.
    pub kind: ParseErrorKind,
}

/// The different kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    /// The expression was empty after trimming.
    #[error("empty expression")]
    EmptyExpression,

    /// A character the tokenizer does not recognize.
    #[error("unexpected character")]
    UnknownCharacter,

    /// A token that cannot begin or continue an operand at this position.
    #[error("expected an expression")]
    ExpectedExpression,

    /// An opening parenthesis without a matching closing parenthesis.
    #[error("missing closing parenthesis")]
    UnclosedParen,

    /// Leftover input after a complete expression was parsed.
    #[error("unexpected trailing input")]
    TrailingInput,

    /// A numeric literal too large to represent.
    #[error("number out of range")]
    NumberOutOfRange,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(span: Range<usize>, kind: ParseErrorKind) -> Self {
        Self { span, kind }
    }

    /// Renders a full [`ariadne`] report for this error, highlighting the offending
    /// region of the source expression.
    ///
    /// The rendered report is intended for server-side logs only; clients receive the
    /// sanitized one-line [`Display`](std::fmt::Display) message.
    pub fn report(&self, source: &str) -> String {
        let span = if self.span.start >= self.span.end {
            self.span.start..(self.span.start + 1).min(source.len().max(1))
        } else {
            self.span.clone()
        };

        let report = Report::build(ReportKind::Error, (), span.start)
            .with_message(self.kind.to_string())
            .with_label(
                Label::new(span)
                    .with_message(self.kind.to_string())
                    .with_color(HIGHLIGHT),
            )
            .finish();

        let mut buf = Vec::new();
        // rendering into a Vec<u8> cannot fail
        let _ = report.write(Source::from(source), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
