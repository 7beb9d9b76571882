//! A recursive-descent parser from expression text to [`Expr`].
//!
//! The grammar is the usual arithmetic one (`+ - * / ^`, unary minus, function calls,
//! parentheses) with one addition that matters for free-form queries: **implicit
//! multiplication**. Two operands written next to each other multiply, so `2x`,
//! `3(x + 1)`, `2 sin(x)` and `(x + 1)(x - 1)` all parse. Implicit multiplication binds
//! exactly like `*`.
//!
//! Implicit multiplication does not reach across whitespace, except for a spaced call
//! form (`2 sin(x)`). A spaced bare word after an operand is trailing input, so stray
//! natural-language words around an expression surface as parse errors instead of
//! multiplying in as symbols.
//!
//! Multi-character names followed by parentheses are function calls; all other names are
//! symbols, including multi-character ones (`foo` is one symbol, not `f*o*o`).
//!
//! Parsing produces the flattened [`Expr`] representation directly: subtraction becomes
//! addition of a negated term, and division becomes multiplication by a reciprocal
//! power.

pub mod error;

use crate::expr::Expr;
use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use error::{ParseError, ParseErrorKind};
use std::ops::{Neg, Range};

/// Parses the given source text into an expression.
///
/// This is the engine's `parse` entry point; the [`Parser`] type is exposed for callers
/// that want to drive parsing manually.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    Parser::new(source)?.parse_full()
}

/// A parser over a complete, owned token stream.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens being parsed, with whitespace removed.
    tokens: Box<[Token<'source>]>,

    /// Whether each retained token was preceded by whitespace in the source. Needed to
    /// keep `2 sin(x)` parsing as a product while spans stay accurate.
    spaced: Box<[bool]>,

    /// The length of the source text, for end-of-input spans.
    source_len: usize,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Creates a new parser for the given source, failing on unknown characters.
    pub fn new(source: &'source str) -> Result<Self, ParseError> {
        let all = tokenize_complete(source)
            .map_err(|span| ParseError::new(span, ParseErrorKind::UnknownCharacter))?;

        let mut tokens = Vec::new();
        let mut spaced = Vec::new();
        let mut pending_space = false;
        for token in all.into_vec() {
            if token.kind == TokenKind::Whitespace {
                pending_space = true;
            } else {
                tokens.push(token);
                spaced.push(pending_space);
                pending_space = false;
            }
        }

        Ok(Self {
            tokens: tokens.into_boxed_slice(),
            spaced: spaced.into_boxed_slice(),
            source_len: source.len(),
            cursor: 0,
        })
    }

    /// Parses the entire token stream as a single expression, rejecting trailing input.
    pub fn parse_full(&mut self) -> Result<Expr, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::new(0..0, ParseErrorKind::EmptyExpression));
        }

        let expr = self.parse_sum()?;
        match self.peek() {
            Some(token) => Err(ParseError::new(token.span.clone(), ParseErrorKind::TrailingInput)),
            None => Ok(expr),
        }
    }

    /// Returns the next token without consuming it.
    fn peek(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Consumes and returns the next token.
    fn advance(&mut self) -> Option<Token<'source>> {
        let token = self.tokens.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(token)
    }

    /// The span of the next token, or an empty span at the end of the source.
    fn span(&self) -> Range<usize> {
        self.peek()
            .map(|token| token.span.clone())
            .unwrap_or(self.source_len..self.source_len)
    }

    /// `sum := product (("+" | "-") product)*`
    fn parse_sum(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_product()?;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Add => {
                    self.advance();
                    expr = expr + self.parse_product()?;
                },
                TokenKind::Sub => {
                    self.advance();
                    expr = expr + self.parse_product()?.neg();
                },
                _ => break,
            }
        }
        Ok(expr)
    }

    /// `product := unary (("*" | "/") unary | unary)*`
    ///
    /// The second alternative is implicit multiplication: any token that can begin an
    /// operand continues the product.
    fn parse_product(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_unary()?;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Mul => {
                    self.advance();
                    expr = expr * self.parse_unary()?;
                },
                TokenKind::Div => {
                    self.advance();
                    expr = Expr::frac(expr, self.parse_unary()?);
                },
                kind if kind.starts_operand() && self.continues_product() => {
                    expr = expr * self.parse_unary()?;
                },
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Whether the token at the cursor can begin an implicit-multiplication factor.
    ///
    /// Unspaced operands always continue the product. Across whitespace, only a call
    /// form does; a spaced bare name or number ends the expression.
    fn continues_product(&self) -> bool {
        if !self.spaced[self.cursor] {
            return true;
        }
        self.peek().map_or(false, |token| token.kind == TokenKind::Name)
            && self.tokens.get(self.cursor + 1).map_or(false, |next| {
                next.kind == TokenKind::OpenParen && !self.spaced[self.cursor + 1]
            })
    }

    /// `unary := "-" unary | "+" unary | power`
    ///
    /// Unary minus binds looser than `^`, so `-x^2` is `-(x^2)`.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().map(|token| token.kind) {
            Some(TokenKind::Sub) => {
                self.advance();
                Ok(self.parse_unary()?.neg())
            },
            Some(TokenKind::Add) => {
                self.advance();
                self.parse_unary()
            },
            _ => self.parse_power(),
        }
    }

    /// `power := atom ("^" unary)?`
    ///
    /// Exponentiation is right-associative, and the exponent may carry its own unary
    /// sign (`x^-2`).
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_atom()?;
        if let Some(token) = self.peek() {
            if token.kind == TokenKind::Caret {
                self.advance();
                let exp = self.parse_unary()?;
                return Ok(Expr::Pow(Box::new(base), Box::new(exp)));
            }
        }
        Ok(base)
    }

    /// `atom := Int | Float | Name | Name "(" sum ("," sum)* ")" | "(" sum ")"`
    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let token = match self.advance() {
            Some(token) => token,
            None => {
                return Err(ParseError::new(
                    self.source_len..self.source_len,
                    ParseErrorKind::ExpectedExpression,
                ));
            },
        };

        match token.kind {
            TokenKind::Int => token
                .lexeme
                .parse::<i64>()
                .map(Expr::int)
                .map_err(|_| ParseError::new(token.span, ParseErrorKind::NumberOutOfRange)),
            TokenKind::Float => token
                .lexeme
                .parse::<f64>()
                .map(Expr::float)
                .map_err(|_| ParseError::new(token.span, ParseErrorKind::NumberOutOfRange)),
            TokenKind::Name => {
                // only a name immediately followed by `(` is a call
                let is_call = self.peek().map_or(false, |next| {
                    next.kind == TokenKind::OpenParen && !self.spaced[self.cursor]
                });
                if is_call {
                    let open_span = self.span();
                    self.advance();
                    let mut args = vec![self.parse_sum()?];
                    loop {
                        match self.peek().map(|next| next.kind) {
                            Some(TokenKind::Comma) => {
                                self.advance();
                                args.push(self.parse_sum()?);
                            },
                            Some(TokenKind::CloseParen) => {
                                self.advance();
                                break;
                            },
                            _ => return Err(ParseError::new(open_span, ParseErrorKind::UnclosedParen)),
                        }
                    }
                    Ok(Expr::call(token.lexeme, args))
                } else {
                    Ok(Expr::sym(token.lexeme))
                }
            },
            TokenKind::OpenParen => {
                let open_span = token.span;
                let inner = self.parse_sum()?;
                match self.peek().map(|next| next.kind) {
                    Some(TokenKind::CloseParen) => {
                        self.advance();
                        Ok(inner)
                    },
                    _ => Err(ParseError::new(open_span, ParseErrorKind::UnclosedParen)),
                }
            },
            _ => Err(ParseError::new(token.span, ParseErrorKind::ExpectedExpression)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::Expr;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn implicit_multiplication() {
        let expr = parse("2x").unwrap();
        assert_eq!(expr, Expr::Mul(vec![Expr::int(2), Expr::sym("x")]));
    }

    #[test]
    fn implicit_multiplication_with_call() {
        let expr = parse("2 sin(x)").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(vec![
                Expr::int(2),
                Expr::call("sin", vec![Expr::sym("x")]),
            ]),
        );
    }

    #[test]
    fn adjacent_parens_multiply() {
        let expr = parse("(x + 1)(x - 1)").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(vec![
                Expr::Add(vec![Expr::sym("x"), Expr::int(1)]),
                Expr::Add(vec![Expr::sym("x"), Expr::int(-1)]),
            ]),
        );
    }

    #[test]
    fn subtraction_becomes_negated_term() {
        let expr = parse("x^2 - 4").unwrap();
        assert_eq!(
            expr,
            Expr::Add(vec![
                Expr::Pow(Box::new(Expr::sym("x")), Box::new(Expr::int(2))),
                Expr::int(-4),
            ]),
        );
    }

    #[test]
    fn division_becomes_reciprocal() {
        let expr = parse("x/3").unwrap();
        assert_eq!(expr, Expr::Mul(vec![Expr::sym("x"), Expr::int(3).recip()]));
    }

    #[test]
    fn power_is_right_associative() {
        let expr = parse("x^2^3").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::sym("x")),
                Box::new(Expr::Pow(Box::new(Expr::int(2)), Box::new(Expr::int(3)))),
            ),
        );
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        let expr = parse("-x^2").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(vec![
                Expr::int(-1),
                Expr::Pow(Box::new(Expr::sym("x")), Box::new(Expr::int(2))),
            ]),
        );
    }

    #[test]
    fn multi_character_symbol() {
        let expr = parse("velocity + 1").unwrap();
        assert_eq!(expr, Expr::Add(vec![Expr::sym("velocity"), Expr::int(1)]));
    }

    #[test]
    fn spaced_bare_name_is_trailing_input() {
        let err = parse("solve x^2 - 1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingInput);
        assert_eq!(err.span, 6..7);
    }

    #[test]
    fn spaced_number_is_trailing_input() {
        let err = parse("x 2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingInput);
    }

    #[test]
    fn empty_expression() {
        let err = parse("   ").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyExpression);
    }

    #[test]
    fn trailing_input() {
        let err = parse("1 + 2)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingInput);
        assert_eq!(err.span, 5..6);
    }

    #[test]
    fn unclosed_paren() {
        let err = parse("2(x + 1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedParen);
    }

    #[test]
    fn unknown_character() {
        let err = parse("2 @ 3").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownCharacter);
    }
}
