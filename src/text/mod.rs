//! Wexpr text format support.
//!
//! This module parses the human-readable Wexpr syntax into [`Expression`]
//! trees and renders trees back out, in compact or indented form.
//!
//! # Example
//!
//! ```
//! use wexpr::text;
//!
//! let expr = text::parse("@(name Bob scores #(1 2 3))").unwrap();
//! assert_eq!(expr.map_get("name").and_then(|v| v.as_value()), Some("Bob"));
//!
//! let compact = text::render(&expr, &text::WriteOptions::default(), 0);
//! assert_eq!(compact, "@(name Bob scores #(1 2 3))");
//! ```
//!
//! # Errors
//!
//! Parsing stops at the first problem and reports it with a 1-based line and
//! column:
//!
//! ```
//! use wexpr::text::{self, ParseErrorKind};
//!
//! let err = text::parse("#(a b").unwrap_err();
//! assert_eq!(err.kind, ParseErrorKind::ArrayMissingEndParen);
//! assert_eq!(err.to_string(), "1:6: array missing its ending paren");
//! ```

mod cursor;
mod error;
mod parser;
mod render;

pub use error::{ParseError, ParseErrorKind};

use std::collections::HashMap;

use crate::expr::Expression;

/// Knobs for a parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// How deep expressions may nest before the parse fails with
    /// [`ParseErrorKind::NestingTooDeep`].
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// Knobs for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Emit newlines and tab indentation instead of the compact single-space
    /// form.
    pub human_readable: bool,
}

/// Parse a document with default options and no external references.
pub fn parse(source: &str) -> Result<Expression, ParseError> {
    parse_with(source, &ParseOptions::default(), &HashMap::new())
}

/// Parse a document.
///
/// `external_refs` supplies named expressions that `*[name]` can pull in when
/// the document itself has not bound `name`; the table is only read.
pub fn parse_with(
    source: &str,
    options: &ParseOptions,
    external_refs: &HashMap<String, Expression>,
) -> Result<Expression, ParseError> {
    parser::parse(source, options, external_refs)
}

/// Parse a document from raw bytes with default options and no external
/// references.
pub fn parse_bytes(source: &[u8]) -> Result<Expression, ParseError> {
    parse_bytes_with(source, &ParseOptions::default(), &HashMap::new())
}

/// Parse a document from raw bytes.
///
/// The bytes must be UTF-8; anything else fails with
/// [`ParseErrorKind::InvalidUtf8`] positioned at the first invalid byte.
pub fn parse_bytes_with(
    source: &[u8],
    options: &ParseOptions,
    external_refs: &HashMap<String, Expression>,
) -> Result<Expression, ParseError> {
    match std::str::from_utf8(source) {
        Ok(text) => parser::parse(text, options, external_refs),
        Err(utf8_err) => {
            let valid = std::str::from_utf8(&source[..utf8_err.valid_up_to()]).unwrap_or("");
            let mut cursor = cursor::Cursor::new(valid);
            while cursor.advance().is_some() {}
            let pos = cursor.position();
            Err(ParseError::new(ParseErrorKind::InvalidUtf8, pos.line, pos.column))
        }
    }
}

/// Render `expr` as text at the given starting indent level.
pub fn render(expr: &Expression, options: &WriteOptions, indent: usize) -> String {
    render::render(expr, options, indent)
}

/// Structural characters that end a bareword and are forbidden unquoted.
pub(crate) fn is_reserved(c: char) -> bool {
    matches!(
        c,
        '*' | '#' | '@' | '(' | ')' | '[' | ']' | '^' | '<' | '>' | '"' | ';'
    )
}

/// Wexpr whitespace. CR counts as whitespace here, not as a line break.
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bytes_accepts_utf8() {
        let expr = parse_bytes("#(\u{e9} b)".as_bytes()).unwrap();
        assert_eq!(expr.as_array().map(|items| items.len()), Some(2));
    }

    #[test]
    fn parse_bytes_positions_invalid_utf8() {
        let err = parse_bytes(b"ab\ncd\xff").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUtf8);
        assert_eq!((err.line, err.column), (2, 3));
    }

    #[test]
    fn default_options() {
        assert_eq!(ParseOptions::default().max_depth, 128);
        assert!(!WriteOptions::default().human_readable);
    }
}
