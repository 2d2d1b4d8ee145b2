//! A parser and serializer for the Wexpr data format.
//!
//! Wexpr is a small data interchange format with two equivalent encodings: a
//! human-editable text form with S-expression-like syntax, and a
//! length-prefixed binary chunk form. Both decode into the same
//! [`Expression`] tree, and either encoding can be produced from it.
//!
//! # Modules
//!
//! - [`expr`] -- The [`Expression`] tree shared by both formats.
//! - [`text`] -- Text format parser and renderer, including reference resolution.
//! - [`chunk`] -- Binary chunk encoder and decoder.
//!
//! # Example
//!
//! ```
//! use wexpr::Expression;
//!
//! let expr = wexpr::parse_text("@(name Bob regions #(na eu))").unwrap();
//! assert_eq!(expr.map_get("name"), Some(&Expression::value("Bob")));
//!
//! let bytes = wexpr::encode_binary(&expr);
//! assert_eq!(wexpr::decode_binary(&bytes).unwrap(), expr);
//!
//! assert_eq!(
//!     wexpr::render_text(&expr, &Default::default(), 0),
//!     "@(name Bob regions #(na eu))"
//! );
//! ```
//!
//! # Text syntax
//!
//! ```text
//! ; a comment
//! @(                        ; map
//!     name "Bob"            ; quoted value
//!     age 24                ; bareword value
//!     scores #(1 2 3)       ; array
//!     avatar <aGk=>         ; binary data, base64
//!     home [addr] @(city x) ; bind a reference while parsing it
//!     work *[addr]          ; deep-copy the bound expression here
//!     note null             ; null literal (nil also works)
//! )
//! ```
//!
//! # Format
//!
//! Implements the Wexpr format of
//! [libWexpr](https://github.com/thothonegan/libWexpr), covering both the
//! text encoding and the uncompressed binary chunk encoding.

use std::collections::HashMap;

pub mod chunk;
pub mod expr;
pub mod text;

pub use chunk::DecodeError;
pub use expr::{ExprKind, Expression};
pub use text::{ParseError, ParseErrorKind, ParseOptions, WriteOptions};

/// Parse a Wexpr text document with default options and no external
/// references.
pub fn parse_text(source: &str) -> Result<Expression, ParseError> {
    text::parse(source)
}

/// Parse a Wexpr text document.
///
/// `external_refs` supplies expressions that `*[name]` can resolve when the
/// document itself never bound `name`.
pub fn parse_text_with(
    source: &str,
    options: &ParseOptions,
    external_refs: &HashMap<String, Expression>,
) -> Result<Expression, ParseError> {
    text::parse_with(source, options, external_refs)
}

/// Render an expression as Wexpr text.
///
/// `indent` is the nesting level the expression sits at, for embedding output
/// inside already-indented surroundings; pass 0 for a whole document.
pub fn render_text(expr: &Expression, options: &WriteOptions, indent: usize) -> String {
    text::render(expr, options, indent)
}

/// Encode an expression in the binary chunk form.
pub fn encode_binary(expr: &Expression) -> Vec<u8> {
    chunk::encode(expr)
}

/// Decode the binary chunk form back into an expression.
pub fn decode_binary(bytes: &[u8]) -> Result<Expression, DecodeError> {
    chunk::decode(bytes)
}
