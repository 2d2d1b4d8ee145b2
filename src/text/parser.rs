//! Recursive-descent parser from Wexpr text to an expression tree.
//!
//! The parser consumes a [`Cursor`] over the source and dispatches on the
//! next one or two characters after trimming whitespace and comments. It
//! never backtracks. Reference definitions (`[name]`) bind a deep copy of the
//! expression that follows them into a per-parse internal table; dereferences
//! (`*[name]`) copy back out of that table, falling back to a caller-supplied
//! external table.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::cursor::{Cursor, Position};
use super::error::{ParseError, ParseErrorKind};
use super::{is_reserved, is_whitespace, ParseOptions};
use crate::expr::Expression;

const BLOCK_COMMENT_START: &str = ";(--";
const BLOCK_COMMENT_END: &str = "--)";

/// Parse one complete document. The whole input must be consumed: anything
/// left after the root expression and a trailing trim is an error.
pub(crate) fn parse(
    source: &str,
    options: &ParseOptions,
    external_refs: &HashMap<String, Expression>,
) -> Result<Expression, ParseError> {
    let mut parser = Parser::new(source, options, external_refs);

    let root = match parser.parse_expression()? {
        Some(expr) => expr,
        None => return Err(parser.error_here(ParseErrorKind::EmptyString)),
    };

    parser.trim_front();
    if !parser.cursor.is_eof() {
        return Err(parser.error_here(ParseErrorKind::ExtraDataAfterRoot));
    }

    Ok(root)
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    /// Nesting budget; parsing fails rather than recursing past it.
    max_depth: usize,
    depth: usize,
    /// Names bound by `[name]` so far in this document.
    internal_refs: HashMap<String, Expression>,
    /// Caller-supplied bindings, consulted only when a name is not internal.
    external_refs: &'a HashMap<String, Expression>,
}

impl<'a> Parser<'a> {
    fn new(
        source: &'a str,
        options: &ParseOptions,
        external_refs: &'a HashMap<String, Expression>,
    ) -> Self {
        Self {
            cursor: Cursor::new(source),
            max_depth: options.max_depth,
            depth: 0,
            internal_refs: HashMap::new(),
            external_refs,
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Parse the next expression, or `None` if the input is exhausted after
    /// trimming. Callers decide what an absent expression means at their
    /// position (root: empty document; map: missing value).
    fn parse_expression(&mut self) -> Result<Option<Expression>, ParseError> {
        self.trim_front();

        let c = match self.cursor.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        match c {
            '#' if self.cursor.peek_second() == Some('(') => self.parse_array().map(Some),
            '@' if self.cursor.peek_second() == Some('(') => self.parse_map().map(Some),
            '[' => self.parse_reference_define(),
            '*' if self.cursor.peek_second() == Some('[') => {
                self.parse_reference_insert().map(Some)
            }
            '<' => self.parse_binary_data().map(Some),
            _ => self.parse_value().map(Some),
        }
    }

    /// Parse a nested expression, counting it against the depth budget.
    fn parse_child(&mut self) -> Result<Option<Expression>, ParseError> {
        if self.depth >= self.max_depth {
            return Err(self.error_here(ParseErrorKind::NestingTooDeep));
        }
        self.depth += 1;
        let result = self.parse_expression();
        self.depth -= 1;
        result
    }

    /// Strip whitespace and comments until the next significant character.
    ///
    /// A `;` starts a comment to the end of the line, unless it opens the
    /// four-character block form, which runs to the first closer (block
    /// comments do not nest) or to end of input.
    fn trim_front(&mut self) {
        loop {
            self.cursor.skip_while(is_whitespace);
            if self.cursor.peek() != Some(';') {
                return;
            }
            if self.cursor.starts_with(BLOCK_COMMENT_START) {
                self.cursor.advance_by(BLOCK_COMMENT_START.len());
                while !self.cursor.is_eof() && !self.cursor.starts_with(BLOCK_COMMENT_END) {
                    self.cursor.advance();
                }
                self.cursor.advance_by(BLOCK_COMMENT_END.len());
            } else {
                while let Some(c) = self.cursor.advance() {
                    if c == '\n' {
                        break;
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Containers
    // -----------------------------------------------------------------------

    fn parse_array(&mut self) -> Result<Expression, ParseError> {
        self.cursor.advance_by(2); // #(

        let mut items = Vec::new();
        loop {
            self.trim_front();
            match self.cursor.peek() {
                None => return Err(self.error_here(ParseErrorKind::ArrayMissingEndParen)),
                Some(')') => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => match self.parse_child()? {
                    Some(child) => items.push(child),
                    None => return Err(self.error_here(ParseErrorKind::ArrayMissingEndParen)),
                },
            }
        }

        Ok(Expression::Array(items))
    }

    fn parse_map(&mut self) -> Result<Expression, ParseError> {
        self.cursor.advance_by(2); // @(

        let mut map = Expression::Map(Vec::new());
        loop {
            self.trim_front();
            match self.cursor.peek() {
                None => return Err(self.error_here(ParseErrorKind::MapMissingEndParen)),
                Some(')') => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    // Key errors point at where the pair began.
                    let pair_start = self.cursor.position();
                    let key = match self.parse_child()? {
                        Some(key) => key,
                        None => return Err(self.error_here(ParseErrorKind::MapMissingEndParen)),
                    };
                    let key = match key {
                        Expression::Value(key) => key,
                        _ => {
                            return Err(
                                self.error_at(ParseErrorKind::MapKeyMustBeAValue, &pair_start)
                            )
                        }
                    };
                    let value = match self.parse_child()? {
                        Some(value) => value,
                        None => return Err(self.error_at(ParseErrorKind::MapNoValue, &pair_start)),
                    };
                    map.map_insert(key, value);
                }
            }
        }

        Ok(map)
    }

    // -----------------------------------------------------------------------
    // References
    // -----------------------------------------------------------------------

    /// `[name]expr` binds a deep copy of `expr` to `name` and yields `expr`
    /// itself; the annotation adds no node of its own. Returns `None` when no
    /// expression follows, leaving the caller to report the absence.
    fn parse_reference_define(&mut self) -> Result<Option<Expression>, ParseError> {
        let start = self.cursor.position();
        self.cursor.advance(); // [

        let name_start = self.cursor.position();
        self.cursor.skip_while(|c| c != ']');
        if self.cursor.is_eof() {
            return Err(self.error_at(ParseErrorKind::ReferenceMissingEndBracket, &start));
        }

        let name = self.cursor.slice_from(&name_start);
        if !is_valid_reference_name(name) {
            let kind = ParseErrorKind::ReferenceInvalidName(name.to_string());
            return Err(self.error_at(kind, &start));
        }
        let name = name.to_string();
        self.cursor.advance(); // ]

        let expr = match self.parse_child()? {
            Some(expr) => expr,
            None => return Ok(None),
        };
        self.internal_refs.insert(name, expr.clone());
        Ok(Some(expr))
    }

    fn parse_reference_insert(&mut self) -> Result<Expression, ParseError> {
        let start = self.cursor.position();
        self.cursor.advance_by(2); // *[

        let name_start = self.cursor.position();
        self.cursor.skip_while(|c| c != ']');
        if self.cursor.is_eof() {
            return Err(self.error_at(ParseErrorKind::ReferenceInsertMissingEndBracket, &start));
        }

        let name = self.cursor.slice_from(&name_start).to_string();
        self.cursor.advance(); // ]

        if let Some(expr) = self.internal_refs.get(&name) {
            return Ok(expr.clone());
        }
        if let Some(expr) = self.external_refs.get(&name) {
            return Ok(expr.clone());
        }
        Err(self.error_here(ParseErrorKind::ReferenceUnknownReference(name)))
    }

    // -----------------------------------------------------------------------
    // Scalars
    // -----------------------------------------------------------------------

    fn parse_binary_data(&mut self) -> Result<Expression, ParseError> {
        let start = self.cursor.position();
        self.cursor.advance(); // <

        let data_start = self.cursor.position();
        self.cursor.skip_while(|c| c != '>');
        if self.cursor.is_eof() {
            return Err(self.error_at(ParseErrorKind::BinaryDataNoEndingBracket, &start));
        }

        let encoded = self.cursor.slice_from(&data_start);
        let bytes = match STANDARD.decode(encoded) {
            Ok(bytes) => bytes,
            Err(_) => return Err(self.error_at(ParseErrorKind::BinaryDataInvalidBase64, &start)),
        };
        self.cursor.advance(); // >

        Ok(Expression::BinaryData(bytes))
    }

    fn parse_value(&mut self) -> Result<Expression, ParseError> {
        let start = self.cursor.position();
        if self.cursor.peek() == Some('"') {
            return self.parse_quoted_value(&start);
        }

        self.cursor
            .skip_while(|c| !is_reserved(c) && !is_whitespace(c));
        let word = self.cursor.slice_from(&start);
        if word.is_empty() {
            return Err(self.error_at(ParseErrorKind::EmptyString, &start));
        }

        // Only barewords spell Null; the quoted forms stay values.
        if word == "null" || word == "nil" {
            return Ok(Expression::Null);
        }
        Ok(Expression::Value(word.to_string()))
    }

    fn parse_quoted_value(&mut self, start: &Position) -> Result<Expression, ParseError> {
        self.cursor.advance(); // opening quote

        let mut text = String::new();
        loop {
            // Escape errors point at the backslash that opened the sequence.
            let char_pos = self.cursor.position();
            match self.cursor.advance() {
                None => {
                    return Err(self.error_at(ParseErrorKind::UnterminatedQuotedString, start))
                }
                Some('"') => break,
                Some('\\') => match self.cursor.advance() {
                    None => {
                        return Err(self.error_at(ParseErrorKind::UnterminatedQuotedString, start))
                    }
                    Some('"') => text.push('"'),
                    Some('r') => text.push('\r'),
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('\\') => text.push('\\'),
                    Some(other) => {
                        let kind = ParseErrorKind::InvalidStringEscape(other);
                        return Err(self.error_at(kind, &char_pos));
                    }
                },
                Some(c) => text.push(c),
            }
        }

        Ok(Expression::Value(text))
    }

    // -----------------------------------------------------------------------
    // Error helpers
    // -----------------------------------------------------------------------

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        let pos = self.cursor.position();
        ParseError::new(kind, pos.line, pos.column)
    }

    fn error_at(&self, kind: ParseErrorKind, position: &Position) -> ParseError {
        ParseError::new(kind, position.line, position.column)
    }
}

/// First character `[A-Za-z_]`, the rest `[A-Za-z0-9_]`. The empty name is
/// accepted.
fn is_valid_reference_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        None => true,
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parse_never_panics(source in any::<String>()) {
            let _ = parse(&source, &ParseOptions::default(), &HashMap::new());
        }

        // Dense soup of structural characters reaches the grammar corners
        // far more often than fully arbitrary strings do.
        #[test]
        fn structural_soup_never_panics(source in "[-#@()\\[\\]<>\"*^;\\\\ \t\r\nab01=]{0,64}") {
            let _ = parse(&source, &ParseOptions::default(), &HashMap::new());
        }

        #[test]
        fn error_positions_stay_in_range(source in "[-#@()\\[\\]<>\"*^;\\\\ \t\r\nab01=]{0,64}") {
            if let Err(err) = parse(&source, &ParseOptions::default(), &HashMap::new()) {
                let line_count = source.chars().filter(|&c| c == '\n').count() as u32 + 1;
                prop_assert!(err.line >= 1 && err.line <= line_count);
                prop_assert!(err.column >= 1);
            }
        }
    }
}
