//! Errors raised while parsing Wexpr text.

use thiserror::Error;

/// Everything that can go wrong in a text parse.
///
/// The set is closed: parsing either succeeds or fails with exactly one of
/// these kinds. Variants carry the offending token data where it helps the
/// message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("no expression found")]
    EmptyString,
    #[error("extra data after the root expression")]
    ExtraDataAfterRoot,
    #[error("input is not valid utf-8")]
    InvalidUtf8,
    #[error("invalid escape '\\{0}' in quoted value")]
    InvalidStringEscape(char),
    #[error("quoted value missing its ending quote")]
    UnterminatedQuotedString,
    #[error("array missing its ending paren")]
    ArrayMissingEndParen,
    #[error("map missing its ending paren")]
    MapMissingEndParen,
    #[error("map key must be a value")]
    MapKeyMustBeAValue,
    #[error("map key missing its value")]
    MapNoValue,
    #[error("reference missing its ending bracket")]
    ReferenceMissingEndBracket,
    #[error("invalid reference name '{0}'")]
    ReferenceInvalidName(String),
    #[error("reference insert missing its ending bracket")]
    ReferenceInsertMissingEndBracket,
    #[error("unknown reference '{0}'")]
    ReferenceUnknownReference(String),
    #[error("binary data missing its ending '>'")]
    BinaryDataNoEndingBracket,
    #[error("binary data is not valid base64")]
    BinaryDataInvalidBase64,
    #[error("expressions nested too deeply")]
    NestingTooDeep,
}

/// A fatal parse error with its 1-based source position.
///
/// Displays as `line:column: message`, e.g. `2:5: map key must be a value`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: u32,
    pub column: u32,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: u32, column: u32) -> Self {
        Self { kind, line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position_and_message() {
        let err = ParseError::new(ParseErrorKind::MapNoValue, 3, 14);
        assert_eq!(err.to_string(), "3:14: map key missing its value");
    }

    #[test]
    fn display_includes_variant_data() {
        let err = ParseError::new(ParseErrorKind::InvalidStringEscape('q'), 1, 6);
        assert_eq!(err.to_string(), "1:6: invalid escape '\\q' in quoted value");

        let err = ParseError::new(
            ParseErrorKind::ReferenceUnknownReference("player".to_string()),
            1,
            10,
        );
        assert_eq!(err.to_string(), "1:10: unknown reference 'player'");
    }
}
