//! Scan and parse diagnostics.
//!
//! These are collected alongside the tree rather than returned through
//! `Result`: a malformed document still yields a best-effort CST, and the
//! caller decides how much it cares about the problems.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    #[error("unexpected symbol")]
    InvalidSymbol,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid character in string")]
    InvalidCharacter,
    #[error("invalid number")]
    InvalidNumber,
    #[error("unterminated block comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("{0}")]
    Scan(ScanErrorKind),
    #[error("value expected")]
    ValueExpected,
    #[error("property name expected")]
    PropertyNameExpected,
    #[error("colon expected")]
    ColonExpected,
    #[error("comma expected")]
    CommaExpected,
    #[error("closing brace expected")]
    ClosingBraceExpected,
    #[error("closing bracket expected")]
    ClosingBracketExpected,
    #[error("trailing comma")]
    TrailingComma,
    #[error("end of file expected")]
    EndOfFileExpected,
}

/// A diagnostic anchored to a source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    pub length: usize,
}
