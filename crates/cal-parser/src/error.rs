//! Parse errors and skipped-region summaries.
//!
//! These are the only diagnostic shapes that cross the parser boundary.
//! Messages are sanitized at construction time (see [`crate::sanitize`]);
//! the token metadata exposed here is limited to kind and position, never
//! the raw lexeme.

use std::fmt;

use cal_common::token::{Token, TokenKind};
use serde::Serialize;

/// Error codes for diagnostics that editor middleware dispatches on.
pub mod codes {
    /// AL ternary `?:` operator encountered in C/AL source.
    pub const TERNARY_OPERATOR: &str = "TERNARY_OPERATOR";
    /// AL-only construct (`ENUM`, `INTERFACE`, `INTERNAL PROCEDURE`, ...).
    pub const AL_ONLY_KEYWORD: &str = "AL_ONLY_KEYWORD";
    /// Structural keyword used in declaration position.
    pub const RESERVED_KEYWORD: &str = "RESERVED_KEYWORD";
}

/// The boundary-safe view of the token a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        Self {
            kind: token.kind,
            line: token.line,
            column: token.column,
        }
    }
}

/// A recoverable parse diagnostic. `message` is sanitized; it never
/// contains the raw text of an unsafe token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseError {
    pub message: String,
    pub token: TokenInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, token: &Token, code: Option<&'static str>) -> Self {
        Self {
            message: message.into(),
            token: TokenInfo::from(token),
            code,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.message, self.token.line, self.token.column
        )
    }
}

impl std::error::Error for ParseError {}

/// Numeric summary of a contiguous token run consumed by error recovery.
///
/// Only counts and positions leave the parser; the tokens themselves stay
/// internal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRegion {
    pub token_count: usize,
    pub reason: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}
