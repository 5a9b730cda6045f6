//! C/AL parser: recursive-descent parsing of object definition text into
//! an owned typed AST.
//!
//! The entry point is [`parse`]. Parsing is total: every input yields a
//! [`ast::Document`] plus a list of sanitized diagnostics and a numeric
//! summary of any token runs consumed by error recovery. No raw token
//! text crosses this boundary -- see [`sanitize`] for the allow-list and
//! [`error`] for the boundary shapes.

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod indent;
pub mod sanitize;

mod parser;

pub use error::{codes, ParseError, SkippedRegion, TokenInfo};

/// Everything a parse produces.
#[derive(Debug)]
pub struct ParseResult {
    pub document: ast::Document,
    /// Sanitized diagnostics, in source order.
    pub errors: Vec<ParseError>,
    /// Numeric summaries of recovery skips.
    pub skipped_regions: Vec<SkippedRegion>,
}

impl ParseResult {
    /// Whether parsing completed without diagnostics.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Lex and parse a source document.
pub fn parse(source: &str) -> ParseResult {
    parse_tokens(cal_lexer::Lexer::tokenize(source))
}

/// Parse an existing token stream (must end with `Eof`; one is appended
/// defensively if missing).
pub fn parse_tokens(tokens: Vec<cal_common::Token>) -> ParseResult {
    let (document, errors, skipped_regions) = parser::Parser::new(tokens).run();
    ParseResult {
        document,
        errors,
        skipped_regions,
    }
}
