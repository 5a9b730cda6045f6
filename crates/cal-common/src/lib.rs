//! Shared types for the C/AL frontend.
//!
//! Every stage of the pipeline (lexer, parser, type resolver, symbol
//! harvester) speaks in terms of the types defined here: byte-offset
//! [`span::Span`]s, immutable [`token::Token`]s, and the keyword
//! vocabulary of the C/AL dialect.

pub mod span;
pub mod token;

pub use span::{LineIndex, Span};
pub use token::{keyword_from_str, Token, TokenKind};
