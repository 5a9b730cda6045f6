//! Diagnostic sanitizer.
//!
//! Source text reaching this parser may contain proprietary identifiers,
//! string literals, or arbitrary stray bytes, and diagnostics are sent to
//! clients that log and forward them. [`token_display`] is the single
//! choke point through which token text enters a diagnostic message:
//! tokens whose kind is not in the safe allow-list are rendered as a
//! length-only placeholder. Parser code never formats `token.text` into a
//! message directly.

use cal_common::token::{Token, TokenKind};

/// Whether a token kind's literal text may appear in diagnostics.
///
/// Safe kinds are punctuation, operators, keywords, and `Eof` -- lexemes
/// drawn from the closed vocabulary of the language. Words, literals, and
/// `Unknown` byte runs carry user content and are unsafe.
pub fn is_safe_kind(kind: TokenKind) -> bool {
    !matches!(
        kind,
        TokenKind::Ident
            | TokenKind::QuotedIdent
            | TokenKind::Int
            | TokenKind::Decimal
            | TokenKind::Str
            | TokenKind::Unknown
    )
}

/// Render a token for inclusion in a diagnostic message.
///
/// Safe tokens render their literal text (`Eof` renders as `EOF`); unsafe
/// tokens render `[content sanitized, N chars]` where N counts characters
/// of the original lexeme.
pub fn token_display(token: &Token) -> String {
    if is_safe_kind(token.kind) {
        if token.text.is_empty() {
            token.kind.to_string()
        } else {
            token.text.clone()
        }
    } else {
        format!("[content sanitized, {} chars]", token.text.chars().count())
    }
}
