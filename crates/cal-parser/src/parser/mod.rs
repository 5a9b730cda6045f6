//! Parser core: token cursor, brace-depth tracking, and error recovery.
//!
//! The parser owns its token vector, an error list, and a skipped-region
//! list. Entry parsers return `Result<T, Bail>`: a `Bail` means the error
//! is already recorded and the caller should synchronize. Recovery never
//! consumes past the closing `}` of the enclosing section, so later
//! sections stay parseable.

pub(crate) mod code;
pub(crate) mod expressions;
pub(crate) mod layout;
pub(crate) mod object;
pub(crate) mod properties;
pub(crate) mod statements;
pub(crate) mod tables;

use cal_common::token::{Token, TokenKind};

use crate::error::{ParseError, SkippedRegion};
use crate::sanitize::token_display;

/// Sentinel for "error recorded, synchronize upstream".
pub(crate) struct Bail;

pub(crate) type PResult<T> = Result<T, Bail>;

/// What a recovery predicate wants done with the current token.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sync {
    /// Stop without consuming the token.
    StopBefore,
    /// Consume the token, then stop.
    Consume,
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Consumed `{` minus consumed `}`. Lets recovery tell nested braces
    /// (GUID columns, property blocks) apart from section-closing braces.
    brace_depth: i32,
    errors: Vec<ParseError>,
    skipped: Vec<SkippedRegion>,
}

impl Parser {
    pub(crate) fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column, offset) = tokens
                .last()
                .map(|t| (t.line, t.column, t.span.end))
                .unwrap_or((1, 1, 0));
            tokens.push(Token::new(
                TokenKind::Eof,
                "",
                line,
                column,
                cal_common::Span::new(offset, offset),
            ));
        }
        Self {
            tokens,
            pos: 0,
            brace_depth: 0,
            errors: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> (crate::ast::Document, Vec<ParseError>, Vec<SkippedRegion>) {
        let start = self.tokens[0].clone();
        let end = self.tokens[self.tokens.len() - 1].clone();
        let object = object::parse_document(&mut self);
        let document = crate::ast::Document { object, start, end };
        // Diagnostics surface in source order of the token they reference.
        self.errors
            .sort_by_key(|e| (e.token.line, e.token.column));
        (document, self.errors, self.skipped)
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    /// The current token. Never advances past `Eof`.
    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Kind of the current token.
    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Kind of the token `n` positions ahead (`Eof` past the end).
    pub(crate) fn nth_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Raw cursor position, for forced-progress checks in loops whose
    /// recovery may legitimately stop without consuming anything.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Whether the current token is word-shaped with the given text,
    /// compared case-insensitively. Contextual keywords (`TEMPORARY`,
    /// `ARRAY`, `SECURITYFILTERING`, type names) are matched this way.
    pub(crate) fn at_word(&self, text: &str) -> bool {
        let t = self.current();
        t.kind.is_word() && t.text.eq_ignore_ascii_case(text)
    }

    /// The most recently consumed token (the current token when nothing
    /// has been consumed yet). Used for node end positions.
    pub(crate) fn prev(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Sanitized display of the current token, for messages.
    pub(crate) fn display(&self) -> String {
        token_display(self.current())
    }

    pub(crate) fn brace_depth(&self) -> i32 {
        self.brace_depth
    }

    // ── Consumption ────────────────────────────────────────────────────

    /// Consume and return the current token. `Eof` is never consumed.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            match token.kind {
                TokenKind::LBrace => self.brace_depth += 1,
                TokenKind::RBrace => self.brace_depth -= 1,
                _ => {}
            }
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches, without error otherwise.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or record an error and bail.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            self.error(format!("Expected {} but found {}", kind, self.display()));
            Err(Bail)
        }
    }

    // ── Diagnostics ────────────────────────────────────────────────────

    /// Record an error at the current token.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let token = self.current().clone();
        self.error_at(message, &token, None);
    }

    /// Record an error at the current token with an error code.
    pub(crate) fn error_with_code(&mut self, message: impl Into<String>, code: &'static str) {
        let token = self.current().clone();
        self.error_at(message, &token, Some(code));
    }

    /// Record an error at an explicit token.
    pub(crate) fn error_at(
        &mut self,
        message: impl Into<String>,
        token: &Token,
        code: Option<&'static str>,
    ) {
        self.errors.push(ParseError::new(message, token, code));
    }

    // ── Recovery ───────────────────────────────────────────────────────

    /// Skip tokens until the predicate asks to stop, then record the
    /// skipped region. Regions longer than one token also produce the
    /// `"Skipped N tokens during error recovery"` diagnostic; the tokens
    /// themselves are kept only long enough to derive positions.
    pub(crate) fn recover_until(&mut self, predicate: impl Fn(&Parser) -> Option<Sync>) {
        let first = self.current().clone();
        let mut last = first.clone();
        let mut count = 0usize;
        while !self.at_eof() {
            match predicate(self) {
                Some(Sync::StopBefore) => break,
                Some(Sync::Consume) => {
                    last = self.advance();
                    count += 1;
                    break;
                }
                None => {
                    last = self.advance();
                    count += 1;
                }
            }
        }
        if count > 1 {
            self.error_at(
                format!("Skipped {count} tokens during error recovery"),
                &first,
                None,
            );
            self.skipped.push(SkippedRegion {
                token_count: count,
                reason: "Error recovery".to_string(),
                start_line: first.line,
                start_column: first.column,
                end_line: last.line,
                end_column: last.column,
            });
        }
    }

    /// Entry-level recovery inside a brace-delimited section. Synchronizes
    /// to the next entry `{`, the section-closing `}`, or a section
    /// keyword, all at the section's own depth. Never consumes the
    /// section's closing brace.
    pub(crate) fn recover_entry(&mut self, section_depth: i32) {
        self.recover_until(|p| {
            if p.brace_depth < section_depth {
                return Some(Sync::StopBefore);
            }
            if p.brace_depth > section_depth {
                return None;
            }
            match p.kind() {
                TokenKind::LBrace | TokenKind::RBrace => Some(Sync::StopBefore),
                k if k.is_section_keyword() => Some(Sync::StopBefore),
                _ => None,
            }
        });
    }

    /// Section-level recovery inside an object body: skip to the next
    /// section keyword or the object's closing `}` at the body's depth.
    pub(crate) fn recover_section(&mut self, body_depth: i32) {
        self.recover_until(|p| {
            if p.brace_depth < body_depth {
                return Some(Sync::StopBefore);
            }
            if p.brace_depth > body_depth {
                return None;
            }
            match p.kind() {
                TokenKind::RBrace => Some(Sync::StopBefore),
                TokenKind::Object if p.nth_kind(1) == TokenKind::Minus => Some(Sync::StopBefore),
                k if k.is_section_keyword() => Some(Sync::StopBefore),
                _ => None,
            }
        });
    }

    /// Declaration recovery in VAR blocks: skip to the next `;` or stop
    /// before `BEGIN`, without crossing a procedure or section boundary.
    pub(crate) fn recover_var_decl(&mut self) {
        self.recover_until(|p| match p.kind() {
            TokenKind::Semicolon => Some(Sync::Consume),
            TokenKind::Begin
            | TokenKind::Procedure
            | TokenKind::Local
            | TokenKind::Trigger
            | TokenKind::Var
            | TokenKind::RBrace => Some(Sync::StopBefore),
            k if k.is_section_keyword() => Some(Sync::StopBefore),
            _ => None,
        });
    }

    /// Parameter-list recovery: skip to the next `;` or `,`, or stop
    /// before `)`.
    pub(crate) fn recover_param(&mut self) {
        self.recover_until(|p| match p.kind() {
            TokenKind::Semicolon | TokenKind::Comma => Some(Sync::Consume),
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Begin => Some(Sync::StopBefore),
            _ => None,
        });
    }

    /// Statement recovery: skip past the next `;`, or stop before a
    /// block/section boundary.
    pub(crate) fn recover_statement(&mut self) {
        self.recover_until(|p| match p.kind() {
            TokenKind::Semicolon => Some(Sync::Consume),
            TokenKind::End
            | TokenKind::Else
            | TokenKind::Until
            | TokenKind::RBrace
            | TokenKind::Procedure
            | TokenKind::Local
            | TokenKind::Trigger => Some(Sync::StopBefore),
            k if k.is_section_keyword() => Some(Sync::StopBefore),
            _ => None,
        });
    }

    /// Property recovery: skip past the next `;` at value depth zero, or
    /// stop before the owning `}`.
    pub(crate) fn recover_property(&mut self, owner_depth: i32) {
        self.recover_until(|p| {
            if p.brace_depth < owner_depth {
                return Some(Sync::StopBefore);
            }
            if p.brace_depth > owner_depth {
                return None;
            }
            match p.kind() {
                TokenKind::Semicolon => Some(Sync::Consume),
                TokenKind::RBrace => Some(Sync::StopBefore),
                _ => None,
            }
        });
    }
}

/// Reconstruct source-shaped text for a token, re-adding the quote
/// delimiters the lexer stripped.
pub(crate) fn source_text(token: &Token) -> String {
    match token.kind {
        TokenKind::Str => format!("'{}'", token.text.replace('\'', "''")),
        TokenKind::QuotedIdent => format!("\"{}\"", token.text.replace('"', "\"\"")),
        _ => token.text.clone(),
    }
}

/// Join consecutive tokens back into text, inserting a single space where
/// the original tokens were separated by whitespace (detected from byte
/// offsets).
pub(crate) fn join_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 && token.span.start > tokens[i - 1].span.end {
            out.push(' ');
        }
        out.push_str(&source_text(token));
    }
    out
}

/// Shared section envelope for brace-delimited entry lists. Emits the
/// `"Expected } to close <SECTION> section"` diagnostic on EOF and routes
/// entry failures through entry-level recovery.
pub(crate) fn parse_section_entries<T>(
    p: &mut Parser,
    section: &str,
    mut entry: impl FnMut(&mut Parser) -> PResult<T>,
) -> Vec<T> {
    let mut out = Vec::new();
    if p.expect(TokenKind::LBrace).is_err() {
        return out;
    }
    let depth = p.brace_depth();
    loop {
        match p.kind() {
            TokenKind::RBrace => {
                p.advance();
                break;
            }
            TokenKind::Eof => {
                p.error(format!("Expected }} to close {section} section"));
                break;
            }
            TokenKind::LBrace => match entry(p) {
                Ok(item) => out.push(item),
                Err(Bail) => p.recover_entry(depth),
            },
            // A new section heading means this one was never closed;
            // synthesize the close and let the object body dispatch it.
            k if k.is_section_keyword() => {
                p.error(format!("Expected }} to close {section} section"));
                break;
            }
            _ => {
                p.error(format!(
                    "Unexpected token in {section} section: {}",
                    p.display()
                ));
                p.recover_entry(depth);
            }
        }
    }
    out
}
