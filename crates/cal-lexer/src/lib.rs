//! C/AL lexer -- tokenizer for the C/AL object definition language.
//!
//! The lexer is total and infallible: every input produces a token stream
//! ending in exactly one `Eof` token, with stray bytes collected into
//! `Unknown` tokens rather than aborting. Whitespace and `//` line comments
//! are skipped and never emitted.
//!
//! The one genuinely ambiguous decision is the apostrophe: `'` opens a
//! string literal only when the immediately preceding character is not an
//! identifier character; otherwise it continues the current identifier run
//! (`John's` is a single identifier). This falls out of the scan order:
//! the identifier scanner swallows embedded apostrophes, so a `'` that
//! reaches top-level dispatch is by construction at a token start.

mod cursor;

use cal_common::token::{keyword_from_str, Token, TokenKind};
use cal_common::Span;
use cursor::Cursor;

/// The C/AL lexer. Converts source text into a stream of tokens.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
        }
    }

    /// Tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector always ends with the `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Produce the next token.
    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.start_mark();

        let Some(c) = self.cursor.peek() else {
            return self.token_from(TokenKind::Eof, String::new(), start);
        };

        match c {
            // ── Single-character punctuation ───────────────────────────
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            '.' => self.single_char_token(TokenKind::Dot, start),
            '@' => self.single_char_token(TokenKind::At, start),
            '=' => self.single_char_token(TokenKind::Eq, start),
            '?' => self.single_char_token(TokenKind::Question, start),

            // ── Multi-character operators ──────────────────────────────
            ':' => self.lex_colon(start),
            '<' => self.lex_lt(start),
            '>' => self.lex_gt(start),
            '+' => self.lex_compound_assign(TokenKind::Plus, TokenKind::PlusAssign, start),
            '-' => self.lex_compound_assign(TokenKind::Minus, TokenKind::MinusAssign, start),
            '*' => self.lex_compound_assign(TokenKind::Star, TokenKind::StarAssign, start),
            '/' => self.lex_compound_assign(TokenKind::Slash, TokenKind::SlashAssign, start),

            // ── Literals and words ─────────────────────────────────────
            '0'..='9' => self.lex_number(start),
            '\'' => self.lex_string(start),
            '"' => self.lex_quoted_ident(start),
            c if is_ident_start(c) => self.lex_word(start),

            // ── Stray bytes ────────────────────────────────────────────
            _ => self.lex_unknown_run(start),
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// Skip whitespace and `//` line comments; neither is emitted.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_while(|c| c.is_whitespace());
            if self.cursor.peek() == Some('/') && self.cursor.peek_next() == Some('/') {
                self.cursor.eat_while(|c| c != '\n');
                continue;
            }
            break;
        }
    }

    /// Capture the (offset, line, column) triple at the start of a token.
    fn start_mark(&self) -> (u32, u32, u32) {
        (self.cursor.pos(), self.cursor.line(), self.cursor.column())
    }

    /// Build a token from an explicit text, spanning from `start` to the
    /// current cursor position.
    fn token_from(&self, kind: TokenKind, text: String, start: (u32, u32, u32)) -> Token {
        let (offset, line, column) = start;
        Token::new(kind, text, line, column, Span::new(offset, self.cursor.pos()))
    }

    /// Build a token whose text is the raw source slice from `start`.
    fn token_sliced(&self, kind: TokenKind, start: (u32, u32, u32)) -> Token {
        let text = self.cursor.slice(start.0, self.cursor.pos()).to_string();
        self.token_from(kind, text, start)
    }

    /// Consume one character and return a token of the given kind.
    fn single_char_token(&mut self, kind: TokenKind, start: (u32, u32, u32)) -> Token {
        self.cursor.advance();
        self.token_sliced(kind, start)
    }

    // ── Operator lexing ────────────────────────────────────────────────

    /// `:` -> `Colon`, `::` -> `ColonColon`, `:=` -> `Assign`
    fn lex_colon(&mut self, start: (u32, u32, u32)) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some(':') => {
                self.cursor.advance();
                self.token_sliced(TokenKind::ColonColon, start)
            }
            Some('=') => {
                self.cursor.advance();
                self.token_sliced(TokenKind::Assign, start)
            }
            _ => self.token_sliced(TokenKind::Colon, start),
        }
    }

    /// `<` -> `Lt`, `<=` -> `LtEq`, `<>` -> `Neq`
    fn lex_lt(&mut self, start: (u32, u32, u32)) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('=') => {
                self.cursor.advance();
                self.token_sliced(TokenKind::LtEq, start)
            }
            Some('>') => {
                self.cursor.advance();
                self.token_sliced(TokenKind::Neq, start)
            }
            _ => self.token_sliced(TokenKind::Lt, start),
        }
    }

    /// `>` -> `Gt`, `>=` -> `GtEq`
    fn lex_gt(&mut self, start: (u32, u32, u32)) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            self.token_sliced(TokenKind::GtEq, start)
        } else {
            self.token_sliced(TokenKind::Gt, start)
        }
    }

    /// An arithmetic operator, or its compound-assign form when followed
    /// by `=` (`+` -> `Plus`, `+=` -> `PlusAssign`).
    fn lex_compound_assign(
        &mut self,
        plain: TokenKind,
        compound: TokenKind,
        start: (u32, u32, u32),
    ) -> Token {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            self.token_sliced(compound, start)
        } else {
            self.token_sliced(plain, start)
        }
    }

    // ── Literal lexing ─────────────────────────────────────────────────

    /// Integer or decimal literal. `12.5` is a single `Decimal` token;
    /// `12.` or `12..` leaves the dot(s) for the next token.
    fn lex_number(&mut self, start: (u32, u32, u32)) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance(); // '.'
            self.cursor.eat_while(|c| c.is_ascii_digit());
            self.token_sliced(TokenKind::Decimal, start)
        } else {
            self.token_sliced(TokenKind::Int, start)
        }
    }

    /// Single-quoted string literal. `''` is an escaped apostrophe. The
    /// stored text is the inner content with escapes resolved. Strings do
    /// not span lines; an unterminated string ends at the newline or EOF.
    fn lex_string(&mut self, start: (u32, u32, u32)) -> Token {
        self.cursor.advance(); // opening '
        let mut text = String::new();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => break,
                Some('\'') => {
                    self.cursor.advance();
                    if self.cursor.peek() == Some('\'') {
                        self.cursor.advance();
                        text.push('\'');
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    self.cursor.advance();
                    text.push(c);
                }
            }
        }
        self.token_from(TokenKind::Str, text, start)
    }

    /// Double-quoted identifier, e.g. `"No."`. `""` is an escaped quote.
    /// The stored text is the inner name.
    fn lex_quoted_ident(&mut self, start: (u32, u32, u32)) -> Token {
        self.cursor.advance(); // opening "
        let mut text = String::new();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => break,
                Some('"') => {
                    self.cursor.advance();
                    if self.cursor.peek() == Some('"') {
                        self.cursor.advance();
                        text.push('"');
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    self.cursor.advance();
                    text.push(c);
                }
            }
        }
        self.token_from(TokenKind::QuotedIdent, text, start)
    }

    /// Identifier or structural keyword. The continuation set includes
    /// digits (compound type lexemes like `Text50` stay one token) and
    /// apostrophes (`John's` stays one token).
    fn lex_word(&mut self, start: (u32, u32, u32)) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start.0, self.cursor.pos());
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        self.token_sliced(kind, start)
    }

    /// A maximal run of bytes that begin no recognized token.
    fn lex_unknown_run(&mut self, start: (u32, u32, u32)) -> Token {
        while let Some(c) = self.cursor.peek() {
            if is_recognized_start(c) {
                break;
            }
            self.cursor.advance();
        }
        self.token_sliced(TokenKind::Unknown, start)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

/// Whether a character may start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Whether a character may continue an identifier run. Embedded
/// apostrophes continue the run; a `'` preceded by a non-identifier
/// character never reaches this predicate and opens a string instead.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}

/// Whether a character begins any recognized token. Used to bound
/// `Unknown` runs.
fn is_recognized_start(c: char) -> bool {
    c.is_whitespace()
        || c.is_ascii_digit()
        || is_ident_start(c)
        || matches!(
            c,
            '(' | ')' | '{' | '}' | '[' | ']' | ';' | ',' | '.' | '@' | '=' | '?' | ':' | '<'
                | '>' | '+' | '-' | '*' | '/' | '\'' | '"'
        )
}
