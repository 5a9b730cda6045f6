//! Table-section parsers: FIELDS, KEYS, and FIELDGROUPS.
//!
//! Entries are brace-delimited tuples of semicolon-separated columns.
//! Name columns are rejoined from raw tokens so unquoted names with
//! embedded punctuation (`No.`, `Bill-to City`) survive.

use cal_common::token::{Token, TokenKind};

use crate::ast::{FieldDecl, FieldGroupDecl, KeyDecl};

use super::{code, join_tokens, parse_section_entries, properties, Bail, PResult, Parser};

pub(crate) fn parse_fields_section(p: &mut Parser) -> Vec<FieldDecl> {
    parse_section_entries(p, "FIELDS", parse_field_entry)
}

pub(crate) fn parse_keys_section(p: &mut Parser) -> Vec<KeyDecl> {
    parse_section_entries(p, "KEYS", parse_key_entry)
}

pub(crate) fn parse_field_groups_section(p: &mut Parser) -> Vec<FieldGroupDecl> {
    parse_section_entries(p, "FIELDGROUPS", parse_field_group_entry)
}

/// `{ id ; <legacy> ; name ; datatype [; properties] }`
fn parse_field_entry(p: &mut Parser) -> PResult<FieldDecl> {
    let start = p.advance(); // {

    let id = if p.at(TokenKind::Int) {
        p.advance().text.parse().unwrap_or(0)
    } else {
        p.error(format!("Expected field number but found {}", p.display()));
        return Err(Bail);
    };
    p.expect(TokenKind::Semicolon)?;

    // Legacy second column; content (usually empty) is ignored.
    skip_column(p);
    p.expect(TokenKind::Semicolon)?;

    let name_tokens = collect_column_tokens(p);
    let name = column_text(&name_tokens);
    if name.is_empty() {
        p.error("Field name cannot be empty (in FIELDS section)");
        return Err(Bail);
    }
    p.expect(TokenKind::Semicolon)?;

    let data_type = code::parse_data_type(p)?;

    let properties = if p.eat(TokenKind::Semicolon).is_some() {
        Some(properties::parse_property_list(p))
    } else {
        None
    };
    p.expect(TokenKind::RBrace)?;

    Ok(FieldDecl {
        id,
        name,
        data_type,
        properties,
        start,
        end: p.prev().clone(),
    })
}

/// `{ <enabled> ; field,field ; properties }`
fn parse_key_entry(p: &mut Parser) -> PResult<KeyDecl> {
    let start = p.advance(); // {

    // Enabled flag column, usually empty.
    skip_column(p);
    p.expect(TokenKind::Semicolon)?;

    let fields = collect_name_list(p);

    let properties = if p.eat(TokenKind::Semicolon).is_some() {
        Some(properties::parse_property_list(p))
    } else {
        None
    };
    p.expect(TokenKind::RBrace)?;

    Ok(KeyDecl {
        fields,
        properties,
        start,
        end: p.prev().clone(),
    })
}

/// `{ id ; name ; field,field }`
fn parse_field_group_entry(p: &mut Parser) -> PResult<FieldGroupDecl> {
    let start = p.advance(); // {

    let id = if p.at(TokenKind::Int) {
        p.advance().text.parse().unwrap_or(0)
    } else {
        p.error(format!("Expected field group ID but found {}", p.display()));
        return Err(Bail);
    };
    p.expect(TokenKind::Semicolon)?;

    let name_tokens = collect_column_tokens(p);
    let name = column_text(&name_tokens);
    p.expect(TokenKind::Semicolon)?;

    let fields = collect_name_list(p);
    p.expect(TokenKind::RBrace)?;

    Ok(FieldGroupDecl {
        id,
        name,
        fields,
        start,
        end: p.prev().clone(),
    })
}

// ── Column helpers ─────────────────────────────────────────────────────

/// Consume a column's tokens without keeping them.
fn skip_column(p: &mut Parser) {
    while !matches!(
        p.kind(),
        TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
    ) {
        p.advance();
    }
}

/// Collect a column's tokens up to `;`, `}`, or EOF.
pub(crate) fn collect_column_tokens(p: &mut Parser) -> Vec<Token> {
    let mut out = Vec::new();
    while !matches!(
        p.kind(),
        TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
    ) {
        out.push(p.advance());
    }
    out
}

/// Render a column: a lone quoted identifier yields its inner name,
/// anything else is rejoined verbatim.
pub(crate) fn column_text(tokens: &[Token]) -> String {
    if tokens.len() == 1 && tokens[0].kind == TokenKind::QuotedIdent {
        tokens[0].text.clone()
    } else {
        join_tokens(tokens)
    }
}

/// A comma-separated name list column (`No.,Name`).
fn collect_name_list(p: &mut Parser) -> Vec<String> {
    let mut names = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    loop {
        match p.kind() {
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => break,
            TokenKind::Comma => {
                p.advance();
                if !current.is_empty() {
                    names.push(column_text(&current));
                    current.clear();
                }
            }
            _ => current.push(p.advance()),
        }
    }
    if !current.is_empty() {
        names.push(column_text(&current));
    }
    names
}
