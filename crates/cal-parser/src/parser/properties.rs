//! Property-list parsing, shared by sections, field entries, layout rows,
//! and element rows.
//!
//! A property is `Name=Value;`. Values are captured as raw text up to the
//! next `;` or `}` at nesting depth zero, so bracketed multi-language
//! values (`CaptionML=[ENU=x;ESP=y]`) and parenthesized formulas survive
//! intact. A value starting with `VAR` or `BEGIN` is an inline trigger
//! body and is parsed with the real statement parser instead.

use cal_common::token::{Token, TokenKind};

use crate::ast::{Property, PropertyList, TriggerDecl};

use super::{code, join_tokens, statements, Bail, PResult, Parser};

/// Parse a full `{ properties }` section body (PROPERTIES or
/// OBJECT-PROPERTIES). The caller has consumed the section keyword.
pub(crate) fn parse_property_section(p: &mut Parser, section: &str) -> PResult<PropertyList> {
    p.expect(TokenKind::LBrace)?;
    let list = parse_property_list(p);
    if p.eat(TokenKind::RBrace).is_none() {
        p.error(format!("Expected }} to close {section} section"));
    }
    Ok(list)
}

/// Parse properties until the owning `}` (not consumed) or EOF.
pub(crate) fn parse_property_list(p: &mut Parser) -> PropertyList {
    let start = p.current().clone();
    let owner_depth = p.brace_depth();
    let mut properties: Vec<Property> = Vec::new();
    let mut triggers: Vec<TriggerDecl> = Vec::new();

    loop {
        while p.eat(TokenKind::Semicolon).is_some() {}
        if p.at(TokenKind::RBrace) || p.at_eof() {
            break;
        }
        // A section heading (not followed by `=`) means the property
        // block was never closed; stop so the object body can resume.
        if p.kind().is_section_keyword() && p.nth_kind(1) != TokenKind::Eq {
            break;
        }

        if !p.kind().is_word() {
            p.error(format!("Expected property name but found {}", p.display()));
            p.recover_property(owner_depth);
            continue;
        }
        // Property names may span words (`Version List=...`).
        let name_token = p.advance();
        let mut name_tokens = vec![name_token.clone()];
        while p.kind().is_word() {
            name_tokens.push(p.advance());
        }
        let name = join_tokens(&name_tokens);

        if p.eat(TokenKind::Eq).is_none() {
            p.error(format!("Expected = after property name but found {}", p.display()));
            p.recover_property(owner_depth);
            continue;
        }

        if p.at(TokenKind::Var) || p.at(TokenKind::Begin) {
            match parse_trigger_value(p, name, name_token) {
                Ok(trigger) => triggers.push(trigger),
                Err(Bail) => p.recover_property(owner_depth),
            }
            p.eat(TokenKind::Semicolon);
        } else {
            let value_tokens = collect_value_tokens(p);
            let end = value_tokens.last().cloned().unwrap_or_else(|| name_token.clone());
            properties.push(Property {
                name,
                value: join_tokens(&value_tokens),
                start: name_token,
                end,
            });
        }
    }

    // An empty list consumes nothing; keep start <= end.
    let prev = p.prev().clone();
    let end = if prev.span.start < start.span.start {
        start.clone()
    } else {
        prev
    };
    PropertyList {
        properties,
        triggers,
        start,
        end,
    }
}

/// Collect raw value tokens up to the terminating `;` (consumed) or the
/// owning `}` (left in place), tracking bracket/brace/paren nesting so
/// embedded separators stay inside the value.
fn collect_value_tokens(p: &mut Parser) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut depth = 0i32;
    loop {
        match p.kind() {
            TokenKind::Eof => break,
            TokenKind::Semicolon if depth == 0 => {
                p.advance();
                break;
            }
            TokenKind::RBrace if depth == 0 => break,
            TokenKind::LBracket | TokenKind::LBrace | TokenKind::LParen => {
                depth += 1;
                tokens.push(p.advance());
            }
            TokenKind::RBracket | TokenKind::RBrace | TokenKind::RParen => {
                // Stray closers at depth zero stay plain tokens; the
                // depth-zero RBrace arm above already stopped for the
                // owning brace.
                if depth > 0 {
                    depth -= 1;
                }
                tokens.push(p.advance());
            }
            _ => tokens.push(p.advance()),
        }
    }
    tokens
}

/// Parse an inline trigger body: `[VAR decls] BEGIN statements END`.
pub(crate) fn parse_trigger_value(
    p: &mut Parser,
    name: String,
    start: Token,
) -> PResult<TriggerDecl> {
    let variables = if p.at(TokenKind::Var) {
        code::parse_var_block(p)
    } else {
        Vec::new()
    };
    p.expect(TokenKind::Begin)?;
    let body = statements::parse_statement_list(p, &[TokenKind::End]);
    p.expect(TokenKind::End)?;
    Ok(TriggerDecl {
        name,
        variables,
        body,
        start,
        end: p.prev().clone(),
    })
}
