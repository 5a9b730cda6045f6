//! Layout-section parsers: CONTROLS, ACTIONS, and XMLport ELEMENTS.
//!
//! Rows arrive flat, tagged with an indent level; the shared
//! [`crate::indent::build_forest`] stack algorithm turns them into the
//! parent/child forest. Unknown kind lexemes fall back to a canonical
//! default with the original text preserved in the `raw_*` field.

use cal_common::token::TokenKind;

use crate::ast::{
    ActionDecl, ActionKind, ControlDecl, ControlKind, ElementDecl, ElementNodeType,
    ElementSourceType,
};
use crate::indent::build_forest;

use super::{join_tokens, parse_section_entries, properties, tables, PResult, Parser};

pub(crate) fn parse_controls_section(p: &mut Parser) -> Vec<ControlDecl> {
    let rows = parse_section_entries(p, "CONTROLS", parse_control_entry);
    build_forest(rows)
}

pub(crate) fn parse_actions_section(p: &mut Parser) -> Vec<ActionDecl> {
    let rows = parse_section_entries(p, "ACTIONS", parse_action_entry);
    build_forest(rows)
}

pub(crate) fn parse_elements_section(p: &mut Parser) -> Vec<ElementDecl> {
    let rows = parse_section_entries(p, "ELEMENTS", parse_element_entry);
    build_forest(rows)
}

/// `{ id ; indent ; kind [; properties] }`
fn parse_control_entry(p: &mut Parser) -> PResult<ControlDecl> {
    let start = p.advance(); // {

    let id = parse_row_id(p, "control")?;
    p.expect(TokenKind::Semicolon)?;
    let indent_level = parse_indent(p);
    p.expect(TokenKind::Semicolon)?;

    let (kind, raw_kind) = if p.kind().is_word() {
        let token = p.advance();
        match ControlKind::from_str(&token.text) {
            Some(kind) => (kind, None),
            None => (ControlKind::Field, Some(token.text)),
        }
    } else {
        (ControlKind::Field, None)
    };

    let properties = if p.eat(TokenKind::Semicolon).is_some() {
        Some(properties::parse_property_list(p))
    } else {
        None
    };
    p.expect(TokenKind::RBrace)?;

    Ok(ControlDecl {
        id,
        indent_level,
        kind,
        raw_kind,
        children: Vec::new(),
        properties,
        start,
        end: p.prev().clone(),
    })
}

/// `{ id ; indent ; kind [; properties] }`
fn parse_action_entry(p: &mut Parser) -> PResult<ActionDecl> {
    let start = p.advance(); // {

    let id = parse_row_id(p, "action")?;
    p.expect(TokenKind::Semicolon)?;
    let indent_level = parse_indent(p);
    p.expect(TokenKind::Semicolon)?;

    let (kind, raw_kind) = if p.kind().is_word() {
        let token = p.advance();
        match ActionKind::from_str(&token.text) {
            Some(kind) => (kind, None),
            None => (ActionKind::Action, Some(token.text)),
        }
    } else {
        (ActionKind::Action, None)
    };

    let properties = if p.eat(TokenKind::Semicolon).is_some() {
        Some(properties::parse_property_list(p))
    } else {
        None
    };
    p.expect(TokenKind::RBrace)?;

    Ok(ActionDecl {
        id,
        indent_level,
        kind,
        raw_kind,
        children: Vec::new(),
        properties,
        start,
        end: p.prev().clone(),
    })
}

/// `{ [{guid}] ; indent ; name ; nodetype ; sourcetype [; properties] }`
fn parse_element_entry(p: &mut Parser) -> PResult<ElementDecl> {
    let start = p.advance(); // {

    let guid = parse_guid_column(p)?;
    p.expect(TokenKind::Semicolon)?;
    let indent_level = parse_indent(p);
    p.expect(TokenKind::Semicolon)?;

    let name_tokens = tables::collect_column_tokens(p);
    let name = tables::column_text(&name_tokens);
    p.expect(TokenKind::Semicolon)?;

    let (node_type, raw_node_type) = if p.kind().is_word() {
        let token = p.advance();
        match ElementNodeType::from_str(&token.text) {
            Some(node_type) => (node_type, None),
            None => (ElementNodeType::Element, Some(token.text)),
        }
    } else {
        (ElementNodeType::Element, None)
    };

    let (source_type, raw_source_type) = if p.eat(TokenKind::Semicolon).is_some() {
        if p.kind().is_word() {
            let token = p.advance();
            match ElementSourceType::from_str(&token.text) {
                Some(source_type) => (source_type, None),
                None => (ElementSourceType::Text, Some(token.text)),
            }
        } else {
            (ElementSourceType::Text, None)
        }
    } else {
        (ElementSourceType::Text, None)
    };

    let properties = if p.eat(TokenKind::Semicolon).is_some() {
        Some(properties::parse_property_list(p))
    } else {
        None
    };
    p.expect(TokenKind::RBrace)?;

    Ok(ElementDecl {
        guid,
        indent_level,
        name,
        node_type,
        raw_node_type,
        source_type,
        raw_source_type,
        children: Vec::new(),
        properties,
        start,
        end: p.prev().clone(),
    })
}

// ── Row helpers ────────────────────────────────────────────────────────

fn parse_row_id(p: &mut Parser, what: &str) -> PResult<u32> {
    if p.at(TokenKind::Int) {
        Ok(p.advance().text.parse().unwrap_or(0))
    } else {
        p.error(format!("Expected {what} ID but found {}", p.display()));
        Err(super::Bail)
    }
}

/// The indent column: an integer, or empty (defaults to 0).
fn parse_indent(p: &mut Parser) -> u32 {
    if p.at(TokenKind::Int) {
        p.advance().text.parse().unwrap_or(0)
    } else {
        0
    }
}

/// The optional GUID column: `{...}` in brackets, or brace-bare, or
/// empty. The nested braces are tracked by the parser's depth counter so
/// they never read as the section close.
fn parse_guid_column(p: &mut Parser) -> PResult<Option<String>> {
    let bracketed = p.eat(TokenKind::LBracket).is_some();
    let guid = if p.at(TokenKind::LBrace) {
        p.advance();
        let mut tokens = Vec::new();
        let mut depth = 1i32;
        loop {
            match p.kind() {
                TokenKind::Eof => {
                    p.error("Expected } to close GUID");
                    break;
                }
                TokenKind::LBrace => {
                    depth += 1;
                    tokens.push(p.advance());
                }
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        p.advance();
                        break;
                    }
                    tokens.push(p.advance());
                }
                _ => tokens.push(p.advance()),
            }
        }
        Some(join_tokens(&tokens))
    } else {
        None
    };
    if bracketed {
        p.expect(TokenKind::RBracket)?;
    }
    Ok(guid)
}
