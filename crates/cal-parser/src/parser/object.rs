//! Object header parsing and section dispatch.

use cal_common::token::{al_only_keyword, Token, TokenKind};

use crate::ast::{ObjectDecl, ObjectKind};
use crate::error::codes;
use crate::sanitize::token_display;

use super::{code, layout, properties, tables, Parser, Sync};

/// Parse the document: leading garbage is reported and skipped, then the
/// first `OBJECT` declaration (if any) is parsed.
pub(crate) fn parse_document(p: &mut Parser) -> Option<ObjectDecl> {
    loop {
        match p.kind() {
            TokenKind::Eof => return None,
            TokenKind::Object => return parse_object(p),
            k if k.is_word() => {
                let text = p.current().text.clone();
                if let Some(kw) = al_only_keyword(&text) {
                    p.error_with_code(
                        format!("AL-only keyword '{kw}' not supported in C/AL"),
                        codes::AL_ONLY_KEYWORD,
                    );
                    p.advance();
                } else {
                    p.error(format!("Expected OBJECT declaration but found {}", p.display()));
                    recover_to_object(p);
                }
            }
            _ => {
                p.error(format!("Expected OBJECT declaration but found {}", p.display()));
                recover_to_object(p);
            }
        }
    }
}

fn recover_to_object(p: &mut Parser) {
    p.recover_until(|p| match p.kind() {
        TokenKind::Object => Some(Sync::StopBefore),
        _ => None,
    });
}

/// Parse `OBJECT <Kind> <Id> <Name> { sections }`.
fn parse_object(p: &mut Parser) -> Option<ObjectDecl> {
    let start = p.advance(); // OBJECT

    let kind = if p.kind().is_word() {
        let token = p.advance();
        match ObjectKind::from_str(&token.text) {
            Some(kind) => kind,
            None => {
                p.error_at(
                    format!("Unknown object kind {}", token_display(&token)),
                    &token,
                    None,
                );
                return None;
            }
        }
    } else {
        p.error(format!("Expected object kind but found {}", p.display()));
        return None;
    };

    let id = if p.at(TokenKind::Int) {
        p.advance().text.parse().unwrap_or(0)
    } else {
        p.error(format!("Expected object ID but found {}", p.display()));
        // Synthesize id 0 and resume at the object body.
        p.recover_until(|p| match p.kind() {
            TokenKind::LBrace => Some(Sync::StopBefore),
            _ => None,
        });
        0
    };

    let name = parse_object_name(p);
    if name.is_empty() && !p.at_eof() {
        p.error(format!("Expected object name but found {}", p.display()));
    }

    let mut object = ObjectDecl {
        kind,
        id,
        name,
        object_properties: None,
        properties: None,
        fields: None,
        keys: None,
        field_groups: None,
        controls: None,
        actions: None,
        elements: None,
        code: None,
        start: start.clone(),
        end: start,
    };

    if !p.at(TokenKind::LBrace) {
        p.error(format!("Expected {{ but found {}", p.display()));
        p.recover_until(|p| match p.kind() {
            TokenKind::LBrace => Some(Sync::StopBefore),
            _ => None,
        });
    }
    if p.at(TokenKind::LBrace) {
        p.advance();
        parse_object_body(p, &mut object);
    }
    object.end = p.prev().clone();
    Some(object)
}

/// The object name: a quoted identifier, or a run of bare tokens up to
/// the `{` (`OBJECT Table 36 Sales Header`), rejoined with original
/// spacing.
fn parse_object_name(p: &mut Parser) -> String {
    if p.at(TokenKind::QuotedIdent) {
        return p.advance().text;
    }
    let mut tokens: Vec<Token> = Vec::new();
    loop {
        match p.kind() {
            k if k.is_word() => tokens.push(p.advance()),
            TokenKind::Int | TokenKind::Decimal | TokenKind::Dot | TokenKind::Minus
            | TokenKind::Slash => tokens.push(p.advance()),
            _ => break,
        }
    }
    super::join_tokens(&tokens)
}

/// Whether a section keyword is compatible with an object kind. The
/// parser never populates a section outside this matrix; notably Query
/// ELEMENTS entries have a different shape and are not XMLport elements.
fn section_allowed(kind: ObjectKind, section: TokenKind) -> bool {
    match section {
        TokenKind::Properties | TokenKind::Code => true,
        TokenKind::Fields | TokenKind::Keys | TokenKind::FieldGroups => {
            kind == ObjectKind::Table
        }
        TokenKind::Controls | TokenKind::Actions => kind == ObjectKind::Page,
        TokenKind::Elements => kind == ObjectKind::XmlPort,
        _ => false,
    }
}

fn section_name(section: TokenKind) -> &'static str {
    match section {
        TokenKind::Properties => "PROPERTIES",
        TokenKind::Fields => "FIELDS",
        TokenKind::Keys => "KEYS",
        TokenKind::FieldGroups => "FIELDGROUPS",
        TokenKind::Controls => "CONTROLS",
        TokenKind::Actions => "ACTIONS",
        TokenKind::Elements => "ELEMENTS",
        TokenKind::Code => "CODE",
        _ => "OBJECT",
    }
}

fn parse_object_body(p: &mut Parser, object: &mut ObjectDecl) {
    let body_depth = p.brace_depth();
    loop {
        match p.kind() {
            TokenKind::RBrace => {
                p.advance();
                break;
            }
            TokenKind::Eof => {
                p.error("Expected } to close object body");
                break;
            }
            // OBJECT-PROPERTIES is the token run `OBJECT` `-` `PROPERTIES`.
            TokenKind::Object
                if p.nth_kind(1) == TokenKind::Minus
                    && p.nth_kind(2) == TokenKind::Properties =>
            {
                p.advance();
                p.advance();
                p.advance();
                match properties::parse_property_section(p, "OBJECT-PROPERTIES") {
                    Ok(list) => object.object_properties = Some(list),
                    Err(_) => p.recover_section(body_depth),
                }
            }
            k if k.is_section_keyword() => {
                if !section_allowed(object.kind, k) {
                    p.error(format!(
                        "{} section is not valid in a {} object",
                        section_name(k),
                        object.kind.name()
                    ));
                    p.advance();
                    p.recover_section(body_depth);
                    continue;
                }
                dispatch_section(p, object, k, body_depth);
            }
            k if k.is_word() => {
                let text = p.current().text.clone();
                if let Some(kw) = al_only_keyword(&text) {
                    p.error_with_code(
                        format!("AL-only keyword '{kw}' not supported in C/AL"),
                        codes::AL_ONLY_KEYWORD,
                    );
                    p.advance();
                    p.recover_section(body_depth);
                } else {
                    p.error(format!("Unknown section {}", p.display()));
                    p.recover_section(body_depth);
                }
            }
            _ => {
                p.error(format!("Unexpected token in object body: {}", p.display()));
                p.recover_section(body_depth);
            }
        }
    }
}

fn dispatch_section(p: &mut Parser, object: &mut ObjectDecl, section: TokenKind, body_depth: i32) {
    match section {
        TokenKind::Properties => {
            p.advance();
            match properties::parse_property_section(p, "PROPERTIES") {
                Ok(list) => object.properties = Some(list),
                Err(_) => p.recover_section(body_depth),
            }
        }
        TokenKind::Fields => {
            p.advance();
            object.fields = Some(tables::parse_fields_section(p));
        }
        TokenKind::Keys => {
            p.advance();
            object.keys = Some(tables::parse_keys_section(p));
        }
        TokenKind::FieldGroups => {
            p.advance();
            object.field_groups = Some(tables::parse_field_groups_section(p));
        }
        TokenKind::Controls => {
            p.advance();
            object.controls = Some(layout::parse_controls_section(p));
        }
        TokenKind::Actions => {
            p.advance();
            object.actions = Some(layout::parse_actions_section(p));
        }
        TokenKind::Elements => {
            p.advance();
            object.elements = Some(layout::parse_elements_section(p));
        }
        TokenKind::Code => {
            let keyword = p.advance();
            match code::parse_code_section(p, keyword) {
                Ok(section) => object.code = Some(section),
                Err(_) => p.recover_section(body_depth),
            }
        }
        _ => unreachable!("dispatch_section called for non-section keyword"),
    }
}
