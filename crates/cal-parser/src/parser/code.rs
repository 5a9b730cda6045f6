//! CODE-section parsing: global VAR blocks, procedures, object triggers,
//! type expressions, and parameter lists.
//!
//! The context-sensitive identifier rule lives here: declaration names are
//! accepted by lexical shape (any word-shaped token), then rejected only
//! when the shape is a reserved structural keyword. Type names and
//! AL-only words are therefore legal names.

use cal_common::token::{al_only_keyword, Token, TokenKind};

use crate::ast::{
    CodeSection, DataType, ParameterDecl, ProcedureDecl, TriggerDecl, VariableDecl,
};
use crate::error::codes;
use crate::sanitize::token_display;

use super::{join_tokens, statements, Bail, PResult, Parser, Sync};

/// Parse `CODE { ... }`. The caller has consumed the `CODE` keyword.
pub(crate) fn parse_code_section(p: &mut Parser, keyword: Token) -> PResult<CodeSection> {
    p.expect(TokenKind::LBrace)?;
    let depth = p.brace_depth();

    let mut section = CodeSection {
        variables: Vec::new(),
        procedures: Vec::new(),
        triggers: Vec::new(),
        body: None,
        start: keyword,
        end: p.prev().clone(),
    };
    let mut attributes: Vec<String> = Vec::new();

    loop {
        match p.kind() {
            TokenKind::RBrace => {
                p.advance();
                break;
            }
            TokenKind::Eof => {
                p.error("Expected } to close CODE section");
                break;
            }
            TokenKind::Var => section.variables.extend(parse_var_block(p)),
            TokenKind::LBracket => attributes.push(parse_attribute(p)),
            TokenKind::Procedure => {
                let start = p.current().clone();
                match parse_procedure(p, false, std::mem::take(&mut attributes), start) {
                    Ok(proc) => section.procedures.push(proc),
                    Err(Bail) => recover_code_item(p, depth),
                }
            }
            TokenKind::Local => {
                let start = p.advance();
                if p.at(TokenKind::Procedure) {
                    match parse_procedure(p, true, std::mem::take(&mut attributes), start) {
                        Ok(proc) => section.procedures.push(proc),
                        Err(Bail) => recover_code_item(p, depth),
                    }
                } else {
                    p.error(format!("Expected PROCEDURE after LOCAL but found {}", p.display()));
                    recover_code_item(p, depth);
                }
            }
            TokenKind::Trigger => match parse_trigger_decl(p) {
                Ok(trigger) => section.triggers.push(trigger),
                Err(Bail) => recover_code_item(p, depth),
            },
            TokenKind::Begin => {
                // Object-level body, terminated `END.`
                p.advance();
                let body = statements::parse_statement_list(p, &[TokenKind::End]);
                if p.eat(TokenKind::End).is_none() {
                    p.error(format!("Expected END but found {}", p.display()));
                }
                p.eat(TokenKind::Dot);
                p.eat(TokenKind::Semicolon);
                section.body = Some(body);
            }
            // A section heading inside CODE means the section was never
            // closed; synthesize the close and hand back to the object.
            k if k.is_section_keyword() => {
                p.error("Expected } to close CODE section");
                break;
            }
            k if k.is_word() => {
                let text = p.current().text.clone();
                if let Some(kw) = al_only_keyword(&text) {
                    p.error_with_code(
                        format!("AL-only keyword '{kw}' not supported in C/AL"),
                        codes::AL_ONLY_KEYWORD,
                    );
                    p.advance();
                    // `INTERNAL PROCEDURE ...` resumes at PROCEDURE.
                } else {
                    p.error(format!("Unexpected token in CODE section: {}", p.display()));
                    recover_code_item(p, depth);
                }
            }
            _ => {
                p.error(format!("Unexpected token in CODE section: {}", p.display()));
                recover_code_item(p, depth);
            }
        }
    }

    section.end = p.prev().clone();
    Ok(section)
}

/// Synchronize to the next declaration starter or the section close.
fn recover_code_item(p: &mut Parser, depth: i32) {
    p.recover_until(|p| {
        if p.brace_depth() < depth {
            return Some(Sync::StopBefore);
        }
        if p.brace_depth() > depth {
            return None;
        }
        match p.kind() {
            TokenKind::Var
            | TokenKind::Procedure
            | TokenKind::Local
            | TokenKind::Trigger
            | TokenKind::Begin
            | TokenKind::LBracket
            | TokenKind::RBrace => Some(Sync::StopBefore),
            k if k.is_section_keyword() => Some(Sync::StopBefore),
            _ => None,
        }
    });
}

/// `[Bracketed]` attribute line; returns the inner text.
fn parse_attribute(p: &mut Parser) -> String {
    p.advance(); // [
    let mut tokens: Vec<Token> = Vec::new();
    loop {
        match p.kind() {
            TokenKind::RBracket => {
                p.advance();
                break;
            }
            TokenKind::Eof => {
                p.error("Expected ] to close attribute");
                break;
            }
            _ => tokens.push(p.advance()),
        }
    }
    join_tokens(&tokens)
}

/// Parse a VAR block: the keyword plus zero or more declarations.
pub(crate) fn parse_var_block(p: &mut Parser) -> Vec<VariableDecl> {
    p.advance(); // VAR
    let mut out = Vec::new();
    loop {
        match p.kind() {
            TokenKind::Begin
            | TokenKind::Procedure
            | TokenKind::Local
            | TokenKind::Trigger
            | TokenKind::Var
            | TokenKind::RBrace
            | TokenKind::Eof => break,
            k if k.is_section_keyword() => break,
            k if k.is_word() => match parse_var_decl(p) {
                Ok(decl) => out.push(decl),
                Err(Bail) => p.recover_var_decl(),
            },
            _ => {
                p.error(format!(
                    "Expected variable declaration but found {}",
                    p.display()
                ));
                p.recover_var_decl();
            }
        }
    }
    out
}

/// One declaration: `Name[@n] : [TEMPORARY] Type [SECURITYFILTERING(...)] ;`
fn parse_var_decl(p: &mut Parser) -> PResult<VariableDecl> {
    let name_token = p.advance();
    if name_token.kind.is_reserved_name() {
        p.error_at(
            format!(
                "Cannot use reserved keyword '{}' as a variable name",
                token_display(&name_token)
            ),
            &name_token,
            Some(codes::RESERVED_KEYWORD),
        );
        return Err(Bail);
    }
    let name = name_token.text.clone();
    eat_auto_number(p);
    p.expect(TokenKind::Colon)?;

    let is_temporary = if p.at_word("TEMPORARY") {
        p.advance();
        true
    } else {
        false
    };
    let data_type = parse_data_type(p)?;
    let security_filtering = parse_security_filtering(p)?;
    let dimensions = data_type.dimensions.clone();

    if p.eat(TokenKind::Semicolon).is_none() {
        p.error(format!(
            "Expected ; after variable declaration but found {}",
            p.display()
        ));
    }
    Ok(VariableDecl {
        name,
        data_type,
        is_temporary,
        security_filtering,
        dimensions,
        start: name_token,
        end: p.prev().clone(),
    })
}

/// Consume and discard an `@n` auto-numbering suffix.
fn eat_auto_number(p: &mut Parser) {
    if p.at(TokenKind::At) {
        p.advance();
        p.eat(TokenKind::Int);
    }
}

/// `SECURITYFILTERING(Filtered)` tail, if present.
fn parse_security_filtering(p: &mut Parser) -> PResult<Option<String>> {
    if !p.at_word("SECURITYFILTERING") {
        return Ok(None);
    }
    p.advance();
    p.expect(TokenKind::LParen)?;
    let value = if p.kind().is_word() {
        p.advance().text
    } else {
        p.error(format!(
            "Expected identifier in SECURITYFILTERING but found {}",
            p.display()
        ));
        String::new()
    };
    p.expect(TokenKind::RParen)?;
    Ok(Some(value))
}

/// Parse a type expression into a syntactic [`DataType`].
///
/// `type_name` keeps the raw lexeme text (`"Record 2000000001"` stays
/// compound); the structured fields are set only for components the
/// lexeme actually carries. Decomposition of embedded-digit names like
/// `Text50` is the semantic resolver's job, not ours.
pub(crate) fn parse_data_type(p: &mut Parser) -> PResult<DataType> {
    if p.at_word("ARRAY") {
        return parse_array_type(p);
    }

    if !p.kind().is_word() {
        p.error(format!("Expected type name but found {}", p.display()));
        return Err(Bail);
    }
    let name_token = p.advance();
    let start = name_token.clone();
    let mut type_name = name_token.text.clone();
    let mut length = None;
    let mut table_id = None;
    let mut option_string = None;

    match p.kind() {
        // `Record 18`, `Codeunit 80`, `Page 21` -- inline object id.
        TokenKind::Int => {
            let id_token = p.advance();
            table_id = id_token.text.parse().ok();
            type_name = join_tokens(&[name_token, id_token]);
        }
        // `Text[100]`, `Code[20]` -- bracketed length.
        TokenKind::LBracket => {
            p.advance();
            if p.at(TokenKind::Int) {
                length = p.advance().text.parse().ok();
            } else {
                p.error(format!("Expected length but found {}", p.display()));
                return Err(Bail);
            }
            p.expect(TokenKind::RBracket)?;
        }
        _ => {
            // `Option` may carry its value list inline.
            if type_name.eq_ignore_ascii_case("Option") {
                option_string = collect_option_values(p);
            }
        }
    }

    Ok(DataType {
        type_name,
        length,
        table_id,
        option_string,
        dimensions: None,
        start,
        end: p.prev().clone(),
    })
}

/// `ARRAY [n, n] OF BaseType`.
fn parse_array_type(p: &mut Parser) -> PResult<DataType> {
    let start = p.advance(); // ARRAY
    p.expect(TokenKind::LBracket)?;
    let mut dimensions: Vec<u32> = Vec::new();
    loop {
        if p.at(TokenKind::Int) {
            dimensions.push(p.advance().text.parse().unwrap_or(0));
        } else {
            p.error(format!("Expected array size but found {}", p.display()));
            return Err(Bail);
        }
        if p.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    p.expect(TokenKind::RBracket)?;
    p.expect(TokenKind::Of)?;
    let element = parse_data_type(p)?;

    let dims = dimensions
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",");
    Ok(DataType {
        type_name: format!("ARRAY [{dims}] OF {}", element.type_name),
        length: None,
        table_id: None,
        option_string: None,
        dimensions: Some(dimensions),
        start,
        end: element.end,
    })
}

/// Inline option values after `Option`: words, strings, and commas up to
/// the declaration terminator.
fn collect_option_values(p: &mut Parser) -> Option<String> {
    let mut tokens: Vec<Token> = Vec::new();
    loop {
        match p.kind() {
            TokenKind::Comma => tokens.push(p.advance()),
            TokenKind::Int | TokenKind::Str => tokens.push(p.advance()),
            k if k.is_word() => {
                // SECURITYFILTERING belongs to the declaration, not the list.
                if p.at_word("SECURITYFILTERING") {
                    break;
                }
                tokens.push(p.advance());
            }
            _ => break,
        }
    }
    if tokens.is_empty() {
        None
    } else {
        Some(join_tokens(&tokens))
    }
}

/// Parse `PROCEDURE Name@n(params) [: ReturnType]; [VAR ...] BEGIN ... END;`
/// `start` is the `LOCAL` or `PROCEDURE` token.
fn parse_procedure(
    p: &mut Parser,
    is_local: bool,
    attributes: Vec<String>,
    start: Token,
) -> PResult<ProcedureDecl> {
    p.advance(); // PROCEDURE

    if !p.kind().is_word() {
        p.error(format!("Expected procedure name but found {}", p.display()));
        return Err(Bail);
    }
    let name_token = p.advance();
    if name_token.kind.is_reserved_name() {
        p.error_at(
            format!(
                "Cannot use reserved keyword '{}' as a procedure name",
                token_display(&name_token)
            ),
            &name_token,
            Some(codes::RESERVED_KEYWORD),
        );
        return Err(Bail);
    }
    let name = name_token.text.clone();
    eat_auto_number(p);

    let parameters = if p.at(TokenKind::LParen) {
        parse_param_list(p)
    } else {
        Vec::new()
    };

    let return_type = if p.eat(TokenKind::Colon).is_some() {
        Some(parse_data_type(p)?)
    } else {
        None
    };
    if p.eat(TokenKind::Semicolon).is_none() {
        p.error(format!(
            "Expected ; after procedure signature but found {}",
            p.display()
        ));
    }

    let variables = if p.at(TokenKind::Var) {
        parse_var_block(p)
    } else {
        Vec::new()
    };

    p.expect(TokenKind::Begin)?;
    let body = statements::parse_statement_list(p, &[TokenKind::End]);
    if p.eat(TokenKind::End).is_none() {
        p.error(format!("Expected END but found {}", p.display()));
    }
    p.eat(TokenKind::Semicolon);

    Ok(ProcedureDecl {
        name,
        is_local,
        attributes,
        parameters,
        return_type,
        variables,
        body,
        start,
        end: p.prev().clone(),
    })
}

/// Object-level trigger: `TRIGGER Name@n(); [VAR ...] BEGIN ... END;`
fn parse_trigger_decl(p: &mut Parser) -> PResult<TriggerDecl> {
    let start = p.advance(); // TRIGGER

    if !p.kind().is_word() {
        p.error(format!("Expected trigger name but found {}", p.display()));
        return Err(Bail);
    }
    let name = p.advance().text;
    eat_auto_number(p);
    if p.at(TokenKind::LParen) {
        // Trigger parameter lists are parsed for recovery but not kept.
        parse_param_list(p);
    }
    p.eat(TokenKind::Semicolon);

    let variables = if p.at(TokenKind::Var) {
        parse_var_block(p)
    } else {
        Vec::new()
    };
    p.expect(TokenKind::Begin)?;
    let body = statements::parse_statement_list(p, &[TokenKind::End]);
    if p.eat(TokenKind::End).is_none() {
        p.error(format!("Expected END but found {}", p.display()));
    }
    p.eat(TokenKind::Semicolon);

    Ok(TriggerDecl {
        name,
        variables,
        body,
        start,
        end: p.prev().clone(),
    })
}

const PARAM_LIST_MESSAGE: &str = "Unexpected token in parameter list; expected ';' or ')'";

/// Parse `( [VAR] Name[@n] : Type (;|,) ... )`. The caller is at `(`.
fn parse_param_list(p: &mut Parser) -> Vec<ParameterDecl> {
    p.advance(); // (
    let mut out = Vec::new();
    loop {
        match p.kind() {
            TokenKind::RParen => {
                p.advance();
                break;
            }
            TokenKind::Eof | TokenKind::RBrace | TokenKind::Begin => {
                p.error("Expected ) to close parameter list");
                break;
            }
            _ => {}
        }

        let by_ref = p.eat(TokenKind::Var).is_some();
        if !p.kind().is_word() {
            p.error(PARAM_LIST_MESSAGE);
            p.recover_param();
            continue;
        }
        let name_token = p.advance();
        if name_token.kind.is_reserved_name() {
            p.error_at(
                format!(
                    "Cannot use reserved keyword '{}' as a parameter name",
                    token_display(&name_token)
                ),
                &name_token,
                Some(codes::RESERVED_KEYWORD),
            );
            p.recover_param();
            continue;
        }
        eat_auto_number(p);

        if p.eat(TokenKind::Colon).is_none() {
            p.error(PARAM_LIST_MESSAGE);
            p.recover_param();
            continue;
        }
        let data_type = match parse_data_type(p) {
            Ok(dt) => dt,
            Err(Bail) => {
                p.recover_param();
                continue;
            }
        };
        out.push(ParameterDecl {
            by_ref,
            name: name_token.text.clone(),
            data_type,
            start: name_token,
            end: p.prev().clone(),
        });

        match p.kind() {
            TokenKind::Semicolon | TokenKind::Comma => {
                p.advance();
            }
            TokenKind::RParen => {}
            _ => {
                p.error(PARAM_LIST_MESSAGE);
                p.recover_param();
            }
        }
    }
    out
}
