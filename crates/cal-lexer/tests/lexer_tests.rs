//! Lexer integration tests over realistic C/AL object text.

use cal_common::token::TokenKind;
use cal_lexer::Lexer;

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
}

fn texts(source: &str) -> Vec<String> {
    Lexer::tokenize(source).into_iter().map(|t| t.text).collect()
}

#[test]
fn object_header_line() {
    assert_eq!(
        kinds("OBJECT Table 18 Customer"),
        vec![
            TokenKind::Object,
            TokenKind::Ident,
            TokenKind::Int,
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
}

#[test]
fn field_row_tokenizes_column_by_column() {
    let source = "{ 1 ; ;No. ;Code20 }";
    assert_eq!(
        kinds(source),
        vec![
            TokenKind::LBrace,
            TokenKind::Int,
            TokenKind::Semicolon,
            TokenKind::Semicolon,
            TokenKind::Ident,
            TokenKind::Dot,
            TokenKind::Semicolon,
            TokenKind::Ident,
            TokenKind::RBrace,
            TokenKind::Eof
        ]
    );
}

#[test]
fn record_with_inline_id_is_two_tokens() {
    let tokens = Lexer::tokenize("Record 2000000001");
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].text, "Record");
    assert_eq!(tokens[1].kind, TokenKind::Int);
    assert_eq!(tokens[1].text, "2000000001");
}

#[test]
fn array_type_expression() {
    assert_eq!(
        kinds("ARRAY [10] OF Integer"),
        vec![
            TokenKind::Ident,
            TokenKind::LBracket,
            TokenKind::Int,
            TokenKind::RBracket,
            TokenKind::Of,
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
}

#[test]
fn var_declaration_with_auto_number() {
    assert_eq!(
        kinds("VAR Amount@1000 : Decimal;"),
        vec![
            TokenKind::Var,
            TokenKind::Ident,
            TokenKind::At,
            TokenKind::Int,
            TokenKind::Colon,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn quoted_identifier_keeps_inner_text() {
    let tokens = Lexer::tokenize("\"No.\" := '';");
    assert_eq!(tokens[0].kind, TokenKind::QuotedIdent);
    assert_eq!(tokens[0].text, "No.");
    assert_eq!(tokens[1].kind, TokenKind::Assign);
    assert_eq!(tokens[2].kind, TokenKind::Str);
    assert_eq!(tokens[2].text, "");
}

#[test]
fn text_constant_with_escaped_apostrophe() {
    // A property value in the shape TextConst values use.
    let tokens = Lexer::tokenize("ENU='Customer''s name'");
    assert_eq!(tokens[2].kind, TokenKind::Str);
    assert_eq!(tokens[2].text, "Customer's name");
}

#[test]
fn procedure_signature() {
    assert_eq!(
        kinds("PROCEDURE GetName@2(VAR Rec@1 : Record 18) : Text;"),
        vec![
            TokenKind::Procedure,
            TokenKind::Ident,
            TokenKind::At,
            TokenKind::Int,
            TokenKind::LParen,
            TokenKind::Var,
            TokenKind::Ident,
            TokenKind::At,
            TokenKind::Int,
            TokenKind::Colon,
            TokenKind::Ident,
            TokenKind::Int,
            TokenKind::RParen,
            TokenKind::Colon,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn statement_with_operator_keywords() {
    assert_eq!(
        kinds("IF (a DIV 2 = 0) AND NOT Done THEN EXIT;"),
        vec![
            TokenKind::If,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::Div,
            TokenKind::Int,
            TokenKind::Eq,
            TokenKind::Int,
            TokenKind::RParen,
            TokenKind::And,
            TokenKind::Not,
            TokenKind::Ident,
            TokenKind::Then,
            TokenKind::Exit,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn ternary_question_mark_is_its_own_token() {
    assert_eq!(
        kinds("x := a ? b : c"),
        vec![
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::Ident,
            TokenKind::Question,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
}

#[test]
fn every_input_terminates_with_single_eof() {
    for source in [
        "",
        "   ",
        "// only a comment",
        "OBJECT",
        "'unterminated",
        "\"unterminated",
        "\u{1F980}\u{1F980}",
        "{{{{",
    ] {
        let tokens = Lexer::tokenize(source);
        let eof_count = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        assert_eq!(eof_count, 1, "source {source:?}");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }
}

#[test]
fn unterminated_string_stops_at_newline() {
    let tokens = Lexer::tokenize("'abc\nNext");
    assert_eq!(tokens[0].kind, TokenKind::Str);
    assert_eq!(tokens[0].text, "abc");
    assert_eq!(tokens[1].kind, TokenKind::Ident);
    assert_eq!(tokens[1].text, "Next");
}

#[test]
fn spans_reconstruct_the_source_slice() {
    let source = "OBJECT Codeunit 50000 T";
    for token in Lexer::tokenize(source) {
        if token.kind == TokenKind::Eof {
            continue;
        }
        let slice = &source[token.span.start as usize..token.span.end as usize];
        assert_eq!(slice, token.text, "span must cover the lexeme");
    }
}

#[test]
fn offsets_are_monotonic() {
    let source = "FIELDS { {1; ;Name ;Text50 } }";
    let tokens = Lexer::tokenize(source);
    for pair in tokens.windows(2) {
        assert!(pair[0].span.start <= pair[1].span.start);
        assert!(pair[0].span.start <= pair[0].span.end);
    }
}

#[test]
fn al_only_words_lex_as_identifiers() {
    assert_eq!(
        texts("ENUM INTERFACE INTERNAL")[..3],
        ["ENUM", "INTERFACE", "INTERNAL"]
    );
    assert_eq!(
        kinds("ENUM INTERFACE INTERNAL")[..3],
        [TokenKind::Ident, TokenKind::Ident, TokenKind::Ident]
    );
}
