//! Pratt expression parser.
//!
//! Binding powers, tight to loose: postfix (member `.`, scoped `::`,
//! call, index), unary (`+ - NOT`), multiplicative (`* / DIV MOD`),
//! additive (`+ -`), relational (`= <> < <= > >= IN`), logical
//! (`AND OR XOR`). Assignment is statement-level and never appears here.

use cal_common::token::TokenKind;

use crate::ast::{BinaryOp, Expression, ExpressionKind, UnaryOp};
use crate::error::codes;
use crate::sanitize::token_display;

use super::{Bail, PResult, Parser};

// ── Binding Power Tables ───────────────────────────────────────────────

/// Returns (op, left_bp, right_bp) for infix operators. Left < right
/// means left-associative, which every C/AL operator is.
fn infix_binding_power(kind: TokenKind) -> Option<(BinaryOp, u8, u8)> {
    match kind {
        // Logical: loosest.
        TokenKind::And => Some((BinaryOp::And, 3, 4)),
        TokenKind::Or => Some((BinaryOp::Or, 3, 4)),
        TokenKind::Xor => Some((BinaryOp::Xor, 3, 4)),

        // Relational.
        TokenKind::Eq => Some((BinaryOp::Eq, 5, 6)),
        TokenKind::Neq => Some((BinaryOp::Neq, 5, 6)),
        TokenKind::Lt => Some((BinaryOp::Lt, 5, 6)),
        TokenKind::LtEq => Some((BinaryOp::LtEq, 5, 6)),
        TokenKind::Gt => Some((BinaryOp::Gt, 5, 6)),
        TokenKind::GtEq => Some((BinaryOp::GtEq, 5, 6)),
        TokenKind::In => Some((BinaryOp::In, 5, 6)),

        // Additive.
        TokenKind::Plus => Some((BinaryOp::Add, 7, 8)),
        TokenKind::Minus => Some((BinaryOp::Sub, 7, 8)),

        // Multiplicative: tightest infix.
        TokenKind::Star => Some((BinaryOp::Mul, 9, 10)),
        TokenKind::Slash => Some((BinaryOp::Div, 9, 10)),
        TokenKind::Div => Some((BinaryOp::IntDiv, 9, 10)),
        TokenKind::Mod => Some((BinaryOp::Mod, 9, 10)),

        _ => None,
    }
}

/// Returns (op, right_bp) for prefix operators.
fn prefix_binding_power(kind: TokenKind) -> Option<(UnaryOp, u8)> {
    match kind {
        TokenKind::Plus => Some((UnaryOp::Plus, 11)),
        TokenKind::Minus => Some((UnaryOp::Minus, 11)),
        TokenKind::Not => Some((UnaryOp::Not, 11)),
        _ => None,
    }
}

/// Postfix operations bind tighter than all prefix and infix operators.
const POSTFIX_BP: u8 = 13;

/// Control-flow keywords that are an error in primary position. `EXIT`
/// and `BREAK` are deliberately absent: `EXIT` may head an argument
/// expression and `BREAK` is a legal procedure name.
fn is_banned_in_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Then
            | TokenKind::Else
            | TokenKind::Do
            | TokenKind::Of
            | TokenKind::To
            | TokenKind::Downto
            | TokenKind::Until
            | TokenKind::Begin
            | TokenKind::End
    )
}

const TERNARY_MESSAGE: &str = "AL-only ternary operator '?' not supported in C/AL";

// ── Entry Point ────────────────────────────────────────────────────────

/// Parse an expression at the loosest binding power.
pub(crate) fn parse_expression(p: &mut Parser) -> PResult<Expression> {
    expr_bp(p, 0)
}

/// Core Pratt loop: parse a prefix/primary LHS, then fold postfix and
/// infix operators while their binding power clears `min_bp`.
fn expr_bp(p: &mut Parser, min_bp: u8) -> PResult<Expression> {
    let mut lhs = parse_lhs(p)?;

    loop {
        let kind = p.kind();

        // AL ternary: report once per token, drop it, keep going.
        if kind == TokenKind::Question {
            p.error_with_code(TERNARY_MESSAGE, codes::TERNARY_OPERATOR);
            p.advance();
            continue;
        }

        // ── Postfix: member access ──
        if kind == TokenKind::Dot && POSTFIX_BP >= min_bp {
            p.advance();
            if !p.kind().is_word() {
                p.error("Expected identifier after . operator");
                return Err(Bail);
            }
            let member = p.advance();
            let start = lhs.start.clone();
            lhs = Expression {
                kind: ExpressionKind::Member {
                    base: Box::new(lhs),
                    member: member.text.clone(),
                },
                start,
                end: member,
            };
            continue;
        }

        // ── Postfix: scoped access ──
        if kind == TokenKind::ColonColon && POSTFIX_BP >= min_bp {
            p.advance();
            if !p.kind().is_word() {
                p.error("Expected identifier after :: operator");
                return Err(Bail);
            }
            let member = p.advance();
            let start = lhs.start.clone();
            lhs = Expression {
                kind: ExpressionKind::Scope {
                    base: Box::new(lhs),
                    member: member.text.clone(),
                },
                start,
                end: member,
            };
            continue;
        }

        // ── Postfix: call ──
        if kind == TokenKind::LParen && POSTFIX_BP >= min_bp {
            p.advance();
            let args = parse_expression_list(p, TokenKind::RParen)?;
            p.expect(TokenKind::RParen)?;
            let start = lhs.start.clone();
            lhs = Expression {
                kind: ExpressionKind::Call {
                    callee: Box::new(lhs),
                    args,
                },
                start,
                end: p.prev().clone(),
            };
            continue;
        }

        // ── Postfix: index ──
        if kind == TokenKind::LBracket && POSTFIX_BP >= min_bp {
            p.advance();
            let indices = parse_expression_list(p, TokenKind::RBracket)?;
            p.expect(TokenKind::RBracket)?;
            let start = lhs.start.clone();
            lhs = Expression {
                kind: ExpressionKind::Index {
                    base: Box::new(lhs),
                    indices,
                },
                start,
                end: p.prev().clone(),
            };
            continue;
        }

        // ── Infix ──
        let Some((op, left_bp, right_bp)) = infix_binding_power(kind) else {
            break;
        };
        if left_bp < min_bp {
            break;
        }
        p.advance();
        let rhs = expr_bp(p, right_bp)?;
        let start = lhs.start.clone();
        let end = rhs.end.clone();
        lhs = Expression {
            kind: ExpressionKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            start,
            end,
        };
    }

    Ok(lhs)
}

/// Comma-separated expressions up to (not including) `close`. An empty
/// list is fine (`Foo()`).
fn parse_expression_list(p: &mut Parser, close: TokenKind) -> PResult<Vec<Expression>> {
    let mut out = Vec::new();
    if p.at(close) {
        return Ok(out);
    }
    loop {
        out.push(parse_expression(p)?);
        if p.eat(TokenKind::Comma).is_none() {
            break;
        }
    }
    Ok(out)
}

/// Prefix operator or primary.
fn parse_lhs(p: &mut Parser) -> PResult<Expression> {
    if let Some((op, right_bp)) = prefix_binding_power(p.kind()) {
        let token = p.advance();
        let operand = expr_bp(p, right_bp)?;
        let end = operand.end.clone();
        return Ok(Expression {
            kind: ExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
            start: token,
            end,
        });
    }
    parse_primary(p)
}

/// Primary: literal, boolean, identifier, or parenthesized expression.
fn parse_primary(p: &mut Parser) -> PResult<Expression> {
    // Leading ternary garbage: report and drop before retrying.
    while p.at(TokenKind::Question) {
        p.error_with_code(TERNARY_MESSAGE, codes::TERNARY_OPERATOR);
        p.advance();
    }

    let token = p.current().clone();
    let kind = match token.kind {
        TokenKind::Int => {
            p.advance();
            ExpressionKind::Integer(token.text.parse().unwrap_or(i64::MAX))
        }
        TokenKind::Decimal => {
            p.advance();
            ExpressionKind::Decimal(token.text.parse().unwrap_or(0.0))
        }
        TokenKind::Str => {
            p.advance();
            ExpressionKind::Str(token.text.clone())
        }
        TokenKind::LParen => {
            p.advance();
            let inner = parse_expression(p)?;
            p.expect(TokenKind::RParen)?;
            // Grouping keeps the inner expression, widened to the parens.
            return Ok(Expression {
                kind: inner.kind,
                start: token,
                end: p.prev().clone(),
            });
        }
        k if k.is_word() => {
            if is_banned_in_expression(k) {
                let message = format!(
                    "Unexpected keyword {} in expression",
                    token_display(&token)
                );
                p.error_at(message, &token, None);
                return Err(Bail);
            }
            p.advance();
            if token.kind == TokenKind::Ident && token.text.eq_ignore_ascii_case("TRUE") {
                ExpressionKind::Bool(true)
            } else if token.kind == TokenKind::Ident && token.text.eq_ignore_ascii_case("FALSE") {
                ExpressionKind::Bool(false)
            } else {
                ExpressionKind::Ident {
                    name: token.text.clone(),
                    quoted: token.kind == TokenKind::QuotedIdent,
                }
            }
        }
        _ => {
            p.error(format!("Expected expression but found {}", p.display()));
            return Err(Bail);
        }
    };
    Ok(Expression {
        kind,
        start: token.clone(),
        end: token,
    })
}
