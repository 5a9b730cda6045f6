//! Statement parsing for the embedded procedural language.

use cal_common::token::TokenKind;

use crate::ast::{CaseArm, CompoundOp, Statement, StatementKind};

use super::{expressions, Bail, PResult, Parser};

/// Parse statements separated by `;` until one of `terminators`, a `}`,
/// a declaration starter, or EOF. Stray semicolons are skipped.
pub(crate) fn parse_statement_list(p: &mut Parser, terminators: &[TokenKind]) -> Vec<Statement> {
    let mut out = Vec::new();
    loop {
        while p.eat(TokenKind::Semicolon).is_some() {}
        if at_list_end(p, terminators) {
            break;
        }
        let before = p.pos();
        match parse_statement(p) {
            Ok(statement) => out.push(statement),
            Err(Bail) => {
                // Recovery already synchronized (usually past a `;`).
                // A stray ELSE/UNTIL is both unparseable and not a
                // recovery point here; force progress rather than
                // spinning on it.
                p.recover_statement();
                if p.pos() == before && !p.at_eof() && !at_list_end(p, terminators) {
                    p.advance();
                }
                continue;
            }
        }
        if p.at(TokenKind::Semicolon) || at_list_end(p, terminators) {
            continue;
        }
        p.error(format!("Expected ; but found {}", p.display()));
        p.recover_statement();
    }
    out
}

fn at_list_end(p: &Parser, terminators: &[TokenKind]) -> bool {
    let kind = p.kind();
    terminators.contains(&kind)
        || matches!(
            kind,
            TokenKind::Eof
                | TokenKind::RBrace
                | TokenKind::Procedure
                | TokenKind::Local
                | TokenKind::Trigger
        )
        || kind.is_section_keyword()
}

/// Parse a single statement.
pub(crate) fn parse_statement(p: &mut Parser) -> PResult<Statement> {
    let start = p.current().clone();
    let kind = match p.kind() {
        TokenKind::Begin => {
            p.advance();
            let statements = parse_statement_list(p, &[TokenKind::End]);
            p.expect(TokenKind::End)?;
            StatementKind::Block { statements }
        }
        TokenKind::If => {
            p.advance();
            let condition = expressions::parse_expression(p)?;
            p.expect(TokenKind::Then)?;
            let then_branch = Box::new(parse_branch(p)?);
            let else_branch = if p.eat(TokenKind::Else).is_some() {
                Some(Box::new(parse_branch(p)?))
            } else {
                None
            };
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            }
        }
        TokenKind::Case => parse_case(p)?,
        TokenKind::For => {
            p.advance();
            let var = expressions::parse_expression(p)?;
            p.expect(TokenKind::Assign)?;
            let from = expressions::parse_expression(p)?;
            let downto = match p.kind() {
                TokenKind::To => {
                    p.advance();
                    false
                }
                TokenKind::Downto => {
                    p.advance();
                    true
                }
                _ => {
                    p.error(format!("Expected TO or DOWNTO but found {}", p.display()));
                    return Err(Bail);
                }
            };
            let to = expressions::parse_expression(p)?;
            p.expect(TokenKind::Do)?;
            let body = Box::new(parse_branch(p)?);
            StatementKind::For {
                var,
                from,
                to,
                downto,
                body,
            }
        }
        TokenKind::While => {
            p.advance();
            let condition = expressions::parse_expression(p)?;
            p.expect(TokenKind::Do)?;
            let body = Box::new(parse_branch(p)?);
            StatementKind::While { condition, body }
        }
        TokenKind::Repeat => {
            p.advance();
            let body = parse_statement_list(p, &[TokenKind::Until]);
            p.expect(TokenKind::Until)?;
            let condition = expressions::parse_expression(p)?;
            StatementKind::Repeat { body, condition }
        }
        TokenKind::Exit => {
            p.advance();
            let value = if p.eat(TokenKind::LParen).is_some() {
                let value = expressions::parse_expression(p)?;
                p.expect(TokenKind::RParen)?;
                Some(value)
            } else {
                None
            };
            StatementKind::Exit { value }
        }
        TokenKind::Break => {
            p.advance();
            StatementKind::Break
        }
        _ => {
            let target = expressions::parse_expression(p)?;
            match p.kind() {
                TokenKind::Assign => {
                    p.advance();
                    let value = expressions::parse_expression(p)?;
                    StatementKind::Assignment { target, value }
                }
                TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::SlashAssign => {
                    let op = match p.kind() {
                        TokenKind::PlusAssign => CompoundOp::Add,
                        TokenKind::MinusAssign => CompoundOp::Sub,
                        TokenKind::StarAssign => CompoundOp::Mul,
                        _ => CompoundOp::Div,
                    };
                    p.advance();
                    let value = expressions::parse_expression(p)?;
                    StatementKind::CompoundAssignment { target, op, value }
                }
                _ => StatementKind::Expr { expr: target },
            }
        }
    };
    Ok(Statement {
        kind,
        start,
        end: p.prev().clone(),
    })
}

/// A branch position that may be empty (`IF x THEN;`): produces an empty
/// block when the next token already terminates the branch.
fn parse_branch(p: &mut Parser) -> PResult<Statement> {
    if matches!(
        p.kind(),
        TokenKind::Semicolon | TokenKind::Else | TokenKind::End | TokenKind::Until | TokenKind::Eof
    ) {
        let here = p.current().clone();
        return Ok(Statement {
            kind: StatementKind::Block {
                statements: Vec::new(),
            },
            start: here.clone(),
            end: here,
        });
    }
    parse_statement(p)
}

/// `CASE expr OF value[,value]: stmt; ... [ELSE stmts] END`
fn parse_case(p: &mut Parser) -> PResult<StatementKind> {
    p.advance(); // CASE
    let scrutinee = expressions::parse_expression(p)?;
    p.expect(TokenKind::Of)?;

    let mut arms: Vec<CaseArm> = Vec::new();
    let mut else_arm = None;
    loop {
        while p.eat(TokenKind::Semicolon).is_some() {}
        match p.kind() {
            TokenKind::End => {
                p.advance();
                break;
            }
            TokenKind::Else => {
                p.advance();
                else_arm = Some(parse_statement_list(p, &[TokenKind::End]));
                p.expect(TokenKind::End)?;
                break;
            }
            TokenKind::Eof | TokenKind::RBrace => {
                p.error(format!("Expected END to close CASE but found {}", p.display()));
                break;
            }
            _ => {
                let arm_start = p.current().clone();
                let mut values = vec![expressions::parse_expression(p)?];
                while p.eat(TokenKind::Comma).is_some() {
                    values.push(expressions::parse_expression(p)?);
                }
                p.expect(TokenKind::Colon)?;
                let body = if matches!(
                    p.kind(),
                    TokenKind::Semicolon | TokenKind::End | TokenKind::Else
                ) {
                    None
                } else {
                    Some(parse_statement(p)?)
                };
                arms.push(CaseArm {
                    values,
                    body,
                    start: arm_start,
                    end: p.prev().clone(),
                });
                p.eat(TokenKind::Semicolon);
            }
        }
    }
    Ok(StatementKind::Case {
        scrutinee,
        arms,
        else_arm,
    })
}
