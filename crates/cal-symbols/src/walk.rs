//! AST walkers that extract identifier occurrences from statement bodies.
//!
//! Occurrences are textual: every word-shaped name position counts,
//! including member and scope accessors (`Rec.Name` yields both `Rec`
//! and `Name`). Literals contribute nothing.

use cal_parser::ast::{CaseArm, Expression, ExpressionKind, Statement, StatementKind};

/// Collect identifier occurrences from a statement list.
pub(crate) fn names_in_statements(statements: &[Statement], out: &mut Vec<String>) {
    for statement in statements {
        names_in_statement(statement, out);
    }
}

pub(crate) fn names_in_statement(statement: &Statement, out: &mut Vec<String>) {
    match &statement.kind {
        StatementKind::Assignment { target, value } => {
            names_in_expression(target, out);
            names_in_expression(value, out);
        }
        StatementKind::CompoundAssignment { target, value, .. } => {
            names_in_expression(target, out);
            names_in_expression(value, out);
        }
        StatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            names_in_expression(condition, out);
            names_in_statement(then_branch, out);
            if let Some(else_branch) = else_branch {
                names_in_statement(else_branch, out);
            }
        }
        StatementKind::Case {
            scrutinee,
            arms,
            else_arm,
        } => {
            names_in_expression(scrutinee, out);
            for CaseArm { values, body, .. } in arms {
                for value in values {
                    names_in_expression(value, out);
                }
                if let Some(body) = body {
                    names_in_statement(body, out);
                }
            }
            if let Some(else_arm) = else_arm {
                names_in_statements(else_arm, out);
            }
        }
        StatementKind::For {
            var,
            from,
            to,
            body,
            ..
        } => {
            names_in_expression(var, out);
            names_in_expression(from, out);
            names_in_expression(to, out);
            names_in_statement(body, out);
        }
        StatementKind::While { condition, body } => {
            names_in_expression(condition, out);
            names_in_statement(body, out);
        }
        StatementKind::Repeat { body, condition } => {
            names_in_statements(body, out);
            names_in_expression(condition, out);
        }
        StatementKind::Block { statements } => names_in_statements(statements, out),
        StatementKind::Exit { value } => {
            if let Some(value) = value {
                names_in_expression(value, out);
            }
        }
        StatementKind::Break => {}
        StatementKind::Expr { expr } => names_in_expression(expr, out),
    }
}

pub(crate) fn names_in_expression(expression: &Expression, out: &mut Vec<String>) {
    match &expression.kind {
        ExpressionKind::Integer(_)
        | ExpressionKind::Decimal(_)
        | ExpressionKind::Str(_)
        | ExpressionKind::Bool(_) => {}
        ExpressionKind::Ident { name, .. } => out.push(name.clone()),
        ExpressionKind::Unary { operand, .. } => names_in_expression(operand, out),
        ExpressionKind::Binary { lhs, rhs, .. } => {
            names_in_expression(lhs, out);
            names_in_expression(rhs, out);
        }
        ExpressionKind::Member { base, member } => {
            names_in_expression(base, out);
            out.push(member.clone());
        }
        ExpressionKind::Scope { base, member } => {
            names_in_expression(base, out);
            out.push(member.clone());
        }
        ExpressionKind::Index { base, indices } => {
            names_in_expression(base, out);
            for index in indices {
                names_in_expression(index, out);
            }
        }
        ExpressionKind::Call { callee, args } => {
            names_in_expression(callee, out);
            for arg in args {
                names_in_expression(arg, out);
            }
        }
    }
}
