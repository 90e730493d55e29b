//! Expression translation: source expressions to logical terms and
//! predicates.

use crate::ast::{BinOp, Expr, ExprKind, UnOp};
use crate::error::{Result, VcgError};
use crate::pred::{ArithOp, Connective, Pred, RelOp, Term};

/// Translates source expressions into the logic. The transformer only
/// consumes this interface, so front ends may plug in their own.
pub trait ExprTranslator {
    /// Translate an integer-valued expression.
    fn term(&self, expr: &Expr) -> Result<Term>;
    /// Translate a boolean-valued expression.
    fn pred(&self, expr: &Expr) -> Result<Pred>;
}

/// Syntax-directed translation. Variables are integers; booleans only
/// arise from literals, comparisons and connectives.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxTranslator;

fn mismatch(expr: &Expr, reason: &'static str) -> VcgError {
    VcgError::Translate {
        expr: expr.to_string(),
        span: expr.span,
        reason,
    }
}

fn arith_op(op: BinOp) -> Option<ArithOp> {
    match op {
        BinOp::Add => Some(ArithOp::Add),
        BinOp::Sub => Some(ArithOp::Sub),
        BinOp::Mul => Some(ArithOp::Mul),
        BinOp::Div => Some(ArithOp::Div),
        BinOp::Mod => Some(ArithOp::Mod),
        _ => None,
    }
}

fn rel_op(op: BinOp) -> Option<RelOp> {
    match op {
        BinOp::Eq => Some(RelOp::Eq),
        BinOp::Ne => Some(RelOp::Ne),
        BinOp::Lt => Some(RelOp::Lt),
        BinOp::Le => Some(RelOp::Le),
        BinOp::Gt => Some(RelOp::Gt),
        BinOp::Ge => Some(RelOp::Ge),
        _ => None,
    }
}

impl ExprTranslator for SyntaxTranslator {
    fn term(&self, expr: &Expr) -> Result<Term> {
        Ok(match &expr.kind {
            ExprKind::Var { name } => Term::var(name).at(expr.span),
            ExprKind::Int { value } => Term::int(*value).at(expr.span),
            ExprKind::Unary {
                op: UnOp::Neg,
                operand,
            } => Term::neg(&self.term(operand)?).at(expr.span),
            ExprKind::Binary { lhs, op, rhs } => match arith_op(*op) {
                Some(op) => Term::arith(&self.term(lhs)?, op, &self.term(rhs)?).at(expr.span),
                None => return Err(mismatch(expr, "expected an integer expression")),
            },
            ExprKind::Bool { .. }
            | ExprKind::Unary {
                op: UnOp::Not, ..
            } => return Err(mismatch(expr, "expected an integer expression")),
        })
    }

    fn pred(&self, expr: &Expr) -> Result<Pred> {
        Ok(match &expr.kind {
            ExprKind::Bool { value } => Pred::bool(*value).at(expr.span),
            ExprKind::Unary {
                op: UnOp::Not,
                operand,
            } => self.pred(operand)?.not().at(expr.span),
            ExprKind::Binary { lhs, op, rhs } => {
                if let Some(rel) = rel_op(*op) {
                    Pred::rel(self.term(lhs)?, rel, self.term(rhs)?).at(expr.span)
                } else {
                    let conn = match op {
                        BinOp::And => Connective::And,
                        BinOp::Or => Connective::Or,
                        _ => return Err(mismatch(expr, "expected a boolean expression")),
                    };
                    self.pred(lhs)?.binary(conn, &self.pred(rhs)?).at(expr.span)
                }
            }
            ExprKind::Var { .. }
            | ExprKind::Int { .. }
            | ExprKind::Unary {
                op: UnOp::Neg, ..
            } => return Err(mismatch(expr, "expected a boolean expression")),
        })
    }
}
