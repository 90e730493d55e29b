//! Variable renaming over terms and predicates.

use crate::pred::{Pred, PredKind, Term, TermKind};

// t[old <- new]
pub fn substitute_term(term: &Term, old: &str, new: &str) -> Term {
    let kind = match &term.kind {
        TermKind::Var { name, state } if name == old => TermKind::Var {
            name: new.to_owned(),
            state: *state,
        },
        TermKind::Var { .. } | TermKind::Int { .. } => term.kind.clone(),
        TermKind::Neg { operand } => TermKind::Neg {
            operand: Box::new(substitute_term(operand, old, new)),
        },
        TermKind::Arith { lhs, op, rhs } => TermKind::Arith {
            lhs: Box::new(substitute_term(lhs, old, new)),
            op: *op,
            rhs: Box::new(substitute_term(rhs, old, new)),
        },
    };
    Term {
        span: term.span,
        kind,
    }
}

// p[old <- new]
pub fn substitute_pred(pred: &Pred, old: &str, new: &str) -> Pred {
    let kind = match &pred.kind {
        PredKind::Bool { .. } => pred.kind.clone(),
        PredKind::Rel { lhs, op, rhs } => PredKind::Rel {
            lhs: substitute_term(lhs, old, new),
            op: *op,
            rhs: substitute_term(rhs, old, new),
        },
        PredKind::Not { operand } => PredKind::Not {
            operand: Box::new(substitute_pred(operand, old, new)),
        },
        PredKind::Binary { lhs, op, rhs } => PredKind::Binary {
            lhs: Box::new(substitute_pred(lhs, old, new)),
            op: *op,
            rhs: Box::new(substitute_pred(rhs, old, new)),
        },
    };
    Pred {
        span: pred.span,
        kind,
    }
}
