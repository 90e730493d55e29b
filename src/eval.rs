//! Concrete evaluation of terms and predicates under a valuation.
//!
//! Division and remainder are Euclidean, matching SMT-LIB `div`/`mod`.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::error::EvalError;
use crate::pred::{ArithOp, Connective, Pred, PredKind, RelOp, Term, TermKind, VarKey, VarState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Valuation {
    values: BTreeMap<VarKey, i64>,
}

impl Valuation {
    pub fn new() -> Valuation {
        Valuation::default()
    }

    pub fn with(mut self, name: &str, value: i64) -> Valuation {
        self.set((name.to_owned(), VarState::Current), value);
        self
    }

    pub fn set(&mut self, key: VarKey, value: i64) {
        self.values.insert(key, value);
    }

    pub fn get(&self, name: &str, state: VarState) -> Option<i64> {
        self.values.get(&(name.to_owned(), state)).copied()
    }
}

impl std::fmt::Display for Valuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = self.values.iter().map(|((name, state), value)| match state {
            VarState::Current => format!("{name} = {value}"),
            VarState::Before => format!("old({name}) = {value}"),
        });
        write!(f, "{}", shown.format(", "))
    }
}

impl Term {
    pub fn eval(&self, env: &Valuation) -> Result<i64, EvalError> {
        match &self.kind {
            TermKind::Var { name, state } => env
                .get(name, *state)
                .ok_or_else(|| EvalError::Unbound(name.clone())),
            TermKind::Int { value } => Ok(*value),
            TermKind::Neg { operand } => operand.eval(env)?.checked_neg().ok_or(EvalError::Overflow),
            TermKind::Arith { lhs, op, rhs } => {
                let (a, b) = (lhs.eval(env)?, rhs.eval(env)?);
                let result = match op {
                    ArithOp::Add => a.checked_add(b),
                    ArithOp::Sub => a.checked_sub(b),
                    ArithOp::Mul => a.checked_mul(b),
                    ArithOp::Div | ArithOp::Mod if b == 0 => return Err(EvalError::DivisionByZero),
                    ArithOp::Div => a.checked_div_euclid(b),
                    ArithOp::Mod => a.checked_rem_euclid(b),
                };
                result.ok_or(EvalError::Overflow)
            }
        }
    }
}

impl Pred {
    pub fn eval(&self, env: &Valuation) -> Result<bool, EvalError> {
        match &self.kind {
            PredKind::Bool { value } => Ok(*value),
            PredKind::Rel { lhs, op, rhs } => {
                let (a, b) = (lhs.eval(env)?, rhs.eval(env)?);
                Ok(match op {
                    RelOp::Eq => a == b,
                    RelOp::Ne => a != b,
                    RelOp::Lt => a < b,
                    RelOp::Le => a <= b,
                    RelOp::Gt => a > b,
                    RelOp::Ge => a >= b,
                })
            }
            PredKind::Not { operand } => Ok(!operand.eval(env)?),
            PredKind::Binary { lhs, op, rhs } => {
                let a = lhs.eval(env)?;
                Ok(match op {
                    Connective::And => a && rhs.eval(env)?,
                    Connective::Or => a || rhs.eval(env)?,
                    Connective::Implies => !a || rhs.eval(env)?,
                })
            }
        }
    }
}
