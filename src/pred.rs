use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ast::Span;

/// Which program state a variable reference denotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarState {
    /// Value in the state the predicate describes.
    #[default]
    Current,
    /// Value at entry to the enclosing predicate's scope.
    Before,
}

/// A variable as the evaluator sees it: `x` and `old(x)` are distinct.
pub type VarKey = (String, VarState);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    #[serde(default)]
    pub span: Span,
    #[serde(flatten)]
    pub kind: TermKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "term", rename_all = "snake_case")]
pub enum TermKind {
    Var {
        name: String,
        #[serde(default)]
        state: VarState,
    },
    Int {
        value: i64,
    },
    Neg {
        operand: Box<Term>,
    },
    Arith {
        lhs: Box<Term>,
        op: ArithOp,
        rhs: Box<Term>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pred {
    #[serde(default)]
    pub span: Span,
    #[serde(flatten)]
    pub kind: PredKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pred", rename_all = "snake_case")]
pub enum PredKind {
    Bool {
        value: bool,
    },
    Rel {
        lhs: Term,
        op: RelOp,
        rhs: Term,
    },
    Not {
        operand: Box<Pred>,
    },
    Binary {
        lhs: Box<Pred>,
        op: Connective,
        rhs: Box<Pred>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connective {
    And,
    Or,
    Implies,
}

impl Term {
    /// Names of all variables referenced, regardless of state tag.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_keys(&mut |name, _| {
            out.insert(name.to_owned());
        });
        out
    }

    pub fn free_keys(&self) -> BTreeSet<VarKey> {
        let mut out = BTreeSet::new();
        self.collect_keys(&mut |name, state| {
            out.insert((name.to_owned(), state));
        });
        out
    }

    fn collect_keys(&self, f: &mut impl FnMut(&str, VarState)) {
        match &self.kind {
            TermKind::Var { name, state } => f(name, *state),
            TermKind::Int { .. } => {}
            TermKind::Neg { operand } => operand.collect_keys(f),
            TermKind::Arith { lhs, rhs, .. } => {
                lhs.collect_keys(f);
                rhs.collect_keys(f);
            }
        }
    }
}

impl Pred {
    /// Names of all variables occurring free. Predicates have no binders,
    /// so every occurrence is free.
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_keys(&mut |name, _| {
            out.insert(name.to_owned());
        });
        out
    }

    pub fn free_keys(&self) -> BTreeSet<VarKey> {
        let mut out = BTreeSet::new();
        self.collect_keys(&mut |name, state| {
            out.insert((name.to_owned(), state));
        });
        out
    }

    fn collect_keys(&self, f: &mut impl FnMut(&str, VarState)) {
        match &self.kind {
            PredKind::Bool { .. } => {}
            PredKind::Rel { lhs, rhs, .. } => {
                lhs.collect_keys(f);
                rhs.collect_keys(f);
            }
            PredKind::Not { operand } => operand.collect_keys(f),
            PredKind::Binary { lhs, rhs, .. } => {
                lhs.collect_keys(f);
                rhs.collect_keys(f);
            }
        }
    }
}
