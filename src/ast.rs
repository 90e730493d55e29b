use serde::{Deserialize, Serialize};

use crate::pred::Pred;

/// Source position of a node, 1-based. `0:0` means synthesized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(line: u32, column: u32) -> Span {
        Span { line, column }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expr {
    #[serde(default)]
    pub span: Span,
    #[serde(flatten)]
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum ExprKind {
    Var { name: String },
    Int { value: i64 },
    Bool { value: bool },
    Unary { op: UnOp, operand: Box<Expr> },
    Binary { lhs: Box<Expr>, op: BinOp, rhs: Box<Expr> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stmt {
    #[serde(default)]
    pub span: Span,
    #[serde(flatten)]
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum StmtKind {
    Assign {
        target: String,
        value: Expr,
    },
    Seq {
        first: Box<Stmt>,
        second: Box<Stmt>,
    },
    Skip,
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        #[serde(default = "Stmt::boxed_skip")]
        else_branch: Box<Stmt>,
    },
    Block {
        body: Box<Stmt>,
    },
    Loop {
        condition: Expr,
        #[serde(default)]
        invariant: Option<Pred>,
        body: Box<Stmt>,
    },
    Assert {
        condition: Expr,
    },
    Assume {
        condition: Expr,
    },
    Call {
        callee: String,
        #[serde(default)]
        args: Vec<Expr>,
    },
    LocalDef {
        name: String,
        #[serde(default)]
        init: Option<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    #[serde(default)]
    pub span: Span,
    pub pre: Pred,
    pub post: Pred,
    pub body: Stmt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub main: String,
    pub procedures: Vec<Procedure>,
}
