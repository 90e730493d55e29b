use crate::ast::Span;
use crate::pred::{ArithOp, Connective, Pred, PredKind, RelOp, Term, TermKind, VarState};

impl Term {
    pub fn var(name: &str) -> Term {
        Term::var_in(name, VarState::Current)
    }
    pub fn old(name: &str) -> Term {
        Term::var_in(name, VarState::Before)
    }
    pub fn var_in(name: &str, state: VarState) -> Term {
        Term {
            span: Span::default(),
            kind: TermKind::Var {
                name: name.to_owned(),
                state,
            },
        }
    }
    pub fn int(value: i64) -> Term {
        Term {
            span: Span::default(),
            kind: TermKind::Int { value },
        }
    }
    pub fn neg(operand: &Term) -> Term {
        Term {
            span: operand.span,
            kind: TermKind::Neg {
                operand: Box::new(operand.clone()),
            },
        }
    }
    pub fn arith(lhs: &Term, op: ArithOp, rhs: &Term) -> Term {
        Term {
            span: lhs.span,
            kind: TermKind::Arith {
                lhs: Box::new(lhs.clone()),
                op,
                rhs: Box::new(rhs.clone()),
            },
        }
    }
    pub fn at(mut self, span: Span) -> Term {
        self.span = span;
        self
    }
}

impl Pred {
    pub fn tt() -> Pred {
        Pred::bool(true)
    }
    pub fn ff() -> Pred {
        Pred::bool(false)
    }
    pub fn bool(value: bool) -> Pred {
        Pred {
            span: Span::default(),
            kind: PredKind::Bool { value },
        }
    }
    pub fn rel(lhs: Term, op: RelOp, rhs: Term) -> Pred {
        Pred {
            span: lhs.span,
            kind: PredKind::Rel { lhs, op, rhs },
        }
    }
    pub fn not(&self) -> Pred {
        Pred {
            span: self.span,
            kind: PredKind::Not {
                operand: Box::new(self.clone()),
            },
        }
    }
    pub fn binary(&self, op: Connective, other: &Pred) -> Pred {
        Pred {
            span: self.span,
            kind: PredKind::Binary {
                lhs: Box::new(self.clone()),
                op,
                rhs: Box::new(other.clone()),
            },
        }
    }
    pub fn and(&self, other: &Pred) -> Pred {
        self.binary(Connective::And, other)
    }
    pub fn or(&self, other: &Pred) -> Pred {
        self.binary(Connective::Or, other)
    }
    pub fn implies(&self, other: &Pred) -> Pred {
        self.binary(Connective::Implies, other)
    }
    /// Left-nested conjunction; `true` when empty.
    pub fn conj(preds: &[Pred]) -> Pred {
        preds
            .iter()
            .cloned()
            .reduce(|a, b| a.and(&b))
            .unwrap_or(Pred::tt())
    }
    pub fn at(mut self, span: Span) -> Pred {
        self.span = span;
        self
    }
}

impl std::fmt::Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for RelOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for Connective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Connective::And => "&&",
            Connective::Or => "||",
            Connective::Implies => "==>",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TermKind::Var {
                name,
                state: VarState::Current,
            } => write!(f, "{name}"),
            TermKind::Var {
                name,
                state: VarState::Before,
            } => write!(f, "old({name})"),
            TermKind::Int { value } => write!(f, "{value}"),
            TermKind::Neg { operand } => write!(f, "-{operand}"),
            TermKind::Arith { lhs, op, rhs } => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}

impl std::fmt::Display for Pred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            PredKind::Bool { value } => write!(f, "{value}"),
            PredKind::Rel { lhs, op, rhs } => write!(f, "{lhs} {op} {rhs}"),
            PredKind::Not { operand } => match operand.kind {
                PredKind::Rel { .. } => write!(f, "!({operand})"),
                _ => write!(f, "!{operand}"),
            },
            PredKind::Binary { lhs, op, rhs } => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}
