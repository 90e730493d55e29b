use std::collections::BTreeSet;

use itertools::Itertools;

use crate::ast::{BinOp, Expr, ExprKind, Procedure, Program, Span, Stmt, StmtKind, UnOp};
use crate::error::{Result, VcgError};
use crate::pred::Pred;

impl Expr {
    pub fn var(name: &str) -> Expr {
        Expr::new(ExprKind::Var {
            name: name.to_owned(),
        })
    }
    pub fn int(value: i64) -> Expr {
        Expr::new(ExprKind::Int { value })
    }
    pub fn bool(value: bool) -> Expr {
        Expr::new(ExprKind::Bool { value })
    }
    pub fn unary(op: UnOp, operand: &Expr) -> Expr {
        Expr {
            span: operand.span,
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand.clone()),
            },
        }
    }
    pub fn binary(lhs: &Expr, op: BinOp, rhs: &Expr) -> Expr {
        Expr {
            span: lhs.span,
            kind: ExprKind::Binary {
                lhs: Box::new(lhs.clone()),
                op,
                rhs: Box::new(rhs.clone()),
            },
        }
    }
    pub fn at(mut self, span: Span) -> Expr {
        self.span = span;
        self
    }
    fn new(kind: ExprKind) -> Expr {
        Expr {
            span: Span::default(),
            kind,
        }
    }

    fn collect_vars(&self, out: &mut BTreeSet<String>) {
        match &self.kind {
            ExprKind::Var { name } => {
                out.insert(name.clone());
            }
            ExprKind::Int { .. } | ExprKind::Bool { .. } => {}
            ExprKind::Unary { operand, .. } => operand.collect_vars(out),
            ExprKind::Binary { lhs, rhs, .. } => {
                lhs.collect_vars(out);
                rhs.collect_vars(out);
            }
        }
    }
}

impl Stmt {
    pub fn assign(target: &str, value: &Expr) -> Stmt {
        Stmt::new(StmtKind::Assign {
            target: target.to_owned(),
            value: value.clone(),
        })
    }
    pub fn seq(&self, other: &Stmt) -> Stmt {
        Stmt {
            span: self.span,
            kind: StmtKind::Seq {
                first: Box::new(self.clone()),
                second: Box::new(other.clone()),
            },
        }
    }
    /// Right-nested sequence of `stmts`; `skip` when empty.
    pub fn seqs(stmts: &[Stmt]) -> Stmt {
        stmts
            .iter()
            .cloned()
            .rev()
            .reduce(|tail, head| head.seq(&tail))
            .unwrap_or(Stmt::skip())
    }
    pub fn skip() -> Stmt {
        Stmt::new(StmtKind::Skip)
    }
    pub(crate) fn boxed_skip() -> Box<Stmt> {
        Box::new(Stmt::skip())
    }
    pub fn if_then(condition: &Expr, then_branch: &Stmt) -> Stmt {
        Stmt::if_then_else(condition, then_branch, &Stmt::skip())
    }
    pub fn if_then_else(condition: &Expr, then_branch: &Stmt, else_branch: &Stmt) -> Stmt {
        Stmt {
            span: condition.span,
            kind: StmtKind::If {
                condition: condition.clone(),
                then_branch: Box::new(then_branch.clone()),
                else_branch: Box::new(else_branch.clone()),
            },
        }
    }
    pub fn block(body: &Stmt) -> Stmt {
        Stmt {
            span: body.span,
            kind: StmtKind::Block {
                body: Box::new(body.clone()),
            },
        }
    }
    pub fn while_loop(condition: &Expr, invariant: Option<&Pred>, body: &Stmt) -> Stmt {
        Stmt {
            span: condition.span,
            kind: StmtKind::Loop {
                condition: condition.clone(),
                invariant: invariant.cloned(),
                body: Box::new(body.clone()),
            },
        }
    }
    pub fn assert(condition: &Expr) -> Stmt {
        Stmt {
            span: condition.span,
            kind: StmtKind::Assert {
                condition: condition.clone(),
            },
        }
    }
    pub fn assume(condition: &Expr) -> Stmt {
        Stmt {
            span: condition.span,
            kind: StmtKind::Assume {
                condition: condition.clone(),
            },
        }
    }
    pub fn call(callee: &str, args: &[Expr]) -> Stmt {
        Stmt::new(StmtKind::Call {
            callee: callee.to_owned(),
            args: args.to_vec(),
        })
    }
    pub fn local(name: &str, init: Option<&Expr>) -> Stmt {
        Stmt::new(StmtKind::LocalDef {
            name: name.to_owned(),
            init: init.cloned(),
        })
    }
    pub fn at(mut self, span: Span) -> Stmt {
        self.span = span;
        self
    }
    fn new(kind: StmtKind) -> Stmt {
        Stmt {
            span: Span::default(),
            kind,
        }
    }

    /// Short name of the statement kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::Assign { .. } => "assignment",
            StmtKind::Seq { .. } => "sequence",
            StmtKind::Skip => "skip",
            StmtKind::If { .. } => "conditional",
            StmtKind::Block { .. } => "block",
            StmtKind::Loop { .. } => "loop",
            StmtKind::Assert { .. } => "assert",
            StmtKind::Assume { .. } => "assume",
            StmtKind::Call { .. } => "call",
            StmtKind::LocalDef { .. } => "local definition",
        }
    }

    /// Every variable name mentioned anywhere in the statement.
    pub fn vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_vars(&mut out, false);
        out
    }

    /// Variables the statement may write.
    pub fn assigned_vars(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_vars(&mut out, true);
        out
    }

    fn collect_vars(&self, out: &mut BTreeSet<String>, written_only: bool) {
        match &self.kind {
            StmtKind::Assign { target, value } => {
                out.insert(target.clone());
                if !written_only {
                    value.collect_vars(out);
                }
            }
            StmtKind::Seq { first, second } => {
                first.collect_vars(out, written_only);
                second.collect_vars(out, written_only);
            }
            StmtKind::Skip => {}
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if !written_only {
                    condition.collect_vars(out);
                }
                then_branch.collect_vars(out, written_only);
                else_branch.collect_vars(out, written_only);
            }
            StmtKind::Block { body } => body.collect_vars(out, written_only),
            StmtKind::Loop {
                condition,
                invariant,
                body,
            } => {
                if !written_only {
                    condition.collect_vars(out);
                    if let Some(inv) = invariant {
                        out.extend(inv.free_vars());
                    }
                }
                body.collect_vars(out, written_only);
            }
            StmtKind::Assert { condition } | StmtKind::Assume { condition } => {
                if !written_only {
                    condition.collect_vars(out);
                }
            }
            StmtKind::Call { args, .. } => {
                if !written_only {
                    args.iter().for_each(|a| a.collect_vars(out));
                }
            }
            StmtKind::LocalDef { name, init } => {
                out.insert(name.clone());
                match init {
                    Some(init) if !written_only => init.collect_vars(out),
                    _ => {}
                }
            }
        }
    }
}

impl Procedure {
    pub fn new(name: &str, pre: &Pred, body: &Stmt, post: &Pred) -> Procedure {
        Procedure {
            name: name.to_owned(),
            span: body.span,
            pre: pre.clone(),
            post: post.clone(),
            body: body.clone(),
        }
    }

    /// Names used by the contract or the body.
    pub fn vars(&self) -> BTreeSet<String> {
        let mut out = self.body.vars();
        out.extend(self.pre.free_vars());
        out.extend(self.post.free_vars());
        out
    }
}

impl Program {
    /// A program whose only procedure is its main one.
    pub fn single(main: Procedure) -> Program {
        Program {
            main: main.name.clone(),
            procedures: vec![main],
        }
    }

    /// Parses a program from its JSON form.
    ///
    /// `serde_json` refuses input nested more than 128 levels deep, and
    /// every `seq`, `if`, `block` and `loop` statement is one level. Long
    /// statement lists should therefore be built with [`Stmt::seqs`] in code
    /// rather than spelled out as nested `seq` objects; deeper input fails
    /// with `VcgError::Input`.
    pub fn from_json(input: &str) -> Result<Program> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name == name)
    }

    pub fn main_procedure(&self) -> Result<&Procedure> {
        self.procedure(&self.main)
            .ok_or_else(|| VcgError::MissingMain(self.main.clone()))
    }
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Neg => f.write_str("-"),
            UnOp::Not => f.write_str("!"),
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Var { name } => write!(f, "{name}"),
            ExprKind::Int { value } => write!(f, "{value}"),
            ExprKind::Bool { value } => write!(f, "{value}"),
            ExprKind::Unary { op, operand } => write!(f, "{op}{operand}"),
            ExprKind::Binary { lhs, op, rhs } => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}

impl std::fmt::Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            StmtKind::Assign { target, value } => write!(f, "{target} := {value}"),
            StmtKind::Seq { first, second } => write!(f, "{first} ; {second}"),
            StmtKind::Skip => write!(f, "skip"),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch.kind {
                StmtKind::Skip => write!(f, "if {condition} {{ {then_branch} }}"),
                _ => write!(f, "if {condition} {{ {then_branch} }} else {{ {else_branch} }}"),
            },
            StmtKind::Block { body } => write!(f, "{{ {body} }}"),
            StmtKind::Loop {
                condition,
                invariant: Some(inv),
                body,
            } => write!(f, "while {condition} invariant {inv} {{ {body} }}"),
            StmtKind::Loop {
                condition, body, ..
            } => write!(f, "while {condition} {{ {body} }}"),
            StmtKind::Assert { condition } => write!(f, "assert {condition}"),
            StmtKind::Assume { condition } => write!(f, "assume {condition}"),
            StmtKind::Call { callee, args } => write!(f, "call {callee}({})", args.iter().join(", ")),
            StmtKind::LocalDef { name, init: Some(init) } => write!(f, "var {name} := {init}"),
            StmtKind::LocalDef { name, init: None } => write!(f, "var {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pred::{RelOp, Term};

    fn incr(name: &str) -> Stmt {
        Stmt::assign(name, &Expr::binary(&Expr::var(name), BinOp::Add, &Expr::int(1)))
    }

    #[test]
    fn seqs_nest_to_the_right() {
        let s = Stmt::seqs(&[incr("a"), incr("b"), incr("c")]);
        assert_eq!(s, incr("a").seq(&incr("b").seq(&incr("c"))));
        assert_eq!(Stmt::seqs(&[]), Stmt::skip());
    }

    #[test]
    fn display_statements() {
        let s = Stmt::if_then(
            &Expr::binary(&Expr::var("x"), BinOp::Eq, &Expr::int(0)),
            &incr("y"),
        );
        assert_eq!(s.to_string(), "if (x == 0) { y := (y + 1) }");
        let c = Stmt::call("f", &[Expr::var("a"), Expr::int(2)]);
        assert_eq!(c.to_string(), "call f(a, 2)");
    }

    #[test]
    fn assigned_vars_skip_reads() {
        let body = Stmt::seqs(&[
            Stmt::assign("x", &Expr::var("z")),
            Stmt::if_then_else(&Expr::var("c"), &incr("y"), &Stmt::skip()),
            Stmt::local("t", None),
            Stmt::assert(&Expr::var("w")),
        ]);
        let written: Vec<_> = body.assigned_vars().into_iter().collect();
        assert_eq!(written, vec!["t", "x", "y"]);
        let all: Vec<_> = body.vars().into_iter().collect();
        assert_eq!(all, vec!["c", "t", "w", "x", "y", "z"]);
    }

    #[test]
    fn procedure_vars_include_contract() {
        let pre = Pred::rel(Term::var("n"), RelOp::Ge, Term::int(0));
        let post = Pred::rel(Term::var("r"), RelOp::Gt, Term::var("n"));
        let p = Procedure::new("main", &pre, &incr("r"), &post);
        let names: Vec<_> = p.vars().into_iter().collect();
        assert_eq!(names, vec!["n", "r"]);
    }

    #[test]
    fn missing_main_is_reported() {
        let p = Procedure::new("helper", &Pred::tt(), &Stmt::skip(), &Pred::tt());
        let program = Program {
            main: "main".to_owned(),
            procedures: vec![p],
        };
        assert!(matches!(
            program.main_procedure(),
            Err(VcgError::MissingMain(name)) if name == "main"
        ));
    }

    #[test]
    fn missing_else_deserializes_as_skip() {
        let s: Stmt = serde_json::from_str(
            r#"{"stmt":"if","condition":{"expr":"bool","value":true},
                "then_branch":{"stmt":"assign","target":"x","value":{"expr":"int","value":1}}}"#,
        )
        .unwrap();
        assert_eq!(s, Stmt::if_then(&Expr::bool(true), &Stmt::assign("x", &Expr::int(1))));
    }

    fn nested_blocks_json(levels: usize) -> String {
        format!(
            r#"{{"main":"main","procedures":[{{"name":"main",
                "pre":{{"pred":"bool","value":true}},"post":{{"pred":"bool","value":true}},
                "body":{}{{"stmt":"skip"}}{}}}]}}"#,
            r#"{"stmt":"block","body":"#.repeat(levels),
            "}".repeat(levels)
        )
    }

    #[test]
    fn json_nesting_is_bounded_by_the_parser() {
        let shallow = Program::from_json(&nested_blocks_json(60)).unwrap();
        assert_eq!(shallow.main_procedure().unwrap().body.vars().len(), 0);
        assert!(matches!(
            Program::from_json(&nested_blocks_json(200)),
            Err(VcgError::Input(_))
        ));
    }
}
