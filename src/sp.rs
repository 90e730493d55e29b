//! Strongest-postcondition transformer over statements.
//!
//! `sp(s, P)` is a predicate true of every state reachable by running `s`
//! from a state satisfying `P`. Overwritten values are kept under fresh
//! names, so the result may mention variables that do not occur in the
//! program; they are implicitly existential.

use std::collections::BTreeSet;

use crate::ast::{Expr, Span, Stmt, StmtKind};
use crate::config::{ConditionalRule, UnsupportedPolicy, VcgConfig};
use crate::error::{Result, VcgError};
use crate::fresh::FreshNames;
use crate::pred::{Pred, RelOp, Term};
use crate::report::{Obligation, UnsoundSite};
use crate::subst::{substitute_pred, substitute_term};
use crate::translate::ExprTranslator;

/// State of one top-level transformation: the fresh-name allocator plus the
/// side obligations and unsound sites met along the way.
pub(crate) struct Transformer<'a, T: ?Sized> {
    config: &'a VcgConfig,
    translator: &'a T,
    fresh: FreshNames,
    depth: usize,
    pub(crate) side: Vec<Obligation>,
    pub(crate) unsound: Vec<UnsoundSite>,
}

impl<'a, T: ExprTranslator + ?Sized> Transformer<'a, T> {
    /// `reserved` are names fresh names must never collide with, normally
    /// every variable of the procedure being transformed.
    pub(crate) fn new(config: &'a VcgConfig, translator: &'a T, reserved: BTreeSet<String>) -> Self {
        let mut fresh = FreshNames::new(&config.fresh_separator);
        fresh.reserve(reserved);
        Transformer {
            config,
            translator,
            fresh,
            depth: 0,
            side: vec![],
            unsound: vec![],
        }
    }

    /// Only statements that contain other statements count towards
    /// `max_depth`; the components of a sequence sit at the sequence's level.
    pub(crate) fn sp(&mut self, stmt: &Stmt, pre: &Pred) -> Result<Pred> {
        if matches!(stmt.kind, StmtKind::Seq { .. }) {
            return self.sp_kind(stmt, pre);
        }
        if self.depth >= self.config.max_depth {
            return Err(VcgError::TooDeep {
                limit: self.config.max_depth,
                span: stmt.span,
            });
        }
        self.depth += 1;
        let post = self.sp_kind(stmt, pre);
        self.depth -= 1;
        post
    }

    fn sp_kind(&mut self, stmt: &Stmt, pre: &Pred) -> Result<Pred> {
        tracing::debug!(rule = stmt.kind_name(), span = %stmt.span, "applying rule");
        match &stmt.kind {
            StmtKind::Skip => Ok(pre.clone()),
            StmtKind::Seq { first, second } => self.sp_seq(first, second, pre),
            StmtKind::Block { body } => self.sp(body, pre),
            StmtKind::Assign { target, value } => self.sp_assignment(target, value, pre),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.sp_if(condition, then_branch, else_branch, pre),
            StmtKind::Assume { condition } => self.sp_assume(condition, pre),
            StmtKind::Assert { condition } => self.sp_assert(condition, stmt.span, pre),
            StmtKind::LocalDef {
                name,
                init: Some(init),
            } => self.sp_assignment(name, init, pre),
            StmtKind::LocalDef { name, init: None } => Ok(self.sp_havoc(name, pre)),
            StmtKind::Loop {
                condition,
                invariant: Some(invariant),
                body,
            } => self.sp_loop(condition, invariant, body, stmt.span, pre),
            StmtKind::Loop { invariant: None, .. } | StmtKind::Call { .. } => {
                self.sp_unsupported(stmt, pre)
            }
        }
    }

    // Walks the right spine of `s1; (s2; (s3; ...))` iteratively.
    fn sp_seq(&mut self, first: &Stmt, second: &Stmt, pre: &Pred) -> Result<Pred> {
        let mut post = self.sp(first, pre)?;
        let mut rest = second;
        while let StmtKind::Seq { first, second } = &rest.kind {
            post = self.sp(first, &post)?;
            rest = second;
        }
        self.sp(rest, &post)
    }

    // sp(x := E, P) = P[x <- x'] && x == E[x <- x']
    fn sp_assignment(&mut self, target: &str, value: &Expr, pre: &Pred) -> Result<Pred> {
        let fresh = self.fresh.fresh(target, pre);
        let value = substitute_term(&self.translator.term(value)?, target, &fresh);
        let renamed = substitute_pred(pre, target, &fresh);
        let current = Pred::rel(Term::var(target).at(pre.span), RelOp::Eq, value).at(pre.span);
        Ok(renamed.and(&current))
    }

    // sp(if C then S1 else S2, P) = (C && sp(S1, P)) || (!C && sp(S2, P))
    fn sp_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: &Stmt, pre: &Pred) -> Result<Pred> {
        let cond = self.translator.pred(condition)?;
        let (then_post, else_post) = match self.config.conditional {
            ConditionalRule::GuardOutside => {
                let then_post = self.sp(then_branch, pre)?;
                let else_post = self.sp(else_branch, pre)?;
                (
                    cond.and(&then_post).at(pre.span),
                    cond.not().and(&else_post).at(pre.span),
                )
            }
            ConditionalRule::GuardOnEntry => (
                self.sp(then_branch, &cond.and(pre).at(pre.span))?,
                self.sp(else_branch, &cond.not().and(pre).at(pre.span))?,
            ),
        };
        Ok(then_post.or(&else_post).at(pre.span))
    }

    fn sp_assume(&mut self, condition: &Expr, pre: &Pred) -> Result<Pred> {
        let cond = self.translator.pred(condition)?;
        Ok(pre.and(&cond))
    }

    // assert C behaves as assume C once `P ==> C` has been discharged.
    fn sp_assert(&mut self, condition: &Expr, span: Span, pre: &Pred) -> Result<Pred> {
        let cond = self.translator.pred(condition)?;
        self.side
            .push(Obligation::new(pre.implies(&cond), span, "assertion might not hold"));
        Ok(pre.and(&cond))
    }

    fn sp_havoc(&mut self, name: &str, pre: &Pred) -> Pred {
        let fresh = self.fresh.fresh(name, pre);
        substitute_pred(pre, name, &fresh)
    }

    // Initiation and maintenance become side obligations; afterwards only
    // the invariant, the negated guard and the untouched part of P are known.
    fn sp_loop(&mut self, condition: &Expr, invariant: &Pred, body: &Stmt, span: Span, pre: &Pred) -> Result<Pred> {
        let cond = self.translator.pred(condition)?;
        self.side.push(Obligation::new(
            pre.implies(invariant),
            span,
            "loop invariant might not hold on entry",
        ));
        let body_post = self.sp(body, &invariant.and(&cond))?;
        self.side.push(Obligation::new(
            body_post.implies(invariant),
            span,
            "loop invariant might not be maintained",
        ));
        let frame = body
            .assigned_vars()
            .iter()
            .fold(pre.clone(), |frame, var| self.sp_havoc(var, &frame));
        Ok(frame.and(invariant).and(&cond.not()).at(pre.span))
    }

    fn sp_unsupported(&mut self, stmt: &Stmt, pre: &Pred) -> Result<Pred> {
        let kind = stmt.kind_name();
        match self.config.unsupported {
            UnsupportedPolicy::Reject => Err(VcgError::Unsupported {
                kind,
                span: stmt.span,
            }),
            UnsupportedPolicy::PassThrough => {
                tracing::warn!(kind, span = %stmt.span, "no rule for statement, passing precondition through");
                self.unsound.push(UnsoundSite {
                    kind,
                    span: stmt.span,
                });
                Ok(pre.clone())
            }
        }
    }
}
