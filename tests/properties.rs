//! Algebraic laws of the strongest-postcondition transformer.
//!
//! Statements are generated over integer variables `x`, `y`, `z`, and
//! logical equivalence is decided with the bounded checker, reading the
//! generator's fresh names existentially.

use std::collections::BTreeSet;

use proptest::prelude::*;
use sp_vcg::ast::{BinOp, Expr, Stmt};
use sp_vcg::check::BoundedChecker;
use sp_vcg::config::{ConditionalRule, VcgConfig};
use sp_vcg::fresh::{fresh_var, FreshNames};
use sp_vcg::pred::{Connective, Pred, PredKind, RelOp, Term, VarKey, VarState};
use sp_vcg::translate::{ExprTranslator, SyntaxTranslator};
use sp_vcg::Vcg;

const ALL: &[&str] = &["x", "y", "z"];
const WRITTEN: &[&str] = &["x", "y"];
const GUARDED: &[&str] = &["z"];

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

fn int_expr(vars: &'static [&'static str]) -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        prop::sample::select(vars).prop_map(|v| Expr::var(v)),
        (-3i64..=3).prop_map(Expr::int),
    ];
    leaf.prop_recursive(2, 6, 2, |inner| {
        (
            inner.clone(),
            prop_oneof![Just(BinOp::Add), Just(BinOp::Sub)],
            inner,
        )
            .prop_map(|(l, op, r)| Expr::binary(&l, op, &r))
    })
}

fn comparison() -> impl Strategy<Value = BinOp> {
    prop_oneof![
        Just(BinOp::Eq),
        Just(BinOp::Ne),
        Just(BinOp::Lt),
        Just(BinOp::Le),
        Just(BinOp::Gt),
        Just(BinOp::Ge),
    ]
}

fn guard(vars: &'static [&'static str]) -> impl Strategy<Value = Expr> {
    (int_expr(vars), comparison(), int_expr(vars)).prop_map(|(l, op, r)| Expr::binary(&l, op, &r))
}

fn precondition() -> impl Strategy<Value = Pred> {
    let atom = prop_oneof![
        1 => Just(Pred::tt()),
        3 => guard(ALL).prop_map(|e| SyntaxTranslator.pred(&e).unwrap()),
    ];
    prop::collection::vec(atom, 1..=2).prop_map(|atoms| Pred::conj(&atoms))
}

fn assign(targets: &'static [&'static str]) -> impl Strategy<Value = Stmt> {
    (prop::sample::select(targets), int_expr(ALL)).prop_map(|(t, e)| Stmt::assign(t, &e))
}

/// Statements that write only `targets` and branch only on `guards`.
fn stmt(targets: &'static [&'static str], guards: &'static [&'static str], depth: u32) -> BoxedStrategy<Stmt> {
    let leaf = prop_oneof![
        3 => assign(targets),
        1 => Just(Stmt::skip()),
    ];
    leaf.prop_recursive(depth, 8, 3, move |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.seq(&b)),
            (guard(guards), inner.clone(), inner.clone())
                .prop_map(|(c, t, e)| Stmt::if_then_else(&c, &t, &e)),
            (guard(guards), inner.clone()).prop_map(|(c, t)| Stmt::if_then(&c, &t)),
            inner.prop_map(|s| Stmt::block(&s)),
        ]
    })
    .boxed()
}

fn program_vars() -> BTreeSet<VarKey> {
    ALL.iter()
        .map(|v| (v.to_string(), VarState::Current))
        .collect()
}

fn sp(stmt: &Stmt, pre: &Pred) -> Pred {
    Vcg::default().transform(stmt, pre).unwrap().post
}

fn sp_guard_on_entry(stmt: &Stmt, pre: &Pred) -> Pred {
    let config = VcgConfig::default().with_conditional(ConditionalRule::GuardOnEntry);
    Vcg::new(config).unwrap().transform(stmt, pre).unwrap().post
}

fn equivalent(a: &Pred, b: &Pred) -> bool {
    BoundedChecker::new(2)
        .equivalent_on(a, b, &program_vars())
        .unwrap()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn skip_is_identity(pre in precondition()) {
        prop_assert_eq!(sp(&Stmt::skip(), &pre), pre);
    }

    #[test]
    fn sequencing_is_associative(
        s1 in stmt(ALL, ALL, 2),
        s2 in stmt(ALL, ALL, 2),
        s3 in stmt(ALL, ALL, 2),
        pre in precondition(),
    ) {
        let right = sp(&s1.seq(&s2.seq(&s3)), &pre);
        let left = sp(&s1.seq(&s2).seq(&s3), &pre);
        prop_assert_eq!(right, left);
    }

    #[test]
    fn transform_is_deterministic(s in stmt(ALL, ALL, 3), pre in precondition()) {
        prop_assert_eq!(sp(&s, &pre), sp(&s, &pre));
    }

    #[test]
    fn block_has_no_effect(s in stmt(ALL, ALL, 2), pre in precondition()) {
        prop_assert_eq!(sp(&Stmt::block(&s), &pre), sp(&s, &pre));
    }

    #[test]
    fn assignment_keeps_old_value_under_fresh_name(
        target in prop::sample::select(ALL),
        value in int_expr(ALL),
        pre in precondition(),
    ) {
        let post = sp(&Stmt::assign(target, &value), &pre);
        let introduced = post
            .free_vars()
            .into_iter()
            .filter(|n| !ALL.contains(&n.as_str()))
            .collect::<Vec<_>>();
        prop_assert!(introduced.len() <= 1);
        for name in &introduced {
            prop_assert!(!pre.free_vars().contains(name));
        }
        // The new value is pinned by the last conjunct.
        let pinned = match &post.kind {
            PredKind::Binary { op: Connective::And, rhs, .. } => matches!(
                &rhs.kind,
                PredKind::Rel { lhs, op: RelOp::Eq, .. } if *lhs == Term::var(target)
            ),
            _ => false,
        };
        prop_assert!(pinned, "{}", post);
    }

    #[test]
    fn fresh_names_are_never_free(pre in precondition(), base in prop::sample::select(ALL)) {
        let name = fresh_var(&pre, base);
        prop_assert!(!pre.free_vars().contains(&name));

        let mut names = FreshNames::new("_");
        let a = names.fresh(base, &pre);
        let b = names.fresh(base, &pre);
        prop_assert_ne!(a, b);
    }
}

// Equivalence checks enumerate valuations, so they get fewer cases.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn conditional_is_guarded_disjunction(
        cond in guard(ALL),
        then_s in stmt(ALL, ALL, 1),
        else_s in stmt(ALL, ALL, 1),
        pre in precondition(),
    ) {
        let c = SyntaxTranslator.pred(&cond).unwrap();
        let actual = sp(&Stmt::if_then_else(&cond, &then_s, &else_s), &pre);
        let expected = c.and(&sp(&then_s, &pre)).or(&c.not().and(&sp(&else_s, &pre)));
        prop_assert!(equivalent(&actual, &expected), "{} vs {}", actual, expected);
    }

    #[test]
    fn missing_else_keeps_precondition(
        cond in guard(ALL),
        then_s in stmt(ALL, ALL, 1),
        pre in precondition(),
    ) {
        let c = SyntaxTranslator.pred(&cond).unwrap();
        let actual = sp(&Stmt::if_then(&cond, &then_s), &pre);
        let expected = c.and(&sp(&then_s, &pre)).or(&c.not().and(&pre));
        prop_assert!(equivalent(&actual, &expected), "{} vs {}", actual, expected);
    }

    // Conjoining the guard on entry only agrees with the default rule while
    // no branch writes a variable the guard reads.
    #[test]
    fn guard_on_entry_agrees_when_guard_is_not_written(
        cond in guard(GUARDED),
        then_s in stmt(WRITTEN, GUARDED, 1),
        else_s in stmt(WRITTEN, GUARDED, 1),
        pre in precondition(),
    ) {
        let s = Stmt::if_then_else(&cond, &then_s, &else_s);
        let (entry, outside) = (sp_guard_on_entry(&s, &pre), sp(&s, &pre));
        prop_assert!(equivalent(&entry, &outside), "{} vs {}", entry, outside);
    }
}
