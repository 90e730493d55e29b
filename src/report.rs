use itertools::Itertools;

use crate::ast::Span;
use crate::pred::Pred;

/// A formula that must be valid, with the location to blame if it is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obligation {
    pub pred: Pred,
    pub span: Span,
    pub msg: String,
}

impl Obligation {
    pub fn new(pred: Pred, span: Span, msg: &str) -> Obligation {
        Obligation {
            pred,
            span,
            msg: msg.to_owned(),
        }
    }
}

/// A statement that was passed through without a rule. Any verdict for a
/// report containing one of these says nothing about the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsoundSite {
    pub kind: &'static str,
    pub span: Span,
}

/// `sp(stmt, pre)` together with what the transformer met on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub post: Pred,
    pub side: Vec<Obligation>,
    pub unsound: Vec<UnsoundSite>,
}

impl Transformed {
    /// No pass-through site was involved, so `post` really is the strongest
    /// postcondition (given that every side obligation holds).
    pub fn is_sound(&self) -> bool {
        self.unsound.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcReport {
    pub procedure: String,
    /// `computed postcondition ==> declared postcondition`
    pub main: Obligation,
    /// Obligations raised by asserts and loop invariants, in program order.
    pub side: Vec<Obligation>,
    pub unsound: Vec<UnsoundSite>,
}

impl VcReport {
    /// All obligations, side ones first.
    pub fn obligations(&self) -> impl Iterator<Item = &Obligation> {
        self.side.iter().chain(std::iter::once(&self.main))
    }

    /// The single formula to hand to a prover: the main implication, or the
    /// conjunction of every obligation when there are side obligations.
    pub fn predicate(&self) -> Pred {
        let preds = self.obligations().map(|o| o.pred.clone()).collect_vec();
        Pred::conj(&preds)
    }

    pub fn is_sound(&self) -> bool {
        self.unsound.is_empty()
    }
}

impl std::fmt::Display for VcReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "procedure {}:", self.procedure)?;
        for o in self.obligations() {
            writeln!(f, "  [{}] {}: {}", o.span, o.msg, o.pred)?;
        }
        if !self.is_sound() {
            writeln!(
                f,
                "  unsound: {}",
                self.unsound
                    .iter()
                    .map(|s| format!("{} at {}", s.kind, s.span))
                    .join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pred::{RelOp, Term};

    fn report(side: Vec<Obligation>) -> VcReport {
        let main = Obligation::new(
            Pred::tt().implies(&Pred::rel(Term::var("x"), RelOp::Gt, Term::int(0))),
            Span::new(3, 1),
            "postcondition might not hold",
        );
        VcReport {
            procedure: "main".into(),
            main,
            side,
            unsound: vec![],
        }
    }

    #[test]
    fn predicate_without_side_is_main() {
        let r = report(vec![]);
        assert_eq!(r.predicate(), r.main.pred);
    }

    #[test]
    fn predicate_conjoins_side_first() {
        let side = Obligation::new(Pred::ff(), Span::new(1, 1), "assertion might not hold");
        let r = report(vec![side.clone()]);
        assert_eq!(r.predicate(), side.pred.and(&r.main.pred));
    }

    #[test]
    fn display_lists_obligations_and_unsound_sites() {
        let mut r = report(vec![]);
        r.unsound.push(UnsoundSite {
            kind: "call",
            span: Span::new(2, 4),
        });
        assert_eq!(
            r.to_string(),
            "procedure main:\n  [3:1] postcondition might not hold: (true ==> x > 0)\n  unsound: call at 2:4\n"
        );
        assert!(!r.is_sound());
    }
}
