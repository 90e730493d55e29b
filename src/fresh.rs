//! Fresh names for the value a variable held before it was overwritten.
//!
//! One `FreshNames` lives for one top-level transformation. It never hands
//! out a name that is free in the predicate it is asked about, nor one that
//! it has handed out before or that was reserved up front (the procedure's
//! own variables).

use std::collections::{HashMap, HashSet};

use crate::pred::Pred;

#[derive(Debug, Clone)]
pub struct FreshNames {
    separator: String,
    taken: HashSet<String>,
    next: HashMap<String, usize>,
}

impl FreshNames {
    pub fn new(separator: &str) -> FreshNames {
        FreshNames {
            separator: separator.to_owned(),
            taken: HashSet::new(),
            next: HashMap::new(),
        }
    }

    pub fn reserve<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.taken.extend(names);
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// A name derived from `base` that is not free in `avoid` and was
    /// never returned or reserved before.
    pub fn fresh(&mut self, base: &str, avoid: &Pred) -> String {
        let free = avoid.free_vars();
        let counter = self.next.entry(base.to_owned()).or_insert(0);
        loop {
            let candidate = format!("{base}{}{counter}", self.separator);
            *counter += 1;
            if !free.contains(&candidate) && !self.taken.contains(&candidate) {
                tracing::debug!(base, fresh = %candidate, "allocated fresh name");
                self.taken.insert(candidate.clone());
                return candidate;
            }
        }
    }
}

/// One-shot allocation: a name derived from `base` that is not free in `pred`.
pub fn fresh_var(pred: &Pred, base: &str) -> String {
    FreshNames::new("_").fresh(base, pred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pred::{RelOp, Term};

    fn eq(a: &str, b: &str) -> Pred {
        Pred::rel(Term::var(a), RelOp::Eq, Term::var(b))
    }

    #[test]
    fn skips_names_free_in_predicate() {
        let p = eq("x_0", "x_1");
        assert_eq!(fresh_var(&p, "x"), "x_2");
    }

    #[test]
    fn skips_before_state_occurrences() {
        let p = Pred::rel(Term::old("x_0"), RelOp::Lt, Term::int(1));
        assert_eq!(fresh_var(&p, "x"), "x_1");
    }

    #[test]
    fn never_repeats_within_one_allocator() {
        let mut names = FreshNames::new("_");
        let p = Pred::tt();
        let a = names.fresh("x", &p);
        let b = names.fresh("x", &p);
        let c = names.fresh("y", &p);
        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("x_0", "x_1", "y_0"));
    }

    #[test]
    fn honours_reserved_names() {
        let mut names = FreshNames::new("_");
        names.reserve(["x_0".to_owned(), "x_1".to_owned()]);
        assert_eq!(names.fresh("x", &Pred::tt()), "x_2");
        assert!(names.is_taken("x_2"));
    }

    #[test]
    fn separate_allocators_are_independent() {
        let p = eq("x", "y");
        assert_eq!(FreshNames::new("_").fresh("x", &p), "x_0");
        assert_eq!(FreshNames::new("_").fresh("x", &p), "x_0");
        assert_eq!(FreshNames::new("'").fresh("x", &p), "x'0");
    }
}
