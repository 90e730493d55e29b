//! Bounded validity checking by exhaustive enumeration.
//!
//! Every free variable ranges over `-bound..=bound`. A `Valid` verdict only
//! means no counterexample exists inside that box; a `Refuted` one is a real
//! counterexample. Cost is `(2 * bound + 1) ^ vars`, so keep both small.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::error::EvalError;
use crate::eval::Valuation;
use crate::pred::{Pred, VarKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Refuted(Valuation),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedChecker {
    pub bound: i64,
}

impl Default for BoundedChecker {
    fn default() -> Self {
        Self { bound: 4 }
    }
}

impl BoundedChecker {
    pub fn new(bound: i64) -> BoundedChecker {
        BoundedChecker { bound: bound.abs() }
    }

    pub fn check(&self, pred: &Pred) -> Result<Verdict, EvalError> {
        let keys = pred.free_keys().into_iter().collect_vec();
        for env in self.valuations(&Valuation::new(), &keys) {
            if !pred.eval(&env)? {
                return Ok(Verdict::Refuted(env));
            }
        }
        Ok(Verdict::Valid)
    }

    pub fn find_model(&self, pred: &Pred) -> Result<Option<Valuation>, EvalError> {
        let keys = pred.free_keys().into_iter().collect_vec();
        self.extend_to_model(pred, &Valuation::new(), &keys)
    }

    /// Whether `a` and `b` agree on every valuation of `visible` once all
    /// other variables are read existentially.
    pub fn equivalent_on(&self, a: &Pred, b: &Pred, visible: &BTreeSet<VarKey>) -> Result<bool, EvalError> {
        let shown = visible.iter().cloned().collect_vec();
        let hidden = |p: &Pred| {
            p.free_keys()
                .into_iter()
                .filter(|k| !visible.contains(k))
                .collect_vec()
        };
        let (hidden_a, hidden_b) = (hidden(a), hidden(b));
        for env in self.valuations(&Valuation::new(), &shown) {
            let sat_a = self.extend_to_model(a, &env, &hidden_a)?.is_some();
            let sat_b = self.extend_to_model(b, &env, &hidden_b)?.is_some();
            if sat_a != sat_b {
                tracing::debug!(%env, sat_a, sat_b, "predicates disagree");
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn extend_to_model(&self, pred: &Pred, base: &Valuation, keys: &[VarKey]) -> Result<Option<Valuation>, EvalError> {
        for env in self.valuations(base, keys) {
            if pred.eval(&env)? {
                return Ok(Some(env));
            }
        }
        Ok(None)
    }

    fn valuations<'a>(&self, base: &'a Valuation, keys: &'a [VarKey]) -> Box<dyn Iterator<Item = Valuation> + 'a> {
        if keys.is_empty() {
            return Box::new(std::iter::once(base.clone()));
        }
        let bound = self.bound;
        Box::new(
            keys.iter()
                .map(|_| -bound..=bound)
                .multi_cartesian_product()
                .map(move |values| {
                    let mut env = base.clone();
                    for (key, value) in keys.iter().zip(values) {
                        env.set(key.clone(), value);
                    }
                    env
                }),
        )
    }
}
