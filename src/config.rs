use serde::{Deserialize, Serialize};

use crate::error::{Result, VcgError};

/// What to do with a statement that has no transformer rule
/// (calls, and loops without an invariant).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedPolicy {
    /// Fail with `VcgError::Unsupported`.
    #[default]
    Reject,
    /// Return the precondition unchanged and record the site as unsound.
    PassThrough,
}

/// Where the branch guard is conjoined in `sp(if C then S1 else S2, P)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionalRule {
    /// `(C && sp(S1, P)) || (!C && sp(S2, P))`. The guard is read in the
    /// post-branch state.
    #[default]
    GuardOutside,
    /// `sp(S1, C && P) || sp(S2, !C && P)`. The guard is renamed along with
    /// the precondition, so it keeps describing the pre-branch state when a
    /// branch assigns one of its variables.
    GuardOnEntry,
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VcgConfig {
    pub unsupported: UnsupportedPolicy,
    pub conditional: ConditionalRule,
    /// Inserted between a variable name and its counter when naming the
    /// value a variable held before an assignment, e.g. `x_0`.
    pub fresh_separator: String,
    /// Maximum statement nesting depth.
    pub max_depth: usize,
}

impl Default for VcgConfig {
    fn default() -> Self {
        Self {
            unsupported: UnsupportedPolicy::Reject,
            conditional: ConditionalRule::GuardOutside,
            fresh_separator: "_".to_string(),
            max_depth: 512,
        }
    }
}

impl VcgConfig {
    pub fn with_policy(mut self, policy: UnsupportedPolicy) -> Self {
        self.unsupported = policy;
        self
    }

    pub fn with_conditional(mut self, rule: ConditionalRule) -> Self {
        self.conditional = rule;
        self
    }

    pub fn with_fresh_separator(mut self, separator: &str) -> Self {
        self.fresh_separator = separator.to_string();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.fresh_separator.is_empty() {
            return Err(VcgError::InvalidConfig(
                "fresh_separator must not be empty".to_string(),
            ));
        }
        if self
            .fresh_separator
            .chars()
            .any(|c| c.is_whitespace() || c == '(' || c == ')')
        {
            return Err(VcgError::InvalidConfig(format!(
                "fresh_separator {:?} contains whitespace or parentheses",
                self.fresh_separator
            )));
        }
        if self.max_depth == 0 {
            return Err(VcgError::InvalidConfig(
                "max_depth must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
