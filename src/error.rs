//! Error types for verification-condition generation.

use thiserror::Error;

use crate::ast::Span;

pub type Result<T, E = VcgError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum VcgError {
    /// A statement kind with no transformer rule, under the `Reject` policy.
    #[error("unsupported statement kind `{kind}` at {span}")]
    Unsupported { kind: &'static str, span: Span },

    /// An expression of the wrong sort reached the translator, e.g. a
    /// boolean where an integer term is needed.
    #[error("cannot translate `{expr}` at {span}: {reason}")]
    Translate {
        expr: String,
        span: Span,
        reason: &'static str,
    },

    #[error("main procedure `{0}` not found")]
    MissingMain(String),

    #[error("statement nesting exceeds limit of {limit} at {span}")]
    TooDeep { limit: usize, span: Span },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed input: {0}")]
    Input(#[from] serde_json::Error),
}

/// Failures of concrete evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
    #[error("unbound variable `{0}`")]
    Unbound(String),
}
