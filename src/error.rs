use thiserror::Error;

use crate::catalog::Attribute;

/// Errors raised while building or optimizing a plan.
///
/// None of these are transient: they indicate a malformed input plan, an inconsistent catalog or a
/// bug in a rewrite rule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptError {
    /// The catalog has no relation with this name.
    #[error("unknown relation: {0}")]
    UnknownRelation(String),

    /// An operator references an attribute its input does not produce.
    #[error("attribute {attribute} is not available to {operator}")]
    SchemaViolation {
        attribute: Attribute,
        operator: String,
    },

    /// A predicate which is neither `attr = value` nor `attr = attr`.
    #[error("unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    /// Structurally invalid plan, e.g. an operator with the wrong number of inputs.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
}

pub type OptResult<T> = anyhow::Result<T>;
