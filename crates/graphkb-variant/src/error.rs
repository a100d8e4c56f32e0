//! Parse failures for structural variant expressions.

use thiserror::Error;

/// Raised when a candidate keyword does not parse as a structural variant
/// expression. The keyword-search fallback (§4.3.5, §9) treats this as "not a
/// variant" and falls back to plain keyword matching, logging `reason` at debug
/// level rather than swallowing it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("not a structural variant expression: {reason}")]
pub struct ParsingError {
    pub reason: String,
}

impl ParsingError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}
