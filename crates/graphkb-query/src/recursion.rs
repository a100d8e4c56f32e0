//! Recursion depth guard for nested subqueries (§9).
//!
//! Parsing and compiling are both recursive: a `Subquery`'s target, or a
//! `Comparison`'s value, can nest another subquery arbitrarily deep. The source
//! imposes no explicit cap; adopting one here is a design decision (recorded in
//! `DESIGN.md`) so pathological input fails with a `ValidationError` instead of
//! overflowing the stack.

use crate::config::QueryLimits;
use crate::error::{Error, Result, ValidationError};

#[derive(Clone, Copy, Debug)]
pub struct RecursionGuard {
    depth: usize,
    max: usize,
}

impl RecursionGuard {
    pub fn new(limits: &QueryLimits) -> Self {
        Self { depth: 0, max: limits.max_recursion_depth }
    }

    /// Descend one level, failing once the cap is reached.
    pub fn descend(self) -> Result<Self> {
        if self.depth + 1 > self.max {
            return Err(Error::Validation(ValidationError::RecursionLimitExceeded(self.max)));
        }
        Ok(Self { depth: self.depth + 1, max: self.max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_recursion_at_configured_depth() {
        let limits = QueryLimits { max_recursion_depth: 2, ..QueryLimits::default() };
        let guard = RecursionGuard::new(&limits);
        let guard = guard.descend().unwrap();
        let guard = guard.descend().unwrap();
        assert!(guard.descend().is_err());
    }
}
