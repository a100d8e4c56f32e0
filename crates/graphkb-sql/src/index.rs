//! Parameter name allocation.
//!
//! Parameter indexing is scoped to a single compilation (§5): a per-call
//! monotonically increasing counter, combined with a caller-supplied prefix,
//! guarantees globally unique placeholder names across recursive composition
//! without any shared mutable state. `ParamIndex` is `Copy`; every allocation
//! returns the *next* index by value rather than mutating in place, so callers
//! thread it explicitly through their return values.

/// An immutable cursor over the next free parameter slot in a compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamIndex<'a> {
    prefix: &'a str,
    next: usize,
}

impl<'a> ParamIndex<'a> {
    /// Start a fresh cursor at `start` with the given prefix.
    pub fn new(prefix: &'a str, start: usize) -> Self {
        Self { prefix, next: start }
    }

    /// Allocate the next parameter name, returning it along with the advanced cursor.
    pub fn next_name(self) -> (String, Self) {
        let name = format!("{}param{}", self.prefix, self.next);
        (name, Self { prefix: self.prefix, next: self.next + 1 })
    }

    /// The raw next-free index, for callers that need to report progress.
    pub fn position(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_sequential_names() {
        let idx = ParamIndex::new("", 0);
        let (n0, idx) = idx.next_name();
        let (n1, idx) = idx.next_name();
        let (n2, _idx) = idx.next_name();
        assert_eq!(n0, "param0");
        assert_eq!(n1, "param1");
        assert_eq!(n2, "param2");
    }

    #[test]
    fn honors_prefix_and_start() {
        let idx = ParamIndex::new("sub1_", 5);
        let (name, idx) = idx.next_name();
        assert_eq!(name, "sub1_param5");
        assert_eq!(idx.position(), 6);
    }

    #[test]
    fn is_copy_not_mutated_in_place() {
        let idx = ParamIndex::new("", 0);
        let (_first, _advanced) = idx.next_name();
        // `idx` itself is untouched; re-using it re-allocates the same name.
        let (again, _) = idx.next_name();
        assert_eq!(again, "param0");
    }
}
