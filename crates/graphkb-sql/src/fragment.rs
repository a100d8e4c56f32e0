//! The core statement-building type.
//!
//! A `StatementFragment` pairs growing statement text with the parameter map it has
//! accumulated so far. Unlike a positional SQL placeholder builder, placeholders here
//! are named by the caller (`push_param` takes a name, not just a value) because
//! parameter names are allocated up front by `ParamIndex` and threaded through
//! recursive compilation (§5) rather than owned by the fragment itself.

use crate::param::Param;
use crate::record_id::RecordId;
use indexmap::IndexMap;

/// A statement fragment with its associated named parameters.
#[derive(Clone, Debug, Default)]
pub struct StatementFragment {
    statement: String,
    params: IndexMap<String, Param>,
}

impl StatementFragment {
    /// Create a new empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fragment from raw statement text (no parameters).
    ///
    /// Only for known-safe text: keywords, operators, schema-validated class and
    /// property names. Never pass unvalidated user input here.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            statement: text.into(),
            params: IndexMap::new(),
        }
    }

    /// The accumulated statement text.
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// The accumulated parameters, in allocation order.
    pub fn params(&self) -> &IndexMap<String, Param> {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.statement.is_empty()
    }

    /// Append raw text.
    pub fn push(&mut self, text: &str) -> &mut Self {
        self.statement.push_str(text);
        self
    }

    /// Push a named parameter placeholder (`:name`) and record its value.
    pub fn push_param(&mut self, name: impl Into<String>, value: impl Into<Param>) -> &mut Self {
        let name = name.into();
        self.statement.push(':');
        self.statement.push_str(&name);
        self.params.insert(name, value.into());
        self
    }

    /// Record a parameter's value without writing its placeholder into the
    /// statement text. For callers that have already written one or more
    /// `:name` occurrences themselves (a single round's keyword predicate
    /// references the same bound word across several `OR` branches).
    pub fn bind_param(&mut self, name: impl Into<String>, value: impl Into<Param>) -> &mut Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Push a record id literally (`#cluster:position`), never as a bound parameter
    /// (§6.2: "record-ID parameters are rendered literally to work around a known
    /// driver limitation").
    pub fn push_record_id(&mut self, id: RecordId) -> &mut Self {
        self.statement.push_str(&id.to_string());
        self
    }

    /// Append a literal list of record ids: `[#c:p, #c:p, ...]`, preserving order.
    pub fn push_record_id_list(&mut self, ids: &[RecordId]) -> &mut Self {
        self.push('[');
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_record_id(*id);
        }
        self.push(']');
        self
    }

    /// Splice in another fragment's statement text, merging its parameters.
    ///
    /// Parameter names are assumed already unique (they were allocated from a single
    /// threaded `ParamIndex`), so this is a plain merge, never a renumbering.
    pub fn append(&mut self, other: StatementFragment) -> &mut Self {
        self.statement.push_str(&other.statement);
        self.params.extend(other.params);
        self
    }

    /// Join fragments with a separator, skipping empty ones.
    pub fn join(sep: &str, fragments: impl IntoIterator<Item = StatementFragment>) -> Self {
        let mut result = Self::new();
        let mut first = true;
        for frag in fragments {
            if frag.is_empty() {
                continue;
            }
            if !first {
                result.push(sep);
            }
            result.append(frag);
            first = false;
        }
        result
    }

    /// Wrap in parentheses.
    pub fn parens(mut self) -> Self {
        self.statement = format!("({})", self.statement);
        self
    }

    /// Transform the accumulated statement text in place, leaving parameters
    /// untouched. Useful for wrapping text (`NOT (...)`, an outer `SELECT`)
    /// without having to re-thread the parameter map by hand.
    pub fn map_statement(mut self, f: impl FnOnce(&str) -> String) -> Self {
        self.statement = f(&self.statement);
        self
    }

    /// Consume the fragment, returning the final statement and parameter map.
    pub fn build(self) -> (String, IndexMap<String, Param>) {
        (self.statement, self.params)
    }
}
