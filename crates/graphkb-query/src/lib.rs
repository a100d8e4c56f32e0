//! Structured query layer for the GraphKB API (§1-§6).
//!
//! Parses a schema-typed JSON query description into a typed IR (§3), then compiles
//! the IR into a parameterized statement (§4, §5) for a graph database supporting
//! `TRAVERSE`/`MATCH` traversals and SQL-like projections. The schema itself is an
//! externally supplied, read-only adapter (`graphkb_schema::Schema`); this crate
//! never mutates it.

mod compiler;
mod config;
mod error;
mod fixed;
mod ir;
mod parser;
mod projection;
mod recursion;

pub use config::QueryLimits;
pub use error::{Error, Result, ValidationError};
pub use ir::{
    Clause, ClauseChild, Comparison, ComparisonValue, EdgeDirection, FixedPayload, FixedSubquery,
    LogicOp, Operator, OrderDirection, Projection, QueryNode, QueryType, Scalar, Subquery, Target,
    WrapperQuery,
};

use graphkb_schema::Schema;
use graphkb_sql::Param;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Parse and compile a raw JSON query description in one call: the public entry
/// point callers reach for (§1, end to end).
pub fn compile_query(
    schema: &Schema,
    limits: &QueryLimits,
    raw_query: &JsonValue,
) -> Result<(String, IndexMap<String, Param>)> {
    let wrapper = parser::parse(schema, limits, raw_query)?;
    compiler::compile(schema, limits, &wrapper)
}

/// Parse a raw JSON query description into its IR without compiling it, for
/// callers that want to inspect or transform the tree before compilation.
pub fn parse_query(schema: &Schema, limits: &QueryLimits, raw_query: &JsonValue) -> Result<WrapperQuery> {
    parser::parse(schema, limits, raw_query)
}

/// Compile an already-parsed [`WrapperQuery`] to its statement text and parameter
/// map.
pub fn compile_parsed(schema: &Schema, limits: &QueryLimits, wrapper: &WrapperQuery) -> Result<(String, IndexMap<String, Param>)> {
    compiler::compile(schema, limits, wrapper)
}

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        compile_query, parse_query, Clause, ClauseChild, Comparison, ComparisonValue, EdgeDirection,
        Error, FixedPayload, FixedSubquery, LogicOp, Operator, OrderDirection, Projection,
        QueryLimits, QueryNode, QueryType, Result, Scalar, Subquery, Target, ValidationError,
        WrapperQuery,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphkb_schema::{Class, DataType, Property};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new().with_class(
            Class::new("Disease")
                .property(Property::new("name", DataType::Scalar))
                .property(Property::new("deletedAt", DataType::Scalar)),
        )
    }

    // Scenario A (§8): a literal id-list target with history off wraps the base
    // select in the soft-delete filter.
    #[test]
    fn scenario_a_id_list_target_wraps_soft_delete() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({"target": ["#13:1", "#13:2"]});
        let (statement, params) = compile_query(&schema, &limits, &spec).unwrap();
        assert_eq!(
            statement,
            "SELECT * FROM (SELECT * FROM [#13:1, #13:2]) WHERE deletedAt IS NULL"
        );
        assert!(params.is_empty());
    }
}
