//! Compiles a validated IR tree into a parameterized statement (§4.4, §5).

pub(crate) mod clause;
mod comparison;
pub(crate) mod subquery;
pub(crate) mod target;
mod wrapper;

use crate::config::QueryLimits;
use crate::error::Result;
use crate::ir::{QueryNode, WrapperQuery};
use graphkb_schema::Schema;
use graphkb_sql::{Param, ParamIndex, StatementFragment};
use indexmap::IndexMap;

/// Compile a single IR node, dispatching to the generic subquery compiler or one
/// of the six fixed-query compilers.
pub fn compile_query_node<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    node: &QueryNode,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    match node {
        QueryNode::Subquery(sub) => subquery::compile_subquery(schema, limits, sub, idx),
        QueryNode::Fixed(fixed) => crate::fixed::compile_fixed(schema, limits, fixed, idx),
    }
}

/// Compile a full [`WrapperQuery`] to its final statement text and parameter map.
pub fn compile(schema: &Schema, limits: &QueryLimits, wrapper: &WrapperQuery) -> Result<(String, IndexMap<String, Param>)> {
    let idx = ParamIndex::new("", 0);
    let (inner, _idx) = compile_query_node(schema, limits, &wrapper.inner, idx)?;
    let compiled = wrapper::compile_wrapper(schema, wrapper, inner)?;
    Ok(compiled.build())
}
