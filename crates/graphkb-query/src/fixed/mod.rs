//! The six fixed traversal forms (§4.3): each compiles to a purpose-built
//! statement shape rather than going through the generic subquery compiler.

mod edge;
mod keyword;
mod neighborhood;
mod shared;
mod similar_to;
mod structural_variant;
mod tree_walk;

use crate::config::QueryLimits;
use crate::error::Result;
use crate::ir::{FixedPayload, FixedSubquery, QueryType};
use graphkb_schema::Schema;
use graphkb_sql::{ParamIndex, StatementFragment};

pub fn compile_fixed<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    fixed: &FixedSubquery,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    match &fixed.payload {
        FixedPayload::TreeWalk {
            filters,
            target,
            edges,
            tree_edges,
            depth,
            disambiguate,
            model,
        } => tree_walk::compile_tree_walk(
            schema,
            limits,
            fixed.query_type,
            fixed.history,
            filters,
            target,
            edges,
            tree_edges,
            *depth,
            *disambiguate,
            model,
            idx,
        ),
        FixedPayload::Neighborhood { filters, target, edges, depth } => {
            neighborhood::compile_neighborhood(schema, limits, fixed.history, filters, target, edges, *depth, idx)
        }
        FixedPayload::SimilarTo { target, edges, tree_edges, match_type } => {
            similar_to::compile_similar_to(schema, limits, fixed.history, target, edges, tree_edges, match_type, idx)
        }
        FixedPayload::Keyword { target, keyword, operator } => {
            debug_assert_eq!(fixed.query_type, QueryType::Keyword);
            keyword::compile_keyword(schema, limits, fixed.history, target, keyword, *operator, idx)
        }
        FixedPayload::Edge { target, direction, vertex_filter } => {
            edge::compile_edge(schema, limits, fixed.history, target, *direction, vertex_filter, idx)
        }
    }
}
