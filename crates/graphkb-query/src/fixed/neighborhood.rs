//! k-hop neighborhood (§4.3.2).

use crate::compiler::clause::compile_clause;
use crate::compiler::subquery::wrap_soft_delete;
use crate::config::QueryLimits;
use crate::error::Result;
use crate::fixed::shared::push_edge_list;
use crate::ir::Clause;
use graphkb_schema::Schema;
use graphkb_sql::{ParamIndex, StatementFragment};

pub fn compile_neighborhood<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    history: bool,
    filters: &Option<Clause>,
    target: &str,
    edges: &[String],
    depth: i64,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let mut frag = StatementFragment::new();
    frag.push("MATCH {class: ");
    frag.push(target);
    frag.push(", WHERE: (");

    let mut idx = idx;
    if let Some(clause) = filters {
        let (clause_frag, next_idx) = compile_clause(schema, limits, target, clause, idx)?;
        idx = next_idx;
        frag.append(clause_frag);
    } else {
        frag.push("true");
    }
    frag.push(")}.both(");
    push_edge_list(&mut frag, edges);
    frag.push(&format!("){{while: ($depth < {depth})}} RETURN DISTINCT $pathElements"));

    let mut result = frag;
    if !history {
        result = wrap_soft_delete(result);
    }

    Ok((result, idx))
}
