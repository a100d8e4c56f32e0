//! ancestors / descendants (§4.3.1).

use crate::compiler::clause::compile_clause;
use crate::compiler::subquery::wrap_soft_delete;
use crate::compiler::target::compile_target;
use crate::config::QueryLimits;
use crate::error::Result;
use crate::fixed::shared::{disambiguate, push_edge_list};
use crate::ir::{Clause, QueryType, Target};
use graphkb_schema::Schema;
use graphkb_sql::{ParamIndex, StatementFragment};

#[allow(clippy::too_many_arguments)]
pub fn compile_tree_walk<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    query_type: QueryType,
    history: bool,
    filters: &Option<Clause>,
    target: &Target,
    edges: &[String],
    tree_edges: &[String],
    depth: i64,
    disambiguate_flag: bool,
    model: &str,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let (mut starter, mut idx) = build_starter(schema, limits, target, filters, model, idx)?;

    if disambiguate_flag {
        starter = disambiguate(starter, edges);
    }

    let direction = match query_type {
        QueryType::Ancestors => "in",
        QueryType::Descendants => "out",
        other => unreachable!("tree walk only handles ancestors/descendants, got {other:?}"),
    };

    let mut result = StatementFragment::new();
    result.push("TRAVERSE ");
    result.push(direction);
    result.push("(");
    push_edge_list(&mut result, tree_edges);
    result.push(") FROM ");
    result.append(starter);
    result.push(&format!(" MAXDEPTH {depth}"));

    if !history {
        result = wrap_soft_delete(result);
    }

    Ok((result, idx))
}

fn build_starter<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    target: &Target,
    filters: &Option<Clause>,
    model: &str,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    if let Target::Ids(ids) = target {
        let mut frag = StatementFragment::new();
        frag.push_record_id_list(ids);
        return Ok((frag, idx));
    }

    let is_nested = matches!(target, Target::Nested(_));
    let (target_frag, mut idx) = compile_target(schema, limits, target, idx)?;

    let mut frag = StatementFragment::new();
    frag.push("(SELECT * FROM ");
    if is_nested {
        frag.append(target_frag.parens());
    } else {
        frag.append(target_frag);
    }
    if let Some(clause) = filters {
        let (clause_frag, next_idx) = compile_clause(schema, limits, model, clause, idx)?;
        idx = next_idx;
        frag.push(" WHERE ");
        frag.append(clause_frag);
    }
    frag.push(")");

    Ok((frag, idx))
}
