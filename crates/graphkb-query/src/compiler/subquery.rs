//! Generic `Subquery` compilation (§4.4.3).

use crate::compiler::clause::compile_clause;
use crate::compiler::target::compile_target;
use crate::config::QueryLimits;
use crate::error::Result;
use crate::ir::{Subquery, Target};
use graphkb_schema::Schema;
use graphkb_sql::{ParamIndex, StatementFragment};

pub fn compile_subquery<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    sub: &Subquery,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let is_nested = matches!(sub.target, Target::Nested(_));
    let (target_frag, mut idx) = compile_target(schema, limits, &sub.target, idx)?;

    let mut frag = StatementFragment::new();
    frag.push("SELECT * FROM ");
    if is_nested {
        frag.append(target_frag.parens());
    } else {
        frag.append(target_frag);
    }

    if let Some(clause) = &sub.filters {
        let (clause_frag, next_idx) = compile_clause(schema, limits, &sub.model, clause, idx)?;
        idx = next_idx;
        frag.push(" WHERE ");
        if is_nested {
            frag.append(clause_frag.parens());
        } else {
            frag.append(clause_frag);
        }
    }

    if !sub.history {
        frag = wrap_soft_delete(frag);
    }

    Ok((frag, idx))
}

/// Every non-history-scoped select enclosure filters soft-deleted records at its
/// own nesting boundary (§6.4).
pub fn wrap_soft_delete(frag: StatementFragment) -> StatementFragment {
    frag.map_statement(|s| format!("SELECT * FROM ({s}) WHERE deletedAt IS NULL"))
}
