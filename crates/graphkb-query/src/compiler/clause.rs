//! Clause compilation (§4.4.2): children compile in order, each multi-child
//! nested clause parenthesized as a unit, joined by the clause's operator.

use crate::compiler::comparison::compile_comparison;
use crate::config::QueryLimits;
use crate::error::Result;
use crate::ir::{Clause, ClauseChild};
use graphkb_schema::Schema;
use graphkb_sql::{ParamIndex, StatementFragment};

pub fn compile_clause<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    model: &str,
    clause: &Clause,
    mut idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let mut parts = Vec::with_capacity(clause.children.len());
    for child in &clause.children {
        let frag = match child {
            ClauseChild::Comparison(cmp) => {
                let (frag, next) = compile_comparison(schema, limits, model, cmp, idx)?;
                idx = next;
                frag
            }
            ClauseChild::Clause(inner) => {
                let (frag, next) = compile_clause(schema, limits, model, inner, idx)?;
                idx = next;
                if inner.needs_parens() {
                    frag.parens()
                } else {
                    frag
                }
            }
        };
        parts.push(frag);
    }

    let sep = format!(" {} ", clause.operator.as_str());
    Ok((StatementFragment::join(&sep, parts), idx))
}
