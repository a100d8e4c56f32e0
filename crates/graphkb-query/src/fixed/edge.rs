//! typed edge expansion (§4.3.6).

use crate::compiler::subquery::wrap_soft_delete;
use crate::compiler::target::compile_target;
use crate::config::QueryLimits;
use crate::error::Result;
use crate::ir::{EdgeDirection, Target};
use graphkb_schema::Schema;
use graphkb_sql::{ParamIndex, StatementFragment};

pub fn compile_edge<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    history: bool,
    target: &str,
    direction: EdgeDirection,
    vertex_filter: &Target,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let is_nested = matches!(vertex_filter, Target::Nested(_));
    let (vertex_frag, idx) = compile_target(schema, limits, vertex_filter, idx)?;

    let mut frag = StatementFragment::new();
    frag.push("SELECT expand(");
    frag.push(direction_fn(direction));
    frag.push("E('");
    frag.push(target);
    frag.push("')) FROM ");
    if is_nested {
        frag.append(vertex_frag.parens());
    } else {
        frag.append(vertex_frag);
    }

    let result = if history { frag } else { wrap_soft_delete(frag) };
    Ok((result, idx))
}

fn direction_fn(direction: EdgeDirection) -> &'static str {
    match direction {
        EdgeDirection::In => "in",
        EdgeDirection::Out => "out",
        EdgeDirection::Both => "both",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphkb_schema::Schema;
    use graphkb_sql::ParamIndex;
    use pretty_assertions::assert_eq;

    #[test]
    fn expands_typed_edge_from_a_class_target() {
        let schema = Schema::new();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let vertex_filter = Target::Class("Disease".to_string());

        let (frag, _idx) = compile_edge(&schema, &limits, false, "AliasOf", EdgeDirection::Out, &vertex_filter, idx).unwrap();

        assert_eq!(
            frag.statement(),
            "SELECT * FROM (SELECT expand(outE('AliasOf')) FROM Disease) WHERE deletedAt IS NULL"
        );
    }

    #[test]
    fn history_queries_skip_soft_delete_filter() {
        let schema = Schema::new();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let vertex_filter = Target::Class("Disease".to_string());

        let (frag, _idx) = compile_edge(&schema, &limits, true, "AliasOf", EdgeDirection::Both, &vertex_filter, idx).unwrap();

        assert_eq!(frag.statement(), "SELECT expand(bothE('AliasOf')) FROM Disease");
    }
}
