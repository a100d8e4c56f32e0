//! Shared target compilation (§4.4.3): a `Target` compiles to either a literal
//! record-id list, a bare class name, or a recursively compiled nested query.

use crate::config::QueryLimits;
use crate::error::Result;
use crate::ir::Target;
use graphkb_schema::Schema;
use graphkb_sql::{ParamIndex, StatementFragment};

pub fn compile_target<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    target: &Target,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    match target {
        Target::Class(name) => Ok((StatementFragment::raw(name.clone()), idx)),
        Target::Ids(ids) => {
            let mut frag = StatementFragment::new();
            frag.push_record_id_list(ids);
            Ok((frag, idx))
        }
        Target::Nested(node) => crate::compiler::compile_query_node(schema, limits, node, idx),
    }
}
