//! similarTo (§4.3.3).

use crate::compiler::subquery::wrap_soft_delete;
use crate::compiler::target::compile_target;
use crate::config::QueryLimits;
use crate::error::Result;
use crate::fixed::shared::{disambiguate, push_edge_list};
use crate::ir::Target;
use graphkb_schema::Schema;
use graphkb_sql::{ParamIndex, StatementFragment};

pub fn compile_similar_to<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    history: bool,
    target: &Target,
    edges: &[String],
    tree_edges: &[String],
    match_type: &Option<String>,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let is_nested = matches!(target, Target::Nested(_));
    let (target_frag, idx) = compile_target(schema, limits, target, idx)?;
    let initial = if is_nested { target_frag.parens() } else { target_frag };

    // Phase one: bounded bidirectional expansion across similarity edges.
    let disambiguated = disambiguate(initial, edges);

    let expanded = if tree_edges.is_empty() {
        disambiguated
    } else {
        let ancestors = traverse(disambiguated.clone(), "in", tree_edges);
        let descendants = traverse(disambiguated, "out", tree_edges);
        let mut union = StatementFragment::new();
        union.push("(SELECT expand(UNIONALL(");
        union.append(ancestors);
        union.push(", ");
        union.append(descendants);
        union.push(")))");
        disambiguate(union, edges)
    };

    let restricted = match match_type {
        Some(class) => {
            let mut frag = StatementFragment::new();
            frag.push("(SELECT * FROM (");
            frag.append(expanded);
            frag.push(") WHERE INSTANCEOF ");
            frag.push(class);
            frag.push(")");
            frag
        }
        None => expanded,
    };

    let mut deduped = StatementFragment::new();
    deduped.push("SELECT DISTINCT * FROM (");
    deduped.append(restricted);
    deduped.push(")");

    let result = if history { deduped } else { wrap_soft_delete(deduped) };

    Ok((result, idx))
}

fn traverse(base: StatementFragment, direction: &str, edges: &[String]) -> StatementFragment {
    let mut frag = StatementFragment::new();
    frag.push("(TRAVERSE ");
    frag.push(direction);
    frag.push("(");
    push_edge_list(&mut frag, edges);
    frag.push(") FROM ");
    frag.append(base);
    frag.push(" MAXDEPTH 50)");
    frag
}
