//! Helpers shared by more than one fixed-query compiler.

use graphkb_sql::StatementFragment;

/// Render a quoted, comma-separated edge-class list for a `TRAVERSE`/`MATCH`
/// clause: `'Edge1', 'Edge2'`.
pub fn push_edge_list(frag: &mut StatementFragment, edges: &[String]) {
    for (i, edge) in edges.iter().enumerate() {
        if i > 0 {
            frag.push(", ");
        }
        frag.push("'");
        frag.push(edge);
        frag.push("'");
    }
}

/// Expand a starting set across similarity edges, bounded at depth 4 (§4.3.1,
/// §4.3.3: "bounded bidirectional traversal ... depth <= 4").
pub fn disambiguate(base: StatementFragment, edges: &[String]) -> StatementFragment {
    let mut frag = StatementFragment::new();
    frag.push("(TRAVERSE both(");
    push_edge_list(&mut frag, edges);
    frag.push(") FROM ");
    frag.append(base);
    frag.push(" MAXDEPTH 4)");
    frag
}
