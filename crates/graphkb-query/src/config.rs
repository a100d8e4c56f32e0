//! Tunable bounds threaded through the parser and option normalizer (§4.5, §4.6, §9).
//!
//! Kept as an injected struct rather than module-level constants, matching
//! `postrust-core::config::AppConfig`'s role: a plain `serde`-friendly struct with a
//! `Default`, passed by reference rather than read from a singleton (§5: "no global
//! mutable state").

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryLimits {
    pub limit_min: i64,
    pub limit_max: i64,
    pub skip_min: i64,
    pub neighbors_min: i64,
    pub neighbors_max: i64,
    pub tree_depth_min: i64,
    pub tree_depth_max: i64,
    pub neighborhood_depth_min: i64,
    pub neighborhood_depth_max: i64,
    /// Cap on parser/compiler recursion through nested subqueries (§9: "adopting one
    /// is a design decision to record" — recorded in DESIGN.md as 32).
    pub max_recursion_depth: usize,
    pub default_tree_edges: Vec<String>,
    pub default_similarity_edges: Vec<String>,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            limit_min: 1,
            limit_max: 1000,
            skip_min: 0,
            neighbors_min: 0,
            neighbors_max: 4,
            tree_depth_min: 1,
            tree_depth_max: 50,
            neighborhood_depth_min: 0,
            neighborhood_depth_max: 4,
            max_recursion_depth: 32,
            default_tree_edges: vec!["SubClassOf".to_string(), "ElementOf".to_string()],
            default_similarity_edges: vec![
                "AliasOf".to_string(),
                "CrossReferenceOf".to_string(),
                "DeprecatedBy".to_string(),
                "GeneralizationOf".to_string(),
            ],
        }
    }
}
