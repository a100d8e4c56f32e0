//! `parseSubquery` (§4.2.3).

use crate::config::QueryLimits;
use crate::error::{Error, Result, ValidationError};
use crate::ir::{
    Clause, EdgeDirection, FixedPayload, FixedSubquery, Operator, QueryNode, QueryType, Subquery,
    Target,
};
use crate::parser::clause::{normalize_filters_spec, parse_clause};
use crate::parser::target::parse_target;
use crate::recursion::RecursionGuard;
use graphkb_schema::Schema;
use serde_json::Value as JsonValue;

const GENERIC_FIELDS: &[&str] = &[
    "target",
    "filters",
    "history",
    "model",
    "limit",
    "skip",
    "neighbors",
    "orderBy",
    "orderByDirection",
    "returnProperties",
    "count",
];

pub fn parse_subquery(
    schema: &Schema,
    limits: &QueryLimits,
    spec: &JsonValue,
    guard: RecursionGuard,
) -> Result<QueryNode> {
    let obj = spec
        .as_object()
        .ok_or(Error::Validation(ValidationError::MissingTarget))?;

    let query_type_raw = obj.get("queryType").and_then(JsonValue::as_str);

    if query_type_raw.is_none() {
        for key in obj.keys() {
            if !GENERIC_FIELDS.contains(&key.as_str()) {
                return Err(Error::Validation(ValidationError::UnrecognizedField(
                    key.clone(),
                )));
            }
        }
    }

    let history = obj
        .get("history")
        .and_then(JsonValue::as_bool)
        .unwrap_or(false);

    let raw_target = obj.get("target");
    let target = match raw_target {
        Some(raw) => Some(parse_target(schema, limits, raw, guard)?),
        None => None,
    };

    let resolved_class: Option<&str> = match &target {
        Some(Target::Class(name)) => Some(name.as_str()),
        _ => None,
    };

    let model_hint = obj.get("model").and_then(JsonValue::as_str);
    let default_model = if query_type_raw == Some("edge") { "E" } else { "V" };
    let model = resolved_class.or(model_hint).unwrap_or(default_model);

    let filters = match obj.get("filters") {
        Some(raw) => {
            let normalized = normalize_filters_spec(raw);
            Some(parse_clause(schema, limits, model, &normalized, guard)?)
        }
        None => None,
    };

    // Rule 6: an edge class filtered by a top-level `out`/`in` key must be
    // rewritten into a typed edge FixedSubquery; edges cannot be materialized
    // via vertex-space filters.
    if query_type_raw.is_none() {
        if let Some(class_name) = resolved_class {
            if schema.is_edge(class_name) {
                if let Some(rewritten) =
                    try_rewrite_as_edge(schema, limits, class_name, obj, history, guard)?
                {
                    return Ok(rewritten);
                }
            }
        }
    }

    match query_type_raw {
        None => Ok(QueryNode::Subquery(Subquery {
            target: target.ok_or(Error::Validation(ValidationError::MissingTarget))?,
            history,
            filters,
            model: model.to_string(),
        })),
        Some(qt) => build_fixed_subquery(schema, limits, qt, obj, target, filters, history, guard, model),
    }
}

fn try_rewrite_as_edge(
    schema: &Schema,
    limits: &QueryLimits,
    edge_class: &str,
    obj: &serde_json::Map<String, JsonValue>,
    history: bool,
    guard: RecursionGuard,
) -> Result<Option<QueryNode>> {
    let Some(raw_filters) = obj.get("filters") else {
        return Ok(None);
    };
    let Some(filter_obj) = raw_filters.as_object() else {
        return Ok(None);
    };
    let direction = if filter_obj.contains_key("out") {
        Some((EdgeDirection::Out, "out"))
    } else if filter_obj.contains_key("in") {
        Some((EdgeDirection::In, "in"))
    } else {
        None
    };
    let Some((direction, key)) = direction else {
        return Ok(None);
    };

    tracing::trace!(
        class = edge_class,
        direction = key,
        "rewriting vertex-filtered edge subquery into a typed edge FixedSubquery"
    );

    let vertex_filter = parse_target(schema, limits, &filter_obj[key], guard.descend()?)?;

    Ok(Some(QueryNode::Fixed(FixedSubquery {
        query_type: QueryType::Edge,
        history,
        payload: FixedPayload::Edge {
            target: edge_class.to_string(),
            direction,
            vertex_filter,
        },
    })))
}

fn build_fixed_subquery(
    schema: &Schema,
    limits: &QueryLimits,
    query_type: &str,
    obj: &serde_json::Map<String, JsonValue>,
    target: Option<Target>,
    filters: Option<Clause>,
    history: bool,
    guard: RecursionGuard,
    model: &str,
) -> Result<QueryNode> {
    let payload = match query_type {
        "ancestors" | "descendants" => {
            let qt = if query_type == "ancestors" {
                QueryType::Ancestors
            } else {
                QueryType::Descendants
            };
            let depth = read_bounded_i64(
                obj,
                "depth",
                50,
                limits.tree_depth_min,
                limits.tree_depth_max,
            )?;
            let disambiguate = obj
                .get("disambiguate")
                .and_then(JsonValue::as_bool)
                .unwrap_or(true);
            // `edges` disambiguates the starting set across similarity edges;
            // `treeEdges` is what the TRAVERSE itself follows (§9).
            let edges = read_edge_list(schema, obj, "edges", &limits.default_similarity_edges)?;
            let tree_edges = read_edge_list(schema, obj, "treeEdges", &limits.default_tree_edges)?;
            return Ok(QueryNode::Fixed(FixedSubquery {
                query_type: qt,
                history,
                payload: FixedPayload::TreeWalk {
                    filters,
                    target: target.ok_or(Error::Validation(ValidationError::MissingTarget))?,
                    edges,
                    tree_edges,
                    depth,
                    disambiguate,
                    model: model.to_string(),
                },
            }));
        }
        "neighborhood" => {
            let class_name = match &target {
                Some(Target::Class(name)) => name.clone(),
                _ => return Err(Error::Validation(ValidationError::MissingTarget)),
            };
            let depth = read_bounded_i64(
                obj,
                "depth",
                1,
                limits.neighborhood_depth_min,
                limits.neighborhood_depth_max,
            )?;
            let edges = read_edge_list(schema, obj, "edges", &[])?;
            FixedPayload::Neighborhood {
                filters,
                target: class_name,
                edges,
                depth,
            }
        }
        "similarTo" => {
            let target = target.ok_or(Error::Validation(ValidationError::MissingTarget))?;
            let edges = read_edge_list(schema, obj, "edges", &limits.default_similarity_edges)?;
            if edges.is_empty() {
                return Err(Error::Validation(ValidationError::NoSimilarityEdges));
            }
            let tree_edges = read_edge_list(schema, obj, "treeEdges", &[])?;
            let match_type = match obj.get("matchType").and_then(JsonValue::as_str) {
                Some(name) => {
                    if !schema.has(name) {
                        return Err(Error::Validation(ValidationError::UnknownClass(
                            name.to_string(),
                        )));
                    }
                    Some(name.to_string())
                }
                None => None,
            };
            FixedPayload::SimilarTo {
                target,
                edges,
                tree_edges,
                match_type,
            }
        }
        "keyword" => {
            let class_name = match &target {
                Some(Target::Class(name)) => name.clone(),
                _ => return Err(Error::Validation(ValidationError::MissingTarget)),
            };
            if schema.is_edge(&class_name) {
                return Err(Error::Validation(ValidationError::UnknownClass(class_name)));
            }
            let keyword = obj
                .get("keyword")
                .and_then(JsonValue::as_str)
                .unwrap_or("")
                .trim()
                .to_string();
            if keyword.is_empty() {
                return Err(Error::Validation(ValidationError::EmptyKeyword));
            }
            let operator = match obj.get("operator").and_then(JsonValue::as_str) {
                Some("=") => Operator::Eq,
                Some("CONTAINSTEXT") | None => Operator::ContainsText,
                Some(other) => {
                    return Err(Error::Validation(ValidationError::OperatorNotAllowed {
                        operator: other.to_string(),
                        reason: "keyword search only allows = or CONTAINSTEXT".to_string(),
                    }))
                }
            };
            FixedPayload::Keyword {
                target: class_name,
                keyword,
                operator,
            }
        }
        "edge" => {
            let class_name = match &target {
                Some(Target::Class(name)) => name.clone(),
                _ => return Err(Error::Validation(ValidationError::MissingTarget)),
            };
            if !schema.is_edge(&class_name) {
                return Err(Error::Validation(ValidationError::UnknownEdgeClass(
                    class_name,
                )));
            }
            let direction = match obj.get("direction").and_then(JsonValue::as_str) {
                Some("in") => EdgeDirection::In,
                Some("out") => EdgeDirection::Out,
                Some("both") | None => EdgeDirection::Both,
                Some(other) => {
                    return Err(Error::Validation(ValidationError::InvalidOptionValue {
                        option: "direction".to_string(),
                        value: other.to_string(),
                    }))
                }
            };
            let vertex_filter_raw = obj
                .get("vertexFilter")
                .ok_or(Error::Validation(ValidationError::MissingVertexFilter))?;
            let vertex_filter = parse_target(schema, limits, vertex_filter_raw, guard.descend()?)?;
            FixedPayload::Edge {
                target: class_name,
                direction,
                vertex_filter,
            }
        }
        other => {
            return Err(Error::Validation(ValidationError::InvalidOptionValue {
                option: "queryType".to_string(),
                value: other.to_string(),
            }))
        }
    };

    let resolved_query_type = match query_type {
        "neighborhood" => QueryType::Neighborhood,
        "similarTo" => QueryType::SimilarTo,
        "keyword" => QueryType::Keyword,
        "edge" => QueryType::Edge,
        _ => unreachable!("ancestors/descendants returned early above"),
    };

    Ok(QueryNode::Fixed(FixedSubquery {
        query_type: resolved_query_type,
        history,
        payload,
    }))
}

fn read_bounded_i64(
    obj: &serde_json::Map<String, JsonValue>,
    key: &str,
    default: i64,
    min: i64,
    max: i64,
) -> Result<i64> {
    let value = match obj.get(key) {
        Some(raw) => raw.as_i64().ok_or_else(|| {
            Error::Validation(ValidationError::InvalidOptionValue {
                option: key.to_string(),
                value: raw.to_string(),
            })
        })?,
        None => default,
    };
    if value < min || value > max {
        return Err(Error::Validation(ValidationError::DepthOutOfRange(
            value, min, max,
        )));
    }
    Ok(value)
}

fn read_edge_list(
    schema: &Schema,
    obj: &serde_json::Map<String, JsonValue>,
    key: &str,
    default: &[String],
) -> Result<Vec<String>> {
    let names = match obj.get(key) {
        Some(raw) => raw
            .as_array()
            .ok_or_else(|| {
                Error::Validation(ValidationError::InvalidOptionValue {
                    option: key.to_string(),
                    value: raw.to_string(),
                })
            })?
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| {
                    Error::Validation(ValidationError::InvalidOptionValue {
                        option: key.to_string(),
                        value: v.to_string(),
                    })
                })
            })
            .collect::<Result<Vec<_>>>()?,
        None => default.to_vec(),
    };

    for name in &names {
        if !schema.is_edge(name) {
            return Err(Error::Validation(ValidationError::UnknownEdgeClass(
                name.clone(),
            )));
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphkb_schema::Class;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .with_class(Class::new("Disease"))
            .with_class(Class::new("AliasOf").edge("Disease", "Disease"))
            .with_class(Class::new("SubClassOf").edge("Disease", "Disease"))
            .with_class(Class::new("ElementOf").edge("Disease", "Disease"))
    }

    #[test]
    fn plain_id_list_target() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({"target": ["#13:1", "#13:2"]});
        let node = parse_subquery(&schema, &limits, &spec, RecursionGuard::new(&limits)).unwrap();
        match node {
            QueryNode::Subquery(sub) => {
                assert_eq!(sub.history, false);
                match sub.target {
                    Target::Ids(ids) => assert_eq!(ids.len(), 2),
                    other => panic!("expected Ids target, got {other:?}"),
                }
            }
            other => panic!("expected generic subquery, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_field_without_query_type_is_rejected() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({"target": "Disease", "bogus": 1});
        let err = parse_subquery(&schema, &limits, &spec, RecursionGuard::new(&limits)).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnrecognizedField(_))
        ));
    }

    #[test]
    fn edge_rewrite_heuristic_fires_on_out_filter() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({"target": "AliasOf", "filters": {"out": "Disease"}});
        let node = parse_subquery(&schema, &limits, &spec, RecursionGuard::new(&limits)).unwrap();
        match node {
            QueryNode::Fixed(fixed) => {
                assert_eq!(fixed.query_type, QueryType::Edge);
                match fixed.payload {
                    FixedPayload::Edge { direction, .. } => {
                        assert_eq!(direction, EdgeDirection::Out)
                    }
                    other => panic!("expected Edge payload, got {other:?}"),
                }
            }
            other => panic!("expected fixed edge subquery, got {other:?}"),
        }
    }

    #[test]
    fn ancestors_defaults_depth_to_fifty() {
        let schema = schema();
        let limits = QueryLimits {
            default_similarity_edges: vec!["AliasOf".to_string()],
            default_tree_edges: vec!["SubClassOf".to_string(), "ElementOf".to_string()],
            ..QueryLimits::default()
        };
        let spec = json!({"queryType": "ancestors", "target": "Disease"});
        let node = parse_subquery(&schema, &limits, &spec, RecursionGuard::new(&limits)).unwrap();
        match node {
            QueryNode::Fixed(fixed) => match fixed.payload {
                FixedPayload::TreeWalk { depth, disambiguate, .. } => {
                    assert_eq!(depth, 50);
                    assert_eq!(disambiguate, true);
                }
                other => panic!("expected TreeWalk payload, got {other:?}"),
            },
            other => panic!("expected fixed subquery, got {other:?}"),
        }
    }

    #[test]
    fn depth_out_of_range_is_rejected() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({"queryType": "descendants", "target": "Disease", "depth": 51});
        let err = parse_subquery(&schema, &limits, &spec, RecursionGuard::new(&limits)).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::DepthOutOfRange(51, 1, 50))
        ));
    }

    #[test]
    fn similar_to_requires_at_least_one_edge() {
        let schema = schema();
        let limits = QueryLimits {
            default_similarity_edges: vec![],
            ..limits_for_test()
        };
        let spec = json!({"queryType": "similarTo", "target": ["#13:1"], "edges": []});
        let err = parse_subquery(&schema, &limits, &spec, RecursionGuard::new(&limits)).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::NoSimilarityEdges)
        ));
    }

    fn limits_for_test() -> QueryLimits {
        QueryLimits::default()
    }
}
