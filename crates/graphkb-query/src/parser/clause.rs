//! `parseClause` (§4.2.2).

use crate::config::QueryLimits;
use crate::error::{Error, Result, ValidationError};
use crate::ir::{Clause, ClauseChild, LogicOp};
use crate::parser::comparison::parse_comparison;
use crate::recursion::RecursionGuard;
use graphkb_schema::Schema;
use serde_json::Value as JsonValue;

pub fn parse_clause(
    schema: &Schema,
    limits: &QueryLimits,
    model: &str,
    spec: &JsonValue,
    guard: RecursionGuard,
) -> Result<Clause> {
    let obj = spec
        .as_object()
        .ok_or(Error::Validation(ValidationError::MalformedClause))?;

    let keys: Vec<&String> = obj.keys().collect();
    if keys.len() != 1 {
        return Err(Error::Validation(ValidationError::MalformedClause));
    }
    let key = keys[0];
    let operator = match key.as_str() {
        "AND" => LogicOp::And,
        "OR" => LogicOp::Or,
        _ => return Err(Error::Validation(ValidationError::MalformedClause)),
    };

    let list = obj[key]
        .as_array()
        .ok_or(Error::Validation(ValidationError::MalformedClause))?;
    if list.is_empty() {
        return Err(Error::Validation(ValidationError::MalformedClause));
    }

    let mut children = Vec::with_capacity(list.len());
    for child_spec in list {
        let next_guard = guard.descend()?;
        children.push(parse_clause_child(schema, limits, model, child_spec, next_guard)?);
    }

    Ok(Clause::new(operator, children))
}

/// A clause child is itself a clause when it carries a top-level AND/OR key;
/// otherwise it is parsed as a leaf comparison (§4.2.2).
fn parse_clause_child(
    schema: &Schema,
    limits: &QueryLimits,
    model: &str,
    spec: &JsonValue,
    guard: RecursionGuard,
) -> Result<ClauseChild> {
    let is_nested_clause = spec
        .as_object()
        .map(|obj| obj.keys().any(|k| k == "AND" || k == "OR"))
        .unwrap_or(false);

    if is_nested_clause {
        Ok(ClauseChild::Clause(parse_clause(schema, limits, model, spec, guard)?))
    } else {
        Ok(ClauseChild::Comparison(parse_comparison(
            schema, limits, model, spec, guard,
        )?))
    }
}

/// Wrap a raw `filters` value into a Clause-shaped JSON spec, per §4.2.3 rule 4:
/// a list becomes an implicit `{AND: [...]}`, a single comparison object becomes
/// `{AND: [it]}`, and an already-AND/OR-shaped object passes through unchanged.
pub fn normalize_filters_spec(raw: &JsonValue) -> JsonValue {
    match raw {
        JsonValue::Array(items) => {
            serde_json::json!({ "AND": items })
        }
        JsonValue::Object(obj) if obj.keys().any(|k| k == "AND" || k == "OR") => raw.clone(),
        other => serde_json::json!({ "AND": [other] }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Operator;
    use graphkb_schema::{Class, DataType, Property};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new().with_class(
            Class::new("Disease")
                .property(Property::new("name", DataType::Scalar))
                .property(Property::new("subsets", DataType::Scalar).iterable(true)),
        )
    }

    #[test]
    fn implicit_and_wrap_round_trips_a_single_comparison() {
        let wrapped = normalize_filters_spec(&json!({"name": "cancer"}));
        assert_eq!(wrapped, json!({"AND": [{"name": "cancer"}]}));
    }

    #[test]
    fn parses_nested_and_or() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({
            "AND": [
                {"name": "cancer"},
                {"OR": [{"subsets": "a"}, {"subsets": "b"}]},
            ]
        });
        let clause = parse_clause(&schema, &limits, "Disease", &spec, RecursionGuard::new(&limits))
            .unwrap();
        assert_eq!(clause.operator, LogicOp::And);
        assert_eq!(clause.children.len(), 2);
        match &clause.children[1] {
            ClauseChild::Clause(inner) => {
                assert_eq!(inner.operator, LogicOp::Or);
                assert_eq!(inner.children.len(), 2);
            }
            other => panic!("expected nested clause, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_list() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({"AND": []});
        assert!(parse_clause(&schema, &limits, "Disease", &spec, RecursionGuard::new(&limits))
            .is_err());
    }

    #[test]
    fn single_comparison_round_trips_operator() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({"AND": [{"subsets": "x"}]});
        let clause = parse_clause(&schema, &limits, "Disease", &spec, RecursionGuard::new(&limits))
            .unwrap();
        match &clause.children[0] {
            ClauseChild::Comparison(cmp) => assert_eq!(cmp.operator, Operator::Contains),
            other => panic!("expected comparison, got {other:?}"),
        }
    }
}
