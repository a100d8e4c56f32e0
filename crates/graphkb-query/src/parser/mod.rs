//! Top-level `parse(options)` (§4.2.4): parses the root subquery, normalizes the
//! standard options, and wraps both in a [`WrapperQuery`] with a computed
//! projection.

mod clause;
mod comparison;
mod options;
mod subquery;
mod target;

pub use options::{normalize_options, NormalizedOptions};
pub use subquery::parse_subquery;

use crate::config::QueryLimits;
use crate::error::{Error, Result, ValidationError};
use crate::ir::{FixedPayload, QueryNode, Target, WrapperQuery};
use crate::projection::choose_projection;
use crate::recursion::RecursionGuard;
use graphkb_schema::Schema;
use serde_json::Value as JsonValue;

pub fn parse(schema: &Schema, limits: &QueryLimits, raw_query: &JsonValue) -> Result<WrapperQuery> {
    let obj = raw_query
        .as_object()
        .ok_or(Error::Validation(ValidationError::MissingTarget))?;

    let inner = parse_subquery(schema, limits, raw_query, RecursionGuard::new(limits))?;
    let normalized = normalize_options(limits, obj)?;

    let model = projection_model(&inner);
    if let Some(paths) = &normalized.return_properties {
        let queryable = schema.queryable_properties(model)?;
        for path in paths {
            if !queryable.contains_key(path.as_str()) {
                return Err(Error::Validation(ValidationError::UnknownProperty {
                    class: model.to_string(),
                    property: path.clone(),
                }));
            }
        }
    }
    for path in &normalized.order_by {
        let queryable = schema.queryable_properties(model)?;
        if !queryable.contains_key(path.as_str()) {
            return Err(Error::Validation(ValidationError::UnknownProperty {
                class: model.to_string(),
                property: path.clone(),
            }));
        }
    }

    let projection = choose_projection(normalized.return_properties.as_deref(), normalized.neighbors);

    Ok(WrapperQuery {
        history: inner.history(),
        inner,
        limit: normalized.limit,
        skip: normalized.skip,
        projection,
        order_by: normalized.order_by,
        order_by_direction: normalized.order_by_direction,
        count: normalized.count,
    })
}

/// The class name the projection builder should resolve property paths against
/// for a given parsed root node. Also used by the compiler to render the final
/// projection against the same model the parser validated paths with.
pub(crate) fn projection_model(node: &QueryNode) -> &str {
    match node {
        QueryNode::Subquery(sub) => match &sub.target {
            Target::Class(name) => name.as_str(),
            _ => "V",
        },
        QueryNode::Fixed(fixed) => match &fixed.payload {
            FixedPayload::TreeWalk { target, .. } => match target {
                Target::Class(name) => name.as_str(),
                _ => "V",
            },
            FixedPayload::Neighborhood { target, .. } => target.as_str(),
            FixedPayload::Keyword { target, .. } => target.as_str(),
            FixedPayload::Edge { target, .. } => target.as_str(),
            FixedPayload::SimilarTo { match_type, .. } => {
                match_type.as_deref().unwrap_or("V")
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Projection;
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
    fn flat_projection_by_default() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({"target": "Disease"});
        let wrapper = parse(&schema, &limits, &spec).unwrap();
        assert_eq!(wrapper.projection, Projection::Flat);
        assert_eq!(wrapper.history, false);
    }

    #[test]
    fn neighbors_option_drives_recursive_projection() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({"target": "Disease", "neighbors": 2});
        let wrapper = parse(&schema, &limits, &spec).unwrap();
        assert_eq!(wrapper.projection, Projection::Recursive(2));
    }

    #[test]
    fn return_properties_validated_against_schema() {
        let schema = schema();
        let limits = QueryLimits::default();
        let spec = json!({"target": "Disease", "returnProperties": ["nope"]});
        assert!(parse(&schema, &limits, &spec).is_err());
    }
}
