//! Projection builder (§4.5): decides what the compiled statement selects, and
//! renders that decision into the graph DB's nested projection syntax.

use crate::error::Result;
use crate::ir::Projection;
use graphkb_schema::Schema;

const EXCLUDED_PROPERTIES: &[&str] = &["groupRestrictions", "permissions", "groups"];
const HISTORY_FIELDS: &[&str] = &["history", "deletedAt", "deletedBy"];
const TERMINAL_LINK_PROPERTIES: &[&str] = &["createdBy", "updatedBy", "deletedBy"];

/// Picks the projection mode from normalized options (§4.5 choice step). Explicit
/// `returnProperties` wins over `neighbors`-driven recursion, which wins over the
/// flat default.
pub fn choose_projection(return_properties: Option<&[String]>, neighbors: i64) -> Projection {
    if let Some(paths) = return_properties {
        Projection::Explicit(paths.to_vec())
    } else if neighbors > 0 {
        Projection::Recursive(neighbors)
    } else {
        Projection::Flat
    }
}

/// Serializes a chosen projection into the `SELECT <projection> FROM ...` clause
/// fragment (without the `SELECT`/`FROM` keywords themselves).
pub fn render_projection(
    schema: &Schema,
    model: &str,
    projection: &Projection,
    history: bool,
) -> Result<String> {
    match projection {
        Projection::Flat => Ok("*".to_string()),
        Projection::Explicit(paths) => render_explicit(schema, model, paths),
        Projection::Recursive(depth) => render_recursive(schema, model, *depth, history),
    }
}

fn render_explicit(schema: &Schema, model: &str, paths: &[String]) -> Result<String> {
    let queryable = schema.queryable_properties(model)?;
    let mut rendered = Vec::with_capacity(paths.len());
    for path in paths {
        // Each dotted segment must resolve against the flattened queryable-property
        // view; we don't need the resolved property further than validating it
        // exists, since the flattened map already carries the full dotted name.
        if !queryable.contains_key(path.as_str()) {
            return Err(crate::error::Error::Validation(
                crate::error::ValidationError::UnknownProperty {
                    class: model.to_string(),
                    property: path.clone(),
                },
            ));
        }
        rendered.push(path.clone());
    }
    Ok(rendered.join(", "))
}

fn render_recursive(schema: &Schema, model: &str, depth: i64, history: bool) -> Result<String> {
    if depth < 2 {
        Ok(render_shallow_recursive(depth))
    } else {
        render_property_aware(schema, model, depth, history)
    }
}

/// depth < 2: a purely structural recursive shape, independent of the schema.
fn render_shallow_recursive(depth: i64) -> String {
    if depth <= 0 {
        return "*".to_string();
    }
    format!("*, @rid, @class, !history, *:{{{}}}", render_shallow_recursive(depth - 1))
}

/// depth >= 2: walk the schema's actual properties, expanding non-embedded links
/// and both edge directions, skipping excluded/history fields.
fn render_property_aware(schema: &Schema, model: &str, depth: i64, history: bool) -> Result<String> {
    if depth <= 0 {
        return Ok("*".to_string());
    }

    let queryable = schema.queryable_properties(model)?;
    let mut parts = vec!["*".to_string(), "@rid".to_string(), "@class".to_string()];

    for (name, property) in &queryable {
        if EXCLUDED_PROPERTIES.contains(&name.as_str()) {
            continue;
        }
        if !history && HISTORY_FIELDS.contains(&name.as_str()) {
            continue;
        }
        if TERMINAL_LINK_PROPERTIES.contains(&name.as_str()) {
            continue;
        }
        if property.data_type.is_link() {
            if let Some(linked_class) = &property.linked_class {
                if schema.has(linked_class) {
                    let inner = render_property_aware(schema, linked_class, depth - 1, history)?;
                    parts.push(format!("{name}:{{{inner}}}"));
                }
            }
        }
    }

    for edge in schema.edge_models() {
        let inner = render_property_aware(schema, edge, depth - 1, history).unwrap_or_else(|_| "*".to_string());
        parts.push(format!("outE('{edge}'):{{{inner}}}"));
        parts.push(format!("inE('{edge}'):{{{inner}}}"));
    }

    Ok(parts.join(", "))
}
