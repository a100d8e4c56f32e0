//! Shared target parsing: a subquery/fixed-subquery target and a `vertexFilter`
//! payload both take the same three shapes (§4.2.3 rule 1-3, §4.3.6).

use crate::error::{Error, Result, ValidationError};
use crate::ir::Target;
use crate::parser::subquery::parse_subquery;
use crate::recursion::RecursionGuard;
use graphkb_schema::Schema;
use graphkb_sql::RecordId;
use serde_json::Value as JsonValue;

pub fn parse_target(
    schema: &Schema,
    limits: &crate::config::QueryLimits,
    raw: &JsonValue,
    guard: RecursionGuard,
) -> Result<Target> {
    match raw {
        JsonValue::Array(items) => {
            if items.is_empty() {
                return Err(Error::Validation(ValidationError::EmptyTargetList));
            }
            let ids = items
                .iter()
                .map(|item| {
                    let text = item.as_str().ok_or_else(|| {
                        Error::Validation(ValidationError::MalformedRecordId(item.to_string()))
                    })?;
                    text.parse::<RecordId>().map_err(|_| {
                        Error::Validation(ValidationError::MalformedRecordId(text.to_string()))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Target::Ids(ids))
        }
        JsonValue::Object(_) => {
            let nested = parse_subquery(schema, limits, raw, guard.descend()?)?;
            Ok(Target::Nested(Box::new(nested)))
        }
        JsonValue::String(name) => {
            if !schema.has(name) {
                return Err(Error::Validation(ValidationError::UnknownClass(name.clone())));
            }
            if schema.is_abstract(name) {
                return Err(Error::Validation(ValidationError::AbstractClassTarget {
                    class: name.clone(),
                }));
            }
            Ok(Target::Class(name.clone()))
        }
        _ => Err(Error::Validation(ValidationError::MissingTarget)),
    }
}
