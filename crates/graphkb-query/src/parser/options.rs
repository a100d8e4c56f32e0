//! Option normalizer (§4.6): bounds-checks and type-coerces the standard
//! request options that sit alongside `target`/`filters`/`queryType`.

use crate::config::QueryLimits;
use crate::error::{Error, Result, ValidationError};
use crate::ir::OrderDirection;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedOptions {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    pub neighbors: i64,
    pub order_by: Vec<String>,
    pub order_by_direction: OrderDirection,
    pub return_properties: Option<Vec<String>>,
    pub history: bool,
    pub count: bool,
}

pub fn normalize_options(
    limits: &QueryLimits,
    obj: &serde_json::Map<String, JsonValue>,
) -> Result<NormalizedOptions> {
    let limit = match obj.get("limit") {
        Some(raw) => Some(read_int(raw, "limit")?),
        None => None,
    };
    if let Some(v) = limit {
        if v < limits.limit_min || v > limits.limit_max {
            return Err(Error::Validation(ValidationError::LimitOutOfRange(v)));
        }
    }

    let skip = match obj.get("skip") {
        Some(raw) => Some(read_int(raw, "skip")?),
        None => None,
    };
    if let Some(v) = skip {
        if v < limits.skip_min {
            return Err(Error::Validation(ValidationError::SkipOutOfRange(v)));
        }
    }

    let neighbors = match obj.get("neighbors") {
        Some(raw) => read_int(raw, "neighbors")?,
        None => limits.neighbors_min,
    };
    if neighbors < limits.neighbors_min || neighbors > limits.neighbors_max {
        return Err(Error::Validation(ValidationError::NeighborsOutOfRange(neighbors)));
    }

    let order_by = match obj.get("orderBy") {
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|v| as_path(v, "orderBy"))
            .collect::<Result<Vec<_>>>()?,
        Some(JsonValue::String(s)) => s.split(',').map(|p| p.trim().to_string()).collect(),
        Some(other) => {
            return Err(Error::Validation(ValidationError::InvalidOptionValue {
                option: "orderBy".to_string(),
                value: other.to_string(),
            }))
        }
        None => Vec::new(),
    };

    let order_by_direction = match obj.get("orderByDirection").and_then(JsonValue::as_str) {
        Some("ASC") | None => OrderDirection::Asc,
        Some("DESC") => OrderDirection::Desc,
        Some(_) => return Err(Error::Validation(ValidationError::InvalidOrderDirection)),
    };

    let return_properties = match obj.get("returnProperties") {
        Some(JsonValue::Array(items)) => Some(
            items
                .iter()
                .map(|v| as_path(v, "returnProperties"))
                .collect::<Result<Vec<_>>>()?,
        ),
        Some(JsonValue::Null) | None => None,
        Some(other) => {
            return Err(Error::Validation(ValidationError::InvalidOptionValue {
                option: "returnProperties".to_string(),
                value: other.to_string(),
            }))
        }
    };

    let history = read_bool(obj, "history")?.unwrap_or(false);
    let count = read_bool(obj, "count")?.unwrap_or(false);

    if count && (limit.is_some() || skip.is_some() || !order_by.is_empty()) {
        return Err(Error::Validation(ValidationError::CountConflictsWithPagination));
    }

    Ok(NormalizedOptions {
        limit,
        skip,
        neighbors,
        order_by,
        order_by_direction,
        return_properties,
        history,
        count,
    })
}

fn read_int(raw: &JsonValue, option: &str) -> Result<i64> {
    raw.as_i64().ok_or_else(|| {
        Error::Validation(ValidationError::InvalidOptionValue {
            option: option.to_string(),
            value: raw.to_string(),
        })
    })
}

fn as_path(raw: &JsonValue, option: &str) -> Result<String> {
    raw.as_str().map(str::to_string).ok_or_else(|| {
        Error::Validation(ValidationError::InvalidOptionValue {
            option: option.to_string(),
            value: raw.to_string(),
        })
    })
}

/// Boolean coercion from the strings `t|true|1` / `f|false|0|null` (§4.6), in
/// addition to native JSON booleans.
fn read_bool(obj: &serde_json::Map<String, JsonValue>, key: &str) -> Result<Option<bool>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(JsonValue::String(s)) => match s.as_str() {
            "t" | "true" | "1" => Ok(Some(true)),
            "f" | "false" | "0" => Ok(Some(false)),
            other => Err(Error::Validation(ValidationError::InvalidOptionValue {
                option: key.to_string(),
                value: other.to_string(),
            })),
        },
        Some(JsonValue::Number(n)) => match n.as_i64() {
            Some(1) => Ok(Some(true)),
            Some(0) => Ok(Some(false)),
            _ => Err(Error::Validation(ValidationError::InvalidOptionValue {
                option: key.to_string(),
                value: n.to_string(),
            })),
        },
        Some(other) => Err(Error::Validation(ValidationError::InvalidOptionValue {
            option: key.to_string(),
            value: other.to_string(),
        })),
    }
}
