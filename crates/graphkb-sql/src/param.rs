//! Compiled query parameter values.

use crate::record_id::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A value bound to a named placeholder in a compiled statement.
///
/// Record IDs are a distinct variant rather than a `Text` value because they are
/// never bound through a placeholder (see `StatementFragment::push_record_id`); the
/// variant exists so callers can still recognize and serialize them uniformly when a
/// record ID travels through a `Param` position (e.g. inside an `Array`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Param {
    /// NULL value.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Text/string scalar.
    Text(String),
    /// A record identifier, rendered literally rather than bound.
    RecordId(RecordId),
    /// Array of parameters (used for set-equality size checks and similar).
    Array(Vec<Param>),
}

impl Param {
    /// Create a text parameter.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Create an integer parameter.
    pub fn int(n: i64) -> Self {
        Self::Int(n)
    }

    /// Check if this is a NULL value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build a `Param` from a JSON scalar (null/bool/number/string).
    ///
    /// Returns `None` for arrays/objects; callers handle those shapes themselves
    /// (lists become one parameter per element, objects become subqueries).
    pub fn from_json_scalar(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => Some(Self::Null),
            JsonValue::Bool(b) => Some(Self::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else {
                    n.as_f64().map(Self::Float)
                }
            }
            JsonValue::String(s) => Some(Self::Text(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Param {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Param {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Param {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<RecordId> for Param {
    fn from(id: RecordId) -> Self {
        Self::RecordId(id)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_int_conversions() {
        let p: Param = "hello".into();
        assert!(matches!(p, Param::Text(s) if s == "hello"));

        let p: Param = 42i64.into();
        assert!(matches!(p, Param::Int(42)));

        let p: Param = None::<String>.into();
        assert!(p.is_null());
    }

    #[test]
    fn from_json_scalar_rejects_compound_shapes() {
        assert_eq!(
            Param::from_json_scalar(&serde_json::json!(null)),
            Some(Param::Null)
        );
        assert_eq!(
            Param::from_json_scalar(&serde_json::json!("kras")),
            Some(Param::Text("kras".into()))
        );
        assert_eq!(Param::from_json_scalar(&serde_json::json!([1, 2])), None);
        assert_eq!(Param::from_json_scalar(&serde_json::json!({"a": 1})), None);
    }
}
