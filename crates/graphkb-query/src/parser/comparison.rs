//! `parseComparison` (§4.2.1).

use crate::error::{Error, Result, ValidationError};
use crate::ir::{Comparison, ComparisonValue, Operator, Scalar};
use crate::parser::subquery::parse_subquery;
use crate::recursion::RecursionGuard;
use graphkb_schema::{DataType, Property, Schema};
use graphkb_sql::RecordId;
use serde_json::Value as JsonValue;

/// The structural shape of a comparison's raw JSON value, independent of casting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ValueShape {
    Scalar,
    List,
    Subquery,
}

fn value_shape(value: &JsonValue) -> ValueShape {
    match value {
        JsonValue::Array(_) => ValueShape::List,
        JsonValue::Object(map) if map.contains_key("queryType") || map.contains_key("filters") => {
            ValueShape::Subquery
        }
        _ => ValueShape::Scalar,
    }
}

/// A synthetic property used for the `@this` pseudo-comparison (instance-of checks).
fn this_property(schema: &Schema) -> Property {
    Property::new("@this", DataType::Scalar)
        .with_choices(schema.concrete_class_names().into_iter().map(String::from).collect())
}

pub fn parse_comparison(
    schema: &Schema,
    limits: &crate::config::QueryLimits,
    model: &str,
    spec: &JsonValue,
    guard: RecursionGuard,
) -> Result<Comparison> {
    let obj = spec
        .as_object()
        .ok_or(Error::Validation(ValidationError::MalformedComparison))?;

    let explicit_operator = obj.get("operator").and_then(JsonValue::as_str);
    let negate = obj
        .get("negate")
        .and_then(JsonValue::as_bool)
        .unwrap_or(false);

    let property_keys: Vec<&String> = obj
        .keys()
        .filter(|k| k.as_str() != "operator" && k.as_str() != "negate")
        .collect();
    if property_keys.len() != 1 {
        return Err(Error::Validation(ValidationError::MalformedComparison));
    }
    let raw_key = property_keys[0].clone();
    let (property_name, is_length) = match raw_key.strip_suffix(".length") {
        Some(stripped) => (stripped.to_string(), true),
        None => (raw_key.clone(), false),
    };
    let raw_value = &obj[&raw_key];

    let property: Property = if property_name == "@this" {
        this_property(schema)
    } else {
        let props = schema.queryable_properties(model)?;
        match props.get(&property_name) {
            Some(p) => p.clone(),
            None => {
                return Err(Error::Validation(ValidationError::UnknownProperty {
                    class: model.to_string(),
                    property: property_name,
                }))
            }
        }
    };
    let property = &property;

    let shape = value_shape(raw_value);

    let value = match shape {
        ValueShape::Subquery => {
            let node = parse_subquery(schema, limits, raw_value, guard.descend()?)?;
            ComparisonValue::Subquery(Box::new(node))
        }
        ValueShape::List => {
            let elements = raw_value.as_array().expect("checked by value_shape");
            let scalars = elements
                .iter()
                .map(|el| build_scalar(property, el))
                .collect::<Result<Vec<_>>>()?;
            ComparisonValue::List(scalars)
        }
        ValueShape::Scalar => ComparisonValue::Scalar(build_scalar(property, raw_value)?),
    };

    let operator = resolve_operator(property, shape, explicit_operator)?;

    if property_name == "@this" && operator != Operator::InstanceOf {
        return Err(Error::Validation(ValidationError::ThisRequiresInstanceOf));
    }

    validate(property, &property_name, operator, &value, shape, is_length)?;

    if let Some(choices) = &property.choices {
        check_choices(&property_name, choices, &value)?;
    }

    Ok(Comparison {
        property: property_name,
        operator,
        value,
        negate,
        is_length,
    })
}

fn build_scalar(property: &Property, value: &JsonValue) -> Result<Scalar> {
    if value.is_null() {
        return Ok(Scalar::Null);
    }

    if property.data_type.is_link() {
        let text = value.as_str().ok_or_else(|| {
            Error::Validation(ValidationError::MalformedRecordId(value.to_string()))
        })?;
        let id: RecordId = text
            .parse()
            .map_err(|_| Error::Validation(ValidationError::MalformedRecordId(text.to_string())))?;
        return Ok(Scalar::RecordId(id));
    }

    let cast = property
        .apply_cast(value)
        .map_err(|e| Error::Validation(ValidationError::CastFailed {
            property: property.name.clone(),
            reason: e.reason,
        }))?;

    Ok(match cast {
        JsonValue::Bool(b) => Scalar::Bool(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Scalar::Int(i)
            } else {
                Scalar::Float(n.as_f64().unwrap_or_default())
            }
        }
        JsonValue::String(s) => Scalar::Text(s),
        JsonValue::Null => Scalar::Null,
        other => Scalar::Text(other.to_string()),
    })
}

fn resolve_operator(
    property: &Property,
    shape: ValueShape,
    explicit: Option<&str>,
) -> Result<Operator> {
    if let Some(raw) = explicit {
        if raw == "AND" || raw == "OR" {
            return Err(Error::Validation(ValidationError::LogicOperatorAsComparison));
        }
        return Operator::from_str(raw).ok_or_else(|| {
            Error::Validation(ValidationError::OperatorNotAllowed {
                operator: raw.to_string(),
                reason: "not a recognized comparison operator".to_string(),
            })
        });
    }

    // Default-operator inference (§4.2.1 step 4), exhaustive over
    // (iterable property) x (value shape).
    Ok(match (property.iterable, shape) {
        (true, ValueShape::List) => Operator::Eq,
        (true, ValueShape::Subquery) => Operator::ContainsAny,
        (true, ValueShape::Scalar) => Operator::Contains,
        (false, ValueShape::List) | (false, ValueShape::Subquery) => Operator::In,
        (false, ValueShape::Scalar) => Operator::Eq,
    })
}

fn validate(
    property: &Property,
    property_name: &str,
    operator: Operator,
    value: &ComparisonValue,
    shape: ValueShape,
    is_length: bool,
) -> Result<()> {
    if is_length && !(operator.is_ordering() || operator == Operator::Eq) {
        return Err(Error::Validation(ValidationError::OperatorNotAllowed {
            operator: operator.as_str().to_string(),
            reason: "length comparisons only allow ordering operators or =".to_string(),
        }));
    }

    if operator.is_ordering() && (property.iterable || shape == ValueShape::List) {
        return Err(Error::Validation(ValidationError::OperatorNotAllowed {
            operator: operator.as_str().to_string(),
            reason: "ordering operators are forbidden on iterable properties or list values"
                .to_string(),
        }));
    }

    if operator == Operator::Is && !matches!(value, ComparisonValue::Scalar(Scalar::Null)) {
        return Err(Error::Validation(ValidationError::OperatorNotAllowed {
            operator: "IS".to_string(),
            reason: "IS is reserved for NULL comparisons".to_string(),
        }));
    }

    if operator == Operator::Contains && (!property.iterable || shape != ValueShape::Scalar) {
        return Err(Error::Validation(ValidationError::OperatorNotAllowed {
            operator: "CONTAINS".to_string(),
            reason: "CONTAINS requires an iterable property and a non-iterable value"
                .to_string(),
        }));
    }

    if operator == Operator::In && !matches!(shape, ValueShape::List | ValueShape::Subquery) {
        return Err(Error::Validation(ValidationError::OperatorNotAllowed {
            operator: "IN".to_string(),
            reason: "IN requires a list or subquery value".to_string(),
        }));
    }

    if operator == Operator::Eq && shape == ValueShape::List && !property.iterable {
        return Err(Error::Validation(ValidationError::OperatorNotAllowed {
            operator: "=".to_string(),
            reason: format!(
                "{property_name:?} is not iterable; a list value requires IN, not ="
            ),
        }));
    }

    Ok(())
}

fn check_choices(property_name: &str, choices: &[String], value: &ComparisonValue) -> Result<()> {
    let check_one = |scalar: &Scalar| -> Result<()> {
        if let Scalar::Text(s) = scalar {
            if !choices.iter().any(|c| c == s) {
                return Err(Error::Validation(ValidationError::ChoiceNotAllowed {
                    property: property_name.to_string(),
                    value: s.clone(),
                }));
            }
        }
        Ok(())
    };

    match value {
        ComparisonValue::Scalar(s) => check_one(s),
        ComparisonValue::List(items) => items.iter().try_for_each(check_one),
        ComparisonValue::Subquery(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryLimits;
    use graphkb_schema::Class;
    use serde_json::json;

    fn schema_with_disease() -> Schema {
        let disease = Class::new("Disease")
            .property(Property::new("name", DataType::Scalar))
            .property(Property::new("subsets", DataType::Scalar).iterable(true))
            .property(
                Property::new("status", DataType::Scalar)
                    .with_choices(vec!["active".into(), "retired".into()]),
            );
        Schema::new().with_class(disease)
    }

    #[test]
    fn infers_contains_for_iterable_scalar_value() {
        let schema = schema_with_disease();
        let limits = QueryLimits::default();
        let spec = json!({"subsets": "singleSubset"});
        let cmp = parse_comparison(&schema, &limits, "Disease", &spec, RecursionGuard::new(&limits))
            .unwrap();
        assert_eq!(cmp.operator, Operator::Contains);
    }

    #[test]
    fn infers_in_for_non_iterable_with_list_value() {
        let schema = schema_with_disease();
        let limits = QueryLimits::default();
        let spec = json!({"name": ["a", "b", "c"]});
        let cmp = parse_comparison(&schema, &limits, "Disease", &spec, RecursionGuard::new(&limits))
            .unwrap();
        assert_eq!(cmp.operator, Operator::In);
    }

    #[test]
    fn rejects_list_with_eq_on_non_iterable() {
        let schema = schema_with_disease();
        let limits = QueryLimits::default();
        let spec = json!({"name": ["a", "b"], "operator": "="});
        let err = parse_comparison(&schema, &limits, "Disease", &spec, RecursionGuard::new(&limits))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::OperatorNotAllowed { .. })
        ));
    }

    #[test]
    fn rejects_value_outside_choices() {
        let schema = schema_with_disease();
        let limits = QueryLimits::default();
        let spec = json!({"status": "unknown"});
        let err = parse_comparison(&schema, &limits, "Disease", &spec, RecursionGuard::new(&limits))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::ChoiceNotAllowed { .. })
        ));
    }

    #[test]
    fn unknown_property_is_rejected() {
        let schema = schema_with_disease();
        let limits = QueryLimits::default();
        let spec = json!({"nope": "x"});
        let err = parse_comparison(&schema, &limits, "Disease", &spec, RecursionGuard::new(&limits))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownProperty { .. })
        ));
    }
}
