//! Property metadata.

use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The shape a property's value takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// A plain scalar (string, number, boolean).
    Scalar,
    /// A single link to another vertex.
    Link,
    /// An ordered/unordered collection of links.
    LinkSet,
    /// A nested, non-linked structure.
    Embedded,
    /// A collection of nested structures.
    EmbeddedSet,
}

impl DataType {
    /// Whether this data type is a "link" of some kind (single or set).
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link | Self::LinkSet)
    }

    /// Whether this data type is an embedded (non-link) structure.
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded | Self::EmbeddedSet)
    }
}

#[derive(Debug, Error)]
#[error("cast failed for property {property:?}: {reason}")]
pub struct CastError {
    pub property: String,
    pub reason: String,
}

type CastFn = dyn Fn(&JsonValue) -> Result<JsonValue, String> + Send + Sync;

/// A single queryable property of a class.
#[derive(Clone)]
pub struct Property {
    pub name: String,
    pub data_type: DataType,
    /// Name of the linked/embedded class, when `data_type` references one.
    pub linked_class: Option<String>,
    /// Enum of accepted scalar values, if this property is choice-restricted.
    pub choices: Option<Vec<String>>,
    /// Whether the property holds a collection (list/set) of values.
    pub iterable: bool,
    cast: Option<Arc<CastFn>>,
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .field("linked_class", &self.linked_class)
            .field("choices", &self.choices)
            .field("iterable", &self.iterable)
            .field("has_cast", &self.cast.is_some())
            .finish()
    }
}

impl Property {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            linked_class: None,
            choices: None,
            iterable: false,
            cast: None,
        }
    }

    pub fn with_linked_class(mut self, class_name: impl Into<String>) -> Self {
        self.linked_class = Some(class_name.into());
        self
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn iterable(mut self, iterable: bool) -> Self {
        self.iterable = iterable;
        self
    }

    pub fn with_cast(
        mut self,
        cast: impl Fn(&JsonValue) -> Result<JsonValue, String> + Send + Sync + 'static,
    ) -> Self {
        self.cast = Some(Arc::new(cast));
        self
    }

    /// The name reachable from the class this property belongs to, without any
    /// dotted prefix added by queryable-property flattening.
    pub fn local_name(&self) -> &str {
        &self.name
    }

    /// Whether this property is a non-iterable embedded link (the case flattened
    /// into dotted queryable-property paths by §3).
    pub fn is_non_iterable_embedded_link(&self) -> bool {
        matches!(self.data_type, DataType::Embedded) && !self.iterable
    }

    /// Apply this property's value cast, if any. Cast is applied element-wise by
    /// the caller for list values; this operates on a single scalar.
    pub fn apply_cast(&self, value: &JsonValue) -> Result<JsonValue, CastError> {
        match &self.cast {
            Some(cast) => cast(value).map_err(|reason| CastError {
                property: self.name.clone(),
                reason,
            }),
            None => Ok(value.clone()),
        }
    }
}
