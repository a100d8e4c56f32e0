//! The schema registry: a read-only view over the inheritance DAG supplied by the
//! host application. Pure, no I/O (§4.1).

use crate::class::Class;
use crate::error::SchemaError;
use crate::property::Property;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Recursion cap for queryable-property flattening through embedded links. Embedded
/// classes are not expected to cycle in practice, but the cap turns a schema-authoring
/// mistake into a `SchemaError` instead of a stack overflow.
const MAX_FLATTEN_DEPTH: usize = 8;

/// A read-only, in-memory schema.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    classes: IndexMap<String, Class>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: Class) -> Self {
        self.classes.insert(class.name.clone(), class);
        self
    }

    /// Look up a class by name.
    pub fn get(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    /// Whether a class with this name exists.
    pub fn has(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn is_edge(&self, name: &str) -> bool {
        self.get(name).map(|c| c.is_edge).unwrap_or(false)
    }

    pub fn is_abstract(&self, name: &str) -> bool {
        self.get(name).map(|c| c.is_abstract).unwrap_or(false)
    }

    /// All classes that are edge types.
    pub fn edge_models(&self) -> Vec<&str> {
        self.classes
            .values()
            .filter(|c| c.is_edge)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// All concrete (non-abstract) class names; used as the synthetic `choices` set
    /// for the `@this` pseudo-property (§4.2.1).
    pub fn concrete_class_names(&self) -> Vec<&str> {
        self.classes
            .values()
            .filter(|c| !c.is_abstract)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Whether `name` inherits from `ancestor`, directly or transitively. A class is
    /// considered to inherit from itself.
    pub fn inherits_from(&self, name: &str, ancestor: &str) -> bool {
        if name == ancestor {
            return true;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Some(class) = self.get(&current) else {
                continue;
            };
            for parent in &class.inherits_from {
                if parent == ancestor {
                    return true;
                }
                stack.push(parent.clone());
            }
        }
        false
    }

    /// All concrete subclasses (including `name` itself if concrete) descending from
    /// `name`, used when an `INSTANCEOF` target needs to expand an abstract class.
    pub fn concrete_descendants(&self, name: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Some(class) = self.get(&current) else {
                continue;
            };
            if !class.is_abstract {
                out.push(class.name.clone());
            }
            stack.extend(class.subclasses.iter().cloned());
        }
        out
    }

    /// The flattened queryable-properties view of a class (§3): its own properties,
    /// plus, for each non-iterable embedded-link property, that property's inner
    /// queryable properties under a dotted `outer.inner` name.
    pub fn queryable_properties(
        &self,
        class_name: &str,
    ) -> Result<IndexMap<String, Property>, SchemaError> {
        let class = self
            .get(class_name)
            .ok_or_else(|| SchemaError::UnknownClass(class_name.to_string()))?;
        self.flatten(class, 0)
    }

    fn flatten(&self, class: &Class, depth: usize) -> Result<IndexMap<String, Property>, SchemaError> {
        if depth > MAX_FLATTEN_DEPTH {
            return Err(SchemaError::FlatteningTooDeep(class.name.clone()));
        }

        let mut out = IndexMap::new();
        for (name, property) in &class.properties {
            out.insert(name.clone(), property.clone());

            if property.is_non_iterable_embedded_link() {
                let Some(linked) = property.linked_class.as_deref() else {
                    continue;
                };
                let Some(linked_class) = self.get(linked) else {
                    continue;
                };
                let inner = self.flatten(linked_class, depth + 1)?;
                for (inner_name, inner_prop) in inner {
                    out.insert(format!("{}.{}", name, inner_name), inner_prop);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::DataType;
    use pretty_assertions::assert_eq;

    fn sample_schema() -> Schema {
        let source = Class::new("Source").property(Property::new("name", DataType::Scalar));

        let disease = Class::new("Disease")
            .inherits("Ontology")
            .property(Property::new("name", DataType::Scalar))
            .property(
                Property::new("subsets", DataType::Scalar)
                    .iterable(true),
            )
            .property(
                Property::new("source", DataType::Embedded)
                    .with_linked_class("Source"),
            );

        Schema::new().with_class(source).with_class(disease)
    }

    #[test]
    fn queryable_properties_flattens_non_iterable_embedded_links() {
        let schema = sample_schema();
        let props = schema.queryable_properties("Disease").unwrap();
        assert!(props.contains_key("name"));
        assert!(props.contains_key("subsets"));
        assert!(props.contains_key("source.name"));
    }

    #[test]
    fn unknown_class_is_an_error() {
        let schema = sample_schema();
        assert_eq!(
            schema.queryable_properties("Nope"),
            Err(SchemaError::UnknownClass("Nope".to_string()))
        );
    }

    #[test]
    fn inherits_from_walks_the_dag() {
        let mut schema = sample_schema();
        schema = schema.with_class(Class::new("Ontology").abstract_());
        assert!(schema.inherits_from("Disease", "Ontology"));
        assert!(schema.inherits_from("Disease", "Disease"));
        assert!(!schema.inherits_from("Disease", "Source"));
    }
}
