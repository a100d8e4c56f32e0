//! Class (vertex/edge type) metadata.

use crate::property::Property;
use indexmap::IndexMap;

/// A class in the schema's inheritance DAG.
#[derive(Clone, Debug)]
pub struct Class {
    pub name: String,
    pub is_abstract: bool,
    pub is_embedded: bool,
    pub is_edge: bool,
    pub inherits_from: Vec<String>,
    pub subclasses: Vec<String>,
    pub properties: IndexMap<String, Property>,
    /// For edge classes: the source (`out`) vertex class.
    pub source_class: Option<String>,
    /// For edge classes: the target (`in`) vertex class.
    pub target_class: Option<String>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            is_embedded: false,
            is_edge: false,
            inherits_from: Vec::new(),
            subclasses: Vec::new(),
            properties: IndexMap::new(),
            source_class: None,
            target_class: None,
        }
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn embedded(mut self) -> Self {
        self.is_embedded = true;
        self
    }

    pub fn edge(mut self, source_class: impl Into<String>, target_class: impl Into<String>) -> Self {
        self.is_edge = true;
        self.source_class = Some(source_class.into());
        self.target_class = Some(target_class.into());
        self
    }

    pub fn inherits(mut self, parent: impl Into<String>) -> Self {
        self.inherits_from.push(parent.into());
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }
}
