//! Index of named schema components
//!
//! Built once from the loaded document and only read afterwards. Resolution
//! code receives it by shared reference.

use crate::openapi::{OpenApiSpec, Schema};

/// A named schema component and its raw definition
#[derive(Debug, Clone)]
pub struct SchemaComponent {
    pub type_name: String,
    pub raw_type_data: Schema,
}

/// Ordered collection of schema components, looked up by first exact name match
#[derive(Debug, Clone, Default)]
pub struct SchemaComponentsIndex {
    components: Vec<SchemaComponent>,
}

impl SchemaComponentsIndex {
    pub fn new(components: Vec<SchemaComponent>) -> Self {
        Self { components }
    }

    /// Collect `components.schemas` (or Swagger 2 `definitions`) in document order
    pub fn from_spec(spec: &OpenApiSpec) -> Self {
        let components = spec
            .component_schemas()
            .map(|(name, schema)| SchemaComponent {
                type_name: name.clone(),
                raw_type_data: schema.clone(),
            })
            .collect();
        Self { components }
    }

    pub fn find(&self, type_name: &str) -> Option<&SchemaComponent> {
        self.components.iter().find(|c| c.type_name == type_name)
    }

    /// Whether `type_name` declares `property` as required.
    ///
    /// A missing component or a missing required list counts as "not required".
    pub fn is_property_required(&self, type_name: &str, property: &str) -> bool {
        self.find(type_name)
            .is_some_and(|c| c.raw_type_data.is_property_required(property))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaComponent> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, json: &str) -> SchemaComponent {
        SchemaComponent {
            type_name: name.to_string(),
            raw_type_data: serde_json::from_str(json).unwrap(),
        }
    }

    #[test]
    fn test_required_lookup() {
        let index = SchemaComponentsIndex::new(vec![
            component("User", r#"{"type":"object","required":["age"]}"#),
            component("Tag", r#"{"type":"object"}"#),
        ]);

        assert!(index.is_property_required("User", "age"));
        assert!(!index.is_property_required("User", "nickname"));
        assert!(!index.is_property_required("Tag", "name"));
        assert!(!index.is_property_required("Missing", "age"));
    }

    #[test]
    fn test_first_match_wins() {
        let index = SchemaComponentsIndex::new(vec![
            component("User", r#"{"required":["id"]}"#),
            component("User", r#"{"required":["name"]}"#),
        ]);

        assert!(index.is_property_required("User", "id"));
        assert!(!index.is_property_required("User", "name"));
    }
}
