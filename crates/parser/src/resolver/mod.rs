//! Schema-to-TypeScript type resolution
//!
//! Every schema is classified into a [`SchemaKind`] and handled by one
//! function per kind. `anyOf` nodes go through [`resolve_any_of`], which calls
//! back into the resolver for each member via [`ChildResolver`].
//!
//! ## Usage
//! ```rust,ignore
//! let index = SchemaComponentsIndex::from_spec(&spec);
//! let resolver = TypeResolver::new(&index, &config.placeholders);
//! let node = SchemaNode::new(schema, vec!["User".into(), "age".into()]);
//! let ts_type = resolver.resolve_inline(&node)?;
//! ```

mod any_of;
mod expr;
mod index;

pub use any_of::{is_required, resolve_any_of};
pub use expr::{parenthesize, split_union, union_of};
pub use index::{SchemaComponent, SchemaComponentsIndex};

use crate::openapi::{ref_schema_name, AdditionalProperties, Schema, SchemaType};
use serde_json::Value;
use swagger_query_gen_common::naming::{escape_js_string, format_type_name, quote_property_key};
use swagger_query_gen_common::{Placeholders, Result};
use tracing::debug;

/// A schema together with its resolution context
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub schema: Schema,
    /// Explicit nullability flag; `None` means "derive from `schema_path`"
    pub required: Option<bool>,
    /// Location of the node, `[containingTypeName, propertyName, ...]`
    pub schema_path: Vec<String>,
}

impl SchemaNode {
    /// Node whose explicit flag is the schema's own boolean `required`, if any
    pub fn new(schema: Schema, schema_path: Vec<String>) -> Self {
        let required = schema.required_flag();
        Self {
            schema,
            required,
            schema_path,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Node for a nested schema at the same location, inheriting this
    /// node's explicit flag when the nested schema has none.
    ///
    /// Array items and map values go through here, so a required property
    /// drops null from its item and value unions as well.
    fn nested(&self, schema: &Schema) -> SchemaNode {
        SchemaNode {
            required: schema.required_flag().or(self.required),
            schema: schema.clone(),
            schema_path: self.schema_path.clone(),
        }
    }

    /// Node for a property of an inline object
    fn property(&self, name: &str, schema: &Schema, required: bool) -> SchemaNode {
        let mut schema_path = self.schema_path.clone();
        schema_path.push(name.to_string());
        SchemaNode {
            required: Some(schema.required_flag().unwrap_or(required)),
            schema: schema.clone(),
            schema_path,
        }
    }
}

/// Child-resolution capability used by combinator resolution
#[cfg_attr(test, mockall::automock)]
pub trait ChildResolver {
    /// Resolve a member schema into an inline type expression
    fn resolve_child(&self, node: &SchemaNode) -> Result<String>;
}

/// Declared kind of a schema, in dispatch priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Ref,
    AnyOf,
    OneOf,
    AllOf,
    Enum,
    Const,
    Array,
    Object,
    Primitive,
    Unknown,
}

impl SchemaKind {
    pub fn of(schema: &Schema) -> Self {
        if schema.ref_path.is_some() {
            return SchemaKind::Ref;
        }
        if schema.any_of.as_ref().is_some_and(|m| !m.is_empty()) {
            return SchemaKind::AnyOf;
        }
        if schema.one_of.as_ref().is_some_and(|m| !m.is_empty()) {
            return SchemaKind::OneOf;
        }
        if schema.all_of.as_ref().is_some_and(|m| !m.is_empty()) {
            return SchemaKind::AllOf;
        }
        if !schema.enum_values.is_empty() {
            return SchemaKind::Enum;
        }
        if schema.const_value.is_some() {
            return SchemaKind::Const;
        }

        match &schema.schema_type {
            Some(SchemaType::Single(t)) if t == "array" => SchemaKind::Array,
            Some(SchemaType::Single(t)) if t == "object" => SchemaKind::Object,
            Some(_) => SchemaKind::Primitive,
            None if schema.items.is_some() => SchemaKind::Array,
            None if !schema.properties.is_empty() || schema.additional_properties.is_some() => {
                SchemaKind::Object
            }
            None => SchemaKind::Unknown,
        }
    }
}

/// Resolves schemas into TypeScript type expressions
pub struct TypeResolver<'a> {
    index: &'a SchemaComponentsIndex,
    placeholders: &'a Placeholders,
}

impl<'a> TypeResolver<'a> {
    pub fn new(index: &'a SchemaComponentsIndex, placeholders: &'a Placeholders) -> Self {
        Self {
            index,
            placeholders,
        }
    }

    pub fn index(&self) -> &'a SchemaComponentsIndex {
        self.index
    }

    pub fn placeholders(&self) -> &'a Placeholders {
        self.placeholders
    }

    /// Resolve a schema into an inline type expression
    pub fn resolve_inline(&self, node: &SchemaNode) -> Result<String> {
        let expr = match SchemaKind::of(&node.schema) {
            SchemaKind::AnyOf => {
                return resolve_any_of(node, self.index, self.placeholders, self);
            }
            SchemaKind::Ref => self.resolve_ref(node),
            SchemaKind::OneOf => self.resolve_one_of(node)?,
            SchemaKind::AllOf => self.resolve_all_of(node)?,
            SchemaKind::Enum => self.resolve_enum(&node.schema.enum_values),
            SchemaKind::Const => match &node.schema.const_value {
                Some(value) => self.literal(value),
                None => self.placeholders.any.clone(),
            },
            SchemaKind::Array => self.resolve_array(node)?,
            SchemaKind::Object => self.resolve_object(node)?,
            SchemaKind::Primitive => self.resolve_primitive(node)?,
            SchemaKind::Unknown => self.placeholders.any.clone(),
        };

        if node.schema.is_nullable() {
            Ok(self.with_null(expr))
        } else {
            Ok(expr)
        }
    }

    /// Convenience wrapper for a schema with no location context
    pub fn resolve_schema(&self, schema: &Schema) -> Result<String> {
        self.resolve_inline(&SchemaNode::new(schema.clone(), Vec::new()))
    }

    fn resolve_ref(&self, node: &SchemaNode) -> String {
        let ref_path = node.schema.ref_path.as_deref().unwrap_or_default();
        let name = ref_schema_name(ref_path);
        if self.index.find(name).is_none() {
            debug!(reference = %ref_path, "reference does not point at a known component");
        }
        format_type_name(name)
    }

    fn resolve_one_of(&self, node: &SchemaNode) -> Result<String> {
        let members = node.schema.one_of.as_deref().unwrap_or_default();
        let resolved = members
            .iter()
            .map(|member| self.resolve_inline(&node.nested(member)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.compose_union(union_of(resolved)))
    }

    fn resolve_all_of(&self, node: &SchemaNode) -> Result<String> {
        let members = node.schema.all_of.as_deref().unwrap_or_default();
        let mut parts: Vec<String> = Vec::new();
        for member in members {
            let resolved = self.resolve_inline(&node.nested(member))?;
            if !self.placeholders.is_any(&resolved) && !parts.contains(&resolved) {
                parts.push(resolved);
            }
        }

        Ok(match parts.len() {
            0 => self.placeholders.any.clone(),
            1 => parts.remove(0),
            _ => parts
                .iter()
                .map(|p| parenthesize(p))
                .collect::<Vec<_>>()
                .join(" & "),
        })
    }

    fn resolve_enum(&self, values: &[Value]) -> String {
        self.compose_union(union_of(values.iter().map(|v| self.literal(v))))
    }

    fn resolve_array(&self, node: &SchemaNode) -> Result<String> {
        let item = match &node.schema.items {
            Some(items) => self.resolve_inline(&node.nested(items))?,
            None => self.placeholders.any.clone(),
        };
        Ok(format!("{}[]", parenthesize(&item)))
    }

    fn resolve_object(&self, node: &SchemaNode) -> Result<String> {
        let schema = &node.schema;
        if !schema.properties.is_empty() {
            let mut fields = Vec::with_capacity(schema.properties.len());
            for (name, property) in &schema.properties {
                let required = schema.is_property_required(name);
                let ts_type = self.resolve_inline(&node.property(name, property, required))?;
                let marker = if required { "" } else { "?" };
                fields.push(format!("{}{}: {}", quote_property_key(name), marker, ts_type));
            }
            return Ok(format!("{{ {} }}", fields.join("; ")));
        }

        let value = match &schema.additional_properties {
            Some(AdditionalProperties::Schema(inner)) => self.resolve_inline(&node.nested(inner))?,
            _ => self.placeholders.any.clone(),
        };
        Ok(format!("Record<string, {}>", value))
    }

    fn resolve_primitive(&self, node: &SchemaNode) -> Result<String> {
        let names: Vec<&str> = match &node.schema.schema_type {
            Some(SchemaType::Single(t)) => vec![t.as_str()],
            Some(SchemaType::Multiple(ts)) => ts.iter().map(String::as_str).collect(),
            None => Vec::new(),
        };

        let mut members = Vec::with_capacity(names.len());
        for name in names {
            let member = match name {
                "array" => self.resolve_array(node)?,
                "object" => self.resolve_object(node)?,
                other => self.primitive_name(other, node.schema.format.as_deref()),
            };
            members.push(member);
        }

        if members.is_empty() {
            return Ok(self.placeholders.any.clone());
        }
        Ok(self.compose_union(union_of(members)))
    }

    fn primitive_name(&self, type_name: &str, format: Option<&str>) -> String {
        match (type_name, format) {
            ("string", Some("binary")) | ("file", _) => "File".to_string(),
            ("string", _) => "string".to_string(),
            ("integer", _) | ("number", _) => "number".to_string(),
            ("boolean", _) => "boolean".to_string(),
            ("null", _) => self.placeholders.null.clone(),
            _ => self.placeholders.any.clone(),
        }
    }

    fn literal(&self, value: &Value) -> String {
        match value {
            Value::String(s) => format!("\"{}\"", escape_js_string(s)),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => self.placeholders.null.clone(),
            Value::Array(_) | Value::Object(_) => self.placeholders.any.clone(),
        }
    }

    fn with_null(&self, expr: String) -> String {
        if self.placeholders.is_any(&expr) {
            return expr;
        }
        let mut members = union_of([expr]);
        if members.iter().any(|m| self.placeholders.is_null(m)) {
            return members.join(" | ");
        }
        members.push(self.placeholders.null.clone());
        members.join(" | ")
    }

    fn compose_union(&self, members: Vec<String>) -> String {
        if members.is_empty() {
            self.placeholders.any.clone()
        } else {
            members.join(" | ")
        }
    }
}

impl ChildResolver for TypeResolver<'_> {
    fn resolve_child(&self, node: &SchemaNode) -> Result<String> {
        self.resolve_inline(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(json: &str) -> Schema {
        serde_json::from_str(json).unwrap()
    }

    fn resolve(json: &str) -> String {
        let index = SchemaComponentsIndex::default();
        let placeholders = Placeholders::default();
        TypeResolver::new(&index, &placeholders)
            .resolve_schema(&schema(json))
            .unwrap()
    }

    #[test]
    fn test_kind_dispatch_order() {
        assert_eq!(
            SchemaKind::of(&schema(r##"{"$ref":"#/components/schemas/A","nullable":true}"##)),
            SchemaKind::Ref
        );
        assert_eq!(SchemaKind::of(&schema(r#"{"anyOf":[{}]}"#)), SchemaKind::AnyOf);
        assert_eq!(SchemaKind::of(&schema(r#"{"anyOf":[],"type":"string"}"#)), SchemaKind::Primitive);
        assert_eq!(SchemaKind::of(&schema(r#"{"type":"string","enum":["a"]}"#)), SchemaKind::Enum);
        assert_eq!(SchemaKind::of(&schema(r#"{"items":{}}"#)), SchemaKind::Array);
        assert_eq!(SchemaKind::of(&schema(r#"{"properties":{"a":{}}}"#)), SchemaKind::Object);
        assert_eq!(SchemaKind::of(&schema("{}")), SchemaKind::Unknown);
    }

    #[test]
    fn test_primitives() {
        assert_eq!(resolve(r#"{"type":"string"}"#), "string");
        assert_eq!(resolve(r#"{"type":"string","format":"binary"}"#), "File");
        assert_eq!(resolve(r#"{"type":"integer","format":"int64"}"#), "number");
        assert_eq!(resolve(r#"{"type":"boolean"}"#), "boolean");
        assert_eq!(resolve(r#"{"type":["string","null"]}"#), "string | null");
        assert_eq!(resolve("{}"), "any");
    }

    #[test]
    fn test_nullable_flags() {
        assert_eq!(resolve(r#"{"type":"string","nullable":true}"#), "string | null");
        assert_eq!(resolve(r#"{"type":"number","x-nullable":true}"#), "number | null");
        assert_eq!(
            resolve(r##"{"$ref":"#/definitions/Pet","x-nullable":true}"##),
            "Pet | null"
        );
        assert_eq!(resolve(r#"{"type":["string","null"],"nullable":true}"#), "string | null");
    }

    #[test]
    fn test_refs_and_combinators() {
        assert_eq!(resolve(r##"{"$ref":"#/components/schemas/user.Dto"}"##), "UserDto");
        assert_eq!(
            resolve(r##"{"oneOf":[{"$ref":"#/components/schemas/Cat"},{"$ref":"#/components/schemas/Dog"},{"$ref":"#/components/schemas/Cat"}]}"##),
            "Cat | Dog"
        );
        assert_eq!(
            resolve(r##"{"allOf":[{"$ref":"#/components/schemas/Base"},{"type":"object","properties":{"id":{"type":"string"}},"required":["id"]}]}"##),
            "Base & { id: string }"
        );
        assert_eq!(resolve(r##"{"allOf":[{"$ref":"#/components/schemas/Base"}]}"##), "Base");
    }

    #[test]
    fn test_enum_and_const() {
        assert_eq!(resolve(r#"{"enum":["active","archived"]}"#), "\"active\" | \"archived\"");
        assert_eq!(resolve(r#"{"enum":[1,2,null]}"#), "1 | 2 | null");
        assert_eq!(resolve(r#"{"const":"fixed"}"#), "\"fixed\"");
    }

    #[test]
    fn test_arrays() {
        assert_eq!(resolve(r#"{"type":"array","items":{"type":"string"}}"#), "string[]");
        assert_eq!(resolve(r#"{"type":"array"}"#), "any[]");
        assert_eq!(
            resolve(r#"{"type":"array","items":{"enum":["a","b"]}}"#),
            "(\"a\" | \"b\")[]"
        );
    }

    #[test]
    fn test_objects() {
        assert_eq!(
            resolve(
                r#"{"type":"object","required":["id"],"properties":{"id":{"type":"integer"},"x-tag":{"type":"string"}}}"#
            ),
            "{ id: number; \"x-tag\"?: string }"
        );
        assert_eq!(
            resolve(r#"{"type":"object","additionalProperties":{"type":"number"}}"#),
            "Record<string, number>"
        );
        assert_eq!(resolve(r#"{"type":"object","additionalProperties":true}"#), "Record<string, any>");
        assert_eq!(resolve(r#"{"type":"object"}"#), "Record<string, any>");
    }

    #[test]
    fn test_inline_object_any_of_uses_local_required() {
        let resolved = resolve(
            r#"{
                "type": "object",
                "required": ["a"],
                "properties": {
                    "a": {"anyOf": [{"type": "string"}, {"type": "null"}]},
                    "b": {"anyOf": [{"type": "string"}, {"type": "null"}]}
                }
            }"#,
        );
        assert_eq!(resolved, "{ a: string; b?: string | null }");
    }

    #[test]
    fn test_component_property_any_of_uses_index() {
        let index = SchemaComponentsIndex::new(vec![SchemaComponent {
            type_name: "User".to_string(),
            raw_type_data: schema(r#"{"type":"object","required":["age"]}"#),
        }]);
        let placeholders = Placeholders::default();
        let resolver = TypeResolver::new(&index, &placeholders);
        let any_of = schema(r#"{"anyOf":[{"type":"integer"},{"type":"string"}]}"#);

        let age = SchemaNode::new(any_of.clone(), vec!["User".into(), "age".into()]);
        let nickname = SchemaNode::new(any_of, vec!["User".into(), "nickname".into()]);

        assert_eq!(resolver.resolve_inline(&age).unwrap(), "number | string");
        assert_eq!(resolver.resolve_inline(&nickname).unwrap(), "number | string | null");
    }

    #[test]
    fn test_required_property_drops_null_from_items_and_values() {
        let resolved = resolve(
            r#"{
                "type": "object",
                "required": ["tags", "labels"],
                "properties": {
                    "tags": {"type": "array", "items": {"anyOf": [{"type": "string"}, {"type": "null"}]}},
                    "labels": {"type": "object", "additionalProperties": {"anyOf": [{"type": "string"}, {"type": "null"}]}},
                    "notes": {"type": "array", "items": {"anyOf": [{"type": "string"}, {"type": "null"}]}}
                }
            }"#,
        );
        assert_eq!(
            resolved,
            "{ tags: string[]; labels: Record<string, string>; notes?: (string | null)[] }"
        );
    }

    #[test]
    fn test_nested_any_of_and_array_items_follow_property_presence() {
        let index = SchemaComponentsIndex::default();
        let placeholders = Placeholders::default();
        let resolver = TypeResolver::new(&index, &placeholders);
        let node = SchemaNode::new(
            schema(
                r#"{"anyOf":[{"anyOf":[{"type":"string"},{"type":"null"}]},{"type":"array","items":{"anyOf":[{"type":"number"},{"type":"null"}]}}]}"#,
            ),
            vec!["Order".into(), "note".into()],
        )
        .with_required(true);

        assert_eq!(resolver.resolve_inline(&node).unwrap(), "string | number[]");
    }
}
