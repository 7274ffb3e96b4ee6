//! OpenAPI 3.x / Swagger 2.0 type definitions
//!
//! Covers the subset needed for client generation. Maps use `IndexMap` so
//! that document order carries through to the generated output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use swagger_query_gen_common::HttpMethod;

const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";
const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Document root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiSpec {
    /// OpenAPI version (e.g., "3.0.3"), absent for Swagger 2 documents
    #[serde(default)]
    pub openapi: Option<String>,

    /// Swagger version ("2.0"), absent for OpenAPI 3 documents
    #[serde(default)]
    pub swagger: Option<String>,

    /// API metadata
    pub info: Info,

    /// API paths (endpoints)
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    /// Reusable components (OpenAPI 3)
    #[serde(default)]
    pub components: Option<Components>,

    /// Schema definitions (Swagger 2)
    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,

    /// Reusable parameters (Swagger 2)
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,

    /// Servers (OpenAPI 3)
    #[serde(default)]
    pub servers: Vec<Server>,

    /// Host (Swagger 2)
    #[serde(default)]
    pub host: Option<String>,

    /// Base path (Swagger 2)
    #[serde(rename = "basePath")]
    #[serde(default)]
    pub base_path: Option<String>,

    /// Transfer schemes (Swagger 2)
    #[serde(default)]
    pub schemes: Vec<String>,
}

/// API information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    pub version: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Path item (operations for a path)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,

    #[serde(default)]
    pub post: Option<Operation>,

    #[serde(default)]
    pub put: Option<Operation>,

    #[serde(default)]
    pub patch: Option<Operation>,

    #[serde(default)]
    pub delete: Option<Operation>,

    #[serde(default)]
    pub head: Option<Operation>,

    #[serde(default)]
    pub options: Option<Operation>,

    /// Parameters shared by all operations of this path
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// Declared operations in a fixed method order
    pub fn operations(&self) -> Vec<(HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Options, &self.options),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
        .collect()
    }
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Tags (first tag names the module)
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub request_body: Option<RequestBody>,

    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    #[serde(default)]
    pub deprecated: bool,

    /// Request content types (Swagger 2)
    #[serde(default)]
    pub consumes: Vec<String>,
}

/// Parameter definition
///
/// Swagger 2 puts `type`/`format`/`items`/`enum` directly on the parameter;
/// OpenAPI 3 wraps them in `schema`. Both forms are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    /// Reference to a reusable parameter
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_path: Option<String>,

    #[serde(default)]
    pub name: String,

    /// Location: query, header, path, cookie, body, formData
    #[serde(rename = "in")]
    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub schema: Option<Schema>,

    #[serde(rename = "type")]
    #[serde(default)]
    pub param_type: Option<SchemaType>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub items: Option<Box<Schema>>,

    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Vec<serde_json::Value>,
}

impl Parameter {
    /// Schema describing the parameter value, whichever form was used
    pub fn value_schema(&self) -> Schema {
        if let Some(schema) = &self.schema {
            return schema.clone();
        }
        Schema {
            schema_type: self.param_type.clone(),
            format: self.format.clone(),
            items: self.items.clone(),
            enum_values: self.enum_values.clone(),
            description: self.description.clone(),
            ..Schema::default()
        }
    }
}

/// Request body (OpenAPI 3)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_path: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

/// Response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_path: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Content types (OpenAPI 3)
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    /// Response schema (Swagger 2)
    #[serde(default)]
    pub schema: Option<Schema>,
}

/// Media type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<Schema>,
}

/// `type` is a single name, or a list of names in OpenAPI 3.1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// `required` is a property list on object schemas, or a boolean flag
/// attached to the schema itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Required {
    Flag(bool),
    Properties(Vec<String>),
}

/// `additionalProperties` is a boolean or a schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

/// Schema definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_path: Option<String>,

    #[serde(rename = "type")]
    #[serde(default)]
    pub schema_type: Option<SchemaType>,

    /// Format (e.g., int32, date-time, binary)
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Properties (for object type)
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,

    #[serde(default)]
    pub required: Option<Required>,

    /// Items schema (for array type)
    #[serde(default)]
    pub items: Option<Box<Schema>>,

    #[serde(default)]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "const")]
    #[serde(default)]
    pub const_value: Option<serde_json::Value>,

    #[serde(default)]
    pub any_of: Option<Vec<Schema>>,

    #[serde(default)]
    pub one_of: Option<Vec<Schema>>,

    #[serde(default)]
    pub all_of: Option<Vec<Schema>>,

    /// OpenAPI 3.0 nullable flag
    #[serde(default)]
    pub nullable: Option<bool>,

    /// Swagger 2 vendor nullable flag
    #[serde(rename = "x-nullable")]
    #[serde(default)]
    pub x_nullable: Option<bool>,
}

impl Schema {
    /// Explicit boolean `required` attached to this schema
    pub fn required_flag(&self) -> Option<bool> {
        match self.required {
            Some(Required::Flag(flag)) => Some(flag),
            _ => None,
        }
    }

    /// Names of required properties declared by this object schema
    pub fn required_properties(&self) -> &[String] {
        match &self.required {
            Some(Required::Properties(names)) => names,
            _ => &[],
        }
    }

    pub fn is_property_required(&self, property: &str) -> bool {
        self.required_properties().iter().any(|p| p == property)
    }

    /// Whether `nullable` or `x-nullable` is set
    pub fn is_nullable(&self) -> bool {
        self.nullable == Some(true) || self.x_nullable == Some(true)
    }
}

/// Reusable components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,

    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,

    #[serde(default)]
    pub request_bodies: IndexMap<String, RequestBody>,

    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// Name of the schema a `$ref` points at
///
/// e.g. "#/components/schemas/Pet" -> "Pet", "#/definitions/Pet" -> "Pet"
pub fn ref_schema_name(ref_path: &str) -> &str {
    ref_path
        .strip_prefix(COMPONENT_SCHEMA_PREFIX)
        .or_else(|| ref_path.strip_prefix(DEFINITIONS_PREFIX))
        .unwrap_or_else(|| last_ref_segment(ref_path))
}

fn last_ref_segment(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}

impl OpenApiSpec {
    /// Whether this is a Swagger 2.0 document
    pub fn is_swagger2(&self) -> bool {
        self.swagger.is_some() && self.openapi.is_none()
    }

    /// Named schemas in document order, from `components.schemas` or `definitions`
    pub fn component_schemas(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.components
            .iter()
            .flat_map(|c| c.schemas.iter())
            .chain(self.definitions.iter())
    }

    /// Follow a parameter `$ref`, returning the parameter itself otherwise
    pub fn resolve_parameter<'a>(&'a self, param: &'a Parameter) -> Option<&'a Parameter> {
        let Some(ref_path) = &param.ref_path else {
            return Some(param);
        };
        let name = last_ref_segment(ref_path);
        self.components
            .as_ref()
            .and_then(|c| c.parameters.get(name))
            .or_else(|| self.parameters.get(name))
    }

    /// Follow a request body `$ref`
    pub fn resolve_request_body<'a>(&'a self, body: &'a RequestBody) -> Option<&'a RequestBody> {
        let Some(ref_path) = &body.ref_path else {
            return Some(body);
        };
        self.components
            .as_ref()
            .and_then(|c| c.request_bodies.get(last_ref_segment(ref_path)))
    }

    /// Follow a response `$ref`
    pub fn resolve_response<'a>(&'a self, response: &'a Response) -> Option<&'a Response> {
        let Some(ref_path) = &response.ref_path else {
            return Some(response);
        };
        self.components
            .as_ref()
            .and_then(|c| c.responses.get(last_ref_segment(ref_path)))
    }

    /// Base URL from the first server, or Swagger 2 scheme/host/basePath
    pub fn base_url(&self) -> Option<String> {
        if let Some(server) = self.servers.first() {
            return Some(server.url.clone());
        }

        let host = self.host.as_ref()?;
        let scheme = self
            .schemes
            .iter()
            .find(|s| s.as_str() == "https")
            .or_else(|| self.schemes.first())
            .map(String::as_str)
            .unwrap_or("https");
        let base_path = self.base_path.as_deref().unwrap_or("");
        Some(format!("{}://{}{}", scheme, host, base_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_schema_name() {
        assert_eq!(ref_schema_name("#/components/schemas/Pet"), "Pet");
        assert_eq!(ref_schema_name("#/definitions/Pet"), "Pet");
        assert_eq!(ref_schema_name("other.json#/Pet"), "Pet");
    }

    #[test]
    fn test_required_forms() {
        let object: Schema =
            serde_json::from_str(r#"{"type":"object","required":["age"]}"#).unwrap();
        assert!(object.is_property_required("age"));
        assert_eq!(object.required_flag(), None);

        let flagged: Schema = serde_json::from_str(r#"{"anyOf":[],"required":true}"#).unwrap();
        assert_eq!(flagged.required_flag(), Some(true));
        assert!(flagged.required_properties().is_empty());
    }

    #[test]
    fn test_swagger2_base_url() {
        let spec: OpenApiSpec = serde_json::from_str(
            r#"{
                "swagger": "2.0",
                "info": {"title": "Pets", "version": "1"},
                "host": "api.example.com",
                "basePath": "/v1",
                "schemes": ["http", "https"]
            }"#,
        )
        .unwrap();
        assert!(spec.is_swagger2());
        assert_eq!(spec.base_url().as_deref(), Some("https://api.example.com/v1"));
    }
}
