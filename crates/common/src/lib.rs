//! Common types and utilities for swagger-query-gen
//!
//! This crate contains shared data structures, error types, configuration and
//! naming helpers used across the parser, generator, and CLI components.

pub mod config;
pub mod naming;

pub use config::{CodegenConfig, OutputPaths, Placeholders, MODULE_NAME_PLACEHOLDER};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during client generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Malformed schema at [{path}]: {reason}")]
    MalformedSchema { path: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GeneratorError {
    /// Build a malformed-schema error from a schema location path
    pub fn malformed(schema_path: &[String], reason: impl Into<String>) -> Self {
        GeneratorError::MalformedSchema {
            path: schema_path.join("."),
            reason: reason.into(),
        }
    }
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Kind of file produced by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Shared DTO type definitions
    Dto,
    /// Request-sending API class for one module
    Api,
    /// API class instance for one module
    ApiInstance,
    /// TanStack Query option factories for one module
    Query,
    /// TanStack Query mutation hooks for one module
    Mutation,
}

impl FileKind {
    pub const ALL: [FileKind; 5] = [
        FileKind::Dto,
        FileKind::Api,
        FileKind::ApiInstance,
        FileKind::Query,
        FileKind::Mutation,
    ];

    /// Whether one file of this kind is emitted per module
    pub fn is_per_module(&self) -> bool {
        !matches!(self, FileKind::Dto)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Dto => write!(f, "DTO"),
            FileKind::Api => write!(f, "API class"),
            FileKind::ApiInstance => write!(f, "API instance"),
            FileKind::Query => write!(f, "queries"),
            FileKind::Mutation => write!(f, "mutations"),
        }
    }
}

/// HTTP method of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }

    /// Read-only methods become queries, everything else a mutation
    pub fn is_query(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head | HttpMethod::Options)
    }
}

/// Normalized API description, ready for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDefinition {
    /// Document title
    pub title: String,
    /// Document version
    pub version: String,
    /// Base URL taken from the first server (or Swagger 2 host/basePath)
    pub base_url: Option<String>,
    /// Shared DTO types (components plus generated query types)
    pub dtos: Vec<DtoDefinition>,
    /// Route modules
    pub modules: Vec<ModuleDefinition>,
}

impl ApiDefinition {
    /// Total number of routes over all modules
    pub fn route_count(&self) -> usize {
        self.modules.iter().map(|m| m.routes.len()).sum()
    }
}

/// A named DTO type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtoDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: DtoKind,
}

/// Shape of a DTO: an interface with properties or a type alias
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DtoKind {
    Interface { properties: Vec<PropertyDefinition> },
    Alias { type_expr: String },
}

/// Property of an interface DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Property name as written in the document
    pub name: String,
    /// Property key as emitted (quoted when not a valid identifier)
    pub key: String,
    pub type_expr: String,
    pub optional: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Routes grouped under one module (first tag or path segment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDefinition {
    /// Module name as found in the document
    pub name: String,
    /// Lowercase name used in output paths
    pub module_name: String,
    /// API class name, e.g. `UserApi`
    pub class_name: String,
    /// API instance name, e.g. `userApi`
    pub instance_name: String,
    /// DTO names referenced by this module's routes
    pub dto_imports: Vec<String>,
    pub routes: Vec<RouteDefinition>,
}

impl ModuleDefinition {
    pub fn queries(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.iter().filter(|r| r.is_query)
    }

    pub fn mutations(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.iter().filter(|r| !r.is_query)
    }
}

/// A single operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Method name, e.g. `getUser`
    pub name: String,
    pub http_method: HttpMethod,
    /// Path as written in the document, e.g. `/users/{id}`
    pub path: String,
    /// JS template literal body relative to the client prefix, e.g. `users/${id}`
    pub path_template: String,
    pub path_params: Vec<ParamDefinition>,
    #[serde(default)]
    pub query: Option<QueryDefinition>,
    #[serde(default)]
    pub body: Option<BodyDefinition>,
    pub response_type: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    pub is_query: bool,
    /// DTO names referenced by this route's signature
    #[serde(default)]
    pub dto_imports: Vec<String>,
}

/// Path or query parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDefinition {
    /// Name as written in the document
    pub name: String,
    /// Sanitized identifier used in generated code
    pub ident: String,
    pub type_expr: String,
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Query parameters of a route, emitted as a named DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDefinition {
    pub type_name: String,
    pub params: Vec<ParamDefinition>,
    /// Whether any query parameter is required
    pub required: bool,
}

/// Request body content encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyContent {
    Json,
    FormData,
    UrlEncoded,
}

/// Request body of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDefinition {
    pub type_expr: String,
    pub content: BodyContent,
    pub required: bool,
}
