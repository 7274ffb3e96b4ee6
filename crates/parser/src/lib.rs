//! API document parsing for swagger-query-gen
//!
//! This crate loads OpenAPI/Swagger documents and converts them into the
//! intermediate representation (`ApiDefinition`) consumed by the generator.
//!
//! ## Resolution Strategy
//!
//! Named schemas are collected once into a `SchemaComponentsIndex`, which the
//! `TypeResolver` reads while walking every schema:
//! - `$ref` → component type name
//! - `anyOf` → union, nullability from the explicit `required` flag or the
//!   containing component's required list
//! - `oneOf` / `allOf` → union / intersection
//! - enums, arrays, objects and primitives → TypeScript equivalents

pub mod openapi;
pub mod resolver;

pub use openapi::OpenApiParser;
pub use resolver::{
    resolve_any_of, ChildResolver, SchemaComponent, SchemaComponentsIndex, SchemaKind, SchemaNode,
    TypeResolver,
};

use std::path::Path;
use swagger_query_gen_common::{ApiDefinition, CodegenConfig, Result};

/// Load a local API document and convert it into `ApiDefinition`
///
/// # Arguments
/// * `path` - Path to a JSON or YAML OpenAPI/Swagger document
/// * `config` - Generator configuration (placeholders, module naming)
pub fn parse_document(path: &Path, config: &CodegenConfig) -> Result<ApiDefinition> {
    OpenApiParser::from_file(path)?.parse(config)
}
