//! OpenAPI 3.x / Swagger 2.0 document parser
//!
//! Loads a local document and converts it into `ApiDefinition` IR, resolving
//! every schema into a TypeScript type expression on the way.
//!
//! ## Usage
//! ```rust,ignore
//! use swagger_query_gen_parser::openapi::OpenApiParser;
//!
//! let parser = OpenApiParser::from_file("openapi.yaml")?;
//! let api = parser.parse(&config)?;
//! ```

mod converter;
mod parser;
mod types;

pub use converter::convert_spec;
pub use parser::OpenApiParser;
pub use types::*;
