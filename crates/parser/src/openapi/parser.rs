//! OpenAPI document loader

use super::types::OpenApiSpec;
use std::fs;
use std::path::Path;
use swagger_query_gen_common::{ApiDefinition, CodegenConfig, GeneratorError, Result};
use tracing::debug;

/// Loaded OpenAPI 3.x or Swagger 2.0 document
pub struct OpenApiParser {
    spec: OpenApiSpec,
}

impl OpenApiParser {
    /// Load a document from a local JSON or YAML file
    ///
    /// The format follows the extension (`.json`, `.yaml`, `.yml`); other
    /// extensions are sniffed from the content. Remote URLs are rejected.
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = OpenApiParser::from_file("petstore.yaml")?;
    /// let api = parser.parse(&CodegenConfig::default())?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        if shown.starts_with("http://") || shown.starts_with("https://") {
            return Err(GeneratorError::Parse(format!(
                "Remote documents are not supported, download {} and pass the local file",
                shown
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!("Failed to read OpenAPI file {}: {}", shown, e))
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        debug!(path = %shown, ?extension, "loading API document");

        match extension.as_deref() {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ if content.trim_start().starts_with('{') => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: OpenApiSpec = serde_json::from_str(json)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))?;
        Self::new(spec)
    }

    /// Parse a document from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let spec: OpenApiSpec = serde_yaml::from_str(yaml)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;
        Self::new(spec)
    }

    fn new(spec: OpenApiSpec) -> Result<Self> {
        if spec.openapi.is_none() && spec.swagger.is_none() {
            return Err(GeneratorError::Parse(
                "Document declares neither `openapi` nor `swagger` version".to_string(),
            ));
        }
        Ok(Self { spec })
    }

    /// Convert the document into `ApiDefinition`
    pub fn parse(&self, config: &CodegenConfig) -> Result<ApiDefinition> {
        super::converter::convert_spec(&self.spec, config)
    }

    /// Get reference to the underlying document
    pub fn spec(&self) -> &OpenApiSpec {
        &self.spec
    }
}
