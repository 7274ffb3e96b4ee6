//! Generator configuration loaded from YAML
//!
//! Every field is optional in the file; missing fields fall back to the
//! defaults below. CLI flags are applied on top by the caller.

use crate::{FileKind, GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no config is given
pub const DEFAULT_CONFIG_FILE: &str = "swagger-query-gen.yaml";

/// Placeholder replaced by the module name in per-module output paths
pub const MODULE_NAME_PLACEHOLDER: &str = "{moduleName}";

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Sentinel type texts of the target type system
    pub placeholders: Placeholders,
    /// Output path templates
    pub output: OutputPaths,
    /// Index of the path segment used as module name for untagged routes
    pub module_name_index: usize,
    /// Directory with `*.tera` files overriding the built-in templates
    pub templates: Option<PathBuf>,
    /// Overrides the base URL found in the document
    pub base_url: Option<String>,
    /// Import specifier of the DTO module used by generated API files
    pub dto_import: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            placeholders: Placeholders::default(),
            output: OutputPaths::default(),
            module_name_index: 0,
            templates: None,
            base_url: None,
            dto_import: "@/shared/api/dto".to_string(),
        }
    }
}

impl CodegenConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            GeneratorError::Config(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: CodegenConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given, else the default file in `dir` if present,
    /// else the built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.placeholders.any.trim().is_empty() || self.placeholders.null.trim().is_empty() {
            return Err(GeneratorError::Config(
                "placeholders.any and placeholders.null must not be empty".to_string(),
            ));
        }
        if self.placeholders.any == self.placeholders.null {
            return Err(GeneratorError::Config(format!(
                "placeholders.any and placeholders.null must differ (both are {:?})",
                self.placeholders.any
            )));
        }
        Ok(())
    }
}

/// Literal texts standing for "unknown/any" and "absent/null"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub any: String,
    pub null: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            any: "any".to_string(),
            null: "null".to_string(),
        }
    }
}

impl Placeholders {
    pub fn is_any(&self, type_expr: &str) -> bool {
        type_expr == self.any
    }

    pub fn is_null(&self, type_expr: &str) -> bool {
        type_expr == self.null
    }
}

/// Output path templates, relative to the output root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub dto: String,
    pub api: String,
    pub api_instance: String,
    pub query: String,
    pub mutation: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            dto: "src/shared/api/dto.ts".to_string(),
            api: "src/entities/{moduleName}/api/index.ts".to_string(),
            api_instance: "src/entities/{moduleName}/api/instance.ts".to_string(),
            query: "src/entities/{moduleName}/api/queries.ts".to_string(),
            mutation: "src/entities/{moduleName}/api/mutations.ts".to_string(),
        }
    }
}

impl OutputPaths {
    /// Path template for a file kind
    pub fn template(&self, kind: FileKind) -> &str {
        match kind {
            FileKind::Dto => &self.dto,
            FileKind::Api => &self.api,
            FileKind::ApiInstance => &self.api_instance,
            FileKind::Query => &self.query,
            FileKind::Mutation => &self.mutation,
        }
    }

    /// Resolve the relative output path of a file
    pub fn resolve(&self, kind: FileKind, module_name: Option<&str>) -> PathBuf {
        let template = self.template(kind);
        match module_name {
            Some(name) => PathBuf::from(template.replace(MODULE_NAME_PLACEHOLDER, name)),
            None => PathBuf::from(template),
        }
    }

    /// Override individual templates, keeping the rest
    pub fn set(&mut self, kind: FileKind, template: impl Into<String>) {
        let slot = match kind {
            FileKind::Dto => &mut self.dto,
            FileKind::Api => &mut self.api,
            FileKind::ApiInstance => &mut self.api_instance,
            FileKind::Query => &mut self.query,
            FileKind::Mutation => &mut self.mutation,
        };
        *slot = template.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
placeholders:
  any: unknown
output:
  dto: src/api/types.ts
"#;
        let config = CodegenConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.placeholders.any, "unknown");
        assert_eq!(config.placeholders.null, "null");
        assert_eq!(config.output.dto, "src/api/types.ts");
        assert_eq!(
            config.output.query,
            "src/entities/{moduleName}/api/queries.ts"
        );
        assert_eq!(config.dto_import, "@/shared/api/dto");
    }

    #[test]
    fn test_identical_placeholders_rejected() {
        let yaml = "placeholders:\n  any: x\n  \"null\": x\n";
        let err = CodegenConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, GeneratorError::Config(_)));
    }

    #[test]
    fn test_resolve_module_path() {
        let paths = OutputPaths::default();
        assert_eq!(
            paths.resolve(FileKind::Api, Some("user")),
            PathBuf::from("src/entities/user/api/index.ts")
        );
        assert_eq!(
            paths.resolve(FileKind::Dto, None),
            PathBuf::from("src/shared/api/dto.ts")
        );
    }

    #[test]
    fn test_load_or_default() {
        let dir = TempDir::new().unwrap();
        let config = CodegenConfig::load_or_default(None, dir.path()).unwrap();
        assert_eq!(config, CodegenConfig::default());

        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "module_name_index: 2\n").unwrap();
        let config = CodegenConfig::load_or_default(None, dir.path()).unwrap();
        assert_eq!(config.module_name_index, 2);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(CodegenConfig::load_or_default(Some(&missing), dir.path()).is_err());
    }
}
