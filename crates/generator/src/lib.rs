//! TypeScript client generation for swagger-query-gen
//!
//! This crate renders the `ApiDefinition` IR into TypeScript sources:
//! - a shared DTO file
//! - a `ky`-based API class and its instance per module
//! - TanStack Query option factories and mutation hooks per module
//!
//! Rendering and writing are separate steps, so callers can filter or
//! inspect the files before anything touches the disk.

mod templates;
mod view;

pub use view::relative_import;

use std::fs;
use std::path::{Path, PathBuf};
use swagger_query_gen_common::{
    ApiDefinition, CodegenConfig, FileKind, GeneratorError, ModuleDefinition, OutputPaths, Result,
};
use tera::Tera;
use tracing::{debug, info};
use view::ModuleView;

/// Prefix used by the API instance when the document declares no server
const DEFAULT_PREFIX_URL: &str = "/";

/// A rendered file, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub kind: FileKind,
    /// Module the file belongs to, `None` for the shared DTO file
    pub module_name: Option<String>,
    pub content: String,
}

impl GeneratedFile {
    /// Output path relative to the output root
    pub fn relative_path(&self, paths: &OutputPaths) -> PathBuf {
        paths.resolve(self.kind, self.module_name.as_deref())
    }
}

/// TypeScript client generator
pub struct ClientGenerator {
    api: ApiDefinition,
    tera: Tera,
    output: OutputPaths,
    dto_import: String,
    base_url: Option<String>,
}

impl ClientGenerator {
    /// Create a generator, loading built-in templates and any project overrides
    pub fn new(api: ApiDefinition, config: &CodegenConfig) -> Result<Self> {
        let tera = templates::load_templates(config.templates.as_deref())?;
        Ok(Self {
            base_url: config.base_url.clone().or_else(|| api.base_url.clone()),
            api,
            tera,
            output: config.output.clone(),
            dto_import: config.dto_import.clone(),
        })
    }

    pub fn api(&self) -> &ApiDefinition {
        &self.api
    }

    /// Render every file kind
    pub fn render(&self) -> Result<Vec<GeneratedFile>> {
        self.render_targets(&FileKind::ALL)
    }

    /// Render only the requested file kinds
    ///
    /// Query and mutation files are skipped for modules without such routes.
    pub fn render_targets(&self, targets: &[FileKind]) -> Result<Vec<GeneratedFile>> {
        let mut files = Vec::new();

        if targets.contains(&FileKind::Dto) {
            files.push(GeneratedFile {
                kind: FileKind::Dto,
                module_name: None,
                content: self.render_template("dto.ts", &self.create_context())?,
            });
        }

        for module in &self.api.modules {
            for &kind in targets.iter().filter(|k| k.is_per_module()) {
                if let Some(content) = self.render_module(module, kind)? {
                    files.push(GeneratedFile {
                        kind,
                        module_name: Some(module.module_name.clone()),
                        content,
                    });
                }
            }
        }

        Ok(files)
    }

    fn render_module(&self, module: &ModuleDefinition, kind: FileKind) -> Result<Option<String>> {
        let (template, routes): (&str, Vec<_>) = match kind {
            FileKind::Dto => return Ok(None),
            FileKind::Api => ("api.ts", module.routes.iter().collect()),
            FileKind::ApiInstance => ("instance.ts", Vec::new()),
            FileKind::Query => ("queries.ts", module.queries().collect()),
            FileKind::Mutation => ("mutations.ts", module.mutations().collect()),
        };

        if matches!(kind, FileKind::Query | FileKind::Mutation) && routes.is_empty() {
            debug!(module = %module.module_name, %kind, "no routes, skipping file");
            return Ok(None);
        }

        let own_path = self.output.resolve(kind, Some(&module.module_name));
        let api_path = self.output.resolve(FileKind::Api, Some(&module.module_name));
        let instance_path = self
            .output
            .resolve(FileKind::ApiInstance, Some(&module.module_name));

        let view = ModuleView::new(
            module,
            routes.into_iter(),
            relative_import(&own_path, &api_path),
            relative_import(&own_path, &instance_path),
        );

        let mut context = self.create_context();
        context.insert("module", &view);
        self.render_template(template, &context).map(Some)
    }

    fn render_template(&self, name: &str, context: &tera::Context) -> Result<String> {
        self.tera
            .render(name, context)
            .map_err(|e| GeneratorError::Generation(format!("Template error in {}: {:?}", name, e)))
    }

    /// Render the requested kinds and write them below `root`
    pub fn write_to_directory(&self, root: &Path, targets: &[FileKind]) -> Result<Vec<PathBuf>> {
        let files = self.render_targets(targets)?;
        write_files(root, &self.output, &files)
    }

    /// Create template context shared by every file
    fn create_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("api", &self.api);
        context.insert("dto_import", &self.dto_import);
        context.insert(
            "base_url",
            self.base_url.as_deref().unwrap_or(DEFAULT_PREFIX_URL),
        );
        context
    }
}

/// Write rendered files below `root`, creating parent directories
///
/// Returns the written paths in order.
pub fn write_files(
    root: &Path,
    paths: &OutputPaths,
    files: &[GeneratedFile],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let output_path = root.join(file.relative_path(paths));
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GeneratorError::Generation(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&output_path, &file.content).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to write {}: {}",
                output_path.display(),
                e
            ))
        })?;

        info!(kind = %file.kind, path = %output_path.display(), "wrote file");
        written.push(output_path);
    }

    Ok(written)
}

/// Generate every file for `api` below `root` (convenience function)
pub fn generate_client(
    api: ApiDefinition,
    config: &CodegenConfig,
    root: &Path,
) -> Result<Vec<PathBuf>> {
    ClientGenerator::new(api, config)?.write_to_directory(root, &FileKind::ALL)
}
