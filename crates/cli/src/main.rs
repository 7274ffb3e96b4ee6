//! swagger-query-gen CLI
//!
//! Command-line interface for generating TypeScript API clients and TanStack
//! Query wrappers from OpenAPI/Swagger documents.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::{Path, PathBuf};
use swagger_query_gen_common::{CodegenConfig, FileKind};
use swagger_query_gen_generator::ClientGenerator;
use swagger_query_gen_parser::parse_document;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swagger-query-gen")]
#[command(version, about = "Generate TypeScript API clients and TanStack Query wrappers from OpenAPI/Swagger documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and display the extracted modules and DTOs
    #[command(after_help = "EXAMPLES:\n  \
        # Inspect an OpenAPI 3 document\n  \
        swagger-query-gen inspect openapi.json\n\n  \
        # Inspect a Swagger 2 document with route details\n  \
        swagger-query-gen inspect swagger.yaml --verbose")]
    Inspect {
        /// Path to the OpenAPI/Swagger document (JSON or YAML)
        input: PathBuf,

        /// Config file (defaults to ./swagger-query-gen.yaml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate TypeScript files from a document
    #[command(after_help = "EXAMPLES:\n  \
        # Generate everything into the current project\n  \
        swagger-query-gen generate openapi.json\n\n  \
        # Only regenerate DTOs and API classes\n  \
        swagger-query-gen generate openapi.json --targets dto,api\n\n  \
        # Custom layout and templates\n  \
        swagger-query-gen generate openapi.yaml \\\n    \
        --output ./web \\\n    \
        --api-output-path 'src/api/{moduleName}.ts' \\\n    \
        --templates ./codegen-templates")]
    Generate {
        /// Path to the OpenAPI/Swagger document (JSON or YAML)
        input: PathBuf,

        /// Config file (defaults to ./swagger-query-gen.yaml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output root directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Comma-separated list of file kinds to write
        #[arg(long, value_delimiter = ',')]
        targets: Option<Vec<Target>>,

        /// Directory with `*.tera` files overriding the built-in templates
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Base URL used by the API instances
        #[arg(long)]
        base_url: Option<String>,

        /// Output path of the DTO file
        #[arg(long)]
        dto_output_path: Option<String>,

        /// Output path template of API classes (`{moduleName}` is substituted)
        #[arg(long)]
        api_output_path: Option<String>,

        /// Output path template of API instances
        #[arg(long)]
        api_instance_output_path: Option<String>,

        /// Output path template of query files
        #[arg(long)]
        query_output_path: Option<String>,

        /// Output path template of mutation files
        #[arg(long)]
        mutation_output_path: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    /// Shared DTO types
    Dto,
    /// API classes
    Api,
    /// API instances
    Instance,
    /// Query option factories
    Queries,
    /// Mutation hooks
    Mutations,
}

impl From<Target> for FileKind {
    fn from(target: Target) -> Self {
        match target {
            Target::Dto => FileKind::Dto,
            Target::Api => FileKind::Api,
            Target::Instance => FileKind::ApiInstance,
            Target::Queries => FileKind::Query,
            Target::Mutations => FileKind::Mutation,
        }
    }
}

/// Flags of the `generate` command
struct GenerateArgs {
    input: PathBuf,
    config: Option<PathBuf>,
    output: PathBuf,
    targets: Option<Vec<Target>>,
    templates: Option<PathBuf>,
    base_url: Option<String>,
    output_paths: Vec<(FileKind, Option<String>)>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }

    match cli.command {
        Commands::Inspect { input, config } => {
            inspect_command(&input, config.as_deref(), cli.verbose)?;
        }
        Commands::Generate {
            input,
            config,
            output,
            targets,
            templates,
            base_url,
            dto_output_path,
            api_output_path,
            api_instance_output_path,
            query_output_path,
            mutation_output_path,
        } => {
            generate_command(
                GenerateArgs {
                    input,
                    config,
                    output,
                    targets,
                    templates,
                    base_url,
                    output_paths: vec![
                        (FileKind::Dto, dto_output_path),
                        (FileKind::Api, api_output_path),
                        (FileKind::ApiInstance, api_instance_output_path),
                        (FileKind::Query, query_output_path),
                        (FileKind::Mutation, mutation_output_path),
                    ],
                },
                cli.verbose,
            )?;
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` takes precedence over `--verbose`
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("{} tracing subscriber already initialized", "⚠".yellow());
    }
}

fn load_config(explicit: Option<&Path>) -> Result<CodegenConfig> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    CodegenConfig::load_or_default(explicit, &cwd).context("Failed to load configuration")
}

fn inspect_command(input: &Path, config: Option<&Path>, verbose: bool) -> Result<()> {
    println!("{} Parsing document: {}", "→".cyan(), input.display());

    let config = load_config(config)?;
    let api = parse_document(input, &config).context("Failed to parse API document")?;

    println!("\n{}", "✓ Parse successful!".green().bold());
    println!("\n{}", "API Definition:".bold());
    println!("  Title: {}", api.title.yellow());
    println!("  Version: {}", api.version.yellow());
    println!(
        "  Base URL: {}",
        api.base_url.as_deref().unwrap_or("(none)")
    );
    println!("  DTOs: {}", api.dtos.len());
    println!("  Modules: {}", api.modules.len());
    println!("  Routes: {}", api.route_count());

    println!("\n{}", "Modules:".bold());
    for module in &api.modules {
        println!(
            "  • {} ({} queries, {} mutations)",
            module.class_name.cyan(),
            module.queries().count(),
            module.mutations().count()
        );

        if verbose {
            for route in &module.routes {
                println!(
                    "    {} {} → {}",
                    route.http_method.as_str().to_uppercase(),
                    route.path,
                    route.name
                );
            }
        }
    }

    Ok(())
}

fn generate_command(args: GenerateArgs, verbose: bool) -> Result<()> {
    println!(
        "{} Generating client from: {}",
        "→".cyan(),
        args.input.display()
    );

    let mut config = load_config(args.config.as_deref())?;
    if let Some(templates) = args.templates {
        config.templates = Some(templates);
    }
    if let Some(base_url) = args.base_url {
        config.base_url = Some(base_url);
    }
    for (kind, path) in args
        .output_paths
        .into_iter()
        .filter_map(|(kind, path)| path.map(|p| (kind, p)))
    {
        config.output.set(kind, path);
    }

    let targets: Vec<FileKind> = match args.targets {
        Some(targets) if !targets.is_empty() => targets.into_iter().map(FileKind::from).collect(),
        _ => FileKind::ALL.to_vec(),
    };

    if verbose {
        println!("  Output: {}", args.output.display());
        println!(
            "  Targets: {}",
            targets
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        if let Some(templates) = &config.templates {
            println!("  Templates: {}", templates.display());
        }
    }

    println!("{} Parsing document...", "→".cyan());
    let api = parse_document(&args.input, &config).context("Failed to parse API document")?;
    println!(
        "{} Parsed {} modules, {} routes, {} DTOs",
        "✓".green(),
        api.modules.len(),
        api.route_count(),
        api.dtos.len()
    );

    if api.modules.is_empty() {
        println!("{} Document declares no routes", "⚠".yellow());
    }

    println!("{} Rendering files...", "→".cyan());
    let generator = ClientGenerator::new(api, &config).context("Failed to create generator")?;
    let written = generator
        .write_to_directory(&args.output, &targets)
        .context("Failed to generate client")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("\n{}", "Generated files:".bold());
    for path in &written {
        println!("  📄 {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "swagger-query-gen",
            "generate",
            "openapi.json",
            "--targets",
            "dto,queries",
            "--api-output-path",
            "src/api/{moduleName}.ts",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                input,
                targets,
                api_output_path,
                output,
                ..
            } => {
                assert_eq!(input, PathBuf::from("openapi.json"));
                assert_eq!(targets, Some(vec![Target::Dto, Target::Queries]));
                assert_eq!(api_output_path.as_deref(), Some("src/api/{moduleName}.ts"));
                assert_eq!(output, PathBuf::from("."));
            }
            Commands::Inspect { .. } => panic!("expected generate"),
        }
    }

    #[test]
    fn test_unknown_target_rejected() {
        assert!(Cli::try_parse_from([
            "swagger-query-gen",
            "generate",
            "openapi.json",
            "--targets",
            "hooks",
        ])
        .is_err());
    }

    #[test]
    fn test_target_maps_to_file_kind() {
        assert_eq!(FileKind::from(Target::Instance), FileKind::ApiInstance);
        assert_eq!(FileKind::from(Target::Mutations), FileKind::Mutation);
    }
}
