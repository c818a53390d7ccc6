//! openapi-rst CLI
//!
//! Command-line interface for rendering OpenAPI specs as
//! reStructuredText httpdomain markup.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use openapi_rst_renderer::{render, RenderOptions};
use openapi_rst_resolver::{load_spec, normalize, resolve_refs};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "openapi-rst")]
#[command(version, about = "Render OpenAPI specs as reStructuredText httpdomain markup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a spec file as httpdomain markup
    #[command(after_help = "EXAMPLES:\n  \
        # Render a whole spec to stdout\n  \
        openapi-rst render --spec petstore.yaml\n\n  \
        # Render selected endpoints to a file\n  \
        openapi-rst render --spec petstore.yaml --paths /pets,/pets/{id} --output pets.rst\n\n  \
        # Anchor relative references at an explicit base URI\n  \
        openapi-rst render --spec petstore.json --uri https://example.com/api/petstore.json")]
    Render {
        /// Path to the spec file (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Base URI for reference resolution (defaults to the spec
        /// file's own file:// URL)
        #[arg(short, long)]
        uri: Option<String>,

        /// Comma-separated list of endpoint paths to render (all when
        /// not specified)
        #[arg(short, long, value_delimiter = ',')]
        paths: Option<Vec<String>>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve all references in a spec and dump the expanded document
    #[command(after_help = "EXAMPLES:\n  \
        # Dump the dereferenced spec as pretty JSON\n  \
        openapi-rst resolve --spec petstore.yaml\n\n  \
        # Dump as YAML to a file\n  \
        openapi-rst resolve --spec petstore.yaml --format yaml --output resolved.yaml")]
    Resolve {
        /// Path to the spec file (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Base URI for reference resolution (defaults to the spec
        /// file's own file:// URL)
        #[arg(short, long)]
        uri: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: DumpFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DumpFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Render {
            spec,
            uri,
            paths,
            output,
        } => render_command(&spec, uri, paths, output.as_deref(), cli.verbose),
        Commands::Resolve {
            spec,
            uri,
            format,
            output,
        } => resolve_command(&spec, uri, format, output.as_deref(), cli.verbose),
    }
}

fn render_command(
    spec_path: &Path,
    uri: Option<String>,
    paths: Option<Vec<String>>,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    eprintln!("{} Loading spec: {}", "→".cyan(), spec_path.display());
    let tree = load_spec(spec_path)
        .with_context(|| format!("failed to load spec {}", spec_path.display()))?;

    let options = RenderOptions {
        uri: uri.unwrap_or_else(|| default_base_uri(spec_path)),
        paths,
    };

    if verbose {
        eprintln!("  Base URI: {}", options.uri);
        if let Some(paths) = &options.paths {
            eprintln!("  Paths: {}", paths.join(", "));
        }
    }

    eprintln!("{} Rendering...", "→".cyan());
    let markup = render(tree, &options).context("failed to render spec")?;

    match output {
        Some(path) => {
            std::fs::write(path, markup.to_string())
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} Wrote {}", "✓".green().bold(), path.display());
        }
        None => print!("{}", markup),
    }

    Ok(())
}

fn resolve_command(
    spec_path: &Path,
    uri: Option<String>,
    format: DumpFormat,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    eprintln!("{} Loading spec: {}", "→".cyan(), spec_path.display());
    let tree = load_spec(spec_path)
        .with_context(|| format!("failed to load spec {}", spec_path.display()))?;

    let base_uri = uri.unwrap_or_else(|| default_base_uri(spec_path));
    if verbose {
        eprintln!("  Base URI: {}", base_uri);
    }

    eprintln!("{} Resolving references...", "→".cyan());
    let mut resolved = resolve_refs(&base_uri, tree).context("failed to resolve references")?;
    normalize(&mut resolved);

    let dump = match format {
        DumpFormat::Json => {
            serde_json::to_string_pretty(&resolved).context("failed to serialize as JSON")?
        }
        DumpFormat::Yaml => {
            serde_yaml::to_string(&resolved).context("failed to serialize as YAML")?
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, dump)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} Wrote {}", "✓".green().bold(), path.display());
        }
        None => println!("{}", dump),
    }

    Ok(())
}

/// The spec file's own file:// URL, so same-directory references work
/// without an explicit --uri
fn default_base_uri(spec_path: &Path) -> String {
    let absolute = std::fs::canonicalize(spec_path).unwrap_or_else(|_| spec_path.to_path_buf());
    format!("file://{}", absolute.display())
}
