//! Silhouette command line tool
//!
//! Discovers templates from module and theme directories and shows how a
//! shape occurrence resolves against them.
//!
//! Usage:
//!   silhouette resolve --feature theme:./Themes/TheTheme Content --display-type Summary --attr ContentType=BlogPost
//!   silhouette paths Content_Summary__BlogPost

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use silhouette::{NamingConfig, ShapeOccurrence, shape_name_to_candidate_paths};
use silhouette_registry::{FileSystemSource, Provenance, ShapeTable, TemplateSource};
use tracing::{info, warn};

mod error;

use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "silhouette")]
#[command(about = "Inspect shape template resolution", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a shape occurrence against discovered templates
    Resolve(ResolveArgs),

    /// Print the template paths that would render a shape name
    Paths {
        /// Canonical shape name, e.g. Content_Summary__BlogPost
        name: String,
    },
}

#[derive(clap::Args)]
struct ResolveArgs {
    /// Base shape type
    shape_type: String,

    /// Template directory as <kind>:<dir>, kind being module, base-theme or theme
    #[arg(short, long = "feature", value_name = "KIND:DIR")]
    features: Vec<String>,

    /// Display type of the occurrence
    #[arg(short, long)]
    display_type: Option<String>,

    /// Contextual attribute as Key=Value, e.g. ContentType=BlogPost
    #[arg(short, long = "attr", value_name = "KEY=VALUE")]
    attributes: Vec<String>,

    /// Declared alternate; later ones take precedence
    #[arg(long = "alternate", value_name = "NAME")]
    alternates: Vec<String>,

    /// Explicit wrapper override
    #[arg(long)]
    wrapper: Option<String>,

    /// Print the full candidate trace as JSON
    #[arg(long)]
    trace: bool,
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "silhouette_registry=info".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let naming = NamingConfig::from_env()?;

    match cli.command {
        Command::Paths { name } => {
            for path in shape_name_to_candidate_paths(&name, &naming) {
                println!("{}", path);
            }
            Ok(())
        }
        Command::Resolve(args) => resolve(args, naming).await,
    }
}

async fn resolve(args: ResolveArgs, naming: NamingConfig) -> Result<()> {
    let mut sources = args
        .features
        .iter()
        .map(|feature| parse_feature(feature))
        .collect::<Result<Vec<_>>>()?;
    // modules first so enumeration order follows precedence
    sources.sort_by_key(|source| source.provenance());
    let sources: Vec<Arc<dyn TemplateSource>> = sources
        .into_iter()
        .map(|source| Arc::new(source) as Arc<dyn TemplateSource>)
        .collect();

    let table = ShapeTable::new(naming);
    let report = table.refresh(1, &sources).await?;
    info!(
        names = report.names,
        templates = report.templates,
        "templates discovered"
    );
    for diagnostic in &report.diagnostics {
        warn!("{}", diagnostic);
    }

    let occurrence = build_occurrence(&args)?;

    if args.trace {
        let trace = table.trace(&occurrence);
        println!("{}", serde_json::to_string_pretty(&trace)?);
        return Ok(());
    }

    let (resolution, wrappers) = table.resolve_with_wrappers(&occurrence);
    match resolution.template() {
        Some(template) => println!(
            "{} <- {} [{}]",
            template.shape_name, template.source, template.provenance
        ),
        None => println!("{}: no template found", occurrence.shape_type()),
    }
    for wrapper in &wrappers {
        println!("  wrapped by {} <- {}", wrapper.shape_name, wrapper.source);
    }

    Ok(())
}

/// Parses `<kind>:<dir>`; the directory name becomes the feature name
fn parse_feature(argument: &str) -> Result<FileSystemSource> {
    let (kind, dir) = argument
        .split_once(':')
        .ok_or_else(|| CliError::Argument(format!("expected <kind>:<dir>, got '{}'", argument)))?;
    let provenance: Provenance = kind.parse()?;

    let root = PathBuf::from(dir);
    let feature = root
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(dir)
        .to_string();
    Ok(FileSystemSource::new(feature, provenance, root))
}

fn build_occurrence(args: &ResolveArgs) -> Result<ShapeOccurrence> {
    let mut builder = ShapeOccurrence::builder(args.shape_type.as_str());
    if let Some(display_type) = &args.display_type {
        builder = builder.display_type(display_type.as_str());
    }
    for attribute in &args.attributes {
        let (key, value) = attribute.split_once('=').ok_or_else(|| {
            CliError::Argument(format!("expected KEY=VALUE, got '{}'", attribute))
        })?;
        builder = builder.attribute_named(key, value)?;
    }
    for alternate in &args.alternates {
        builder = builder.alternate(alternate);
    }
    if let Some(wrapper) = &args.wrapper {
        builder = builder.wrapper(wrapper);
    }
    Ok(builder.build()?)
}
