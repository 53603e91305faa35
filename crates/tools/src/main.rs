use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use battlemap_core::{Catalog, GridSize, MapBuildResult, ManualConfig, MapGenerator};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Generate tactical battle maps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a map from a free-text prompt
    Generate {
        /// Description of the map, French or English
        #[arg(short, long, default_value = "")]
        prompt: String,
        #[arg(long, default_value_t = 16)]
        cols: usize,
        #[arg(long, default_value_t = 12)]
        rows: usize,
        /// Number of enemies to place
        #[arg(short, long, default_value_t = 4)]
        enemies: usize,
        /// Catalog JSON file; the built-in catalog is used when omitted
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Generate a map from a manual config file (.toml or .json)
    Manual {
        config: PathBuf,
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Validate a catalog and list its entries
    Catalog {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Summary,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate { prompt, cols, rows, enemies, catalog, format } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let result =
                MapGenerator::new(&catalog).generate(&prompt, GridSize::new(cols, rows), enemies);
            println!("{}", render(&result, format)?);
        }
        Commands::Manual { config, catalog, format } => {
            let catalog = load_catalog(catalog.as_deref())?;
            let config = load_manual_config(&config)?;
            let result = MapGenerator::new(&catalog).generate_manual(&config);
            println!("{}", render(&result, format)?);
        }
        Commands::Catalog { catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            println!("{}", describe_catalog(&catalog));
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        let catalog = Catalog::builtin();
        catalog.validate().context("Built-in catalog failed validation")?;
        return Ok(catalog);
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    let catalog = Catalog::from_json_str(&text)
        .with_context(|| format!("Invalid catalog: {}", path.display()))?;
    info!(path = %path.display(), obstacles = catalog.obstacles.len(), "catalog loaded");
    Ok(catalog)
}

fn load_manual_config(path: &Path) -> Result<ManualConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manual config: {}", path.display()))?;
    let config = match path.extension().and_then(|extension| extension.to_str()) {
        Some("toml") => ManualConfig::from_toml_str(&text),
        Some("json") => ManualConfig::from_json_str(&text),
        _ => bail!("Manual config must be a .toml or .json file: {}", path.display()),
    };
    config.with_context(|| format!("Invalid manual config: {}", path.display()))
}

fn render(result: &MapBuildResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).context("Failed to serialize map result")
        }
        OutputFormat::Summary => {
            let mut lines = result.summary.clone();
            lines.push(format!("fingerprint {:016x}", result.fingerprint()));
            lines.push("log:".to_string());
            lines.extend(result.log.iter().map(|line| format!("  {line}")));
            Ok(lines.join("\n"))
        }
    }
}

fn describe_catalog(catalog: &Catalog) -> String {
    let section = |name: &str, ids: Vec<&str>| format!("{name} ({}): {}", ids.len(), ids.join(", "));
    [
        section("obstacles", catalog.obstacles.iter().map(|entry| entry.id.as_str()).collect()),
        section("walls", catalog.walls.iter().map(|entry| entry.id.as_str()).collect()),
        section("decorations", catalog.decorations.iter().map(|entry| entry.id.as_str()).collect()),
        section("enemies", catalog.enemies.iter().map(|entry| entry.id.as_str()).collect()),
        section("patterns", catalog.patterns.iter().map(|entry| entry.id.as_str()).collect()),
    ]
    .join("\n")
}
