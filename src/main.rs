use anyhow::{bail, Context, Result};
use clap::Parser;
use sheetcast::config::{Config, SheetConfig};
use sheetcast::convert::{convert_dir, read_file_text};
use sheetcast::helpers::encoding::EncodingHint;
use sheetcast::json::JsonValue;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Converts a directory of CSV sheets into JSON record files.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing the input .csv sheets
    input_dir: PathBuf,

    /// Directory the <sheet>.json files are written to
    output_dir: PathBuf,

    /// Optional JSON configuration document
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Seed configuration used when no document overrides it.
fn default_config() -> Config {
    let mut config = Config::default();
    config.sheets.insert(
        "Item".to_owned(),
        SheetConfig {
            start_cell: "A2".to_owned(),
            columns: ["Idx", "Name", "Type", "Value", "Effect"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
        },
    );
    config.sheets.insert(
        "Shop".to_owned(),
        SheetConfig {
            start_cell: "A2".to_owned(),
            columns: ["ShopId", "ItemIdx", "Price", "Stock"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
        },
    );
    config
}

/// Loads the configuration, overlaying the optional document onto the seeds.
/// An unreadable or malformed document leaves the defaults in effect.
fn load_config(path: Option<&Path>) -> Config {
    let mut config = default_config();
    let Some(path) = path else {
        return config;
    };
    match read_file_text(path, EncodingHint::Auto, None) {
        Ok(text) => match JsonValue::parse(&text) {
            Ok(root) => config.apply_json(&root),
            Err(error) => warn!("Ignoring config '{}': {}", path.display(), error),
        },
        Err(error) => warn!("Cannot read config '{}': {}", path.display(), error),
    }
    config
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !cli.input_dir.is_dir() {
        bail!("Input directory not found: {}", cli.input_dir.display());
    }

    let config = load_config(cli.config.as_deref());
    let summary = convert_dir(&cli.input_dir, &cli.output_dir, &config)
        .with_context(|| format!("Converting '{}'", cli.input_dir.display()))?;
    info!(
        "Done: {} converted, {} skipped, {} failed",
        summary.converted, summary.skipped, summary.failed
    );
    Ok(())
}
