//! wkmp-em - Entity Merger command-line tool
//!
//! Reads a JSON array of fragments (from a file or stdin), merges them into
//! one entity and prints the result as JSON. Prints `null` when no entity
//! could be materialized in lenient mode.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use wkmp_common::config::ConfigResolver;
use wkmp_em::schema::load_schema_file;
use wkmp_em::{EntityKind, FragmentMerger, MergeMode, SchemaRegistry};

/// Command-line arguments for wkmp-em
#[derive(Parser, Debug)]
#[command(name = "wkmp-em")]
#[command(about = "Assemble a catalog entity from its fragments")]
#[command(version)]
struct Args {
    /// Entity kind to assemble (e.g. album-release)
    #[arg(short, long, default_value = "album-release")]
    kind: String,

    /// TOML schema file replacing the built-in entity schema
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Fail on a missing root fragment or an unmatched collection placeholder
    #[arg(long)]
    strict: bool,

    /// Config file (defaults to $WKMP_EM_CONFIG, then ~/.config/wkmp/wkmp-em.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the merged entity
    #[arg(short, long)]
    pretty: bool,

    /// JSON file holding an array of fragments, or "-" for stdin
    input: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Config picks the log level, so its source is reported once tracing is up
    let (config, source) = ConfigResolver::new("wkmp-em")
        .load_with_source(args.config.as_deref())
        .context("Failed to load configuration")?;
    wkmp_common::logging::init_tracing(&config.logging)?;

    info!("Starting wkmp-em {}", env!("CARGO_PKG_VERSION"));
    source.log("wkmp-em");

    let kind: EntityKind = args.kind.parse()?;

    let registry = match args.schema.as_ref().or(config.merge.schema.as_ref()) {
        Some(path) => Arc::new(
            load_schema_file(path)
                .with_context(|| format!("Failed to load schema {}", path.display()))?,
        ),
        None => SchemaRegistry::builtin(),
    };

    let mode = MergeMode::from_strict(args.strict || config.merge.strict);
    let merger = FragmentMerger::new(registry).with_mode(mode);

    let fragments = read_fragments(&args.input)?;
    debug!(count = fragments.len(), mode = ?mode, "Fragments loaded");

    let entity = merger
        .merge(kind, &fragments)
        .with_context(|| format!("Unable to assemble {} from {}", kind, args.input.display()))?;

    let output = entity.unwrap_or(Value::Null);
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    Ok(())
}

/// Read the fragment array from `input` ("-" reads stdin)
fn read_fragments(input: &Path) -> Result<Vec<Value>> {
    let content = if input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read fragments from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    serde_json::from_str(&content).context("Fragments must be a JSON array of single-key objects")
}
