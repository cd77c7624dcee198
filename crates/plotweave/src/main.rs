use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use plotweave_config::{AppConfig, EditSurface};

mod script;

use script::{parse_script, Replayer};

/// Replays an edit script against a document's undo/redo history.
#[derive(Parser, Debug)]
#[command(name = "plotweave", version, about)]
struct Cli {
    /// Edit script to replay (`init`, `push`, `undo`, `redo`, `save`, `status`).
    script: PathBuf,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Editing surface whose history capacity applies.
    #[arg(long, default_value = "node-graph")]
    surface: EditSurface,

    /// Override the history capacity for this run.
    #[arg(long)]
    capacity: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting plotweave");

    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    let mut config = AppConfig::load_or_create(&config_path);
    if let Some(capacity) = cli.capacity {
        config.surface_capacities.insert(cli.surface, capacity);
    }
    tracing::info!(
        surface = %cli.surface,
        capacity = config.capacity_for(cli.surface),
        "Loaded config from {}",
        config_path.display()
    );

    let source = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("Failed to read script {}", cli.script.display()))?;
    let lines = parse_script(&source)
        .with_context(|| format!("Failed to parse script {}", cli.script.display()))?;

    let mut stdout = std::io::stdout().lock();
    let summary = Replayer::new(&config, cli.surface)
        .run(&lines, &mut stdout)
        .with_context(|| format!("Failed to replay script {}", cli.script.display()))?;

    match summary {
        Some(summary) => writeln!(stdout, "final: {summary}")?,
        None => tracing::warn!("Script never initialized a document"),
    }
    Ok(())
}
