//! Voidfire - command line scenario runner
//!
//! Loads a TOML scenario, resolves it with seeded dice and prints the result.

use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use voidfire::core::config::{set_config, EngineConfig};
use voidfire::core::error::{EngineError, Result};
use voidfire::core::types::RecordingUpdater;
use voidfire::dice::SeededDice;
use voidfire::report::{JsonPresenter, Presenter, TextPresenter};
use voidfire::scenario::Scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Resolve d100 combat scenarios
#[derive(Parser, Debug)]
#[command(name = "voidfire")]
#[command(about = "Resolve personal, unit and starship combat from a TOML scenario")]
struct Args {
    /// Scenario file
    scenario: PathBuf,

    /// Random seed for reproducible rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Engine config overrides (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("voidfire=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Some(path) = &args.config {
        let config = EngineConfig::from_toml(&std::fs::read_to_string(path)?)?;
        set_config(config)
            .map_err(|_| EngineError::Config("engine config already set".into()))?;
        tracing::info!(path = %path.display(), "engine config loaded");
    }

    let scenario = Scenario::load(&args.scenario)?;
    let mut dice = match args.seed {
        Some(seed) => SeededDice::new(seed),
        None => SeededDice::from_entropy(),
    };
    tracing::info!(kind = scenario.kind(), seed = dice.seed(), "resolving scenario");

    let mut updater = RecordingUpdater::new();
    let mut presenter: Box<dyn Presenter> = match args.format {
        Format::Text => Box::new(TextPresenter::new(io::stdout())),
        Format::Json => Box::new(JsonPresenter::new(io::stdout())),
    };
    scenario.run(&mut dice, &mut updater, presenter.as_mut())?;

    for (entity, updates) in &updater.calls {
        for update in updates {
            tracing::info!(entity = %entity, path = %update.path, value = update.value, "update");
        }
    }
    Ok(())
}
