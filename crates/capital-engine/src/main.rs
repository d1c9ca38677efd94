//! Replay binary for Contrived Capital.
//!
//! Loads the record directories, validates them, replays every event in
//! date order, reconciles cash-outs against the bank, and prints the final
//! state.
//!
//! # Run Sequence
//!
//! 1. Load configuration from `capital-config.yaml` (or `CAPITAL_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Load players, plots, moves, and bank transactions
//! 4. Set up the table
//! 5. Validate the game data and the timeline
//! 6. Replay the timeline
//! 7. Reconcile cash-outs and print the report

mod error;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use capital_core::config::LoggingConfig;
use capital_core::{
    CapitalConfig, GameState, Timeline, TurnCallback, TurnSummary, owed_transactions, run_replay,
    validate_game_data, validate_timeline,
};
use capital_loader::GameData;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report::Report;

/// Environment variable selecting the config file.
const CONFIG_PATH_ENV: &str = "CAPITAL_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "capital-config.yaml";

/// Logs each processed event at `debug`.
struct TraceCallback;

impl TurnCallback for TraceCallback {
    fn on_turn(&mut self, summary: &TurnSummary, state: &GameState) {
        debug!(
            index = summary.index,
            kind = summary.kind.as_str(),
            timestamp = %summary.timestamp,
            applied = summary.outcome.as_ref().map(capital_core::MoveOutcome::is_applied),
            players = state.players.len(),
            "Turn processed"
        );
    }
}

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\nError: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging);
    info!(data_root = %config.data.root.display(), "capital-engine starting");

    match run(&config) {
        Ok(report) => {
            println!("{report}");
            info!("capital-engine finished");
            ExitCode::SUCCESS
        }
        Err(EngineError::Validation { source }) => {
            error!(stage = %source.stage, errors = source.errors.len(), "Validation failed");
            eprintln!("\n{source}");
            eprintln!("\nPlease fix the validation errors before continuing.");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "capital-engine failed");
            eprintln!("\nError: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Install the `fmt` subscriber. `RUST_LOG` wins over `logging.level`.
fn init_tracing(logging: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration, falling back to defaults when the file is absent.
fn load_config() -> Result<CapitalConfig, EngineError> {
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        Ok(CapitalConfig::from_file(&path)?)
    } else {
        let mut config = CapitalConfig::default();
        config.data.apply_env_overrides();
        Ok(config)
    }
}

/// Run one full replay and render the report.
fn run(config: &CapitalConfig) -> Result<String, EngineError> {
    let GameData {
        players,
        plots,
        moves,
        bank,
    } = capital_loader::load_game_data(&config.data, &config.game)?;

    let state = GameState::setup(players, plots, bank, &config.game)?;

    let mut warnings = validate_game_data(&state, &moves)?;
    let mut timeline = Timeline::new(state, moves);
    warnings.extend(validate_timeline(&timeline)?);
    info!(warnings = warnings.len(), "Validation passed");

    let summary = run_replay(&mut timeline, &mut TraceCallback);

    let state = timeline.state();
    let owed = owed_transactions(
        timeline.cash_out_moves(),
        &state.bank,
        &state.players,
        &config.reconciliation,
    );
    info!(owed = owed.len(), "Reconciliation complete");

    Ok(Report {
        state,
        summary: &summary,
        owed: &owed,
        warnings: &warnings,
    }
    .to_string())
}
