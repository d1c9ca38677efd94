//! Directory scanning for each record kind.
//!
//! Every data directory holds `*.txt` files read in file-name order. A
//! file that cannot be read or parsed is logged and skipped; the rest of
//! the directory still loads.

use std::io;
use std::path::{Path, PathBuf};

use capital_core::Bank;
use capital_core::config::{DataConfig, GameConfig};
use capital_types::{BankTransaction, Move, Player, Plot, compare_dated};
use tracing::{info, warn};

use crate::error::LoadError;
use crate::records::{parse_bank_transaction, parse_move, parse_player, parse_plot};

const RECORD_EXTENSION: &str = "txt";

/// Everything loaded from the data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameData {
    /// Players, ordered by join date.
    pub players: Vec<Player>,
    /// Plots, ordered by start date and limited to the table size.
    pub plots: Vec<Plot>,
    /// Moves, ordered by date.
    pub moves: Vec<Move>,
    /// Bank transactions.
    pub bank: Bank,
}

/// Paths of the readable entries, logging and dropping the rest.
fn readable_entries<'a>(
    dir: &'a Path,
    entries: impl Iterator<Item = io::Result<PathBuf>> + 'a,
) -> impl Iterator<Item = PathBuf> + 'a {
    entries.filter_map(move |entry| match entry {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
            None
        }
    })
}

/// Record files in `dir`, sorted by path.
fn record_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = readable_entries(dir, entries.map(|e| e.map(|entry| entry.path())))
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == RECORD_EXTENSION)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Parse every record file in `dir`, skipping the ones that fail.
fn load_records<T>(
    dir: &Path,
    kind: &'static str,
    parse: impl Fn(&Path, &str) -> Result<T, LoadError>,
) -> Result<Vec<T>, LoadError> {
    let mut records = Vec::new();
    for path in record_files(dir)? {
        let parsed = std::fs::read_to_string(&path)
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })
            .and_then(|contents| parse(&path, &contents));
        match parsed {
            Ok(record) => records.push(record),
            Err(e) => warn!(kind, file = %path.display(), error = %e, "Skipping record file"),
        }
    }
    Ok(records)
}

/// Load players from `dir`, ordered by join date string.
///
/// Players without a join date sort first. The directory must exist.
pub fn load_players(dir: &Path) -> Result<Vec<Player>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingDirectory {
            kind: "Players",
            path: dir.to_path_buf(),
        });
    }
    let mut players = load_records(dir, "player", parse_player)?;
    players.sort_by(|a, b| {
        a.date_joined
            .as_deref()
            .unwrap_or_default()
            .cmp(b.date_joined.as_deref().unwrap_or_default())
    });
    info!(count = players.len(), dir = %dir.display(), "Players loaded");
    Ok(players)
}

/// Load plots from `dir`, ordered by start date string.
///
/// Only the first `table_size` plots are kept. The directory must exist.
pub fn load_plots(dir: &Path, table_size: usize) -> Result<Vec<Plot>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingDirectory {
            kind: "Plots",
            path: dir.to_path_buf(),
        });
    }
    let mut plots = load_records(dir, "plot", parse_plot)?;
    plots.sort_by(|a, b| {
        a.date_started
            .as_deref()
            .unwrap_or_default()
            .cmp(b.date_started.as_deref().unwrap_or_default())
    });

    if plots.len() > table_size {
        warn!(
            found = plots.len(),
            table_size, "More plots than the table holds, using the earliest"
        );
        plots.truncate(table_size);
    } else if plots.len() < table_size {
        warn!(found = plots.len(), table_size, "Fewer plots than the table holds");
    }

    info!(count = plots.len(), dir = %dir.display(), "Plots loaded");
    Ok(plots)
}

/// Load moves from `dir`, ordered by date with undated moves first.
///
/// A missing directory yields no moves.
pub fn load_moves(dir: &Path) -> Result<Vec<Move>, LoadError> {
    if !dir.is_dir() {
        info!(dir = %dir.display(), "No moves directory");
        return Ok(Vec::new());
    }
    let mut moves = load_records(dir, "move", parse_move)?;
    moves.sort_by(compare_dated);
    info!(count = moves.len(), dir = %dir.display(), "Moves loaded");
    Ok(moves)
}

/// Load the bank from `dir`. A missing directory yields an empty bank.
pub fn load_bank(dir: &Path) -> Result<Bank, LoadError> {
    if !dir.is_dir() {
        info!(dir = %dir.display(), "No bank transactions directory");
        return Ok(Bank::default());
    }
    let transactions: Vec<BankTransaction> =
        load_records(dir, "bank transaction", parse_bank_transaction)?;
    info!(count = transactions.len(), dir = %dir.display(), "Bank transactions loaded");
    Ok(Bank::new(transactions))
}

/// Load every record kind from the configured data directories.
///
/// At least one plot and one player must load.
pub fn load_game_data(data: &DataConfig, game: &GameConfig) -> Result<GameData, LoadError> {
    let plots = load_plots(&data.plots_path(), game.table_size)?;
    if plots.is_empty() {
        return Err(LoadError::Empty { kind: "plots" });
    }

    let players = load_players(&data.players_path())?;
    if players.is_empty() {
        return Err(LoadError::Empty { kind: "players" });
    }

    let moves = load_moves(&data.moves_path())?;
    let bank = load_bank(&data.bank_transactions_path())?;

    Ok(GameData {
        players,
        plots,
        moves,
        bank,
    })
}
