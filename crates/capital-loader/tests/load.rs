//! Directory loading tests for `capital-loader`.
//!
//! Each test writes a throwaway data root under the system temp directory
//! and removes it when done.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc
)]

use std::fs;
use std::path::{Path, PathBuf};

use capital_core::config::{DataConfig, GameConfig};
use capital_loader::{
    LoadError, load_bank, load_game_data, load_moves, load_players, load_plots,
};
use rust_decimal_macros::dec;

// =============================================================================
// Fixtures
// =============================================================================

/// A temporary data root that is removed on drop.
struct DataRoot {
    path: PathBuf,
}

impl DataRoot {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "capital-loader-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("create data root");
        Self { path }
    }

    fn write(&self, dir: &str, file: &str, contents: &str) {
        let dir = self.path.join(dir);
        fs::create_dir_all(&dir).expect("create record dir");
        fs::write(dir.join(file), contents).expect("write record");
    }

    fn dir(&self, dir: &str) -> PathBuf {
        self.path.join(dir)
    }

    fn data_config(&self) -> DataConfig {
        DataConfig {
            root: self.path.clone(),
            ..DataConfig::default()
        }
    }
}

impl Drop for DataRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn plot_json(product: &str, started: &str) -> String {
    format!(
        r#"{{"description": "{product} story", "cost": 1000, "conversion_ratio": 100, "date_started": "{started}", "product_name": "{product}"}}"#
    )
}

fn is_missing_dir(err: &LoadError, expected: &Path) -> bool {
    matches!(err, LoadError::MissingDirectory { path, .. } if path == expected)
}

// =============================================================================
// Players
// =============================================================================

#[test]
fn players_sorted_by_join_date_and_bad_files_skipped() {
    let root = DataRoot::new("players");
    root.write("Players", "ReardonSean.txt", r#"{"date_joined": "2024-02-01"}"#);
    root.write("Players", "LovelaceAda.txt", r#"{"date_joined": "2024-01-01"}"#);
    root.write("Players", "BrokenFile.txt", "{not json");
    root.write("Players", "notes.md", "ignored");

    let players = load_players(&root.dir("Players")).unwrap();
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["AdaLovelace", "SeanReardon"]);
}

#[test]
fn missing_players_directory_is_an_error() {
    let root = DataRoot::new("no-players");
    let err = load_players(&root.dir("Players")).unwrap_err();
    assert!(is_missing_dir(&err, &root.dir("Players")));
}

// =============================================================================
// Plots
// =============================================================================

#[test]
fn plots_keep_the_earliest_up_to_table_size() {
    let root = DataRoot::new("plots");
    root.write("Plots", "c.txt", &plot_json("Gamma", "2024-03-01"));
    root.write("Plots", "a.txt", &plot_json("Alpha", "2024-01-01"));
    root.write("Plots", "b.txt", &plot_json("Beta", "2024-02-01"));

    let plots = load_plots(&root.dir("Plots"), 2).unwrap();
    let names: Vec<Option<&str>> = plots.iter().map(|p| p.product_name()).collect();
    assert_eq!(names, vec![Some("Alpha"), Some("Beta")]);
    assert_eq!(plots[0].conversion_ratio, dec!(100));
}

#[test]
fn fewer_plots_than_table_size_still_load() {
    let root = DataRoot::new("few-plots");
    root.write("Plots", "a.txt", &plot_json("Alpha", "2024-01-01"));
    assert_eq!(load_plots(&root.dir("Plots"), 10).unwrap().len(), 1);
}

// =============================================================================
// Moves and bank
// =============================================================================

#[test]
fn moves_sorted_by_date_with_bad_names_skipped() {
    let root = DataRoot::new("moves");
    root.write("Moves", "2024-02-01-SeanReardon-Alpha.txt", r#"{"Push": 1}"#);
    root.write("Moves", "2024-01-01-AdaLovelace-Alpha.txt", r#"{"Buy-In": 100}"#);
    root.write("Moves", "2024-01-SeanReardon.txt", "{}");

    let moves = load_moves(&root.dir("Moves")).unwrap();
    let dates: Vec<&str> = moves.iter().map(|m| m.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-02-01"]);
    assert_eq!(moves[0].buy_in_credits, dec!(100));
}

#[test]
fn missing_optional_directories_load_empty() {
    let root = DataRoot::new("optional");
    assert!(load_moves(&root.dir("Moves")).unwrap().is_empty());
    assert!(load_bank(&root.dir("BankTransactions")).unwrap().is_empty());
}

#[test]
fn bank_is_ordered_by_date() {
    let root = DataRoot::new("bank");
    root.write(
        "BankTransactions",
        "late.txt",
        r#"{"account": "ACC-001", "date": "2024-03-01", "Revenue": 10}"#,
    );
    root.write(
        "BankTransactions",
        "early.txt",
        r#"{"account": "ACC-001", "date": "2024-01-01", "Cost": 4}"#,
    );

    let bank = load_bank(&root.dir("BankTransactions")).unwrap();
    let files: Vec<&str> = bank.transactions().iter().map(|t| t.filename.as_str()).collect();
    assert_eq!(files, vec!["early.txt", "late.txt"]);
    assert_eq!(bank.account_balance("ACC-001"), dec!(6));
}

// =============================================================================
// Whole data root
// =============================================================================

#[test]
fn game_data_loads_from_configured_root() {
    let root = DataRoot::new("game");
    root.write("Players", "ReardonSean.txt", r#"{"account": "ACC-001"}"#);
    root.write("Plots", "a.txt", &plot_json("Alpha", "2024-01-01"));
    root.write("Moves", "2024-01-05-SeanReardon-Alpha.txt", r#"{"Cash-Out": 50}"#);

    let data = load_game_data(&root.data_config(), &GameConfig::default()).unwrap();
    assert_eq!(data.players.len(), 1);
    assert_eq!(data.plots.len(), 1);
    assert_eq!(data.moves.len(), 1);
    assert!(data.bank.is_empty());
}

#[test]
fn game_data_requires_plots_and_players() {
    let root = DataRoot::new("empty");
    root.write("Plots", "broken.txt", "nope");
    root.write("Players", "ReardonSean.txt", "{}");

    let err = load_game_data(&root.data_config(), &GameConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::Empty { kind: "plots" }));

    root.write("Plots", "a.txt", &plot_json("Alpha", "2024-01-01"));
    fs::remove_file(root.dir("Players").join("ReardonSean.txt")).unwrap();
    let err = load_game_data(&root.data_config(), &GameConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::Empty { kind: "players" }));
}
