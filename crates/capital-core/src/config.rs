//! Configuration loading and typed config structures.
//!
//! The configuration lives in `capital-config.yaml` next to the data
//! directories. Every field has a default, so an absent file or a partial
//! file is valid.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

/// Environment variable that overrides [`DataConfig::root`].
pub const DATA_ROOT_ENV: &str = "CAPITAL_DATA_ROOT";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CapitalConfig {
    /// Where the record files live.
    #[serde(default)]
    pub data: DataConfig,

    /// Table setup parameters.
    #[serde(default)]
    pub game: GameConfig,

    /// Cash-out to bank deposit matching parameters.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CapitalConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `CAPITAL_DATA_ROOT` overrides `data.root` when set.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.data.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.data.apply_env_overrides();
        Ok(config)
    }
}

/// Data directory layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataConfig {
    /// Directory containing the four record directories.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Player records, relative to `root`.
    #[serde(default = "default_players_dir")]
    pub players_dir: String,

    /// Plot records, relative to `root`.
    #[serde(default = "default_plots_dir")]
    pub plots_dir: String,

    /// Move records, relative to `root`.
    #[serde(default = "default_moves_dir")]
    pub moves_dir: String,

    /// Bank transaction records, relative to `root`.
    #[serde(default = "default_bank_transactions_dir")]
    pub bank_transactions_dir: String,
}

impl DataConfig {
    /// Override `root` from `CAPITAL_DATA_ROOT` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(DATA_ROOT_ENV) {
            self.root = PathBuf::from(val);
        }
    }

    /// Full path of the players directory.
    pub fn players_path(&self) -> PathBuf {
        self.root.join(&self.players_dir)
    }

    /// Full path of the plots directory.
    pub fn plots_path(&self) -> PathBuf {
        self.root.join(&self.plots_dir)
    }

    /// Full path of the moves directory.
    pub fn moves_path(&self) -> PathBuf {
        self.root.join(&self.moves_dir)
    }

    /// Full path of the bank transactions directory.
    pub fn bank_transactions_path(&self) -> PathBuf {
        self.root.join(&self.bank_transactions_dir)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            players_dir: default_players_dir(),
            plots_dir: default_plots_dir(),
            moves_dir: default_moves_dir(),
            bank_transactions_dir: default_bank_transactions_dir(),
        }
    }
}

/// Table setup parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Number of plots placed on the table.
    #[serde(default = "default_table_size")]
    pub table_size: usize,

    /// Carry Points each plot grants every player at setup.
    #[serde(default = "default_carry_points_per_plot")]
    pub carry_points_per_plot: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            table_size: default_table_size(),
            carry_points_per_plot: default_carry_points_per_plot(),
        }
    }
}

/// Cash-out to bank deposit matching parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReconciliationConfig {
    /// Maximum distance in days between a cash-out and its deposit.
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    /// Revenue must be strictly closer than this to the cash-out amount.
    #[serde(default = "default_amount_tolerance")]
    pub amount_tolerance: Decimal,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            amount_tolerance: default_amount_tolerance(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_players_dir() -> String {
    "Players".to_owned()
}

fn default_plots_dir() -> String {
    "Plots".to_owned()
}

fn default_moves_dir() -> String {
    "Moves".to_owned()
}

fn default_bank_transactions_dir() -> String {
    "BankTransactions".to_owned()
}

const fn default_table_size() -> usize {
    10
}

const fn default_carry_points_per_plot() -> u64 {
    1
}

const fn default_window_days() -> i64 {
    30
}

const fn default_amount_tolerance() -> Decimal {
    Decimal::from_parts(1, 0, 0, false, 2)
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn defaults_match_game_rules() {
        let config = CapitalConfig::default();
        assert_eq!(config.game.table_size, 10);
        assert_eq!(config.game.carry_points_per_plot, 1);
        assert_eq!(config.reconciliation.window_days, 30);
        assert_eq!(config.reconciliation.amount_tolerance, dec!(0.01));
        assert_eq!(config.data.players_dir, "Players");
        assert_eq!(config.data.bank_transactions_dir, "BankTransactions");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "
game:
  table_size: 4
reconciliation:
  window_days: 14
  amount_tolerance: \"0.5\"
";
        let config = CapitalConfig::parse(yaml);
        assert!(config.is_ok());
        if let Ok(c) = config {
            assert_eq!(c.game.table_size, 4);
            assert_eq!(c.game.carry_points_per_plot, 1);
            assert_eq!(c.reconciliation.window_days, 14);
            assert_eq!(c.reconciliation.amount_tolerance, dec!(0.5));
            assert_eq!(c.data.moves_dir, "Moves");
        }
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = CapitalConfig::parse("game: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn data_paths_join_root() {
        let data = DataConfig {
            root: PathBuf::from("/srv/game"),
            ..DataConfig::default()
        };
        assert_eq!(data.plots_path(), PathBuf::from("/srv/game/Plots"));
        assert_eq!(
            data.bank_transactions_path(),
            PathBuf::from("/srv/game/BankTransactions")
        );
    }
}
