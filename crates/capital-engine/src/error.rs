//! Error types for the replay binary.
//!
//! [`EngineError`] wraps every failure mode between reading the config
//! and rendering the report.

/// Top-level error for the replay binary.
///
/// Each variant wraps a specific subsystem error, giving `run` a single
/// error type to propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: capital_core::ConfigError,
    },

    /// Loading the record directories failed.
    #[error("cannot load game state: {source}")]
    Load {
        /// The underlying load error.
        #[from]
        source: capital_loader::LoadError,
    },

    /// The loaded records do not form a valid table.
    #[error("setup error: {source}")]
    State {
        /// The underlying setup error.
        #[from]
        source: capital_core::StateError,
    },

    /// Pre-replay validation found errors.
    #[error("{source}")]
    Validation {
        /// The validation errors.
        #[from]
        source: capital_core::ValidationError,
    },
}
