//! Timeline replay, reconciliation, and validation for Contrived Capital.
//!
//! The crate takes fully parsed records, merges them into a chronological
//! [`Timeline`], and replays it one event at a time. Moves mutate players
//! and plot ledgers; everything else is already in place when the timeline
//! is built. After replay, recorded cash-outs are reconciled against the
//! bank.
//!
//! # Modules
//!
//! - [`bank`] -- Date-ordered bank transactions and account queries.
//! - [`config`] -- Configuration loading from `capital-config.yaml`.
//! - [`conservation`] -- Carry Point conservation check.
//! - [`cursor`] -- Single-step [`TimelineCursor`].
//! - [`moves`] -- Applying one move to the game state.
//! - [`reconcile`] -- Matching cash-outs to bank deposits.
//! - [`runner`] -- [`run_replay`] and the [`TurnCallback`] hook.
//! - [`state`] -- [`GameState`] and table setup.
//! - [`timeline`] -- The merged, sorted event stream.
//! - [`validation`] -- Pre-replay integrity checks.
//!
//! [`TimelineCursor`]: cursor::TimelineCursor
//! [`run_replay`]: runner::run_replay
//! [`TurnCallback`]: runner::TurnCallback
//! [`GameState`]: state::GameState

pub mod bank;
pub mod config;
pub mod conservation;
pub mod cursor;
pub mod moves;
pub mod reconcile;
pub mod runner;
pub mod state;
pub mod timeline;
pub mod validation;

pub use bank::Bank;
pub use config::{CapitalConfig, ConfigError, ReconciliationConfig};
pub use cursor::{EventInfo, TimelineCursor, TurnSummary};
pub use moves::{MissingReference, MoveEffects, MoveOutcome};
pub use reconcile::{OwedTransaction, find_matching_transaction, owed_transactions};
pub use runner::{NoOpCallback, ReplaySummary, TurnCallback, run_replay};
pub use state::{GameState, StateError};
pub use timeline::Timeline;
pub use validation::{ValidationError, validate_game_data, validate_timeline};
