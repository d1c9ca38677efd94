//! Record loading for Contrived Capital.
//!
//! Game data lives in four directories under a data root, one JSON record
//! per `.txt` file. This crate turns those directories into the typed
//! records `capital-core` replays.
//!
//! # Modules
//!
//! - [`dirs`] -- Directory scanning and [`load_game_data`].
//! - [`error`] -- [`LoadError`].
//! - [`records`] -- Parsing a single record file.
//!
//! [`load_game_data`]: dirs::load_game_data
//! [`LoadError`]: error::LoadError

pub mod dirs;
pub mod error;
pub mod records;

pub use dirs::{GameData, load_bank, load_game_data, load_moves, load_players, load_plots};
pub use error::LoadError;
