//! Shared record and event types for the Contrived Capital game.
//!
//! The game replays a log of dated records (players joining, plots
//! starting, player moves, and real-world bank transactions) in
//! chronological order. This crate defines those records and the rules for
//! dating and ordering them.
//!
//! # Modules
//!
//! - [`dates`] -- Date parsing, the [`Dated`] trait, and chronological
//!   ordering where undated records sort first.
//! - [`enums`] -- [`SolvencyState`] and [`EventKind`].
//! - [`structs`] -- [`Player`], [`Plot`], [`Move`], [`BankTransaction`].
//! - [`event`] -- The [`Event`] tagged union the timeline hands out.

pub mod dates;
pub mod enums;
pub mod event;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use dates::{Dated, compare_dated, compare_timestamps, parse_event_date};
pub use enums::{EventKind, SolvencyState};
pub use event::Event;
pub use structs::{
    BankTransaction, Move, Player, Plot, STARTING_CARRY_POINTS, STARTING_INVESTOR_POINTS,
};
