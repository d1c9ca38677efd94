//! The timeline event: a tagged union over the four record kinds.
//!
//! Events borrow the records they describe. The timeline stores records
//! once and hands out [`Event`] views, so a player mutated during replay is
//! the same player every later event sees.

use crate::dates::Dated;
use crate::enums::EventKind;
use crate::structs::{BankTransaction, Move, Player, Plot};

/// A borrowed view of one timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// A player joined.
    PlayerJoined(&'a Player),
    /// A plot was started.
    PlotStarted(&'a Plot),
    /// A player made a move.
    PlayerMove(&'a Move),
    /// A bank transaction was recorded.
    BankTransaction(&'a BankTransaction),
}

impl Event<'_> {
    /// Which kind of record this event wraps.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::PlayerJoined(_) => EventKind::PlayerJoined,
            Self::PlotStarted(_) => EventKind::PlotStarted,
            Self::PlayerMove(_) => EventKind::PlayerMove,
            Self::BankTransaction(_) => EventKind::BankTransaction,
        }
    }
}

impl Dated for Event<'_> {
    fn event_date(&self) -> Option<&str> {
        match self {
            Self::PlayerJoined(p) => p.event_date(),
            Self::PlotStarted(p) => p.event_date(),
            Self::PlayerMove(m) => m.event_date(),
            Self::BankTransaction(t) => t.event_date(),
        }
    }
}
