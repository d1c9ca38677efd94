//! Single-step cursor over a [`Timeline`].
//!
//! The cursor owns a position and a mutable borrow of the timeline. Events
//! without a usable date are stepped over and never processed. Only moves
//! change state; player, plot, and bank events are already materialised
//! when the timeline is built.
//!
//! ```text
//! let mut cursor = timeline.cursor();
//! while cursor.has_next() {
//!     cursor.turn();
//!     cursor.advance();
//! }
//! ```

use capital_types::{Dated, Event, EventKind, Move};
use chrono::NaiveDateTime;
use tracing::debug;

use crate::moves::{MoveOutcome, apply_move};
use crate::state::GameState;
use crate::timeline::{Entry, Timeline};

/// What processing one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSummary {
    /// Position of the event in the timeline.
    pub index: usize,
    /// Kind of event processed.
    pub kind: EventKind,
    /// The event's timestamp.
    pub timestamp: NaiveDateTime,
    /// Outcome of the move, for move events.
    pub outcome: Option<MoveOutcome>,
}

/// Position and identity of the event under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInfo {
    /// Zero-based position.
    pub index: usize,
    /// Number of events in the timeline.
    pub total: usize,
    /// Kind of event.
    pub kind: EventKind,
    /// The raw date string.
    pub date: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub day: String,
}

/// Resumable cursor over a timeline.
#[derive(Debug)]
pub struct TimelineCursor<'t> {
    timeline: &'t mut Timeline,
    index: usize,
    cash_out_moves: Vec<Move>,
}

impl<'t> TimelineCursor<'t> {
    pub(crate) fn new(timeline: &'t mut Timeline) -> Self {
        let mut cursor = Self {
            timeline,
            index: 0,
            cash_out_moves: Vec::new(),
        };
        cursor.skip_undated();
        cursor
    }

    fn skip_undated(&mut self) {
        while self.index < self.timeline.len() {
            let dated = self.timeline.event(self.index).is_some_and(|e| e.is_dated());
            if dated {
                break;
            }
            debug!(index = self.index, "Skipping undated event");
            self.index = self.index.saturating_add(1);
        }
    }

    /// Whether a dated event remains.
    ///
    /// Steps over undated events first. Once exhausted this keeps returning
    /// `false` without moving.
    pub fn has_next(&mut self) -> bool {
        self.skip_undated();
        self.index < self.timeline.len()
    }

    /// The event under the cursor, or `None` when exhausted.
    pub fn current(&self) -> Option<Event<'_>> {
        self.timeline.event(self.index)
    }

    /// Process the event under the cursor without moving past it.
    ///
    /// Moves are applied to the game state; a cash-out is recorded both on
    /// this cursor and on the timeline. Calling `turn` twice on the same
    /// event applies it twice. Returns `None` when exhausted.
    pub fn turn(&mut self) -> Option<TurnSummary> {
        self.skip_undated();
        let entry = *self.timeline.entries.get(self.index)?;
        let event = self.timeline.resolve(entry)?;
        let kind = event.kind();
        let timestamp = event.timestamp()?;

        let outcome = match entry {
            Entry::Move(i) => {
                let mv = self.timeline.moves.get(i)?;
                let outcome = apply_move(&mut self.timeline.state, mv);
                if outcome.effects().is_some_and(|e| !e.cashed_out.is_zero()) {
                    self.timeline.cash_out_moves.push(mv.clone());
                    self.cash_out_moves.push(mv.clone());
                }
                Some(outcome)
            }
            Entry::Player(_) | Entry::Plot(_) | Entry::Bank(_) => None,
        };

        debug!(index = self.index, kind = %kind, %timestamp, "Turn processed");

        Some(TurnSummary {
            index: self.index,
            kind,
            timestamp,
            outcome,
        })
    }

    /// Step past the current event. Returns whether a dated event remains.
    pub fn advance(&mut self) -> bool {
        if self.index < self.timeline.len() {
            self.index = self.index.saturating_add(1);
        }
        self.has_next()
    }

    /// Chained form of [`advance`](Self::advance).
    #[must_use]
    pub fn next(mut self) -> Self {
        self.advance();
        self
    }

    /// Current position and total event count.
    pub const fn progress(&self) -> (usize, usize) {
        (self.index, self.timeline.len())
    }

    /// Details of the event under the cursor.
    pub fn current_info(&self) -> Option<EventInfo> {
        let event = self.current()?;
        let timestamp = event.timestamp()?;
        Some(EventInfo {
            index: self.index,
            total: self.timeline.len(),
            kind: event.kind(),
            date: event.event_date().unwrap_or_default().to_owned(),
            day: timestamp.format("%Y-%m-%d").to_string(),
        })
    }

    /// The game state as mutated so far.
    pub fn state(&self) -> &GameState {
        self.timeline.state()
    }

    /// Cash-out moves this cursor has processed.
    pub fn cash_out_moves(&self) -> &[Move] {
        &self.cash_out_moves
    }

    /// Consume the cursor, keeping its cash-out moves.
    pub fn into_cash_out_moves(self) -> Vec<Move> {
        self.cash_out_moves
    }
}
