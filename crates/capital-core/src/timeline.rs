//! The timeline: every record in the game merged into one chronological
//! stream.
//!
//! Records are stored once. The timeline keeps an ordering of lightweight
//! entries that point back into the [`GameState`] and the move list, and
//! resolves them into borrowed [`Event`] views on demand. A player mutated
//! while one move is replayed is therefore the same player every later
//! event and lookup sees.

use capital_types::{Dated, Event, Move, compare_timestamps};
use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::cursor::TimelineCursor;
use crate::state::GameState;

/// Position of a record inside the timeline's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    Player(usize),
    Plot(usize),
    Move(usize),
    Bank(usize),
}

/// Chronologically ordered game history.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub(crate) state: GameState,
    pub(crate) moves: Vec<Move>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) cash_out_moves: Vec<Move>,
}

impl Timeline {
    /// Merge players, plots, moves, and bank transactions (in that order)
    /// and stable-sort them by date.
    ///
    /// Records without a usable date sort first; ties keep merge order.
    pub fn new(state: GameState, moves: Vec<Move>) -> Self {
        let players = (0..state.players.len()).map(Entry::Player);
        let plots = (0..state.plots.len()).map(Entry::Plot);
        let move_entries = (0..moves.len()).map(Entry::Move);
        let bank = (0..state.bank.len()).map(Entry::Bank);

        let mut timeline = Self {
            state,
            moves,
            entries: Vec::new(),
            cash_out_moves: Vec::new(),
        };

        let mut keyed: Vec<(Option<NaiveDateTime>, Entry)> = players
            .chain(plots)
            .chain(move_entries)
            .chain(bank)
            .map(|entry| {
                let stamp = timeline.resolve(entry).and_then(|e| e.timestamp());
                (stamp, entry)
            })
            .collect();
        keyed.sort_by(|a, b| compare_timestamps(a.0, b.0));
        timeline.entries = keyed.into_iter().map(|(_, entry)| entry).collect();

        info!(
            events = timeline.entries.len(),
            players = timeline.state.players.len(),
            plots = timeline.state.plots.len(),
            moves = timeline.moves.len(),
            bank_transactions = timeline.state.bank.len(),
            "Timeline built"
        );

        timeline
    }

    pub(crate) fn resolve(&self, entry: Entry) -> Option<Event<'_>> {
        match entry {
            Entry::Player(i) => self.state.players.get(i).map(Event::PlayerJoined),
            Entry::Plot(i) => self.state.plots.get(i).map(Event::PlotStarted),
            Entry::Move(i) => self.moves.get(i).map(Event::PlayerMove),
            Entry::Bank(i) => self
                .state
                .bank
                .transactions()
                .get(i)
                .map(Event::BankTransaction),
        }
    }

    /// The event at `index` in chronological order.
    pub fn event(&self, index: usize) -> Option<Event<'_>> {
        self.entries
            .get(index)
            .and_then(|entry| self.resolve(*entry))
    }

    /// All events in chronological order, dateless ones included.
    pub fn events(&self) -> impl Iterator<Item = Event<'_>> + '_ {
        self.entries.iter().filter_map(|entry| self.resolve(*entry))
    }

    /// Number of events.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the timeline holds no events.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timestamp of the latest dated event.
    ///
    /// Trailing dateless events are skipped. Returns
    /// [`NaiveDateTime::MIN`] when no event has a date.
    pub fn current_date(&self) -> NaiveDateTime {
        self.entries
            .iter()
            .rev()
            .find_map(|entry| self.resolve(*entry).and_then(|e| e.timestamp()))
            .unwrap_or(NaiveDateTime::MIN)
    }

    /// The game state, as mutated by replay so far.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Every move, in the order supplied.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Cash-out moves recorded during replay, one per processed cash-out.
    pub fn cash_out_moves(&self) -> &[Move] {
        &self.cash_out_moves
    }

    /// A cursor positioned on the first dated event.
    ///
    /// Every cursor starts from the beginning, so draining a second cursor
    /// applies the moves again.
    pub fn cursor(&mut self) -> TimelineCursor<'_> {
        TimelineCursor::new(self)
    }

    /// Drain a fresh cursor and return the recorded cash-out moves.
    pub fn replay(&mut self) -> &[Move] {
        let mut cursor = self.cursor();
        while cursor.has_next() {
            cursor.turn();
            cursor.advance();
        }
        debug!(cash_outs = cursor.cash_out_moves().len(), "Replay drained");
        &self.cash_out_moves
    }

    /// Consume the timeline, returning the final game state.
    pub fn into_state(self) -> GameState {
        self.state
    }
}
