//! Replay runner.
//!
//! [`run_replay`] drives a [`TimelineCursor`](crate::cursor::TimelineCursor)
//! to exhaustion, hands every processed event to a [`TurnCallback`], and
//! checks Carry Point conservation across the whole run.

use tracing::{info, warn};

use crate::conservation::{CarryAnomaly, carry_totals, verify_carry_conservation};
use crate::cursor::TurnSummary;
use crate::moves::MoveOutcome;
use crate::state::GameState;
use crate::timeline::Timeline;

/// Totals for one replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Events in the timeline.
    pub events_total: usize,
    /// Events processed (every dated event).
    pub events_processed: usize,
    /// Events stepped over for lack of a usable date.
    pub events_skipped_undated: usize,
    /// Moves applied to the state.
    pub moves_applied: usize,
    /// Moves skipped for an unknown player or plot.
    pub moves_skipped: usize,
    /// Cash-out moves recorded.
    pub cash_out_moves: usize,
    /// Players whose Carry Point total changed.
    pub carry_anomalies: Vec<CarryAnomaly>,
}

/// Callback invoked after each processed event.
pub trait TurnCallback {
    /// Called with the turn just processed and the state after it.
    fn on_turn(&mut self, summary: &TurnSummary, state: &GameState);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TurnCallback for NoOpCallback {
    fn on_turn(&mut self, _summary: &TurnSummary, _state: &GameState) {}
}

/// Replay `timeline` from its first dated event to the end.
pub fn run_replay(timeline: &mut Timeline, callback: &mut dyn TurnCallback) -> ReplaySummary {
    let before = carry_totals(timeline.state());
    let mut summary = ReplaySummary {
        events_total: timeline.len(),
        ..ReplaySummary::default()
    };

    info!(events = summary.events_total, "Replay starting");

    let mut cursor = timeline.cursor();
    while cursor.has_next() {
        if let Some(turn) = cursor.turn() {
            summary.events_processed = summary.events_processed.saturating_add(1);
            match &turn.outcome {
                Some(MoveOutcome::Applied(_)) => {
                    summary.moves_applied = summary.moves_applied.saturating_add(1);
                }
                Some(MoveOutcome::Skipped(_)) => {
                    summary.moves_skipped = summary.moves_skipped.saturating_add(1);
                }
                None => {}
            }
            callback.on_turn(&turn, cursor.state());
        }
        cursor.advance();
    }
    summary.cash_out_moves = cursor.cash_out_moves().len();

    summary.events_skipped_undated = summary
        .events_total
        .saturating_sub(summary.events_processed);

    let after = carry_totals(timeline.state());
    summary.carry_anomalies = verify_carry_conservation(&before, &after);
    for anomaly in &summary.carry_anomalies {
        warn!(
            player = %anomaly.player,
            before = anomaly.before,
            after = anomaly.after,
            "Carry point conservation violated"
        );
    }

    info!(
        processed = summary.events_processed,
        skipped_undated = summary.events_skipped_undated,
        moves_applied = summary.moves_applied,
        moves_skipped = summary.moves_skipped,
        cash_outs = summary.cash_out_moves,
        "Replay finished"
    );

    summary
}

#[cfg(test)]
mod tests {
    use capital_types::{EventKind, Move, Player, Plot};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::bank::Bank;

    #[derive(Default)]
    struct Recorder {
        kinds: Vec<EventKind>,
        credits_after: Vec<rust_decimal::Decimal>,
    }

    impl TurnCallback for Recorder {
        fn on_turn(&mut self, summary: &TurnSummary, state: &GameState) {
            self.kinds.push(summary.kind);
            if let Some(p) = state.player("SeanReardon") {
                self.credits_after.push(p.credits);
            }
        }
    }

    fn timeline() -> Timeline {
        let players = vec![
            Player::new("SeanReardon")
                .with_date_joined("2024-01-01")
                .with_credits(dec!(900)),
        ];
        let plots = vec![
            Plot::new("Tea", dec!(100), dec!(100))
                .with_product_name("Mamani")
                .with_date_started("2024-01-01"),
        ];
        let moves = vec![
            Move::new("2024-01-02", "SeanReardon", "Mamani").with_push(dec!(3)),
            Move::new("2024-01-03", "SeanReardon", "Ghost").with_push(dec!(3)),
            Move::new("2024-01-04", "SeanReardon", "Mamani").with_cash_out(dec!(400)),
            Move::new("n/a", "SeanReardon", "Mamani").with_cash_out(dec!(1)),
        ];
        Timeline::new(GameState::new(players, plots, Bank::default()), moves)
    }

    #[test]
    fn summary_counts_every_category() {
        let mut tl = timeline();
        let summary = run_replay(&mut tl, &mut NoOpCallback);
        assert_eq!(summary.events_total, 6);
        assert_eq!(summary.events_processed, 5);
        assert_eq!(summary.events_skipped_undated, 1);
        assert_eq!(summary.moves_applied, 2);
        assert_eq!(summary.moves_skipped, 1);
        assert_eq!(summary.cash_out_moves, 1);
        assert!(summary.carry_anomalies.is_empty());
        assert_eq!(tl.cash_out_moves().len(), 1);
    }

    #[test]
    fn callback_sees_state_after_each_turn() {
        let mut tl = timeline();
        let mut recorder = Recorder::default();
        run_replay(&mut tl, &mut recorder);
        assert_eq!(recorder.kinds.len(), 5);
        assert_eq!(recorder.credits_after.last(), Some(&dec!(500)));
        assert_eq!(recorder.credits_after.first(), Some(&dec!(900)));
    }

    #[test]
    fn replaying_again_starts_from_the_first_event() {
        let mut tl = timeline();
        run_replay(&mut tl, &mut NoOpCallback);
        let again = run_replay(&mut tl, &mut NoOpCallback);
        assert_eq!(again.events_processed, 5);
        assert_eq!(tl.cash_out_moves().len(), 2);
        assert_eq!(
            tl.state().player("SeanReardon").map(|p| p.credits),
            Some(dec!(100))
        );
    }
}
