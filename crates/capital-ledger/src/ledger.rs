//! The plot ledger: investor points, carry points, hurdle, and balance.
//!
//! Point maps are keyed by the player's `name` (the `FirstLast` identity
//! used for every cross-reference) and kept in a [`BTreeMap`] so that
//! iteration and reports are deterministic.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clamped_add;

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// The accounting ledger owned by a single Plot.
///
/// Created empty when the plot is loaded and mutated only while moves are
/// replayed against the plot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Credit balance held by the plot.
    balance: Decimal,
    /// Investor Points per player.
    investor_points: BTreeMap<String, u64>,
    /// Credits owed to investors: total investor points times the plot's
    /// conversion ratio.
    hurdle: Decimal,
    /// Carry Points per player.
    carry_points: BTreeMap<String, u64>,
    /// Cumulative profit distributed from this plot.
    paid_out_profit_total: Decimal,
}

impl Ledger {
    /// Create a new empty ledger.
    pub const fn new() -> Self {
        Self {
            balance: Decimal::ZERO,
            investor_points: BTreeMap::new(),
            hurdle: Decimal::ZERO,
            carry_points: BTreeMap::new(),
            paid_out_profit_total: Decimal::ZERO,
        }
    }

    /// Add (or, with a negative `delta`, remove) Investor Points for a
    /// player and recompute the hurdle.
    ///
    /// The player's count is clamped at zero. `conversion_ratio` must be the
    /// owning plot's ratio. The hurdle saturates at [`Decimal::MAX`] rather
    /// than overflowing.
    pub fn add_investor_points(&mut self, player: &str, delta: i64, conversion_ratio: Decimal) {
        let entry = self.investor_points.entry(player.to_owned()).or_insert(0);
        *entry = clamped_add(*entry, delta);

        let total = Decimal::from(self.total_investor_points());
        self.hurdle = total.checked_mul(conversion_ratio).unwrap_or(Decimal::MAX);

        debug!(
            player,
            delta,
            investor_points = self.investor_points_for(player),
            hurdle = %self.hurdle,
            "investor points adjusted"
        );
    }

    /// Add (or, with a negative `delta`, remove) Carry Points for a player.
    ///
    /// The player's count is clamped at zero.
    pub fn add_carry_points(&mut self, player: &str, delta: i64) {
        let entry = self.carry_points.entry(player.to_owned()).or_insert(0);
        *entry = clamped_add(*entry, delta);
    }

    /// Sum of Investor Points across all players.
    pub fn total_investor_points(&self) -> u64 {
        self.investor_points
            .values()
            .fold(0_u64, |acc, v| acc.saturating_add(*v))
    }

    /// Sum of Carry Points across all players.
    pub fn total_carry_points(&self) -> u64 {
        self.carry_points
            .values()
            .fold(0_u64, |acc, v| acc.saturating_add(*v))
    }

    /// Investor Points held by one player (zero when absent).
    pub fn investor_points_for(&self, player: &str) -> u64 {
        self.investor_points.get(player).copied().unwrap_or(0)
    }

    /// Carry Points held by one player (zero when absent).
    pub fn carry_points_for(&self, player: &str) -> u64 {
        self.carry_points.get(player).copied().unwrap_or(0)
    }

    /// All Investor Points, keyed by player name.
    pub const fn investor_points(&self) -> &BTreeMap<String, u64> {
        &self.investor_points
    }

    /// All Carry Points, keyed by player name.
    pub const fn carry_points(&self) -> &BTreeMap<String, u64> {
        &self.carry_points
    }

    /// Credits owed to investors.
    pub const fn hurdle(&self) -> Decimal {
        self.hurdle
    }

    /// Credit balance held by the plot.
    pub const fn balance(&self) -> Decimal {
        self.balance
    }

    /// Cumulative profit paid out from the plot.
    pub const fn paid_out_profit_total(&self) -> Decimal {
        self.paid_out_profit_total
    }
}

impl core::fmt::Display for Ledger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Ledger(balance={}, investor_points={}, hurdle={}, carry_points={}, paid_out_profit={})",
            self.balance,
            self.total_investor_points(),
            self.hurdle,
            self.total_carry_points(),
            self.paid_out_profit_total,
        )
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_ledger_is_empty() {
        let ledger = Ledger::new();
        assert_eq!(ledger.balance(), Decimal::ZERO);
        assert_eq!(ledger.hurdle(), Decimal::ZERO);
        assert_eq!(ledger.total_investor_points(), 0);
        assert_eq!(ledger.total_carry_points(), 0);
        assert_eq!(ledger.paid_out_profit_total(), Decimal::ZERO);
    }

    #[test]
    fn investor_points_recompute_hurdle() {
        let mut ledger = Ledger::new();
        ledger.add_investor_points("AdaLovelace", 4, dec!(1000));
        assert_eq!(ledger.hurdle(), dec!(4000));

        ledger.add_investor_points("AlanTuring", 2, dec!(1000));
        assert_eq!(ledger.total_investor_points(), 6);
        assert_eq!(ledger.hurdle(), dec!(6000));

        ledger.add_investor_points("AdaLovelace", -1, dec!(1000));
        assert_eq!(ledger.investor_points_for("AdaLovelace"), 3);
        assert_eq!(ledger.hurdle(), dec!(5000));
    }

    #[test]
    fn hurdle_tracks_total_for_any_delta_sequence() {
        let mut ledger = Ledger::new();
        let ratio = dec!(250);
        let deltas: [(&str, i64); 7] = [
            ("a", 3),
            ("b", -2),
            ("a", -10),
            ("b", 7),
            ("c", 1),
            ("a", 4),
            ("c", -1),
        ];

        for (player, delta) in deltas {
            ledger.add_investor_points(player, delta, ratio);
            let expected = Decimal::from(ledger.total_investor_points()) * ratio;
            assert_eq!(ledger.hurdle(), expected);
        }

        assert_eq!(ledger.investor_points_for("a"), 4);
        assert_eq!(ledger.investor_points_for("b"), 7);
        assert_eq!(ledger.investor_points_for("c"), 0);
    }

    #[test]
    fn negative_adjustments_clamp_to_zero() {
        let mut ledger = Ledger::new();
        ledger.add_carry_points("GraceHopper", 2);
        ledger.add_carry_points("GraceHopper", -9);
        assert_eq!(ledger.carry_points_for("GraceHopper"), 0);

        ledger.add_investor_points("GraceHopper", -3, dec!(100));
        assert_eq!(ledger.investor_points_for("GraceHopper"), 0);
        assert_eq!(ledger.hurdle(), Decimal::ZERO);
    }

    #[test]
    fn missing_player_reads_as_zero() {
        let ledger = Ledger::new();
        assert_eq!(ledger.carry_points_for("Nobody"), 0);
        assert_eq!(ledger.investor_points_for("Nobody"), 0);
    }

    #[test]
    fn totals_sum_every_player() {
        let mut ledger = Ledger::new();
        ledger.add_carry_points("a", 1);
        ledger.add_carry_points("b", 2);
        ledger.add_carry_points("c", 3);
        assert_eq!(ledger.total_carry_points(), 6);
        assert_eq!(ledger.carry_points().len(), 3);
    }

    #[test]
    fn display_summarises_totals() {
        let mut ledger = Ledger::new();
        ledger.add_investor_points("a", 2, dec!(10));
        ledger.add_carry_points("a", 1);
        assert_eq!(
            ledger.to_string(),
            "Ledger(balance=0, investor_points=2, hurdle=20, carry_points=1, paid_out_profit=0)"
        );
    }

    #[test]
    fn ledger_serde_roundtrip_preserves_points() {
        let mut ledger = Ledger::new();
        ledger.add_investor_points("a", 2, dec!(10));
        let json = serde_json::to_string(&ledger).ok();
        assert!(json.is_some());
        let restored: Result<Ledger, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert!(restored.is_ok());
        assert_eq!(restored.ok(), Some(ledger));
    }
}
