//! Carry Point conservation.
//!
//! Push and Pull only move Carry Points between a player's hand and plot
//! ledgers, so for every player
//!
//! ```text
//! carry_points_in_hand + sum(plot.ledger.carry_points[player]) == constant
//! ```
//!
//! across a replay. A change produces a [`CarryAnomaly`].

use std::collections::BTreeMap;

use crate::state::GameState;

/// A player whose total Carry Points changed across a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarryAnomaly {
    /// The player's name.
    pub player: String,
    /// Total before the replay.
    pub before: u64,
    /// Total after the replay.
    pub after: u64,
}

impl core::fmt::Display for CarryAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "carry points for {} changed from {} to {}",
            self.player, self.before, self.after
        )
    }
}

/// Total Carry Points per player: in hand plus on every plot.
///
/// When two players share a name the first one counts.
pub fn carry_totals(state: &GameState) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for player in &state.players {
        totals.entry(player.name.clone()).or_insert_with(|| {
            state
                .plots
                .iter()
                .map(|plot| plot.ledger.carry_points_for(&player.name))
                .fold(player.carry_points_in_hand, u64::saturating_add)
        });
    }
    totals
}

/// Compare two snapshots taken with [`carry_totals`].
pub fn verify_carry_conservation(
    before: &BTreeMap<String, u64>,
    after: &BTreeMap<String, u64>,
) -> Vec<CarryAnomaly> {
    before
        .iter()
        .filter_map(|(player, &b)| {
            let a = after.get(player).copied().unwrap_or(0);
            (a != b).then(|| CarryAnomaly {
                player: player.clone(),
                before: b,
                after: a,
            })
        })
        .collect()
}
