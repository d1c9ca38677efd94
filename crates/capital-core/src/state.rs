//! Game state: the players, plots, and bank a replay runs against.
//!
//! There is no global game instance. A [`GameState`] is built by the caller
//! (usually from loaded records via [`GameState::setup`]) and handed to the
//! [`Timeline`](crate::timeline::Timeline), which owns it for the rest of
//! the run.

use capital_types::{Player, Plot};
use tracing::info;

use crate::bank::Bank;
use crate::config::GameConfig;

/// Errors raised while setting up the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The table does not hold the configured number of plots.
    #[error("table requires {expected} plots, found {actual}")]
    TableSize {
        /// Configured table size.
        expected: usize,
        /// Number of plots supplied.
        actual: usize,
    },
}

/// Everything the replay mutates or reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    /// Players in load order.
    pub players: Vec<Player>,
    /// Plots in load order.
    pub plots: Vec<Plot>,
    /// Recorded bank transactions.
    pub bank: Bank,
}

impl GameState {
    /// Assemble a state without any checks or seeding.
    pub const fn new(players: Vec<Player>, plots: Vec<Plot>, bank: Bank) -> Self {
        Self {
            players,
            plots,
            bank,
        }
    }

    /// Set up the table for play.
    ///
    /// Requires exactly `game.table_size` plots, then grants every player
    /// `game.carry_points_per_plot` Carry Points on each plot. The seeded
    /// points are not taken from the players' hands.
    pub fn setup(
        players: Vec<Player>,
        mut plots: Vec<Plot>,
        bank: Bank,
        game: &GameConfig,
    ) -> Result<Self, StateError> {
        if plots.len() != game.table_size {
            return Err(StateError::TableSize {
                expected: game.table_size,
                actual: plots.len(),
            });
        }

        let seed = i64::try_from(game.carry_points_per_plot).unwrap_or(i64::MAX);
        for plot in &mut plots {
            for player in &players {
                plot.ledger.add_carry_points(&player.name, seed);
            }
        }

        info!(
            players = players.len(),
            plots = plots.len(),
            bank_transactions = bank.len(),
            carry_points_per_plot = game.carry_points_per_plot,
            "Table set up"
        );

        Ok(Self::new(players, plots, bank))
    }

    /// First player with the given name.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// First plot with the given product name.
    pub fn plot(&self, product_name: &str) -> Option<&Plot> {
        self.plots
            .iter()
            .find(|p| p.product_name() == Some(product_name))
    }

    /// Index of the first player with the given name.
    pub fn player_index(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    /// Index of the first plot with the given product name.
    pub fn plot_index(&self, product_name: &str) -> Option<usize> {
        self.plots
            .iter()
            .position(|p| p.product_name() == Some(product_name))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn plots(n: usize) -> Vec<Plot> {
        (0..n)
            .map(|i| Plot::new("story", dec!(100), dec!(1000)).with_product_name(format!("P{i}")))
            .collect()
    }

    #[test]
    fn setup_rejects_wrong_table_size() {
        let game = GameConfig::default();
        let result = GameState::setup(vec![], plots(3), Bank::default(), &game);
        assert_eq!(
            result,
            Err(StateError::TableSize {
                expected: 10,
                actual: 3
            })
        );
    }

    #[test]
    fn setup_seeds_carry_points_without_touching_hand() {
        let game = GameConfig {
            table_size: 2,
            carry_points_per_plot: 1,
        };
        let players = vec![Player::new("SeanReardon"), Player::new("AdaLovelace")];
        let result = GameState::setup(players, plots(2), Bank::default(), &game);
        assert!(result.is_ok());
        if let Ok(state) = result {
            for plot in &state.plots {
                assert_eq!(plot.ledger.carry_points_for("SeanReardon"), 1);
                assert_eq!(plot.ledger.carry_points_for("AdaLovelace"), 1);
            }
            assert!(state.players.iter().all(|p| p.carry_points_in_hand == 10));
        }
    }

    #[test]
    fn lookups_return_first_match() {
        let players = vec![
            Player::new("Dup").with_email("first@example.com"),
            Player::new("Dup").with_email("second@example.com"),
        ];
        let state = GameState::new(players, plots(2), Bank::default());
        assert_eq!(
            state.player("Dup").and_then(|p| p.email.as_deref()),
            Some("first@example.com")
        );
        assert_eq!(state.plot_index("P1"), Some(1));
        assert!(state.plot("Nope").is_none());
        assert_eq!(state.player_index("Nope"), None);
    }
}
