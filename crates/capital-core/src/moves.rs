//! Applying a single move to the game state.
//!
//! A move may carry any combination of Push, Pull, Buy-In, and Cash-Out.
//! They are applied in that order against the same player, so a Pull can
//! return points placed by the Push in the same move. Nothing here fails:
//! transfers are bounded by what is available and debits floor at zero.

use capital_types::{Move, Player, Plot};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, warn};

use crate::state::GameState;

/// A reference in a move that did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReference {
    /// No player has this name.
    Player(String),
    /// No plot has this product name.
    Plot(String),
}

impl core::fmt::Display for MissingReference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Player(name) => write!(f, "unknown player '{name}'"),
            Self::Plot(name) => write!(f, "unknown plot '{name}'"),
        }
    }
}

/// What a move actually did once bounded by available balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveEffects {
    /// Carry Points moved from hand to the plot.
    pub pushed: u64,
    /// Carry Points moved from the plot back to hand.
    pub pulled: u64,
    /// Investor Points granted on the plot.
    pub investor_points_bought: u64,
    /// Credits debited for the buy-in (before flooring the balance).
    pub buy_in_debited: Decimal,
    /// Credits converted to external currency.
    pub cashed_out: Decimal,
}

/// Result of replaying one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move resolved and was applied.
    Applied(MoveEffects),
    /// The move was skipped without side effects.
    Skipped(MissingReference),
}

impl MoveOutcome {
    /// Whether the move was applied.
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// The effects, when applied.
    pub const fn effects(&self) -> Option<&MoveEffects> {
        match self {
            Self::Applied(effects) => Some(effects),
            Self::Skipped(_) => None,
        }
    }
}

/// Apply `mv` to the player and plot it names.
///
/// Unknown players or plots leave the state untouched and yield
/// [`MoveOutcome::Skipped`].
pub fn apply_move(state: &mut GameState, mv: &Move) -> MoveOutcome {
    let Some(player_idx) = state.player_index(&mv.user_name) else {
        warn!(file = %mv.filename, player = %mv.user_name, "Move skipped: unknown player");
        return MoveOutcome::Skipped(MissingReference::Player(mv.user_name.clone()));
    };
    let Some(plot_idx) = state.plot_index(&mv.project) else {
        warn!(file = %mv.filename, plot = %mv.project, "Move skipped: unknown plot");
        return MoveOutcome::Skipped(MissingReference::Plot(mv.project.clone()));
    };
    let (Some(player), Some(plot)) = (
        state.players.get_mut(player_idx),
        state.plots.get_mut(plot_idx),
    ) else {
        return MoveOutcome::Skipped(MissingReference::Player(mv.user_name.clone()));
    };

    let pushed = push(player, plot, mv.push_credits);
    let pulled = pull(player, plot, mv.pull_credits);
    let (investor_points_bought, buy_in_debited) = buy_in(player, plot, mv.buy_in_credits);
    let effects = MoveEffects {
        pushed,
        pulled,
        investor_points_bought,
        buy_in_debited,
        cashed_out: cash_out(player, mv.cash_out_credits),
    };

    debug!(
        date = %mv.date,
        player = %player.name,
        plot = %mv.project,
        pushed = effects.pushed,
        pulled = effects.pulled,
        investor_points = effects.investor_points_bought,
        cash_out = %effects.cashed_out,
        credits = %player.credits,
        "Move applied"
    );

    MoveOutcome::Applied(effects)
}

/// Whole points in a non-negative quantity. Values beyond `u64` saturate.
fn whole_points(quantity: Decimal) -> u64 {
    if quantity <= Decimal::ZERO {
        return 0;
    }
    quantity.trunc().to_u64().unwrap_or(u64::MAX)
}

fn signed(points: u64) -> i64 {
    i64::try_from(points).unwrap_or(i64::MAX)
}

fn push(player: &mut Player, plot: &mut Plot, quantity: Decimal) -> u64 {
    let moved = whole_points(quantity).min(player.carry_points_in_hand);
    if moved == 0 {
        return 0;
    }
    plot.ledger.add_carry_points(&player.name, signed(moved));
    player.carry_points_in_hand = player.carry_points_in_hand.saturating_sub(moved);
    moved
}

fn pull(player: &mut Player, plot: &mut Plot, quantity: Decimal) -> u64 {
    let on_plot = plot.ledger.carry_points_for(&player.name);
    let moved = whole_points(quantity).min(on_plot);
    if moved == 0 {
        return 0;
    }
    plot.ledger
        .add_carry_points(&player.name, signed(moved).saturating_neg());
    player.carry_points_in_hand = player.carry_points_in_hand.saturating_add(moved);
    moved
}

/// Convert credits to Investor Points at the plot's ratio.
///
/// A buy-in worth less than one point grants nothing and debits nothing.
/// Returns the points granted and the credits debited.
fn buy_in(player: &mut Player, plot: &mut Plot, credits: Decimal) -> (u64, Decimal) {
    if credits <= Decimal::ZERO {
        return (0, Decimal::ZERO);
    }
    let points = credits
        .checked_div(plot.conversion_ratio)
        .and_then(|q| q.floor().to_u64())
        .unwrap_or(0);
    if points == 0 {
        return (0, Decimal::ZERO);
    }

    plot.ledger
        .add_investor_points(&player.name, signed(points), plot.conversion_ratio);
    player.credits = floored_debit(player.credits, credits);
    player.investor_points_in_hand = player.investor_points_in_hand.saturating_sub(points);
    (points, credits)
}

fn cash_out(player: &mut Player, credits: Decimal) -> Decimal {
    if credits <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    player.credits = floored_debit(player.credits, credits);
    credits
}

fn floored_debit(balance: Decimal, amount: Decimal) -> Decimal {
    balance.saturating_sub(amount).max(Decimal::ZERO)
}
