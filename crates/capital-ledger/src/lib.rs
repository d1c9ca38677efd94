//! Per-plot accounting ledger for the Contrived Capital game.
//!
//! Every Plot owns exactly one [`Ledger`]. The ledger tracks which players
//! hold Investor Points and Carry Points on the plot, the hurdle owed to
//! investors, the plot's credit balance, and the cumulative profit paid out.
//!
//! # Invariants
//!
//! - No point count is ever negative. Adjustments that would take a player
//!   below zero are clamped to zero rather than rejected.
//! - The hurdle always equals `total_investor_points() * conversion_ratio`
//!   for the ratio passed to the most recent investor-point change.
//! - `paid_out_profit_total` is monotonic.
//!
//! No ledger operation fails. Out-of-range requests degrade to clamped
//! values so that a replay never aborts half way through.
//!
//! # Usage
//!
//! ```
//! use capital_ledger::Ledger;
//! use rust_decimal::Decimal;
//!
//! let mut ledger = Ledger::new();
//! ledger.add_investor_points("SeanReardon", 3, Decimal::new(1000, 0));
//! ledger.add_carry_points("SeanReardon", -5);
//!
//! assert_eq!(ledger.hurdle(), Decimal::new(3000, 0));
//! assert_eq!(ledger.carry_points_for("SeanReardon"), 0);
//! ```

pub mod ledger;

pub use ledger::Ledger;

/// Apply a signed delta to a point count, clamping the result at zero.
///
/// Results above `u64::MAX` saturate.
pub fn clamped_add(current: u64, delta: i64) -> u64 {
    let next = i128::from(current).saturating_add(i128::from(delta));
    if next <= 0 {
        0
    } else {
        u64::try_from(next).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_add_handles_both_directions() {
        assert_eq!(clamped_add(5, 3), 8);
        assert_eq!(clamped_add(5, -3), 2);
        assert_eq!(clamped_add(5, -5), 0);
        assert_eq!(clamped_add(5, -50), 0);
        assert_eq!(clamped_add(0, i64::MIN), 0);
    }

    #[test]
    fn clamped_add_saturates_at_max() {
        assert_eq!(clamped_add(u64::MAX, 1), u64::MAX);
        assert_eq!(clamped_add(u64::MAX, i64::MAX), u64::MAX);
    }
}
