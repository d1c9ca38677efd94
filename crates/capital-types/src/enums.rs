//! Enumeration types for the Contrived Capital game.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Solvency
// ---------------------------------------------------------------------------

/// Where a plot stands relative to its investors.
///
/// Every plot starts [`SolvencyState::Underwater`]. Nothing in the replay
/// engine moves a plot between states; callers set it explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SolvencyState {
    /// Revenue has not yet covered the hurdle.
    #[default]
    Underwater,
    /// Revenue is paying down the hurdle to investors.
    PayingInvestors,
    /// The hurdle is cleared and profit is distributed.
    PayingProfit,
}

impl SolvencyState {
    /// Human-readable label used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Underwater => "Underwater",
            Self::PayingInvestors => "Paying Investors",
            Self::PayingProfit => "Paying Profit",
        }
    }
}

impl core::fmt::Display for SolvencyState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// The four kinds of record merged into the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A player joined the game.
    PlayerJoined,
    /// A plot was put on the table.
    PlotStarted,
    /// A player made a move against a plot.
    PlayerMove,
    /// A real-world bank transaction was recorded.
    BankTransaction,
}

impl EventKind {
    /// Short name used in logs and debugging output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlayerJoined => "Player",
            Self::PlotStarted => "Plot",
            Self::PlayerMove => "Move",
            Self::BankTransaction => "BankTransaction",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solvency_defaults_to_underwater() {
        assert_eq!(SolvencyState::default(), SolvencyState::Underwater);
    }

    #[test]
    fn solvency_labels() {
        assert_eq!(SolvencyState::Underwater.to_string(), "Underwater");
        assert_eq!(SolvencyState::PayingInvestors.to_string(), "Paying Investors");
        assert_eq!(SolvencyState::PayingProfit.to_string(), "Paying Profit");
    }

    #[test]
    fn event_kind_names() {
        assert_eq!(EventKind::PlayerMove.to_string(), "Move");
        assert_eq!(EventKind::BankTransaction.as_str(), "BankTransaction");
    }
}
