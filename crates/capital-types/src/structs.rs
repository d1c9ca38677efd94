//! Core entity records: players, plots, moves, and bank transactions.
//!
//! Records are fully parsed before they reach the replay engine. Identity
//! is by name: players are referenced by [`Player::name`], plots by
//! [`Plot::product_name`], and bank transactions by account string.

use capital_ledger::Ledger;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::Dated;
use crate::enums::SolvencyState;

/// Investor Points each player holds when they join.
pub const STARTING_INVESTOR_POINTS: u64 = 10;

/// Carry Points each player holds when they join.
pub const STARTING_CARRY_POINTS: u64 = 10;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A player in the game.
///
/// Created once at load time and mutated only while moves are replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Identity in `FirstLast` form, used for every cross-reference.
    pub name: String,
    /// Name shown in reports, e.g. `"First Last"`.
    pub display_name: String,
    /// Date the player joined (the player's event date).
    pub date_joined: Option<String>,
    /// Bank account string used to reconcile cash-outs.
    pub account: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Investor Points not yet committed to a plot.
    pub investor_points_in_hand: u64,
    /// Carry Points not yet placed on a plot.
    pub carry_points_in_hand: u64,
    /// Credits owned by the player.
    pub credits: Decimal,
}

impl Player {
    /// Create a player with starting points and zero credits.
    ///
    /// The display name defaults to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            date_joined: None,
            account: None,
            email: None,
            investor_points_in_hand: STARTING_INVESTOR_POINTS,
            carry_points_in_hand: STARTING_CARRY_POINTS,
            credits: Decimal::ZERO,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the join date.
    #[must_use]
    pub fn with_date_joined(mut self, date: impl Into<String>) -> Self {
        self.date_joined = Some(date.into());
        self
    }

    /// Set the bank account string.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Set the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the starting credit balance.
    #[must_use]
    pub const fn with_credits(mut self, credits: Decimal) -> Self {
        self.credits = credits;
        self
    }

    /// The account string, treating an empty string as absent.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref().filter(|a| !a.is_empty())
    }
}

impl Dated for Player {
    fn event_date(&self) -> Option<&str> {
        self.date_joined.as_deref()
    }
}

impl core::fmt::Display for Player {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Player(name='{}', display_name='{}', investor_points={}, carry_points={}, credits={})",
            self.name,
            self.display_name,
            self.investor_points_in_hand,
            self.carry_points_in_hand,
            self.credits,
        )
    }
}

// ---------------------------------------------------------------------------
// Plot
// ---------------------------------------------------------------------------

/// A business opportunity on the table.
///
/// Owns its [`Ledger`] and [`SolvencyState`] exclusively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    /// Identity referenced by [`Move::project`].
    pub product_name: Option<String>,
    /// Short business plan.
    pub story: String,
    /// Cost in credits.
    pub cost: Decimal,
    /// Credits per Investor Point (e.g. 1000 means 1000 credits buy one point).
    pub conversion_ratio: Decimal,
    /// Cost of risk, between 0 and 0.10.
    pub hurdle_rate: Decimal,
    /// Date the plot was started (the plot's event date).
    pub date_started: Option<String>,
    /// Bank account string.
    pub account: Option<String>,
    /// Link to the plot's working folder.
    pub url: Option<String>,
    /// The plot's accounting ledger.
    pub ledger: Ledger,
    /// Current solvency state.
    pub solvency_state: SolvencyState,
}

impl Plot {
    /// Create a plot with an empty ledger, zero hurdle rate, and
    /// [`SolvencyState::Underwater`].
    pub fn new(story: impl Into<String>, cost: Decimal, conversion_ratio: Decimal) -> Self {
        Self {
            product_name: None,
            story: story.into(),
            cost,
            conversion_ratio,
            hurdle_rate: Decimal::ZERO,
            date_started: None,
            account: None,
            url: None,
            ledger: Ledger::new(),
            solvency_state: SolvencyState::Underwater,
        }
    }

    /// Set the product name that moves use to reference this plot.
    #[must_use]
    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = Some(product_name.into());
        self
    }

    /// Set the start date.
    #[must_use]
    pub fn with_date_started(mut self, date: impl Into<String>) -> Self {
        self.date_started = Some(date.into());
        self
    }

    /// Set the hurdle rate.
    #[must_use]
    pub const fn with_hurdle_rate(mut self, hurdle_rate: Decimal) -> Self {
        self.hurdle_rate = hurdle_rate;
        self
    }

    /// Set the bank account string.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Set the folder URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The product name, treating an empty string as absent.
    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref().filter(|p| !p.is_empty())
    }

    /// The account string, treating an empty string as absent.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref().filter(|a| !a.is_empty())
    }
}

impl Dated for Plot {
    fn event_date(&self) -> Option<&str> {
        self.date_started.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A player action against a plot.
///
/// A single move may carry several non-zero quantities; each is applied
/// independently when the move is replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Source file name, e.g. `2024-01-15-SeanReardon-Mamani.txt`.
    pub filename: String,
    /// Date of the move.
    pub date: String,
    /// The acting player's [`Player::name`].
    pub user_name: String,
    /// The target plot's [`Plot::product_name`].
    pub project: String,
    /// Carry Points to place on the plot.
    pub push_credits: Decimal,
    /// Carry Points to take back from the plot.
    pub pull_credits: Decimal,
    /// Credits to convert into Investor Points.
    pub buy_in_credits: Decimal,
    /// Credits to convert into external currency.
    pub cash_out_credits: Decimal,
}

impl Move {
    /// Create a move with all quantities zero.
    ///
    /// The file name is derived as `{date}-{user_name}-{project}.txt`.
    pub fn new(
        date: impl Into<String>,
        user_name: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        let date = date.into();
        let user_name = user_name.into();
        let project = project.into();
        Self {
            filename: format!("{date}-{user_name}-{project}.txt"),
            date,
            user_name,
            project,
            push_credits: Decimal::ZERO,
            pull_credits: Decimal::ZERO,
            buy_in_credits: Decimal::ZERO,
            cash_out_credits: Decimal::ZERO,
        }
    }

    /// Override the source file name.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the Push quantity.
    #[must_use]
    pub const fn with_push(mut self, credits: Decimal) -> Self {
        self.push_credits = credits;
        self
    }

    /// Set the Pull quantity.
    #[must_use]
    pub const fn with_pull(mut self, credits: Decimal) -> Self {
        self.pull_credits = credits;
        self
    }

    /// Set the Buy-In quantity.
    #[must_use]
    pub const fn with_buy_in(mut self, credits: Decimal) -> Self {
        self.buy_in_credits = credits;
        self
    }

    /// Set the Cash-Out quantity.
    #[must_use]
    pub const fn with_cash_out(mut self, credits: Decimal) -> Self {
        self.cash_out_credits = credits;
        self
    }

    /// Whether this move converts credits to external currency.
    pub fn is_cash_out(&self) -> bool {
        self.cash_out_credits > Decimal::ZERO
    }

    /// Whether any quantity is negative.
    pub fn has_negative_amount(&self) -> bool {
        [
            self.push_credits,
            self.pull_credits,
            self.buy_in_credits,
            self.cash_out_credits,
        ]
        .iter()
        .any(Decimal::is_sign_negative)
    }
}

impl Dated for Move {
    fn event_date(&self) -> Option<&str> {
        Some(&self.date)
    }
}

impl core::fmt::Display for Move {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Move(date='{}', user='{}', project='{}', push={}, pull={}, buy_in={}, cash_out={})",
            self.date,
            self.user_name,
            self.project,
            self.push_credits,
            self.pull_credits,
            self.buy_in_credits,
            self.cash_out_credits,
        )
    }
}

// ---------------------------------------------------------------------------
// Bank transaction
// ---------------------------------------------------------------------------

/// A real-world USD transaction recorded against a player or plot account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Source file name.
    pub filename: String,
    /// Player or plot account string.
    pub account: String,
    /// Date of the transaction.
    pub date: String,
    /// USD sent.
    pub cost_usd: Decimal,
    /// USD received.
    pub revenue_usd: Decimal,
}

impl BankTransaction {
    /// Create a transaction with zero cost and revenue.
    ///
    /// The file name is derived as `{date}-{account}.txt`.
    pub fn new(account: impl Into<String>, date: impl Into<String>) -> Self {
        let account = account.into();
        let date = date.into();
        Self {
            filename: format!("{date}-{account}.txt"),
            account,
            date,
            cost_usd: Decimal::ZERO,
            revenue_usd: Decimal::ZERO,
        }
    }

    /// Override the source file name.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the USD cost.
    #[must_use]
    pub const fn with_cost(mut self, cost_usd: Decimal) -> Self {
        self.cost_usd = cost_usd;
        self
    }

    /// Set the USD revenue.
    #[must_use]
    pub const fn with_revenue(mut self, revenue_usd: Decimal) -> Self {
        self.revenue_usd = revenue_usd;
        self
    }

    /// Net USD (revenue minus cost): positive for net revenue.
    pub fn net_usd(&self) -> Decimal {
        self.revenue_usd.saturating_sub(self.cost_usd)
    }
}

impl Dated for BankTransaction {
    fn event_date(&self) -> Option<&str> {
        Some(&self.date)
    }
}

impl core::fmt::Display for BankTransaction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "BankTransaction(date='{}', account='{}', cost_usd={}, revenue_usd={}, net={})",
            self.date,
            self.account,
            self.cost_usd,
            self.revenue_usd,
            self.net_usd(),
        )
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn player_starts_with_ten_points_and_no_credits() {
        let player = Player::new("SeanReardon");
        assert_eq!(player.investor_points_in_hand, 10);
        assert_eq!(player.carry_points_in_hand, 10);
        assert_eq!(player.credits, Decimal::ZERO);
        assert_eq!(player.display_name, "SeanReardon");
    }

    #[test]
    fn empty_account_reads_as_absent() {
        let player = Player::new("a").with_account("");
        assert_eq!(player.account(), None);
        let plot = Plot::new("story", dec!(1), dec!(1)).with_account("PLOT-1");
        assert_eq!(plot.account(), Some("PLOT-1"));
    }

    #[test]
    fn plot_starts_underwater_with_empty_ledger() {
        let plot = Plot::new("A bakery", dec!(50000), dec!(1000)).with_product_name("Bakery");
        assert_eq!(plot.solvency_state, SolvencyState::Underwater);
        assert_eq!(plot.ledger, Ledger::new());
        assert_eq!(plot.product_name(), Some("Bakery"));
    }

    #[test]
    fn move_filename_is_derived() {
        let mv = Move::new("2024-01-15", "SeanReardon", "Mamani");
        assert_eq!(mv.filename, "2024-01-15-SeanReardon-Mamani.txt");
        assert!(!mv.is_cash_out());
    }

    #[test]
    fn move_detects_negative_amounts() {
        let mv = Move::new("2024-01-15", "a", "b").with_pull(dec!(-1));
        assert!(mv.has_negative_amount());
        let mv = Move::new("2024-01-15", "a", "b").with_cash_out(dec!(5));
        assert!(!mv.has_negative_amount());
        assert!(mv.is_cash_out());
    }

    #[test]
    fn bank_net_is_revenue_minus_cost() {
        let tx = BankTransaction::new("ACC-001", "2024-02-01")
            .with_cost(dec!(120.50))
            .with_revenue(dec!(100));
        assert_eq!(tx.net_usd(), dec!(-20.50));
    }

    #[test]
    fn records_expose_event_dates() {
        assert!(Player::new("a").timestamp().is_none());
        assert!(Player::new("a").with_date_joined("2024-01-01").is_dated());
        assert!(Move::new("2024-01-15", "a", "b").is_dated());
        assert!(!BankTransaction::new("x", "soon").is_dated());
        assert!(
            Plot::new("s", dec!(1), dec!(1))
                .with_date_started("2024-01-01T09:30:00Z")
                .is_dated()
        );
    }
}
