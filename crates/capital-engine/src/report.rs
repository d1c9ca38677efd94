//! Final state report.
//!
//! [`Report`] renders the state left by a replay: every player, every plot
//! with its ledger, the owed bank transactions, and the validation
//! warnings that did not stop the run.

use std::fmt;

use capital_core::{GameState, OwedTransaction, ReplaySummary};
use capital_types::{Player, Plot};
use rust_decimal::Decimal;

const RULE_WIDTH: usize = 80;
const STORY_EXCERPT_CHARS: usize = 100;

/// Everything shown at the end of a run.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    /// State after replay.
    pub state: &'a GameState,
    /// Replay totals.
    pub summary: &'a ReplaySummary,
    /// Cash-outs with no matching deposit.
    pub owed: &'a [OwedTransaction],
    /// Validation warnings.
    pub warnings: &'a [String],
}

fn heading(f: &mut fmt::Formatter<'_>, rule: char, title: &str) -> fmt::Result {
    let line: String = std::iter::repeat_n(rule, RULE_WIDTH).collect();
    writeln!(f)?;
    writeln!(f, "{line}")?;
    writeln!(f, "{title}")?;
    writeln!(f, "{line}")
}

fn story_excerpt(story: &str) -> String {
    let mut excerpt: String = story.chars().take(STORY_EXCERPT_CHARS).collect();
    if story.chars().nth(STORY_EXCERPT_CHARS).is_some() {
        excerpt.push_str("...");
    }
    excerpt
}

fn percent(rate: Decimal) -> Decimal {
    rate.saturating_mul(Decimal::ONE_HUNDRED).round_dp(1)
}

impl Report<'_> {
    fn write_validation(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, '-', "VALIDATION")?;
        if self.warnings.is_empty() {
            return writeln!(f, "\nNo validation warnings.");
        }
        writeln!(f, "\n{} warning(s):", self.warnings.len())?;
        for warning in self.warnings {
            writeln!(f, "  - {warning}")?;
        }
        Ok(())
    }

    fn write_replay(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;
        heading(f, '-', "REPLAY")?;
        writeln!(f, "\n  Events: {} processed of {}", s.events_processed, s.events_total)?;
        writeln!(f, "  Undated events skipped: {}", s.events_skipped_undated)?;
        writeln!(f, "  Moves applied: {}", s.moves_applied)?;
        writeln!(f, "  Moves skipped: {}", s.moves_skipped)?;
        writeln!(f, "  Cash-outs recorded: {}", s.cash_out_moves)?;
        for anomaly in &s.carry_anomalies {
            writeln!(f, "  Carry Point anomaly: {anomaly}")?;
        }
        Ok(())
    }

    fn write_players(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, '-', "PLAYERS")?;
        let mut players: Vec<&Player> = self.state.players.iter().collect();
        players.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        for player in players {
            writeln!(f, "\n{} ({}):", player.display_name, player.name)?;
            writeln!(f, "  Investor Points in hand: {}", player.investor_points_in_hand)?;
            writeln!(f, "  Carry Points in hand: {}", player.carry_points_in_hand)?;
            writeln!(f, "  Credits: {}", player.credits.round())?;
            if let Some(account) = player.account() {
                writeln!(f, "  Account: {account}")?;
            }
            if let Some(email) = player.email.as_deref().filter(|e| !e.is_empty()) {
                writeln!(f, "  Email: {email}")?;
            }
        }
        Ok(())
    }

    fn write_plots(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, '-', "PLOTS")?;
        let mut plots: Vec<&Plot> = self.state.plots.iter().collect();
        plots.sort_by(|a, b| {
            a.product_name()
                .unwrap_or_default()
                .cmp(b.product_name().unwrap_or_default())
        });

        for plot in plots {
            let ledger = &plot.ledger;
            writeln!(
                f,
                "\n{} ({}):",
                plot.product_name().unwrap_or("Unknown"),
                plot.date_started.as_deref().unwrap_or("No date")
            )?;
            writeln!(f, "  Story: {}", story_excerpt(&plot.story))?;
            writeln!(f, "  Cost: {} Credits", plot.cost.normalize())?;
            writeln!(
                f,
                "  Conversion Ratio: {} Credits/Investor Point",
                plot.conversion_ratio.normalize()
            )?;
            writeln!(f, "  Hurdle Rate: {:.1}%", percent(plot.hurdle_rate))?;
            writeln!(f, "  Solvency State: {}", plot.solvency_state)?;
            writeln!(f, "  Ledger Balance: {} Credits", ledger.balance().normalize())?;
            writeln!(f, "  Ledger Hurdle: {} Credits", ledger.hurdle().normalize())?;
            writeln!(f, "  Total Investor Points: {}", ledger.total_investor_points())?;
            writeln!(f, "  Total Carry Points: {}", ledger.total_carry_points())?;
            writeln!(
                f,
                "  Paid Out Profit Total: {} Credits",
                ledger.paid_out_profit_total().normalize()
            )?;
            if let Some(account) = plot.account() {
                writeln!(f, "  Account: {account}")?;
            }

            let investors: Vec<_> = ledger.investor_points().iter().filter(|(_, p)| **p > 0).collect();
            if !investors.is_empty() {
                writeln!(f, "  Investor Points by Player:")?;
                for (name, points) in investors {
                    writeln!(f, "    {name}: {points}")?;
                }
            }
            let carriers: Vec<_> = ledger.carry_points().iter().filter(|(_, p)| **p > 0).collect();
            if !carriers.is_empty() {
                writeln!(f, "  Carry Points by Player:")?;
                for (name, points) in carriers {
                    writeln!(f, "    {name}: {points}")?;
                }
            }
        }
        Ok(())
    }

    fn write_owed(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, '-', "OWED BANK TRANSACTIONS")?;
        if self.owed.is_empty() {
            return writeln!(f, "\nNo owed bank transactions.");
        }
        writeln!(f, "\nFound {} owed bank transaction(s):\n", self.owed.len())?;
        for owed in self.owed {
            writeln!(f, "  Player: {}", owed.player_name)?;
            writeln!(f, "  Account: {}", owed.player_account)?;
            writeln!(f, "  Date: {}", owed.date)?;
            writeln!(f, "  Amount: ${:.2} USD", owed.amount_usd)?;
            writeln!(f, "  Move File: {}", owed.move_record.filename)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, '=', "FINAL GAME STATE")?;
        self.write_validation(f)?;
        self.write_replay(f)?;
        self.write_players(f)?;
        self.write_plots(f)?;
        self.write_owed(f)?;
        write!(f, "{}", "=".repeat(RULE_WIDTH))
    }
}

#[cfg(test)]
mod tests {
    use capital_core::Bank;
    use capital_types::Move;
    use rust_decimal_macros::dec;

    use super::*;

    fn state() -> GameState {
        let mut plot = Plot::new("x".repeat(120), dec!(20000), dec!(1000))
            .with_product_name("Mamani")
            .with_hurdle_rate(dec!(0.05));
        plot.ledger.add_investor_points("SeanReardon", 2, dec!(1000));
        plot.ledger.add_carry_points("SeanReardon", 1);
        GameState::new(
            vec![
                Player::new("ZoeAdams").with_display_name("Zoe Adams"),
                Player::new("AdaLovelace")
                    .with_display_name("Ada Lovelace")
                    .with_account("ACC-002")
                    .with_credits(dec!(1234.6)),
            ],
            vec![plot, Plot::new("bakery", dec!(8000), dec!(500)).with_product_name("Crumb")],
            Bank::default(),
        )
    }

    fn render(owed: &[OwedTransaction], warnings: &[String]) -> String {
        let state = state();
        let summary = ReplaySummary::default();
        Report {
            state: &state,
            summary: &summary,
            owed,
            warnings,
        }
        .to_string()
    }

    #[test]
    fn players_and_plots_are_sorted() {
        let out = render(&[], &[]);
        let ada = out.find("Ada Lovelace (AdaLovelace):");
        let zoe = out.find("Zoe Adams (ZoeAdams):");
        assert!(ada.is_some() && zoe.is_some() && ada < zoe);

        let crumb = out.find("\nCrumb (No date):");
        let mamani = out.find("\nMamani (No date):");
        assert!(crumb.is_some() && mamani.is_some() && crumb < mamani);
    }

    #[test]
    fn plot_figures_and_breakdowns() {
        let out = render(&[], &[]);
        assert!(out.contains("  Hurdle Rate: 5.0%"));
        assert!(out.contains("  Ledger Hurdle: 2000 Credits"));
        assert!(out.contains("  Investor Points by Player:\n    SeanReardon: 2"));
        assert!(out.contains("  Carry Points by Player:\n    SeanReardon: 1"));
        assert!(out.contains(&format!("  Story: {}...", "x".repeat(100))));
        assert!(out.contains("  Credits: 1235"));
        assert!(out.contains("  Account: ACC-002"));
    }

    #[test]
    fn empty_sections_say_so() {
        let out = render(&[], &[]);
        assert!(out.contains("No owed bank transactions."));
        assert!(out.contains("No validation warnings."));
    }

    #[test]
    fn owed_transactions_and_warnings_are_listed() {
        let mv = Move::new("2024-01-15", "AdaLovelace", "Mamani").with_cash_out(dec!(500));
        let owed = [OwedTransaction {
            player_name: "AdaLovelace".to_owned(),
            player_account: "ACC-002".to_owned(),
            date: "2024-01-15".to_owned(),
            amount_usd: dec!(500),
            move_record: mv,
        }];
        let warnings = ["Plot Mamani has hurdle_rate 0.2".to_owned()];
        let out = render(&owed, &warnings);
        assert!(out.contains("Found 1 owed bank transaction(s):"));
        assert!(out.contains("  Amount: $500.00 USD"));
        assert!(out.contains("  Move File: 2024-01-15-AdaLovelace-Mamani.txt"));
        assert!(out.contains("1 warning(s):\n  - Plot Mamani has hurdle_rate 0.2"));
    }
}
