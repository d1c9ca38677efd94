//! Reconciliation of cash-outs against bank deposits.
//!
//! Every cash-out converts credits to dollars one-for-one. After a replay
//! each recorded cash-out is looked up in the bank: a deposit (revenue) on
//! the player's account, within the configured window of the move's date,
//! for the same amount. Cash-outs with no such deposit are owed.
//!
//! Matching does not consume bank transactions. One deposit can satisfy
//! any number of cash-outs that fit it.

use std::collections::BTreeMap;

use capital_types::{BankTransaction, Dated, Move, Player};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::bank::Bank;
pub use crate::config::ReconciliationConfig;

const SECONDS_PER_DAY: i64 = 86_400;

/// A cash-out with no matching bank deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwedTransaction {
    /// The player who cashed out.
    pub player_name: String,
    /// The player's bank account.
    pub player_account: String,
    /// Date of the cash-out move.
    pub date: String,
    /// Dollars owed.
    pub amount_usd: Decimal,
    /// The cash-out move itself.
    pub move_record: Move,
}

/// Map player names to their bank accounts.
///
/// Players with no account, or an empty one, are left out. When two
/// players share a name the later one wins.
pub fn player_accounts(players: &[Player]) -> BTreeMap<&str, &str> {
    players
        .iter()
        .filter_map(|p| p.account().map(|account| (p.name.as_str(), account)))
        .collect()
}

/// Whole days between two timestamps, rounded toward negative infinity.
fn day_difference(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    a.signed_duration_since(b)
        .num_seconds()
        .checked_div_euclid(SECONDS_PER_DAY)
        .unwrap_or(0)
}

/// First bank transaction, in bank order, that settles `mv`.
///
/// A transaction settles a move when it is on `account`, its date is
/// within `window_days` of the move's date in either direction, and its
/// revenue is strictly within `amount_tolerance` of the cash-out amount.
pub fn find_matching_transaction<'b>(
    mv: &Move,
    account: &str,
    bank: &'b Bank,
    config: &ReconciliationConfig,
) -> Option<&'b BankTransaction> {
    let move_dt = mv.timestamp()?;
    let window = u64::try_from(config.window_days).unwrap_or(0);

    bank.transactions_by_account(account).find(|tx| {
        let Some(tx_dt) = tx.timestamp() else {
            return false;
        };
        if day_difference(move_dt, tx_dt).unsigned_abs() > window {
            return false;
        }
        tx.revenue_usd
            .checked_sub(mv.cash_out_credits)
            .is_some_and(|diff| diff.abs() < config.amount_tolerance)
    })
}

/// Cash-outs that no bank deposit accounts for.
///
/// Moves without a positive cash-out, without a resolvable player account,
/// or without a usable date are ignored.
pub fn owed_transactions(
    cash_out_moves: &[Move],
    bank: &Bank,
    players: &[Player],
    config: &ReconciliationConfig,
) -> Vec<OwedTransaction> {
    let accounts = player_accounts(players);
    let mut owed = Vec::new();

    for mv in cash_out_moves {
        if !mv.is_cash_out() {
            continue;
        }
        let Some(account) = accounts.get(mv.user_name.as_str()).copied() else {
            debug!(player = %mv.user_name, "No account for cash-out, not reconciled");
            continue;
        };
        if !mv.is_dated() {
            debug!(file = %mv.filename, "Undated cash-out, not reconciled");
            continue;
        }

        if let Some(tx) = find_matching_transaction(mv, account, bank, config) {
            debug!(file = %mv.filename, deposit = %tx.filename, "Cash-out matched");
            continue;
        }

        owed.push(OwedTransaction {
            player_name: mv.user_name.clone(),
            player_account: account.to_owned(),
            date: mv.date.clone(),
            amount_usd: mv.cash_out_credits,
            move_record: mv.clone(),
        });
    }

    info!(
        cash_outs = cash_out_moves.len(),
        owed = owed.len(),
        "Reconciliation complete"
    );

    owed
}
