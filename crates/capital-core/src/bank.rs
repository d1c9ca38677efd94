//! The bank: every recorded real-world transaction, in date order.

use std::collections::BTreeSet;

use capital_types::{BankTransaction, compare_dated};
use rust_decimal::Decimal;

/// Real-world USD transactions recorded against player and plot accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bank {
    transactions: Vec<BankTransaction>,
}

impl Bank {
    /// Build a bank from transactions, stable-sorted by date with dateless
    /// transactions first.
    pub fn new(mut transactions: Vec<BankTransaction>) -> Self {
        transactions.sort_by(compare_dated);
        Self { transactions }
    }

    /// All transactions in date order.
    pub const fn transactions(&self) -> &[BankTransaction] {
        self.transactions.as_slice()
    }

    /// Number of transactions.
    pub const fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the bank holds no transactions.
    pub const fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Net USD (revenue minus cost) across every transaction on `account`.
    pub fn account_balance(&self, account: &str) -> Decimal {
        self.transactions_by_account(account)
            .fold(Decimal::ZERO, |acc, tx| acc.saturating_add(tx.net_usd()))
    }

    /// Transactions recorded against `account`, in date order.
    ///
    /// The yielded transactions borrow from the bank only, so they outlive
    /// `account`.
    pub fn transactions_by_account<'s, 'a>(
        &'s self,
        account: &'a str,
    ) -> impl Iterator<Item = &'s BankTransaction> + use<'s, 'a> {
        self.transactions.iter().filter(move |tx| tx.account == account)
    }

    /// Distinct account strings, sorted.
    pub fn unique_accounts(&self) -> BTreeSet<&str> {
        self.transactions.iter().map(|tx| tx.account.as_str()).collect()
    }
}
