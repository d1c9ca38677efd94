//! Integrity checks run before replay.
//!
//! Replay tolerates dangling references and bad dates by skipping them.
//! These checks surface such problems up front so a run with broken data
//! stops before any state is touched. Errors are fatal; warnings are
//! returned for the caller to report.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;

use capital_types::{Dated, Event, Move};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::state::GameState;
use crate::timeline::Timeline;

/// Upper bound of the accepted hurdle rate range.
const MAX_HURDLE_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Validation failed with one or more errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} errors:{}", bullet_list(.errors))]
pub struct ValidationError {
    /// Which check failed, e.g. `"Validation"` or `"Timeline Validation"`.
    pub stage: String,
    /// One message per problem found.
    pub errors: Vec<String>,
}

fn bullet_list(items: &[String]) -> String {
    items.iter().fold(String::new(), |mut out, item| {
        let _ = write!(out, "\n  - {item}");
        out
    })
}

/// Values that occur more than once, in order of first appearance.
fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n = n.saturating_add(1),
            None => counts.push((value, 1)),
        }
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(v, _)| v)
        .collect()
}

/// Errors and warnings collected by the game data checks.
#[derive(Debug, Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Check references, uniqueness, dates, and amounts across the loaded data.
///
/// The checks run in order:
/// 1. References -- does every move name a known player and plot?
/// 2. Uniqueness -- player names, plot product names, and accounts.
/// 3. Bank accounts -- does every bank account belong to someone?
/// 4. Plots -- product names, conversion ratios, hurdle rates.
/// 5. Dates -- can every move and bank date be parsed?
/// 6. Amounts -- negative move or bank amounts.
///
/// Returns the warnings when no errors were found.
pub fn validate_game_data(state: &GameState, moves: &[Move]) -> Result<Vec<String>, ValidationError> {
    let mut findings = Findings::default();

    check_references(state, moves, &mut findings);
    check_uniqueness(state, &mut findings);
    check_bank_accounts(state, &mut findings);
    check_plots(state, &mut findings);
    check_dates(state, moves, &mut findings);
    check_amounts(state, moves, &mut findings);

    let Findings { errors, warnings } = findings;
    for w in &warnings {
        warn!(warning = %w, "Validation warning");
    }

    if errors.is_empty() {
        debug!(warnings = warnings.len(), "Game data validated");
        Ok(warnings)
    } else {
        Err(ValidationError {
            stage: "Validation".to_owned(),
            errors,
        })
    }
}

fn check_references(state: &GameState, moves: &[Move], findings: &mut Findings) {
    let player_names: HashSet<&str> = state.players.iter().map(|p| p.name.as_str()).collect();
    let plot_names: HashSet<&str> = state.plots.iter().filter_map(|p| p.product_name()).collect();

    for mv in moves {
        if !player_names.contains(mv.user_name.as_str()) {
            findings.errors.push(format!(
                "Move {} references player '{}' which does not exist in Players",
                mv.filename, mv.user_name
            ));
        }
    }
    for mv in moves {
        if !plot_names.contains(mv.project.as_str()) {
            findings.errors.push(format!(
                "Move {} references plot '{}' which does not exist in Plots",
                mv.filename, mv.project
            ));
        }
    }
}

fn check_uniqueness(state: &GameState, findings: &mut Findings) {
    let groups: [(&str, Vec<&str>); 4] = [
        (
            "Duplicate Player names found",
            state.players.iter().map(|p| p.name.as_str()).collect(),
        ),
        (
            "Duplicate Plot product_names found",
            state.plots.iter().filter_map(|p| p.product_name()).collect(),
        ),
        (
            "Duplicate account strings in Players",
            state.players.iter().filter_map(|p| p.account()).collect(),
        ),
        (
            "Duplicate account strings in Plots",
            state.plots.iter().filter_map(|p| p.account()).collect(),
        ),
    ];

    for (label, values) in groups {
        let dups = duplicates(values.into_iter());
        if !dups.is_empty() {
            findings.errors.push(format!("{label}: {}", dups.join(", ")));
        }
    }
}

fn check_bank_accounts(state: &GameState, findings: &mut Findings) {
    let known_accounts: HashSet<&str> = state
        .players
        .iter()
        .filter_map(|p| p.account())
        .chain(state.plots.iter().filter_map(|p| p.account()))
        .collect();

    for account in state.bank.unique_accounts() {
        if !account.is_empty() && !known_accounts.contains(account) {
            findings.warnings.push(format!(
                "Bank transaction references account '{account}' which does not exist in any Player or Plot"
            ));
        }
    }
}

fn check_plots(state: &GameState, findings: &mut Findings) {
    let unnamed = state.plots.iter().filter(|p| p.product_name().is_none()).count();
    if unnamed > 0 {
        findings.errors.push(format!(
            "{unnamed} Plot(s) missing product_name (required for Move references)"
        ));
    }

    for plot in &state.plots {
        if plot.conversion_ratio <= Decimal::ZERO {
            findings.errors.push(format!(
                "Plot '{}' has non-positive conversion_ratio {}",
                plot.product_name().unwrap_or("Unknown"),
                plot.conversion_ratio
            ));
        }
        if plot.hurdle_rate < Decimal::ZERO || plot.hurdle_rate > MAX_HURDLE_RATE {
            findings.warnings.push(format!(
                "Plot '{}' has hurdle_rate {} outside 0 to 0.10",
                plot.product_name().unwrap_or("Unknown"),
                plot.hurdle_rate
            ));
        }
    }
}

fn check_dates(state: &GameState, moves: &[Move], findings: &mut Findings) {
    for mv in moves {
        if !mv.is_dated() {
            findings.errors.push(format!(
                "Move {} has invalid date format: '{}' (expected YYYY-MM-DD)",
                mv.filename, mv.date
            ));
        }
    }
    for tx in state.bank.transactions() {
        if !tx.is_dated() {
            findings.errors.push(format!(
                "Bank transaction {} has invalid date format: '{}' (expected YYYY-MM-DD)",
                tx.filename, tx.date
            ));
        }
    }
}

fn check_amounts(state: &GameState, moves: &[Move], findings: &mut Findings) {
    for mv in moves {
        if mv.has_negative_amount() {
            findings
                .warnings
                .push(format!("Move {} has negative credit amounts", mv.filename));
        }
    }
    for tx in state.bank.transactions() {
        if tx.cost_usd.is_sign_negative() || tx.revenue_usd.is_sign_negative() {
            findings.warnings.push(format!(
                "Bank transaction {} has negative USD amounts",
                tx.filename
            ));
        }
    }
}

/// Check that no move happens before its player joined or its plot started.
pub fn validate_timeline(timeline: &Timeline) -> Result<Vec<String>, ValidationError> {
    let mut joined: BTreeMap<&str, NaiveDateTime> = BTreeMap::new();
    let mut started: BTreeMap<&str, NaiveDateTime> = BTreeMap::new();

    for event in timeline.events() {
        match event {
            Event::PlayerJoined(player) => {
                if let Some(dt) = player.timestamp() {
                    joined.insert(&player.name, dt);
                }
            }
            Event::PlotStarted(plot) => {
                if let (Some(dt), Some(name)) = (plot.timestamp(), plot.product_name()) {
                    started.insert(name, dt);
                }
            }
            Event::PlayerMove(_) | Event::BankTransaction(_) => {}
        }
    }

    let mut errors = Vec::new();
    for event in timeline.events() {
        let Event::PlayerMove(mv) = event else {
            continue;
        };
        let Some(move_dt) = mv.timestamp() else {
            continue;
        };

        if let Some(join_dt) = joined.get(mv.user_name.as_str()).filter(|dt| move_dt < **dt) {
            errors.push(format!(
                "Move {} on {} occurs before player '{}' joined on {}",
                mv.filename,
                mv.date,
                mv.user_name,
                join_dt.format("%Y-%m-%d")
            ));
        }
        if let Some(start_dt) = started.get(mv.project.as_str()).filter(|dt| move_dt < **dt) {
            errors.push(format!(
                "Move {} on {} occurs before plot '{}' started on {}",
                mv.filename,
                mv.date,
                mv.project,
                start_dt.format("%Y-%m-%d")
            ));
        }
    }

    if errors.is_empty() {
        Ok(Vec::new())
    } else {
        Err(ValidationError {
            stage: "Timeline Validation".to_owned(),
            errors,
        })
    }
}
