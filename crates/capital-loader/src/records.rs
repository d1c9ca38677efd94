//! Parsing of individual record files.
//!
//! Each record is a small JSON object in a `.txt` file. Some identity is
//! carried by the file name rather than the JSON: a player's name comes
//! from `LastnameFirstname.txt`, and a move's date, player, and plot come
//! from `YYYY-MM-DD-UserName-Project.txt`. These functions take the path
//! and the file contents and do no I/O.

use std::path::Path;

use capital_types::{BankTransaction, Move, Player, Plot};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::LoadError;

const MOVE_FILE_PATTERN: &str = "YYYY-MM-DD-UserName-Project.txt";

// ---------------------------------------------------------------------------
// JSON shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PlayerFile {
    display_name: Option<String>,
    date_joined: Option<String>,
    account: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlotFile {
    #[serde(default)]
    description: String,
    #[serde(default)]
    cost: Decimal,
    #[serde(default = "default_conversion_ratio")]
    conversion_ratio: Decimal,
    #[serde(default)]
    hurdle_rate: Decimal,
    date_started: Option<String>,
    account: Option<String>,
    product_name: Option<String>,
    url: Option<String>,
}

const fn default_conversion_ratio() -> Decimal {
    Decimal::from_parts(1000, 0, 0, false, 0)
}

#[derive(Debug, Deserialize)]
struct MoveFile {
    #[serde(rename = "Push", default)]
    push: Decimal,
    #[serde(rename = "Pull", default)]
    pull: Decimal,
    #[serde(rename = "Buy-In", default)]
    buy_in: Decimal,
    #[serde(rename = "Cash-Out", default)]
    cash_out: Decimal,
}

#[derive(Debug, Deserialize)]
struct BankTransactionFile {
    #[serde(default)]
    account: String,
    #[serde(default)]
    date: String,
    #[serde(rename = "Cost", default)]
    cost: Decimal,
    #[serde(rename = "Revenue", default)]
    revenue: Decimal,
}

fn from_json<'de, T: Deserialize<'de>>(path: &Path, contents: &'de str) -> Result<T, LoadError> {
    serde_json::from_str(contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// Split a `LastnameFirstname` stem before its first uppercase letter after
/// the first character. Returns `(lastname, firstname)`.
pub fn split_player_stem(stem: &str) -> Option<(&str, &str)> {
    let (idx, _) = stem
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_uppercase())?;
    Some(stem.split_at(idx))
}

/// Parse a player file named `LastnameFirstname.txt`.
///
/// The player's name becomes `FirstnameLastname`. The display name comes
/// from the JSON, or else `"Firstname Lastname"`. A stem with no second
/// capital is used unchanged for both.
pub fn parse_player(path: &Path, contents: &str) -> Result<Player, LoadError> {
    let data: PlayerFile = from_json(path, contents)?;
    let stem = file_stem(path);

    let (name, generated_display) = match split_player_stem(stem) {
        Some((last, first)) => (format!("{first}{last}"), format!("{first} {last}")),
        None => (stem.to_owned(), stem.to_owned()),
    };

    let mut player = Player::new(name)
        .with_display_name(data.display_name.unwrap_or(generated_display));
    player.date_joined = data.date_joined;
    player.account = data.account;
    player.email = data.email;
    Ok(player)
}

// ---------------------------------------------------------------------------
// Plots
// ---------------------------------------------------------------------------

/// Parse a plot file. The file name carries no data.
pub fn parse_plot(path: &Path, contents: &str) -> Result<Plot, LoadError> {
    let data: PlotFile = from_json(path, contents)?;
    let mut plot = Plot::new(data.description, data.cost, data.conversion_ratio)
        .with_hurdle_rate(data.hurdle_rate);
    plot.product_name = data.product_name;
    plot.date_started = data.date_started;
    plot.account = data.account;
    plot.url = data.url;
    Ok(plot)
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

/// Parse a move file named `YYYY-MM-DD-UserName-Project.txt`.
///
/// The project is everything after the user name and may itself contain
/// dashes. With exactly four parts the project repeats the user name.
pub fn parse_move(path: &Path, contents: &str) -> Result<Move, LoadError> {
    let stem = file_stem(path);
    let parts: Vec<&str> = stem.split('-').collect();
    let (Some(year), Some(month), Some(day), Some(user)) =
        (parts.first(), parts.get(1), parts.get(2), parts.get(3))
    else {
        return Err(LoadError::FileName {
            path: path.to_path_buf(),
            expected: MOVE_FILE_PATTERN,
        });
    };
    let project = match parts.get(4..) {
        Some(rest) if !rest.is_empty() => rest.join("-"),
        _ => (*user).to_owned(),
    };

    let data: MoveFile = from_json(path, contents)?;
    Ok(Move::new(format!("{year}-{month}-{day}"), *user, project)
        .with_filename(file_name(path))
        .with_push(data.push)
        .with_pull(data.pull)
        .with_buy_in(data.buy_in)
        .with_cash_out(data.cash_out))
}

// ---------------------------------------------------------------------------
// Bank transactions
// ---------------------------------------------------------------------------

/// Parse a bank transaction file. Account and date come from the JSON.
pub fn parse_bank_transaction(path: &Path, contents: &str) -> Result<BankTransaction, LoadError> {
    let data: BankTransactionFile = from_json(path, contents)?;
    Ok(BankTransaction::new(data.account, data.date)
        .with_filename(file_name(path))
        .with_cost(data.cost)
        .with_revenue(data.revenue))
}
