//! Event date parsing and chronological ordering.
//!
//! Every record in the game carries a date string. The string is kept as
//! supplied and parsed lazily into a [`NaiveDateTime`] whenever ordering or
//! matching needs it. Anything that does not match one of the accepted
//! formats is treated as having no date at all.

use core::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Plain calendar date, interpreted as midnight.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// ISO-8601 timestamp with a literal `Z` suffix.
pub const ISO_FORMAT_UTC: &str = "%Y-%m-%dT%H:%M:%SZ";

/// ISO-8601 timestamp without a timezone designator.
pub const ISO_FORMAT_LOCAL: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse an event date string.
///
/// Formats are tried in order: [`DATE_FORMAT`], [`ISO_FORMAT_UTC`],
/// [`ISO_FORMAT_LOCAL`]. Empty or unrecognised strings yield `None`.
pub fn parse_event_date(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date.and_time(NaiveTime::MIN));
    }

    NaiveDateTime::parse_from_str(raw, ISO_FORMAT_UTC)
        .or_else(|_err| NaiveDateTime::parse_from_str(raw, ISO_FORMAT_LOCAL))
        .ok()
}

/// Order two optional timestamps.
///
/// A missing timestamp sorts before any present one, and two missing
/// timestamps compare equal. Used with a stable sort so that ties keep
/// their insertion order.
pub fn compare_timestamps(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(&y),
    }
}

/// Anything that carries an event date.
///
/// Implementors only supply the raw string; parsing and ordering are
/// shared.
pub trait Dated {
    /// The raw date string, if one was supplied.
    fn event_date(&self) -> Option<&str>;

    /// The parsed timestamp, or `None` when the date is absent or not in an
    /// accepted format.
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.event_date().and_then(parse_event_date)
    }

    /// Whether this record has a usable date.
    fn is_dated(&self) -> bool {
        self.timestamp().is_some()
    }
}

/// Compare two dated records chronologically (see [`compare_timestamps`]).
pub fn compare_dated<A: Dated + ?Sized, B: Dated + ?Sized>(a: &A, b: &B) -> Ordering {
    compare_timestamps(a.timestamp(), b.timestamp())
}
