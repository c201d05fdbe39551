//! Calendar-day arithmetic.
//!
//! Every date in the tracker is a `NaiveDate`: a bare (year, month, day) with no
//! time-of-day and no zone. Values that do carry a time (timestamps, RFC 3339
//! strings) are reduced to the host's local calendar day before they are
//! compared, so two values are "the same day" exactly when their canonical
//! `YYYY-MM-DD` strings match.

use crate::error::CoreError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// The canonical textual form of a calendar day.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Anything that can be reduced to a single local calendar day.
pub trait CalendarDay {
    /// Returns the canonical `YYYY-MM-DD` form of this value.
    fn canonical(&self) -> Result<String, CoreError>;

    /// Returns the calendar day this value falls on.
    fn calendar_day(&self) -> Result<NaiveDate, CoreError> {
        from_canonical(&self.canonical()?)
    }
}

impl CalendarDay for NaiveDate {
    fn canonical(&self) -> Result<String, CoreError> {
        Ok(self.format(CANONICAL_FORMAT).to_string())
    }

    fn calendar_day(&self) -> Result<NaiveDate, CoreError> {
        Ok(*self)
    }
}

impl CalendarDay for NaiveDateTime {
    fn canonical(&self) -> Result<String, CoreError> {
        self.date().canonical()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn canonical(&self) -> Result<String, CoreError> {
        // Local fields, never UTC ones: late-evening timestamps must not roll over.
        self.with_timezone(&Local).date_naive().canonical()
    }
}

impl CalendarDay for str {
    fn canonical(&self) -> Result<String, CoreError> {
        if has_canonical_shape(self) {
            return Ok(self.to_string());
        }
        DateTime::parse_from_rfc3339(self)
            .map_err(|e| CoreError::invalid("date", format!("'{self}' is not a calendar day: {e}")))?
            .canonical()
    }
}

impl CalendarDay for String {
    fn canonical(&self) -> Result<String, CoreError> {
        self.as_str().canonical()
    }
}

impl<T: CalendarDay + ?Sized> CalendarDay for &T {
    fn canonical(&self) -> Result<String, CoreError> {
        (**self).canonical()
    }

    fn calendar_day(&self) -> Result<NaiveDate, CoreError> {
        (**self).calendar_day()
    }
}

/// Returns the canonical `YYYY-MM-DD` string for `input`.
///
/// Strings that already have the canonical shape are returned unchanged.
pub fn to_canonical<T: CalendarDay + ?Sized>(input: &T) -> Result<String, CoreError> {
    input.canonical()
}

/// Parses a canonical `YYYY-MM-DD` string from its explicit components.
pub fn from_canonical(s: &str) -> Result<NaiveDate, CoreError> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(CoreError::invalid("date", format!("'{s}' is not in YYYY-MM-DD form")));
    }

    let year: i32 = parts[0]
        .parse()
        .map_err(|_| CoreError::invalid("date", format!("bad year in '{s}'")))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| CoreError::invalid("date", format!("bad month in '{s}'")))?;
    let day: u32 = parts[2]
        .parse()
        .map_err(|_| CoreError::invalid("date", format!("bad day in '{s}'")))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CoreError::invalid("date", format!("'{s}' does not exist in the calendar")))
}

/// True when both values fall on the same calendar day.
///
/// A value that cannot be reduced to a calendar day never matches anything.
pub fn same_day<A, B>(a: &A, b: &B) -> bool
where
    A: CalendarDay + ?Sized,
    B: CalendarDay + ?Sized,
{
    match (a.canonical(), b.canonical()) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

/// The current local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// English weekday name, e.g. `Thursday`.
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Long display form, e.g. `Thursday 26 June`.
pub fn format_for_display(date: NaiveDate) -> String {
    date.format("%A %-d %B").to_string()
}

fn has_canonical_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}
