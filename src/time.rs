//! # Time handling for MESSENGER products
//!
//! MESSENGER data files stamp samples with a **year + day-of-year** clock rather than a
//! calendar month/day. This module reconstructs UTC [`Epoch`]s from both layouts used by
//! the instrument archives:
//!
//! - MAG: five whitespace-separated cells forming `YYYY:DDD:HH:MM:SS[.frac]`
//! - FIPS: a single token `YYYY-DDDTHH:MM:SS.frac`
//!
//! It also defines [`CalendarDate`] (the key of the aberration cache) and [`TimeRange`]
//! (the requested window of interest).
//!
//! Calendar arithmetic is left to hifitime: timestamps go through its `%j` day-of-year
//! format parser in the UTC scale, with no leap-second special-casing.
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use hifitime::{efmt::Format, is_gregorian_valid, Epoch, TimeScale};

/// A UTC calendar date, without time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl CalendarDate {
    /// Build a date, rejecting impossible month/day combinations.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, String> {
        if !is_gregorian_valid(year, month, day, 0, 0, 0, 0) {
            return Err(format!("invalid date {year:04}-{month:02}-{day:02}"));
        }
        Ok(CalendarDate { year, month, day })
    }

    /// Build a date from a year and a 1-based day of year.
    pub fn from_ordinal(year: i32, doy: u16) -> Result<Self, String> {
        let date = CalendarDate::from(Epoch::from_day_of_year(
            year,
            f64::from(doy),
            TimeScale::UTC,
        ));
        if doy == 0 || date.year != year {
            return Err(format!("invalid day of year {doy} for {year}"));
        }
        Ok(date)
    }

    /// Midnight UTC at the start of this date.
    pub fn midnight_utc(&self) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(self.year, self.month, self.day)
    }
}

impl From<Epoch> for CalendarDate {
    fn from(epoch: Epoch) -> Self {
        let (year, month, day, _, _, _, _) = epoch.to_gregorian_utc();
        CalendarDate { year, month, day }
    }
}

impl From<&Epoch> for CalendarDate {
    fn from(epoch: &Epoch) -> Self {
        CalendarDate::from(*epoch)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Window of interest for a parse call.
///
/// The bound semantics differ between products and are chosen by the caller through
/// [`TimeRange::contains_exclusive`] and [`TimeRange::contains_half_open`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: Epoch,
    pub end: Epoch,
}

impl TimeRange {
    pub fn new(start: Epoch, end: Epoch) -> Self {
        TimeRange { start, end }
    }

    /// Parse both bounds with hifitime's ISO 8601 parser (e.g. `2011-06-01T00:00:00`).
    pub fn parse(start: &str, end: &str) -> Result<Self, String> {
        let start = Epoch::from_str(start).map_err(|e| format!("invalid start {start}: {e}"))?;
        let end = Epoch::from_str(end).map_err(|e| format!("invalid end {end}: {e}"))?;
        Ok(TimeRange { start, end })
    }

    /// `start < t < end`
    pub fn contains_exclusive(&self, t: &Epoch) -> bool {
        *t > self.start && *t < self.end
    }

    /// `start <= t < end`
    pub fn contains_half_open(&self, t: &Epoch) -> bool {
        *t >= self.start && *t < self.end
    }
}

static MAG_CLOCK: LazyLock<Format> =
    LazyLock::new(|| Format::from_str("%Y:%j:%H:%M:%S.%f").expect("valid format"));
static FIPS_CLOCK: LazyLock<Format> =
    LazyLock::new(|| Format::from_str("%Y-%jT%H:%M:%S.%f").expect("valid format"));

/// hifitime drops a one-digit fraction at the end of the input, so the fraction is
/// padded with a zero. It is also capped at nanosecond precision.
fn padded_fraction(text: &str) -> Cow<'_, str> {
    match text.rsplit_once('.') {
        Some((head, frac)) => {
            let frac = frac.get(..8).unwrap_or(frac);
            Cow::Owned(format!("{head}.{frac}0"))
        }
        None => Cow::Borrowed(text),
    }
}

fn parse_day_of_year(text: &str, format: Format, year_sep: char) -> Result<Epoch, String> {
    let text = text.trim();
    let epoch = Epoch::from_str_with_format(&padded_fraction(text), format)
        .map_err(|e| format!("invalid day-of-year timestamp '{text}': {e}"))?;

    // day 366 of a common year, or day 0, lands in a neighbouring year
    let year = text.split(year_sep).next().and_then(|y| y.parse::<i32>().ok());
    if year != Some(CalendarDate::from(epoch).year) {
        return Err(format!("day of year out of range in '{text}'"));
    }
    Ok(epoch)
}

/// Parse the colon-separated day-of-year layout `YYYY:DDD:HH:MM:SS[.frac]`.
pub fn parse_yday(text: &str) -> Result<Epoch, String> {
    parse_day_of_year(text, *MAG_CLOCK, ':')
}

/// Parse the FIPS layout `YYYY-DDDTHH:MM:SS.frac`.
pub fn parse_doy_timestamp(text: &str) -> Result<Epoch, String> {
    parse_day_of_year(text, *FIPS_CLOCK, '-')
}
