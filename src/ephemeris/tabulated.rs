//! # Tabulated ephemeris
//!
//! An in-memory [`EphemerisProvider`] holding one Cartesian position per calendar date, as
//! produced by a JPL HORIZONS *vector table* export with a daily step.
//!
//! ## HORIZONS CSV layout
//! -----------------
//! Only the data block between the `$$SOE` and `$$EOE` markers is read. Each record is:
//!
//! ```text
//! JDTDB, Calendar Date (TDB), X, Y, Z[, VX, VY, VZ, ...]
//! 2455713.500000000, A.D. 2011-Jun-01 00:00:00.0000, -2.0E+07, -6.4E+07, -3.2E+07,
//! ```
//!
//! The calendar date column is used as the lookup key. X/Y/Z must be in **km** (the
//! HORIZONS `km-s` output unit).
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use camino::Utf8Path;
use csv::{ReaderBuilder, Trim};
use hifitime::Epoch;
use nalgebra::Vector3;
use regex::Regex;
use tracing::debug;

use crate::{
    ephemeris::EphemerisProvider,
    herm_errors::{HermError, ParseRowError},
    time::CalendarDate,
};

type Key = (String, String, String);

#[derive(Debug, Clone, Default)]
pub struct TabulatedEphemeris {
    tables: HashMap<Key, BTreeMap<CalendarDate, Vector3<f64>>>,
}

fn key(body: &str, frame: &str, observer: &str) -> Key {
    (
        body.to_ascii_uppercase(),
        frame.to_ascii_uppercase(),
        observer.to_ascii_uppercase(),
    )
}

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

// data block of a HORIZONS export, markers excluded
static DATA_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\$SOE\r?\n(.*?)\$\$EOE").expect("valid regex"));

static CALENDAR_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:A\.D\.\s+)?(\d{4})-([A-Za-z]{3})-(\d{2})").expect("valid regex")
});

/// Parse the date part of a HORIZONS calendar stamp such as `A.D. 2011-Jun-01 00:00:00.0000`.
fn parse_horizons_date(field: &str) -> Result<CalendarDate, String> {
    let invalid = || format!("invalid HORIZONS calendar date '{field}'");
    let caps = CALENDAR_DATE.captures(field.trim()).ok_or_else(invalid)?;

    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(&caps[2]))
        .ok_or_else(invalid)? as u8
        + 1;
    let day: u8 = caps[3].parse().map_err(|_| invalid())?;
    CalendarDate::new(year, month, day)
}

impl TabulatedEphemeris {
    pub fn insert(
        &mut self,
        body: &str,
        frame: &str,
        observer: &str,
        date: CalendarDate,
        position: Vector3<f64>,
    ) {
        self.tables
            .entry(key(body, frame, observer))
            .or_default()
            .insert(date, position);
    }

    /// Number of tabulated dates for a body/frame/observer triple.
    pub fn len_for(&self, body: &str, frame: &str, observer: &str) -> usize {
        self.tables
            .get(&key(body, frame, observer))
            .map_or(0, BTreeMap::len)
    }

    /// Load the `$$SOE`..`$$EOE` block of a HORIZONS CSV vector table.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: location of the export, used for error reporting.
    /// * `content`: the export text.
    /// * `body`, `frame`, `observer`: identifiers under which the records are stored.
    ///
    /// Return
    /// ----------
    /// * The number of records loaded.
    pub fn load_horizons_csv(
        &mut self,
        path: &Utf8Path,
        content: &str,
        body: &str,
        frame: &str,
        observer: &str,
    ) -> Result<usize, HermError> {
        let parse_err = |line: usize, reason: ParseRowError| HermError::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let block = DATA_BLOCK.captures(content).and_then(|c| c.get(1)).ok_or_else(|| {
            let marker = if content.contains("$$SOE") { "$$EOE" } else { "$$SOE" };
            parse_err(0, ParseRowError::MissingMarker(marker))
        })?;
        // 1-based line of the $$SOE marker
        let soe = content[..block.start()].lines().count();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(block.as_str().as_bytes());

        let mut loaded = 0;
        for record in reader.records() {
            let record = record?;
            let line = soe + record.position().map_or(0, |p| p.line() as usize);
            if record.len() < 5 {
                return Err(parse_err(
                    line,
                    ParseRowError::TooFewColumns {
                        expected: 5,
                        found: record.len(),
                    },
                ));
            }
            let date = parse_horizons_date(&record[1])
                .map_err(|_| parse_err(line, ParseRowError::InvalidTime(record[1].to_string())))?;
            let mut xyz = [0.0; 3];
            for (slot, cell) in xyz.iter_mut().zip(record.iter().skip(2)) {
                *slot = cell
                    .parse()
                    .map_err(|_| parse_err(line, ParseRowError::InvalidNumber(cell.to_string())))?;
            }
            self.insert(body, frame, observer, date, Vector3::from(xyz));
            loaded += 1;
        }

        debug!(%path, records = loaded, body, "loaded HORIZONS vector table");
        Ok(loaded)
    }

    /// Build a table from a HORIZONS CSV export on disk.
    pub fn from_horizons_csv(
        path: &Utf8Path,
        body: &str,
        frame: &str,
        observer: &str,
    ) -> Result<Self, HermError> {
        let content = std::fs::read_to_string(path)?;
        let mut table = TabulatedEphemeris::default();
        table.load_horizons_csv(path, &content, body, frame, observer)?;
        Ok(table)
    }
}

impl EphemerisProvider for TabulatedEphemeris {
    fn position_of(
        &self,
        body: &str,
        frame: &str,
        observer: &str,
        epoch: &Epoch,
    ) -> Result<Vector3<f64>, HermError> {
        let date = CalendarDate::from(epoch);
        let unavailable = |reason: &str| HermError::EphemerisUnavailable {
            body: body.to_string(),
            date,
            reason: reason.to_string(),
        };

        let table = self
            .tables
            .get(&key(body, frame, observer))
            .ok_or_else(|| unavailable(&format!("no table for {frame} relative to {observer}")))?;
        table
            .get(&date)
            .copied()
            .ok_or_else(|| unavailable("date outside tabulated coverage"))
    }
}
