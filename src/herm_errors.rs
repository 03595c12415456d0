use camino::Utf8PathBuf;
use thiserror::Error;

use crate::{constants::Kilometer, time::CalendarDate, units::Unit};

/// Line-level parsing errors for the fixed-column instrument files.
///
/// Variants
/// -----------------
/// * `TooFewColumns` – The row has fewer columns than the layout requires.
/// * `RaggedRow` – The row width differs from the first row of the same file.
/// * `UnevenFluxBlocks` – The FIPS flux columns do not split into three equal blocks.
/// * `InvalidNumber` – A numeric cell could not be parsed; payload carries the cell.
/// * `InvalidTime` – The timestamp could not be assembled; payload carries the offending text.
/// * `MissingMarker` – A HORIZONS export lacks its `$$SOE`/`$$EOE` data markers.
#[derive(Error, Debug, PartialEq)]
pub enum ParseRowError {
    #[error("expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
    #[error("row has {found} columns but the file started with {expected}")]
    RaggedRow { expected: usize, found: usize },
    #[error("{found} flux columns do not split into three equal blocks")]
    UnevenFluxBlocks { found: usize },
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("invalid time: {0}")]
    InvalidTime(String),
    #[error("missing {0} marker")]
    MissingMarker(&'static str),
}

#[derive(Error, Debug)]
pub enum HermError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("{path}:{line}: {reason}")]
    Parse {
        path: Utf8PathBuf,
        line: usize,
        reason: ParseRowError,
    },

    #[error("{path}: unrecognized column count {columns} (expected 12 or 16)")]
    UnrecognizedColumnCount { path: Utf8PathBuf, columns: usize },

    #[error("{path}: product {found} cannot be merged with {expected}")]
    SchemaMismatch {
        path: Utf8PathBuf,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path}: channel axis has length {found}, expected {expected}")]
    ChannelAxisMismatch {
        path: Utf8PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Ephemeris unavailable for {body} on {date}: {reason}")]
    EphemerisUnavailable {
        body: String,
        date: CalendarDate,
        reason: String,
    },

    #[error("Vis-viva radicand is not physical at heliocentric distance {distance} km")]
    VisVivaDomain { distance: Kilometer },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Incompatible units: {0:?}")]
    IncompatibleUnits(Vec<Unit>),

    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("At least one component field is required")]
    EmptyComponents,
}

impl PartialEq for HermError {
    fn eq(&self, other: &Self) -> bool {
        use HermError::*;
        match (self, other) {
            // Opaque payloads: same variant is enough
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (
                Parse {
                    path: p1,
                    line: l1,
                    reason: r1,
                },
                Parse {
                    path: p2,
                    line: l2,
                    reason: r2,
                },
            ) => p1 == p2 && l1 == l2 && r1 == r2,
            (
                UnrecognizedColumnCount {
                    path: p1,
                    columns: c1,
                },
                UnrecognizedColumnCount {
                    path: p2,
                    columns: c2,
                },
            ) => p1 == p2 && c1 == c2,
            (
                SchemaMismatch {
                    path: p1,
                    expected: e1,
                    found: f1,
                },
                SchemaMismatch {
                    path: p2,
                    expected: e2,
                    found: f2,
                },
            ) => p1 == p2 && e1 == e2 && f1 == f2,
            (
                ChannelAxisMismatch {
                    path: p1,
                    expected: e1,
                    found: f1,
                },
                ChannelAxisMismatch {
                    path: p2,
                    expected: e2,
                    found: f2,
                },
            ) => p1 == p2 && e1 == e2 && f1 == f2,
            (
                EphemerisUnavailable {
                    body: b1, date: d1, ..
                },
                EphemerisUnavailable {
                    body: b2, date: d2, ..
                },
            ) => b1 == b2 && d1 == d2,
            (VisVivaDomain { distance: a }, VisVivaDomain { distance: b }) => a == b,
            (MissingField(a), MissingField(b)) => a == b,
            (IncompatibleUnits(a), IncompatibleUnits(b)) => a == b,
            (
                LengthMismatch {
                    expected: e1,
                    found: f1,
                },
                LengthMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,

            (EmptyComponents, EmptyComponents) => true,

            _ => false,
        }
    }
}
