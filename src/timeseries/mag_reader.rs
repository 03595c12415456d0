//! # MESSENGER MAG reader
//!
//! Parses MESSENGER magnetometer tables (whitespace-separated ASCII) into a
//! [`Timeseries`].
//!
//! ## Field Layout
//! -----------------
//! * `0..5` – year, day of year, hour, minute, seconds (`YYYY:DDD:HH:MM:SS[.frac]`, UTC)
//! * `5` – unused by this reader
//! * `6..` – data fields, selected by [`MagProduct::schema`]:
//!   - **12 columns** ([`MagProduct::FullCadence`]): MSO position (km), field vector (nT)
//!   - **16 columns** ([`MagProduct::Averaged`]): observation count, MSO position (km),
//!     field vector (nT), per-axis standard deviation (nT)
//!
//! ## Error Handling
//! -----------------
//! A file whose column count matches neither product fails the whole call with
//! [`HermError::UnrecognizedColumnCount`]; mixing products in one call fails with
//! [`HermError::SchemaMismatch`]. Line-level failures are wrapped in [`HermError::Parse`]
//! with the 1-based line number.
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::{
    herm_errors::{HermError, ParseRowError},
    time::{parse_yday, TimeRange},
    timeseries::{Column, MagProduct, Timeseries},
};

fn parse_cell<T: FromStr>(cell: &str) -> Result<T, ParseRowError> {
    cell.parse::<T>()
        .map_err(|_| ParseRowError::InvalidNumber(cell.to_string()))
}

fn parse_time(cells: &[&str]) -> Result<hifitime::Epoch, ParseRowError> {
    let stamp = cells[..5].join(":");
    parse_yday(&stamp).map_err(|_| ParseRowError::InvalidTime(stamp))
}

/// Parse the content of one MAG file.
///
/// The first non-blank line fixes the column count and therefore the [`MagProduct`];
/// every following line must have the same width.
pub(crate) fn read_mag_table(path: &Utf8Path, content: &str) -> Result<Timeseries, HermError> {
    let parse_err = |line: usize, reason: ParseRowError| HermError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut rows = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.split_whitespace().collect::<Vec<_>>()))
        .filter(|(_, cells)| !cells.is_empty())
        .peekable();

    let width = rows.peek().map(|(_, cells)| cells.len()).unwrap_or(0);
    let product =
        MagProduct::from_column_count(width).ok_or_else(|| HermError::UnrecognizedColumnCount {
            path: path.to_path_buf(),
            columns: width,
        })?;
    let schema = product.schema();

    let mut times = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); schema.len()];

    for (line, cells) in rows {
        if cells.len() != width {
            return Err(parse_err(
                line,
                ParseRowError::RaggedRow {
                    expected: width,
                    found: cells.len(),
                },
            ));
        }
        times.push(parse_time(&cells).map_err(|e| parse_err(line, e))?);
        for ((raw_index, _, _), column) in schema.iter().zip(values.iter_mut()) {
            column.push(parse_cell(cells[*raw_index]).map_err(|e| parse_err(line, e))?);
        }
    }

    let mut table = Timeseries::new(times);
    for ((_, name, unit), column) in schema.iter().zip(values) {
        table.push_column(Column::new(*name, *unit, column))?;
    }
    table.set_product(product);

    debug!(%path, product = product.name(), rows = table.len(), "parsed MAG file");
    Ok(table)
}

/// Read and parse one MAG file from disk.
pub fn read_mag_file(path: &Utf8Path) -> Result<Timeseries, HermError> {
    let content = std::fs::read_to_string(path)?;
    read_mag_table(path, &content)
}

/// Parse MESSENGER MAG files into a single dataset restricted to a time window.
///
/// Files are concatenated in the order given (no re-sorting: supply them chronologically),
/// then rows are kept only if `time_range.start < t < time_range.end`.
///
/// Arguments
/// -----------------
/// * `file_paths`: local MAG tables, all of the same [`MagProduct`].
/// * `time_range`: the window of interest; both bounds are exclusive.
///
/// Return
/// ----------
/// * The merged, sliced [`Timeseries`], or the first error met. No partial dataset is
///   returned on failure.
pub fn parse_vector_series<P: AsRef<Utf8Path>>(
    file_paths: &[P],
    time_range: &TimeRange,
) -> Result<Timeseries, HermError> {
    let mut merged: Option<Timeseries> = None;

    for path in file_paths {
        let path = path.as_ref();
        let table = read_mag_file(path)?;

        match merged.as_mut() {
            None => merged = Some(table),
            Some(acc) => {
                if acc.product() != table.product() {
                    return Err(HermError::SchemaMismatch {
                        path: Utf8PathBuf::from(path),
                        expected: acc.product().map_or("none", |p| p.name()),
                        found: table.product().map_or("none", |p| p.name()),
                    });
                }
                acc.extend(table)?;
            }
        }
    }

    let sliced = merged
        .unwrap_or_else(|| Timeseries::new(Vec::new()))
        .slice_exclusive(time_range);

    info!(
        files = file_paths.len(),
        rows = sliced.len(),
        "merged MAG vector series"
    );
    Ok(sliced)
}
