//! # MESSENGER FIPS reader
//!
//! Parses Fast Imaging Plasma Spectrometer (FIPS) scan tables into a [`Spectrogram`].
//!
//! ## Field Layout
//! -----------------
//! Column positions come from [`FipsLayout`]; the instrument default is:
//! * `1` – scan time, `YYYY-DDDTHH:MM:SS.frac` (UTC)
//! * `2` – quality flag, non-zero marks a bad scan
//! * `3` – scan mode (see [`ScanMode`])
//! * `130..` – three consecutive blocks of equal width over the same energy-channel axis:
//!   valid-event flux, proton flux, total-event flux
//!
//! The block width (the channel-axis length) is derived from the row width, so every row of
//! every file merged in one call must agree on it.
//!
//! ## Processing
//! -----------------
//! 1. Scans with a non-zero quality flag are dropped from every per-row array.
//! 2. `Non-Proton Flux = valid-event flux − proton flux`, element-wise.
//! 3. Files are concatenated along time in the order given.
//! 4. The result is restricted to `[time_range.start, time_range.end)`.
use camino::Utf8Path;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    herm_errors::{HermError, ParseRowError},
    spectrogram::{ScanMode, Spectrogram},
    time::{parse_doy_timestamp, TimeRange},
};

/// Column positions of a FIPS scan table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FipsLayout {
    pub time_column: usize,
    pub quality_column: usize,
    pub mode_column: usize,
    /// First column of the valid-event flux block.
    pub flux_offset: usize,
}

impl Default for FipsLayout {
    fn default() -> Self {
        FipsLayout {
            time_column: 1,
            quality_column: 2,
            mode_column: 3,
            flux_offset: 130,
        }
    }
}

impl FipsLayout {
    /// Channel-axis length implied by a row of `width` columns.
    fn channels_for_width(&self, width: usize) -> Result<usize, ParseRowError> {
        let header = self
            .flux_offset
            .max(self.time_column + 1)
            .max(self.quality_column + 1)
            .max(self.mode_column + 1);
        let flux_width = width.saturating_sub(self.flux_offset);
        if width < header || flux_width < 3 {
            return Err(ParseRowError::TooFewColumns {
                expected: (self.flux_offset + 3).max(header),
                found: width,
            });
        }
        if flux_width % 3 != 0 {
            return Err(ParseRowError::UnevenFluxBlocks { found: flux_width });
        }
        Ok(flux_width / 3)
    }
}

/// Row-major accumulation of good scans, before the blocks become matrices.
#[derive(Debug, Default)]
struct ScanRows {
    n_channels: usize,
    times: Vec<hifitime::Epoch>,
    modes: Vec<ScanMode>,
    proton: Vec<f64>,
    non_proton: Vec<f64>,
    total: Vec<f64>,
}

impl ScanRows {
    fn append(&mut self, other: ScanRows) {
        self.times.extend(other.times);
        self.modes.extend(other.modes);
        self.proton.extend(other.proton);
        self.non_proton.extend(other.non_proton);
        self.total.extend(other.total);
    }

    fn into_spectrogram(self) -> Spectrogram {
        let (rows, cols) = (self.times.len(), self.n_channels);
        Spectrogram::new(
            self.times,
            DMatrix::from_row_slice(rows, cols, &self.proton),
            DMatrix::from_row_slice(rows, cols, &self.non_proton),
            DMatrix::from_row_slice(rows, cols, &self.total),
            self.modes,
        )
    }
}

fn parse_f64(cell: &str) -> Result<f64, ParseRowError> {
    cell.parse::<f64>()
        .map_err(|_| ParseRowError::InvalidNumber(cell.to_string()))
}

fn parse_int(cell: &str) -> Result<i64, ParseRowError> {
    cell.parse::<i64>()
        .map_err(|_| ParseRowError::InvalidNumber(cell.to_string()))
}

fn read_scan_rows(
    path: &Utf8Path,
    content: &str,
    layout: &FipsLayout,
) -> Result<ScanRows, HermError> {
    let parse_err = |line: usize, reason: ParseRowError| HermError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut scans = ScanRows::default();
    let mut width = None;
    let mut dropped = 0usize;

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.is_empty() {
            continue;
        }

        let expected = match width {
            Some(w) => w,
            None => {
                scans.n_channels = layout
                    .channels_for_width(cells.len())
                    .map_err(|e| parse_err(line_no, e))?;
                width = Some(cells.len());
                cells.len()
            }
        };
        if cells.len() != expected {
            return Err(parse_err(
                line_no,
                ParseRowError::RaggedRow {
                    expected,
                    found: cells.len(),
                },
            ));
        }

        let quality = parse_int(cells[layout.quality_column]).map_err(|e| parse_err(line_no, e))?;
        if quality != 0 {
            dropped += 1;
            continue;
        }

        let time_cell = cells[layout.time_column];
        let time = parse_doy_timestamp(time_cell).map_err(|_| {
            parse_err(line_no, ParseRowError::InvalidTime(time_cell.to_string()))
        })?;
        let mode = parse_int(cells[layout.mode_column])
            .map(ScanMode::from)
            .map_err(|e| parse_err(line_no, e))?;

        let n = scans.n_channels;
        let block = |k: usize| -> Result<Vec<f64>, HermError> {
            let start = layout.flux_offset + k * n;
            cells[start..start + n]
                .iter()
                .map(|c| parse_f64(c).map_err(|e| parse_err(line_no, e)))
                .collect()
        };
        let valid = block(0)?;
        let proton = block(1)?;
        let total = block(2)?;

        scans.times.push(time);
        scans.modes.push(mode);
        scans
            .non_proton
            .extend(valid.iter().zip(&proton).map(|(v, p)| v - p));
        scans.proton.extend(proton);
        scans.total.extend(total);
    }

    debug!(
        %path,
        scans = scans.times.len(),
        dropped,
        channels = scans.n_channels,
        "parsed FIPS file"
    );
    Ok(scans)
}

/// Read one FIPS file with an explicit layout, without time restriction.
pub fn read_fips_file(path: &Utf8Path, layout: &FipsLayout) -> Result<Spectrogram, HermError> {
    let content = std::fs::read_to_string(path)?;
    Ok(read_scan_rows(path, &content, layout)?.into_spectrogram())
}

/// [`parse_channel_series`] with a caller-supplied column layout.
pub fn parse_channel_series_with_layout<P: AsRef<Utf8Path>>(
    file_paths: &[P],
    time_range: &TimeRange,
    layout: &FipsLayout,
) -> Result<Spectrogram, HermError> {
    let mut merged: Option<ScanRows> = None;

    for path in file_paths {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let scans = read_scan_rows(path, &content, layout)?;
        if scans.n_channels == 0 {
            // blank file: no row fixed a channel axis
            continue;
        }

        match merged.as_mut() {
            None => merged = Some(scans),
            Some(acc) => {
                if acc.n_channels != scans.n_channels {
                    return Err(HermError::ChannelAxisMismatch {
                        path: path.to_path_buf(),
                        expected: acc.n_channels,
                        found: scans.n_channels,
                    });
                }
                acc.append(scans);
            }
        }
    }

    let spectrogram = merged
        .unwrap_or_default()
        .into_spectrogram()
        .select_time(time_range);

    info!(
        files = file_paths.len(),
        scans = spectrogram.len(),
        channels = spectrogram.n_channels(),
        "merged FIPS channel series"
    );
    Ok(spectrogram)
}

/// Parse MESSENGER FIPS files into a single spectrogram restricted to a time window.
///
/// Arguments
/// -----------------
/// * `file_paths`: local FIPS scan tables, in chronological order.
/// * `time_range`: window of interest, half-open: `[start, end)`.
///
/// Return
/// ----------
/// * The merged [`Spectrogram`], or the first error met. A channel-axis length that differs
///   between files fails with [`HermError::ChannelAxisMismatch`].
pub fn parse_channel_series<P: AsRef<Utf8Path>>(
    file_paths: &[P],
    time_range: &TimeRange,
) -> Result<Spectrogram, HermError> {
    parse_channel_series_with_layout(file_paths, time_range, &FipsLayout::default())
}
