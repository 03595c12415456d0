//! # Channelized (time × channel) datasets
//!
//! [`Spectrogram`] holds FIPS flux blocks as [`DMatrix`] values indexed by
//! `(time sample, energy channel)`, plus the per-sample [`ScanMode`].
//!
//! The quality flag read from the raw files is consumed during construction (bad samples
//! are removed, not masked) and is not kept on the dataset.
use std::fmt;
use std::ops::Range;

use hifitime::Epoch;
use nalgebra::DMatrix;

use crate::{time::TimeRange, units::Unit};

pub mod fips_reader;

/// FIPS electrostatic-analyser stepping table in use for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanMode {
    Normal,
    HighTemperature,
    Burst,
    Test,
    Table4,
    Table5,
    Table6,
    Table7,
    /// Flag value outside the known stepping tables, kept as read.
    Other(i64),
}

impl From<i64> for ScanMode {
    fn from(value: i64) -> Self {
        match value {
            0 => ScanMode::Normal,
            1 => ScanMode::HighTemperature,
            2 => ScanMode::Burst,
            3 => ScanMode::Test,
            4 => ScanMode::Table4,
            5 => ScanMode::Table5,
            6 => ScanMode::Table6,
            7 => ScanMode::Table7,
            other => ScanMode::Other(other),
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanMode::Other(value) => return write!(f, "Mode {value}"),
            ScanMode::Normal => "Normal Scan",
            ScanMode::HighTemperature => "High Temp Scan",
            ScanMode::Burst => "Burst Scan",
            ScanMode::Test => "Test Scan",
            ScanMode::Table4 => "Table 4",
            ScanMode::Table5 => "Table 5",
            ScanMode::Table6 => "Table 6",
            ScanMode::Table7 => "Table 7",
        };
        f.write_str(name)
    }
}

/// Names of the flux variables held by a [`Spectrogram`].
pub const PROTON_FLUX: &str = "Proton Flux";
pub const NON_PROTON_FLUX: &str = "Non-Proton Flux";
pub const TOTAL_EVENT_FLUX: &str = "Total Event Flux";

#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    times: Vec<Epoch>,
    proton_flux: DMatrix<f64>,
    non_proton_flux: DMatrix<f64>,
    total_event_flux: DMatrix<f64>,
    modes: Vec<ScanMode>,
    unit: Unit,
}

impl Spectrogram {
    pub(crate) fn new(
        times: Vec<Epoch>,
        proton_flux: DMatrix<f64>,
        non_proton_flux: DMatrix<f64>,
        total_event_flux: DMatrix<f64>,
        modes: Vec<ScanMode>,
    ) -> Self {
        debug_assert_eq!(times.len(), proton_flux.nrows());
        debug_assert_eq!(times.len(), modes.len());
        Spectrogram {
            times,
            proton_flux,
            non_proton_flux,
            total_event_flux,
            modes,
            unit: Unit::DifferentialFlux,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn n_channels(&self) -> usize {
        self.proton_flux.ncols()
    }

    /// The `Energy Channel` coordinate: `0..n_channels`.
    pub fn energy_channels(&self) -> Range<usize> {
        0..self.n_channels()
    }

    pub fn times(&self) -> &[Epoch] {
        &self.times
    }

    pub fn modes(&self) -> &[ScanMode] {
        &self.modes
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn proton_flux(&self) -> &DMatrix<f64> {
        &self.proton_flux
    }

    pub fn non_proton_flux(&self) -> &DMatrix<f64> {
        &self.non_proton_flux
    }

    pub fn total_event_flux(&self) -> &DMatrix<f64> {
        &self.total_event_flux
    }

    /// Look a flux block up by its variable name.
    pub fn variable(&self, name: &str) -> Option<&DMatrix<f64>> {
        match name {
            PROTON_FLUX => Some(&self.proton_flux),
            NON_PROTON_FLUX => Some(&self.non_proton_flux),
            TOTAL_EVENT_FLUX => Some(&self.total_event_flux),
            _ => None,
        }
    }

    /// Keep the samples inside `[range.start, range.end)`.
    pub fn select_time(&self, range: &TimeRange) -> Spectrogram {
        let keep: Vec<usize> = self
            .times
            .iter()
            .enumerate()
            .filter_map(|(i, t)| range.contains_half_open(t).then_some(i))
            .collect();

        Spectrogram {
            times: keep.iter().map(|&i| self.times[i]).collect(),
            proton_flux: self.proton_flux.select_rows(keep.iter()),
            non_proton_flux: self.non_proton_flux.select_rows(keep.iter()),
            total_event_flux: self.total_event_flux.select_rows(keep.iter()),
            modes: keep.iter().map(|&i| self.modes[i]).collect(),
            unit: self.unit,
        }
    }
}

/// FIPS E/q calibration, one bin edge per energy channel, highest energy first.
///
/// Taken from the FIPA_E2014153CDR_V2 calibration file (column one) and assumed constant
/// across scan modes.
pub const FIPS_ENERGY_BIN_EDGES: [f64; 64] = [
    13.5774, 12.3322, 11.2011, 10.1738, 9.2407, 8.3930, 7.6233, 6.9243, 6.2892, 5.7121, 5.1884,
    4.7126, 4.2802, 3.8877, 3.5310, 3.2074, 2.9131, 2.6459, 2.4034, 2.1830, 1.9828, 1.8007,
    1.6358, 1.4855, 1.3493, 1.2255, 1.1133, 1.0110, 0.9184, 0.8343, 0.7576, 0.6880, 0.6251,
    0.5677, 0.5156, 0.4682, 0.4255, 0.3863, 0.3510, 0.3189, 0.2896, 0.2631, 0.2388, 0.2170,
    0.1970, 0.1789, 0.1627, 0.1478, 0.1340, 0.1219, 0.1107, 0.1004, 0.0851, 0.0729, 0.0611,
    0.0489, 0.0371, 0.0249, 0.0131, 0.0087, 0.0087, 0.0087, 0.0087, 0.0087,
];

/// Calibrated E/q bin edges (keV/e) for the 64 FIPS energy channels.
pub fn fips_energy_bin_edges() -> &'static [f64; 64] {
    &FIPS_ENERGY_BIN_EDGES
}
