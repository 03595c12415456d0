//! # hermrs
//!
//! Readers and frame transforms for MESSENGER observations at Mercury.
//!
//! * [`timeseries::mag_reader::parse_vector_series`] – MAG vector tables into a [`Timeseries`].
//! * [`spectrogram::fips_reader::parse_channel_series`] – FIPS scans into a [`Spectrogram`].
//! * [`aberration::AberrationModel`] – per-date solar-wind aberration angle, memoized.
//! * [`rotation::rotate_to_aberrated`] – rotation of vector columns into the aberrated frame.
//! * [`derived::add_vector_magnitude`] – Euclidean norm of a set of components.
//! * [`panels`] – unit-checked panel layout for plotting front-ends.
pub mod aberration;
pub mod constants;
pub mod derived;
pub mod ephemeris;
pub mod herm_errors;
pub mod panels;
pub mod rotation;
pub mod spectrogram;
pub mod time;
pub mod timeseries;
pub mod units;

pub use aberration::{AberrationCache, AberrationModel, AberrationParams};
pub use ephemeris::{tabulated::TabulatedEphemeris, EphemerisAdapter, EphemerisProvider};
pub use herm_errors::HermError;
pub use spectrogram::{fips_reader::parse_channel_series, ScanMode, Spectrogram};
pub use time::{CalendarDate, TimeRange};
pub use timeseries::{mag_reader::parse_vector_series, MagProduct, Timeseries};
pub use units::Unit;
