#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use camino::Utf8PathBuf;
use hermrs::{
    ephemeris::{J2000, MERCURY, SUN},
    TabulatedEphemeris, Timeseries,
};

pub fn data_path(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Mercury heliocentric positions for 2011-06-01..=2011-06-05.
pub fn mercury_ephemeris() -> TabulatedEphemeris {
    TabulatedEphemeris::from_horizons_csv(
        &data_path("horizons_mercury_2011.csv"),
        MERCURY,
        J2000,
        SUN,
    )
    .expect("HORIZONS fixture should load")
}

pub fn assert_column_close(actual: &Timeseries, name: &str, expected: &[f64], epsilon: f64) {
    let column = actual
        .column(name)
        .unwrap_or_else(|| panic!("missing column {name}"));
    assert_eq!(column.values.len(), expected.len(), "length of {name}");
    for (a, e) in column.values.iter().zip(expected) {
        assert_abs_diff_eq!(*a, *e, epsilon = epsilon);
    }
}
