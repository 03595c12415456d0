mod common;

use std::io::Write;

use approx::assert_relative_eq;
use camino::Utf8Path;
use common::data_path;
use hermrs::{
    parse_channel_series,
    spectrogram::{
        fips_energy_bin_edges,
        fips_reader::{parse_channel_series_with_layout, FipsLayout},
        NON_PROTON_FLUX,
    },
    time::parse_doy_timestamp,
    HermError, ScanMode, TimeRange,
};

fn window(start: &str, end: &str) -> TimeRange {
    TimeRange::new(
        parse_doy_timestamp(start).unwrap(),
        parse_doy_timestamp(end).unwrap(),
    )
}

#[test]
fn test_quality_filter_keeps_four_of_five() {
    let range = window("2011-152T00:00:00.000", "2011-153T00:00:00.000");
    let spec = parse_channel_series(&[data_path("FIPS_ESPEC_2011152_V2.TAB")], &range).unwrap();

    assert_eq!(spec.len(), 4);
    assert_eq!(spec.n_channels(), 63);
    assert_eq!(spec.energy_channels(), 0..63);

    let flagged = parse_doy_timestamp("2011-152T23:00:20.000").unwrap();
    assert!(!spec.times().contains(&flagged));
    assert_eq!(spec.proton_flux().nrows(), 4);
    assert_eq!(spec.total_event_flux().nrows(), 4);
    assert_eq!(
        spec.modes(),
        &[
            ScanMode::Normal,
            ScanMode::Normal,
            ScanMode::Burst,
            ScanMode::HighTemperature
        ]
    );
}

#[test]
fn test_non_proton_is_valid_minus_proton() {
    let range = window("2011-152T00:00:00.000", "2011-153T00:00:00.000");
    let spec = parse_channel_series(&[data_path("FIPS_ESPEC_2011152_V2.TAB")], &range).unwrap();

    // fixture: valid = 10·(c+1), proton = 4·(c+1), total = 12·(c+1)
    let non_proton = spec.variable(NON_PROTON_FLUX).unwrap();
    for c in spec.energy_channels() {
        let k = (c + 1) as f64;
        assert_relative_eq!(non_proton[(0, c)], 6.0 * k);
        assert_relative_eq!(spec.proton_flux()[(3, c)], 4.0 * k);
        assert_relative_eq!(spec.total_event_flux()[(1, c)], 12.0 * k);
    }
}

#[test]
fn test_merge_and_half_open_window() {
    let files = [
        data_path("FIPS_ESPEC_2011152_V2.TAB"),
        data_path("FIPS_ESPEC_2011153_V2.TAB"),
    ];
    let range = window("2011-152T23:00:10.000", "2011-153T00:00:10.000");
    let spec = parse_channel_series(&files, &range).unwrap();

    let expected = [
        "2011-152T23:00:10.000",
        "2011-152T23:00:30.000",
        "2011-152T23:00:40.000",
        "2011-153T00:00:00.000",
    ]
    .map(|t| parse_doy_timestamp(t).unwrap());
    assert_eq!(spec.times(), &expected);
}

#[test]
fn test_channel_axis_mismatch() {
    let files = [
        data_path("FIPS_ESPEC_2011152_V2.TAB"),
        data_path("FIPS_ESPEC_SHORT_AXIS.TAB"),
    ];
    let range = window("2011-152T00:00:00.000", "2011-154T00:00:00.000");
    let err = parse_channel_series(&files, &range).unwrap_err();

    assert_eq!(
        err,
        HermError::ChannelAxisMismatch {
            path: data_path("FIPS_ESPEC_SHORT_AXIS.TAB"),
            expected: 63,
            found: 10,
        }
    );
}

#[test]
fn test_custom_layout_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "0 2011-152T12:00:00.000 0 3 9.0 8.0 1.0 1.5 20.0 30.0").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "0 2011-152T12:00:10.000 0 0 7.0 6.0 2.0 2.5 20.0 30.0").unwrap();

    let layout = FipsLayout {
        flux_offset: 4,
        ..FipsLayout::default()
    };
    let path = Utf8Path::from_path(file.path()).unwrap();
    let range = window("2011-152T00:00:00.000", "2011-153T00:00:00.000");
    let spec = parse_channel_series_with_layout(&[path], &range, &layout).unwrap();

    assert_eq!(spec.len(), 2);
    assert_eq!(spec.n_channels(), 2);
    assert_eq!(spec.non_proton_flux()[(0, 0)], 8.0);
    assert_eq!(spec.non_proton_flux()[(1, 1)], 3.5);
    assert_eq!(spec.modes()[0], ScanMode::Test);
}

#[test]
fn test_energy_bin_edges_table() {
    let edges = fips_energy_bin_edges();
    assert_eq!(edges.len(), 64);
    assert_relative_eq!(edges[0], 13.5774);
    assert_relative_eq!(edges[63], 0.0087);
}
