//! # Aberrated-frame rotation
//!
//! Rotates Cartesian vector columns of a [`Timeseries`] about the Z axis by the per-date
//! solar-wind aberration angle, producing the *aberrated* MSO/MSM frames in which the
//! X axis points into the apparent solar-wind flow.
//!
//! ```text
//!        | cos θ  −sin θ  0 |
//! R(θ) = | sin θ   cos θ  0 |
//!        |   0       0    1 |
//! ```
//!
//! ## Output fields
//! -----------------
//! For each vector group in [`ROTATION_GROUPS`] whose three fields are all present, three
//! columns named `<field>'` are appended with the source unit. An
//! [`ABERRATION_ANGLE`] column (rad) always follows. Every appended value is rounded to
//! three decimals. The input dataset is left untouched.
//!
//! ## See also
//! ------------
//! * [`crate::aberration::AberrationModel`] – Source of the per-row angles.
use itertools::izip;
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{
    aberration::AberrationModel,
    constants::Radian,
    ephemeris::EphemerisProvider,
    herm_errors::HermError,
    timeseries::{Column, Timeseries},
    units::Unit,
};

/// Vector groups eligible for rotation, in output order.
pub const ROTATION_GROUPS: [[&str; 3]; 3] = [
    ["X MSO", "Y MSO", "Z MSO"],
    ["X MSM", "Y MSM", "Z MSM"],
    ["Bx", "By", "Bz"],
];

/// Suffix marking a rotated field.
pub const ROTATED_SUFFIX: &str = "'";

/// Name of the angle column appended by the rotation.
pub const ABERRATION_ANGLE: &str = "Aberration Angle";

const OUTPUT_DECIMALS: i32 = 3;

/// Rotation matrix about Z by `angle` radians.
pub fn aberration_rotation(angle: Radian) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle).into()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn rotated_name(field: &str) -> String {
    format!("{field}{ROTATED_SUFFIX}")
}

/// Rotate the vector groups of `dataset` by caller-supplied per-row angles.
///
/// Arguments
/// -----------------
/// * `dataset`: the source time series; never modified.
/// * `angles`: one angle per row, in radians.
///
/// Return
/// ----------
/// * A copy of `dataset` with the rotated columns and the angle column appended, or
///   [`HermError::LengthMismatch`] when `angles` does not match the row count.
pub fn rotate_columns(dataset: &Timeseries, angles: &[Radian]) -> Result<Timeseries, HermError> {
    if angles.len() != dataset.len() {
        return Err(HermError::LengthMismatch {
            expected: dataset.len(),
            found: angles.len(),
        });
    }

    let rotations: Vec<Matrix3<f64>> = angles.iter().map(|a| aberration_rotation(*a)).collect();
    let mut rotated = dataset.clone();

    for group in ROTATION_GROUPS {
        let (Some(x), Some(y), Some(z)) = (
            dataset.column(group[0]),
            dataset.column(group[1]),
            dataset.column(group[2]),
        ) else {
            continue;
        };

        let mut out = [
            Vec::with_capacity(dataset.len()),
            Vec::with_capacity(dataset.len()),
            Vec::with_capacity(dataset.len()),
        ];
        for (r, vx, vy, vz) in izip!(&rotations, &x.values, &y.values, &z.values) {
            let v = r * Vector3::new(*vx, *vy, *vz);
            for (axis, component) in out.iter_mut().zip(v.iter()) {
                axis.push(round_to(*component, OUTPUT_DECIMALS));
            }
        }

        for (source, values) in [x, y, z].into_iter().zip(out) {
            rotated.push_column(Column::new(rotated_name(&source.name), source.unit, values))?;
        }
    }

    rotated.push_column(Column::new(
        ABERRATION_ANGLE,
        Unit::Radian,
        angles.iter().map(|a| round_to(*a, OUTPUT_DECIMALS)).collect(),
    ))?;
    Ok(rotated)
}

/// Rotate `dataset` into the aberrated frame, one angle per row from its calendar date.
///
/// `time_field` must name the dataset's time axis, otherwise the call fails with
/// [`HermError::MissingField`]. Ephemeris and vis-viva failures propagate unchanged.
pub fn rotate_to_aberrated<P: EphemerisProvider>(
    dataset: &Timeseries,
    time_field: &str,
    model: &AberrationModel<P>,
) -> Result<Timeseries, HermError> {
    if time_field != dataset.time_name() {
        return Err(HermError::MissingField(time_field.to_string()));
    }
    let angles = model.aberration_angles(dataset.times())?;
    rotate_columns(dataset, &angles)
}

#[cfg(test)]
mod rotation_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hifitime::{Epoch, Unit as TimeUnit};
    use std::f64::consts::FRAC_PI_2;

    fn sample() -> Timeseries {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2011, 6, 1);
        let times: Vec<Epoch> = (0..3i64).map(|i| t0 + TimeUnit::Second * i).collect();
        Timeseries::new(times)
            .with_column("X MSO", Unit::Kilometer, vec![1000.0, -250.5, 0.0])
            .unwrap()
            .with_column("Y MSO", Unit::Kilometer, vec![0.0, 120.25, 3.0])
            .unwrap()
            .with_column("Z MSO", Unit::Kilometer, vec![5.0, 6.0, 7.0])
            .unwrap()
            .with_column("Bx", Unit::NanoTesla, vec![10.1234, -3.0, 0.0])
            .unwrap()
            .with_column("By", Unit::NanoTesla, vec![20.0, 4.5, 1.0])
            .unwrap()
            .with_column("Bz", Unit::NanoTesla, vec![-5.0, 0.0, 2.0])
            .unwrap()
    }

    #[test]
    fn test_rotation_matrix() {
        let r = aberration_rotation(FRAC_PI_2);
        let v = r * Vector3::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(v, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-15);
        assert_eq!(aberration_rotation(0.0), Matrix3::identity());
    }

    #[test]
    fn test_zero_angle_is_identity() {
        let ts = sample();
        let rotated = rotate_columns(&ts, &[0.0; 3]).unwrap();

        for group in ROTATION_GROUPS.iter().filter(|g| g[0] != "X MSM") {
            for field in group {
                let source = &ts.column(field).unwrap().values;
                let out = &rotated.column(&rotated_name(field)).unwrap().values;
                for (s, o) in source.iter().zip(out) {
                    assert_eq!(round_to(*s, 3), *o);
                }
            }
        }
        assert_eq!(
            rotated.column(ABERRATION_ANGLE).unwrap().values,
            vec![0.0; 3]
        );
    }

    #[test]
    fn test_round_trip() {
        let ts = sample();
        let theta = 0.123;
        let forward = rotate_columns(&ts, &[theta; 3]).unwrap();

        let mut primed = Timeseries::new(ts.times().to_vec());
        for field in ["Bx", "By", "Bz"] {
            let column = forward.column(&rotated_name(field)).unwrap();
            primed
                .push_column(Column::new(field, column.unit, column.values.clone()))
                .unwrap();
        }
        let back = rotate_columns(&primed, &[-theta; 3]).unwrap();

        for field in ["Bx", "By", "Bz"] {
            let original = &ts.column(field).unwrap().values;
            let restored = &back.column(&rotated_name(field)).unwrap().values;
            for (o, r) in original.iter().zip(restored) {
                assert_abs_diff_eq!(*o, *r, epsilon = 2e-3);
            }
        }
    }

    #[test]
    fn test_partial_group_skipped() {
        let ts = Timeseries::new(sample().times().to_vec())
            .with_column("Bx", Unit::NanoTesla, vec![1.0; 3])
            .unwrap()
            .with_column("By", Unit::NanoTesla, vec![1.0; 3])
            .unwrap();

        let rotated = rotate_columns(&ts, &[0.5; 3]).unwrap();
        let names: Vec<&str> = rotated.column_names().collect();
        assert_eq!(names, vec!["Bx", "By", ABERRATION_ANGLE]);
        assert_eq!(rotated.column(ABERRATION_ANGLE).unwrap().unit, Unit::Radian);
    }

    #[test]
    fn test_output_order_units_and_input_untouched() {
        let ts = sample();
        let before = ts.clone();
        let rotated = rotate_columns(&ts, &[0.1, 0.2, 0.3]).unwrap();

        assert_eq!(ts, before);
        let names: Vec<&str> = rotated.column_names().skip(6).collect();
        assert_eq!(
            names,
            vec!["X MSO'", "Y MSO'", "Z MSO'", "Bx'", "By'", "Bz'", ABERRATION_ANGLE]
        );
        assert_eq!(rotated.column("X MSO'").unwrap().unit, Unit::Kilometer);
        assert_eq!(rotated.column("Bz'").unwrap().values, vec![-5.0, 0.0, 2.0]);
    }

    #[test]
    fn test_angle_count_mismatch() {
        let err = rotate_columns(&sample(), &[0.1]).unwrap_err();
        assert_eq!(
            err,
            HermError::LengthMismatch {
                expected: 3,
                found: 1
            }
        );
    }
}
