//! Fields computed from existing columns of a [`Timeseries`].
use crate::{
    constants::{DIPOLE_OFFSET, METERS_PER_KM},
    herm_errors::HermError,
    timeseries::{Column, Timeseries},
    units::Unit,
};

const MSO_POSITION: [&str; 3] = ["X MSO", "Y MSO", "Z MSO"];
const MSM_POSITION: [&str; 3] = ["X MSM", "Y MSM", "Z MSM"];

/// Name of a magnitude column: `|P|` for the common prefix `P` of the component names,
/// or the names joined by commas when they share no prefix.
fn magnitude_name(components: &[&str]) -> String {
    let first = components[0];
    let mut prefix_len = first.len();
    for name in &components[1..] {
        prefix_len = first
            .char_indices()
            .zip(name.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map_or(0, |((i, a), _)| i + a.len_utf8())
            .min(prefix_len);
    }

    let prefix = first[..prefix_len].trim();
    if components.len() > 1 && !prefix.is_empty() {
        format!("|{prefix}|")
    } else {
        format!("|{}|", components.join(", "))
    }
}

/// Append the Euclidean norm of `components` as a new column.
///
/// Arguments
/// -----------------
/// * `dataset`: source time series; never modified.
/// * `components`: names of the vector components, all in the same unit.
///
/// Return
/// ----------
/// * A copy of `dataset` with the magnitude column appended in the component unit.
///
/// Errors
/// -----------------
/// * [`HermError::EmptyComponents`] if `components` is empty.
/// * [`HermError::MissingField`] if a component is not a column of `dataset`.
/// * [`HermError::IncompatibleUnits`] if the components do not share one unit.
pub fn add_vector_magnitude(
    dataset: &Timeseries,
    components: &[&str],
) -> Result<Timeseries, HermError> {
    if components.is_empty() {
        return Err(HermError::EmptyComponents);
    }
    let columns = components
        .iter()
        .map(|name| dataset.require_column(name))
        .collect::<Result<Vec<&Column>, _>>()?;

    let unit = columns[0].unit;
    if columns.iter().any(|c| c.unit != unit) {
        return Err(HermError::IncompatibleUnits(
            columns.iter().map(|c| c.unit).collect(),
        ));
    }

    let magnitude = (0..dataset.len())
        .map(|row| {
            columns
                .iter()
                .map(|c| c.values[row].powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .collect();

    let mut out = dataset.clone();
    out.push_column(Column::new(magnitude_name(components), unit, magnitude))?;
    Ok(out)
}

/// Append the spacecraft position in Mercury Solar Magnetospheric (MSM) coordinates.
///
/// MSM shares the MSO axes with its origin moved north onto the internal dipole centre,
/// so only Z changes: `Z MSM = Z MSO − DIPOLE_OFFSET`. The MSO columns must be lengths;
/// metre columns are converted so the offset is applied in the column's own unit.
pub fn add_msm_position(dataset: &Timeseries) -> Result<Timeseries, HermError> {
    let mut out = dataset.clone();
    for (mso, msm) in MSO_POSITION.iter().zip(MSM_POSITION) {
        let column = dataset.require_column(mso)?;
        let offset = match column.unit {
            Unit::Kilometer => DIPOLE_OFFSET,
            Unit::Meter => DIPOLE_OFFSET * METERS_PER_KM,
            other => return Err(HermError::IncompatibleUnits(vec![Unit::Kilometer, other])),
        };
        let values = if msm == "Z MSM" {
            column.values.iter().map(|z| z - offset).collect()
        } else {
            column.values.clone()
        };
        out.push_column(Column::new(msm, column.unit, values))?;
    }
    Ok(out)
}

#[cfg(test)]
mod derived_test {
    use super::*;
    use hifitime::{Epoch, Unit as TimeUnit};

    fn field(bx: Vec<f64>, by: Vec<f64>, bz: Vec<f64>) -> Timeseries {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2011, 6, 1);
        let times = (0..bx.len() as i64)
            .map(|i| t0 + TimeUnit::Second * i)
            .collect();
        Timeseries::new(times)
            .with_column("Bx", Unit::NanoTesla, bx)
            .unwrap()
            .with_column("By", Unit::NanoTesla, by)
            .unwrap()
            .with_column("Bz", Unit::NanoTesla, bz)
            .unwrap()
    }

    #[test]
    fn test_magnitude_values() {
        let ts = field(vec![3.0, 0.0, 1.0], vec![4.0, 0.0, 2.0], vec![0.0, 0.0, 2.0]);
        let out = add_vector_magnitude(&ts, &["Bx", "By", "Bz"]).unwrap();

        let magnitude = out.column("|B|").unwrap();
        assert_eq!(magnitude.values, vec![5.0, 0.0, 3.0]);
        assert_eq!(magnitude.unit, Unit::NanoTesla);
        assert!(!ts.has_column("|B|"));
    }

    #[test]
    fn test_magnitude_name() {
        assert_eq!(magnitude_name(&["Bx", "By", "Bz"]), "|B|");
        assert_eq!(magnitude_name(&["X MSO", "Y MSO", "Z MSO"]), "|X MSO, Y MSO, Z MSO|");
        assert_eq!(magnitude_name(&["Bx'", "By'", "Bz'"]), "|B|");
        assert_eq!(magnitude_name(&["Bx"]), "|Bx|");
    }

    #[test]
    fn test_msm_position() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2011, 6, 1);
        let ts = Timeseries::new(vec![t0, t0 + TimeUnit::Second * 1i64])
            .with_column("X MSO", Unit::Kilometer, vec![100.0, 200.0])
            .unwrap()
            .with_column("Y MSO", Unit::Kilometer, vec![-5.0, 5.0])
            .unwrap()
            .with_column("Z MSO", Unit::Kilometer, vec![479.0, 1000.0])
            .unwrap();

        let out = add_msm_position(&ts).unwrap();
        assert_eq!(out.column("X MSM").unwrap().values, vec![100.0, 200.0]);
        assert_eq!(out.column("Y MSM").unwrap().values, vec![-5.0, 5.0]);
        assert_eq!(out.column("Z MSM").unwrap().values, vec![0.0, 521.0]);
        assert_eq!(out.column("Z MSM").unwrap().unit, Unit::Kilometer);

        let no_position = field(vec![1.0], vec![1.0], vec![1.0]);
        assert_eq!(
            add_msm_position(&no_position).unwrap_err(),
            HermError::MissingField("X MSO".to_string())
        );
    }

    #[test]
    fn test_magnitude_errors() {
        let ts = field(vec![1.0], vec![1.0], vec![1.0]);
        assert_eq!(
            add_vector_magnitude(&ts, &[]).unwrap_err(),
            HermError::EmptyComponents
        );
        assert_eq!(
            add_vector_magnitude(&ts, &["Bx", "Bw"]).unwrap_err(),
            HermError::MissingField("Bw".to_string())
        );

        let mixed = ts
            .with_column("X MSO", Unit::Kilometer, vec![1.0])
            .unwrap();
        assert_eq!(
            add_vector_magnitude(&mixed, &["Bx", "X MSO"]).unwrap_err(),
            HermError::IncompatibleUnits(vec![Unit::NanoTesla, Unit::Kilometer])
        );
    }
}
