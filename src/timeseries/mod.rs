//! # Unit-tagged vector time series
//!
//! [`Timeseries`] is the unified dataset produced by the MAG reader: a UTC time axis and an
//! ordered list of named [`Column`]s, each tagged with the [`Unit`] it was built with.
//!
//! ## Overview
//! -----------------
//! - [`MagProduct`] is the schema discriminant, chosen once per parse call from the raw
//!   column count and carried on the dataset.
//! - Every transform in this crate (slicing, rotation, derived fields) returns a **new**
//!   [`Timeseries`]; the input is never mutated.
//! - Row order is the file order. Merging concatenates, so duplicate timestamps coming from
//!   overlapping files are kept.
//!
//! ## See also
//! ------------
//! * [`mag_reader::parse_vector_series`] – Builds a [`Timeseries`] from MAG files.
//! * [`crate::rotation::rotate_to_aberrated`] – Adds rotated vector columns.
//! * [`crate::derived::add_vector_magnitude`] – Adds a magnitude column.
use std::collections::BTreeMap;

use hifitime::Epoch;

use crate::{herm_errors::HermError, time::TimeRange, units::Unit};

pub mod mag_reader;

/// Name of the time axis of every dataset built by this crate.
pub const TIME_AXIS: &str = "UTC";

/// Schema variant of a MESSENGER MAG product, keyed by raw column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagProduct {
    /// Instantaneous samples: 12 raw columns.
    FullCadence,
    /// Window-averaged samples: 16 raw columns.
    Averaged,
}

const FULL_CADENCE_SCHEMA: [(usize, &str, Unit); 6] = [
    (6, "X MSO", Unit::Kilometer),
    (7, "Y MSO", Unit::Kilometer),
    (8, "Z MSO", Unit::Kilometer),
    (9, "Bx", Unit::NanoTesla),
    (10, "By", Unit::NanoTesla),
    (11, "Bz", Unit::NanoTesla),
];

const AVERAGED_SCHEMA: [(usize, &str, Unit); 10] = [
    (6, "N Observations", Unit::Count),
    (7, "X MSO", Unit::Kilometer),
    (8, "Y MSO", Unit::Kilometer),
    (9, "Z MSO", Unit::Kilometer),
    (10, "Bx", Unit::NanoTesla),
    (11, "By", Unit::NanoTesla),
    (12, "Bz", Unit::NanoTesla),
    (13, "SD(Bx)", Unit::NanoTesla),
    (14, "SD(By)", Unit::NanoTesla),
    (15, "SD(Bz)", Unit::NanoTesla),
];

const AVERAGED_NOTE: &str = "This is an averaged data product. Several observations within a \
window of time are averaged, with their mean recorded as Bx, By, Bz, and their standard \
deviation as SD(Bx), etc. UTC marks the centre time of that window, and N Observations details \
the number of observations in that window.";

impl MagProduct {
    pub fn from_column_count(columns: usize) -> Option<Self> {
        match columns {
            12 => Some(MagProduct::FullCadence),
            16 => Some(MagProduct::Averaged),
            _ => None,
        }
    }

    pub fn column_count(&self) -> usize {
        match self {
            MagProduct::FullCadence => 12,
            MagProduct::Averaged => 16,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MagProduct::FullCadence => "full cadence",
            MagProduct::Averaged => "averaged",
        }
    }

    /// Raw column index, output field name and unit of every data field.
    pub fn schema(&self) -> &'static [(usize, &'static str, Unit)] {
        match self {
            MagProduct::FullCadence => &FULL_CADENCE_SCHEMA,
            MagProduct::Averaged => &AVERAGED_SCHEMA,
        }
    }

    pub fn note(&self) -> Option<&'static str> {
        match self {
            MagProduct::FullCadence => None,
            MagProduct::Averaged => Some(AVERAGED_NOTE),
        }
    }
}

/// A named, unit-tagged column of scalar values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub unit: Unit,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, unit: Unit, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            unit,
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeseries {
    time_name: String,
    times: Vec<Epoch>,
    columns: Vec<Column>,
    product: Option<MagProduct>,
    metadata: BTreeMap<String, String>,
}

impl Timeseries {
    /// An empty-schema dataset over the given time axis.
    pub fn new(times: Vec<Epoch>) -> Self {
        Timeseries {
            time_name: TIME_AXIS.to_string(),
            times,
            columns: Vec::new(),
            product: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style [`Timeseries::push_column`].
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        unit: Unit,
        values: Vec<f64>,
    ) -> Result<Self, HermError> {
        self.push_column(Column::new(name, unit, values))?;
        Ok(self)
    }

    /// Append a column, or replace an existing column of the same name in place.
    pub fn push_column(&mut self, column: Column) -> Result<(), HermError> {
        if column.values.len() != self.times.len() {
            return Err(HermError::LengthMismatch {
                expected: self.times.len(),
                found: column.values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    pub(crate) fn set_product(&mut self, product: MagProduct) {
        self.product = Some(product);
        if let Some(note) = product.note() {
            self.metadata.insert("Notes".to_string(), note.to_string());
        }
    }

    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn time_name(&self) -> &str {
        &self.time_name
    }

    pub fn times(&self) -> &[Epoch] {
        &self.times
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Like [`Timeseries::column`] but missing names are an error.
    pub fn require_column(&self, name: &str) -> Result<&Column, HermError> {
        self.column(name)
            .ok_or_else(|| HermError::MissingField(name.to_string()))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn product(&self) -> Option<MagProduct> {
        self.product
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Keep the rows whose timestamp satisfies `keep`, preserving order.
    pub fn filter_rows<F>(&self, keep: F) -> Timeseries
    where
        F: Fn(&Epoch) -> bool,
    {
        let mask: Vec<bool> = self.times.iter().map(keep).collect();
        let select = |values: &[f64]| -> Vec<f64> {
            values
                .iter()
                .zip(&mask)
                .filter_map(|(v, &m)| m.then_some(*v))
                .collect()
        };

        Timeseries {
            time_name: self.time_name.clone(),
            times: self
                .times
                .iter()
                .zip(&mask)
                .filter_map(|(t, &m)| m.then_some(*t))
                .collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.unit, select(&c.values)))
                .collect(),
            product: self.product,
            metadata: self.metadata.clone(),
        }
    }

    /// Rows strictly inside `(range.start, range.end)`.
    pub fn slice_exclusive(&self, range: &TimeRange) -> Timeseries {
        self.filter_rows(|t| range.contains_exclusive(t))
    }

    /// Append the rows of `other` after the rows of `self`.
    ///
    /// Both datasets must carry the same field names, in the same order, with the same units.
    pub fn extend(&mut self, other: Timeseries) -> Result<(), HermError> {
        if self.columns.len() != other.columns.len() {
            return Err(HermError::LengthMismatch {
                expected: self.columns.len(),
                found: other.columns.len(),
            });
        }
        for (mine, theirs) in self.columns.iter().zip(&other.columns) {
            if mine.name != theirs.name {
                return Err(HermError::MissingField(mine.name.clone()));
            }
            if mine.unit != theirs.unit {
                return Err(HermError::IncompatibleUnits(vec![mine.unit, theirs.unit]));
            }
        }

        self.times.extend(other.times);
        for (mine, theirs) in self.columns.iter_mut().zip(other.columns) {
            mine.values.extend(theirs.values);
        }
        for (key, value) in other.metadata {
            self.metadata.entry(key).or_insert(value);
        }
        Ok(())
    }
}
