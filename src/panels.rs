//! # Panel layout
//!
//! Data-only description of stacked plot panels sharing a time axis. No drawing happens
//! here: a panel records *what* to show and guarantees that it can be shown on a single
//! y axis.
//!
//! * [`TimeseriesPanel`] – line traces; all columns must share one physical dimension.
//! * [`SpectrogramPanel`] – one flux block of a [`Spectrogram`] over its channel axis.
//! * [`MultiPanel`] – an ordered, flat list of panels.
//!
//! ```rust, ignore
//! let layout = MultiPanel::from(field_panel)
//!     .append_panel(position_panel)
//!     .append_panel(flux_panel);
//! assert_eq!(layout.len(), 3);
//! ```
use hifitime::Epoch;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{
    herm_errors::HermError,
    spectrogram::Spectrogram,
    timeseries::{Column, Timeseries},
    units::Unit,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TimeseriesPanel {
    times: Vec<Epoch>,
    traces: Vec<Column>,
    unit: Unit,
}

impl TimeseriesPanel {
    /// Select `columns` of `dataset` as the traces of one panel.
    ///
    /// Errors
    /// -----------------
    /// * [`HermError::EmptyComponents`] when `columns` is empty.
    /// * [`HermError::MissingField`] when a name is not a column of `dataset`.
    /// * [`HermError::IncompatibleUnits`] when two columns differ in physical dimension.
    pub fn new(dataset: &Timeseries, columns: &[&str]) -> Result<Self, HermError> {
        let traces = columns
            .iter()
            .map(|name| dataset.require_column(name).cloned())
            .collect::<Result<Vec<Column>, _>>()?;

        let unit = traces.first().ok_or(HermError::EmptyComponents)?.unit;
        if traces.iter().any(|t| !t.unit.is_equivalent(&unit)) {
            return Err(HermError::IncompatibleUnits(
                traces.iter().map(|t| t.unit).collect(),
            ));
        }

        Ok(TimeseriesPanel {
            times: dataset.times().to_vec(),
            traces,
            unit,
        })
    }

    pub fn times(&self) -> &[Epoch] {
        &self.times
    }

    pub fn traces(&self) -> &[Column] {
        &self.traces
    }

    /// Unit of the first trace, used for the axis label.
    pub fn unit(&self) -> Unit {
        self.unit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisScale {
    Linear,
    #[default]
    Log,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramPanel {
    variable: String,
    times: Vec<Epoch>,
    values: DMatrix<f64>,
    unit: Unit,
    y_bin_edges: Vec<f64>,
    y_scale: AxisScale,
    color_range: (Option<f64>, Option<f64>),
}

impl SpectrogramPanel {
    /// Panel over the `variable` block of `spectrogram`, with one unit-wide bin per channel.
    pub fn new(spectrogram: &Spectrogram, variable: &str) -> Result<Self, HermError> {
        let values = spectrogram
            .variable(variable)
            .ok_or_else(|| HermError::MissingField(variable.to_string()))?;

        Ok(SpectrogramPanel {
            variable: variable.to_string(),
            times: spectrogram.times().to_vec(),
            values: values.clone(),
            unit: spectrogram.unit(),
            y_bin_edges: (0..=spectrogram.n_channels()).map(|c| c as f64).collect(),
            y_scale: AxisScale::default(),
            color_range: (None, None),
        })
    }

    /// Replace the channel bin edges, e.g. with calibrated energies.
    ///
    /// At least one edge per channel plus one is required, so the 64-entry FIPS
    /// calibration table fits a 63-channel spectrogram.
    pub fn with_bin_edges(mut self, edges: &[f64]) -> Result<Self, HermError> {
        if edges.len() < self.values.ncols() + 1 {
            return Err(HermError::LengthMismatch {
                expected: self.values.ncols() + 1,
                found: edges.len(),
            });
        }
        self.y_bin_edges = edges.to_vec();
        Ok(self)
    }

    pub fn with_scale(mut self, scale: AxisScale) -> Self {
        self.y_scale = scale;
        self
    }

    pub fn with_color_range(mut self, vmin: Option<f64>, vmax: Option<f64>) -> Self {
        self.color_range = (vmin, vmax);
        self
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn times(&self) -> &[Epoch] {
        &self.times
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn y_bin_edges(&self) -> &[f64] {
        &self.y_bin_edges
    }

    pub fn y_scale(&self) -> AxisScale {
        self.y_scale
    }

    pub fn color_range(&self) -> (Option<f64>, Option<f64>) {
        self.color_range
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Timeseries(TimeseriesPanel),
    Spectrogram(SpectrogramPanel),
}

impl From<TimeseriesPanel> for Panel {
    fn from(panel: TimeseriesPanel) -> Self {
        Panel::Timeseries(panel)
    }
}

impl From<SpectrogramPanel> for Panel {
    fn from(panel: SpectrogramPanel) -> Self {
        Panel::Spectrogram(panel)
    }
}

/// Ordered stack of panels sharing one time axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPanel {
    panels: Vec<Panel>,
}

impl MultiPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a panel, or every panel of another [`MultiPanel`], at the bottom.
    pub fn append_panel(mut self, other: impl Into<MultiPanel>) -> Self {
        self.panels.extend(other.into().panels);
        self
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

impl From<Panel> for MultiPanel {
    fn from(panel: Panel) -> Self {
        MultiPanel {
            panels: vec![panel],
        }
    }
}

impl From<TimeseriesPanel> for MultiPanel {
    fn from(panel: TimeseriesPanel) -> Self {
        Panel::from(panel).into()
    }
}

impl From<SpectrogramPanel> for MultiPanel {
    fn from(panel: SpectrogramPanel) -> Self {
        Panel::from(panel).into()
    }
}
