//! Unit tags carried by every dataset column.
//!
//! Columns keep the unit they were built with through every transform, so that a
//! downstream consumer (see [`crate::panels`]) can refuse to mix incompatible quantities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical dimension shared by a family of units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    MagneticField,
    Angle,
    DifferentialFlux,
    Dimensionless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Kilometer,
    Meter,
    NanoTesla,
    Radian,
    Degree,
    /// counts / (s · (keV/e) · cm² · sr)
    DifferentialFlux,
    /// Plain count, e.g. the number of samples inside an averaging window
    Count,
}

impl Unit {
    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Kilometer | Unit::Meter => Dimension::Length,
            Unit::NanoTesla => Dimension::MagneticField,
            Unit::Radian | Unit::Degree => Dimension::Angle,
            Unit::DifferentialFlux => Dimension::DifferentialFlux,
            Unit::Count => Dimension::Dimensionless,
        }
    }

    /// Two units are equivalent when one converts to the other by a scale factor.
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.dimension() == other.dimension()
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Kilometer => "km",
            Unit::Meter => "m",
            Unit::NanoTesla => "nT",
            Unit::Radian => "rad",
            Unit::Degree => "deg",
            Unit::DifferentialFlux => "1 / (cm2 s sr keV/e)",
            Unit::Count => "",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
