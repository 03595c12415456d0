//! # Ephemeris access
//!
//! The trajectory ephemeris itself (kernel loading, interpolation) lives outside this crate
//! and is reached through the [`EphemerisProvider`] capability. [`EphemerisAdapter`] narrows
//! it down to the one query the aberration model needs: the heliocentric distance of the
//! planet on a calendar date.
//!
//! ## Conventions
//! -----------------
//! * Positions are Cartesian, in **kilometers**.
//! * Queries are issued at **midnight UTC** of the requested date; the time of day of the
//!   caller's timestamp is irrelevant to the distance lookup.
//! * Frame `"J2000"`, observer `"SUN"`, target `"MERCURY"` unless configured otherwise.
//!
//! ## Errors
//! -----------------
//! A provider with no data for a date must return [`HermError::EphemerisUnavailable`]. The
//! adapter propagates it unchanged; it never substitutes a default distance.
use std::sync::Arc;

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{constants::Kilometer, herm_errors::HermError, time::CalendarDate};

pub mod tabulated;

pub const MERCURY: &str = "MERCURY";
pub const SUN: &str = "SUN";
pub const J2000: &str = "J2000";

/// Source of body positions, e.g. a SPICE kernel pool held by the host application.
pub trait EphemerisProvider {
    /// Position of `body` relative to `observer`, expressed in `frame`, at `epoch` (km).
    fn position_of(
        &self,
        body: &str,
        frame: &str,
        observer: &str,
        epoch: &Epoch,
    ) -> Result<Vector3<f64>, HermError>;
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn position_of(
        &self,
        body: &str,
        frame: &str,
        observer: &str,
        epoch: &Epoch,
    ) -> Result<Vector3<f64>, HermError> {
        (**self).position_of(body, frame, observer, epoch)
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for Arc<P> {
    fn position_of(
        &self,
        body: &str,
        frame: &str,
        observer: &str,
        epoch: &Epoch,
    ) -> Result<Vector3<f64>, HermError> {
        (**self).position_of(body, frame, observer, epoch)
    }
}

#[derive(Debug, Clone)]
pub struct EphemerisAdapter<P> {
    provider: P,
    body: String,
}

impl<P: EphemerisProvider> EphemerisAdapter<P> {
    /// Adapter for Mercury's heliocentric distance.
    pub fn new(provider: P) -> Self {
        Self::for_body(provider, MERCURY)
    }

    pub fn for_body(provider: P, body: impl Into<String>) -> Self {
        EphemerisAdapter {
            provider,
            body: body.into(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Distance from the Sun to the body on the calendar date of `date`.
    ///
    /// Arguments
    /// -----------------
    /// * `date`: a [`CalendarDate`] or an [`Epoch`] (only its UTC date is used).
    ///
    /// Return
    /// ----------
    /// * The Euclidean norm of the heliocentric J2000 position, in km.
    pub fn heliocentric_distance(
        &self,
        date: impl Into<CalendarDate>,
    ) -> Result<Kilometer, HermError> {
        let date = date.into();
        let position = self
            .provider
            .position_of(&self.body, J2000, SUN, &date.midnight_utc())?;
        Ok(position.norm())
    }

    /// [`EphemerisAdapter::heliocentric_distance`] for each input, in input order.
    pub fn heliocentric_distances<D>(&self, dates: &[D]) -> Result<Vec<Kilometer>, HermError>
    where
        D: Into<CalendarDate> + Copy,
    {
        dates
            .iter()
            .map(|d| self.heliocentric_distance(*d))
            .collect()
    }
}
