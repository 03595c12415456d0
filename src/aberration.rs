//! # Solar-wind aberration angle
//!
//! Mercury moves through the solar wind at tens of km/s, so in a planet-fixed frame the wind
//! appears to arrive slightly from the direction of orbital motion. The aberration angle
//! approximates that shift from the orbital speed and an assumed mean wind speed:
//!
//! ```text
//! v = sqrt(G·M☉ · (2/r − 1/a))      (vis-viva)
//! θ = atan(v / v_sw)
//! ```
//!
//! where `r` is the heliocentric distance on the date, read from the ephemeris.
//!
//! ## Caching
//! -----------------
//! The angle depends on the calendar date only. [`AberrationModel`] memoizes it per date in
//! an [`AberrationCache`], so a time series spanning one day costs one ephemeris lookup. The
//! cache is owned by the model through an [`Arc`], can be shared between models, and is
//! cleared under caller control.
//!
//! ## Errors
//! -----------------
//! * Ephemeris failures propagate as [`HermError::EphemerisUnavailable`].
//! * A negative (or non-finite) vis-viva radicand fails with [`HermError::VisVivaDomain`]
//!   instead of yielding NaN.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{
        Kilometer, MeterPerSecond, Radian, METERS_PER_KM, MERCURY_SEMI_MAJOR_AXIS, SOLAR_GM,
        SOLAR_WIND_SPEED_AVG,
    },
    ephemeris::{EphemerisAdapter, EphemerisProvider},
    herm_errors::HermError,
    time::CalendarDate,
};

/// Physical inputs of the aberration model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AberrationParams {
    /// Orbital semi-major axis, km
    pub semi_major_axis: Kilometer,
    /// Standard gravitational parameter of the central body, m³/s²
    pub gravitational_parameter: f64,
    /// Assumed mean solar-wind speed, m/s
    pub solar_wind_speed: MeterPerSecond,
}

impl Default for AberrationParams {
    fn default() -> Self {
        AberrationParams {
            semi_major_axis: MERCURY_SEMI_MAJOR_AXIS,
            gravitational_parameter: SOLAR_GM,
            solar_wind_speed: SOLAR_WIND_SPEED_AVG,
        }
    }
}

/// Orbital speed from the vis-viva relation.
///
/// Arguments
/// -----------------
/// * `distance`: heliocentric distance in km.
/// * `params`: semi-major axis and gravitational parameter.
///
/// Return
/// ----------
/// * The orbital speed in m/s, or [`HermError::VisVivaDomain`] when `2/r < 1/a`.
pub fn vis_viva_speed(
    distance: Kilometer,
    params: &AberrationParams,
) -> Result<MeterPerSecond, HermError> {
    let r = distance * METERS_PER_KM;
    let a = params.semi_major_axis * METERS_PER_KM;
    let radicand = params.gravitational_parameter * (2.0 / r - 1.0 / a);

    if !radicand.is_finite() || radicand < 0.0 {
        return Err(HermError::VisVivaDomain { distance });
    }
    Ok(radicand.sqrt())
}

/// Aberration angle for a given heliocentric distance, without any caching.
pub fn aberration_angle_at_distance(
    distance: Kilometer,
    params: &AberrationParams,
) -> Result<Radian, HermError> {
    let speed = vis_viva_speed(distance, params)?;
    Ok((speed / params.solar_wind_speed).atan())
}

/// Per-date memo of aberration angles, safe to share between threads.
#[derive(Debug, Default)]
pub struct AberrationCache {
    angles: Mutex<HashMap<CalendarDate, Radian>>,
}

impl AberrationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CalendarDate, Radian>> {
        // A panic while holding the lock cannot leave a half-written angle behind.
        self.angles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, date: &CalendarDate) -> Option<Radian> {
        self.lock().get(date).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Return the cached angle, or compute, store and return it.
    ///
    /// The lookup, the computation and the insertion happen under a single lock, so
    /// concurrent callers never compute the same date twice.
    pub fn get_or_try_insert_with<F>(
        &self,
        date: CalendarDate,
        compute: F,
    ) -> Result<Radian, HermError>
    where
        F: FnOnce() -> Result<Radian, HermError>,
    {
        let mut angles = self.lock();
        if let Some(angle) = angles.get(&date) {
            return Ok(*angle);
        }
        let angle = compute()?;
        angles.insert(date, angle);
        Ok(angle)
    }
}

#[derive(Debug)]
pub struct AberrationModel<P> {
    ephemeris: EphemerisAdapter<P>,
    params: AberrationParams,
    cache: Arc<AberrationCache>,
}

impl<P: EphemerisProvider> AberrationModel<P> {
    /// Model for Mercury with the default physical parameters and a private cache.
    pub fn new(provider: P) -> Self {
        Self::with_params(provider, AberrationParams::default())
    }

    pub fn with_params(provider: P, params: AberrationParams) -> Self {
        AberrationModel {
            ephemeris: EphemerisAdapter::new(provider),
            params,
            cache: Arc::new(AberrationCache::new()),
        }
    }

    /// Replace the model's cache, e.g. to share one cache between several models.
    pub fn with_cache(mut self, cache: Arc<AberrationCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<AberrationCache> {
        &self.cache
    }

    pub fn params(&self) -> &AberrationParams {
        &self.params
    }

    pub fn ephemeris(&self) -> &EphemerisAdapter<P> {
        &self.ephemeris
    }

    /// Aberration angle for the calendar date of `date`.
    ///
    /// Arguments
    /// -----------------
    /// * `date`: a [`CalendarDate`] or a [`hifitime::Epoch`] (only its UTC date is used).
    ///
    /// Return
    /// ----------
    /// * The angle in radians. The first call for a date queries the ephemeris; later calls
    ///   are served from the cache.
    pub fn aberration_angle(&self, date: impl Into<CalendarDate>) -> Result<Radian, HermError> {
        let date = date.into();
        self.cache.get_or_try_insert_with(date, || {
            let distance = self.ephemeris.heliocentric_distance(date)?;
            let angle = aberration_angle_at_distance(distance, &self.params)?;
            debug!(%date, distance, angle, "computed aberration angle");
            Ok(angle)
        })
    }

    /// [`AberrationModel::aberration_angle`] for each input, in input order.
    pub fn aberration_angles<D>(&self, dates: &[D]) -> Result<Vec<Radian>, HermError>
    where
        D: Into<CalendarDate> + Copy,
    {
        dates.iter().map(|d| self.aberration_angle(*d)).collect()
    }
}

#[cfg(test)]
mod aberration_test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use approx::assert_relative_eq;
    use hifitime::{Epoch, Unit as TimeUnit};
    use nalgebra::Vector3;

    use crate::{constants::AU, ephemeris::tabulated::TabulatedEphemeris};

    /// Provider returning a fixed distance along X and counting its calls.
    struct CountingProvider {
        distance: Kilometer,
        calls: AtomicUsize,
    }

    impl EphemerisProvider for CountingProvider {
        fn position_of(
            &self,
            _body: &str,
            _frame: &str,
            _observer: &str,
            _epoch: &Epoch,
        ) -> Result<Vector3<f64>, HermError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vector3::new(self.distance, 0.0, 0.0))
        }
    }

    fn counting(distance: Kilometer) -> CountingProvider {
        CountingProvider {
            distance,
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_vis_viva_at_semi_major_axis() {
        let params = AberrationParams::default();
        let v = vis_viva_speed(MERCURY_SEMI_MAJOR_AXIS, &params).unwrap();
        let expected = (SOLAR_GM / (MERCURY_SEMI_MAJOR_AXIS * METERS_PER_KM)).sqrt();
        assert_relative_eq!(v, expected, max_relative = 1e-12);
        // ~47.9 km/s
        assert!((v - 47_880.0).abs() < 100.0);
    }

    #[test]
    fn test_vis_viva_domain() {
        let params = AberrationParams::default();
        let too_far = 3.0 * MERCURY_SEMI_MAJOR_AXIS;
        assert_eq!(
            vis_viva_speed(too_far, &params),
            Err(HermError::VisVivaDomain { distance: too_far })
        );
        assert!(vis_viva_speed(0.0, &params).is_err());
    }

    #[test]
    fn test_angle_matches_formula() {
        let distance = 0.307 * AU;
        let model = AberrationModel::new(counting(distance));
        let date = CalendarDate::new(2011, 6, 1).unwrap();

        let angle = model.aberration_angle(date).unwrap();
        let params = AberrationParams::default();
        let expected = (vis_viva_speed(distance, &params).unwrap() / SOLAR_WIND_SPEED_AVG).atan();
        assert_relative_eq!(angle, expected, max_relative = 1e-12);
        assert_eq!(angle, model.aberration_angle(date).unwrap());
    }

    #[test]
    fn test_memoized_per_date() {
        let model = AberrationModel::new(counting(0.35 * AU));
        let t0 = Epoch::from_gregorian_utc_at_midnight(2011, 6, 1);
        let epochs: Vec<Epoch> = (0..24i64).map(|h| t0 + TimeUnit::Hour * h).collect();

        let angles = model.aberration_angles(&epochs).unwrap();
        assert_eq!(angles.len(), 24);
        assert!(angles.iter().all(|a| *a == angles[0]));
        assert_eq!(model.ephemeris().provider().calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.cache().len(), 1);

        model.cache().clear();
        model.aberration_angle(t0).unwrap();
        assert_eq!(model.ephemeris().provider().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shared_cache() {
        let cache = Arc::new(AberrationCache::new());
        let first = AberrationModel::new(counting(0.4 * AU)).with_cache(cache.clone());
        let second = AberrationModel::new(counting(0.4 * AU)).with_cache(cache.clone());
        let date = CalendarDate::new(2011, 6, 1).unwrap();

        first.aberration_angle(date).unwrap();
        second.aberration_angle(date).unwrap();
        assert_eq!(second.ephemeris().provider().calls.load(Ordering::SeqCst), 0);
        assert!(cache.get(&date).is_some());
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_model_is_send_sync() {
        assert_send_sync::<AberrationCache>();
        assert_send_sync::<AberrationModel<TabulatedEphemeris>>();
        assert_send_sync::<AberrationModel<Arc<TabulatedEphemeris>>>();
    }

    #[test]
    fn test_concurrent_lookups_share_one_entry() {
        let model = Arc::new(AberrationModel::new(counting(0.33 * AU)));
        let date = CalendarDate::new(2011, 6, 1).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let model = Arc::clone(&model);
                thread::spawn(move || model.aberration_angle(date).unwrap())
            })
            .collect();
        let angles: Vec<Radian> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(angles.iter().all(|a| *a == angles[0]));
        assert_eq!(model.cache().len(), 1);
        assert_eq!(model.ephemeris().provider().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_domain_error_is_not_cached() {
        let model = AberrationModel::new(counting(3.0 * MERCURY_SEMI_MAJOR_AXIS));
        let date = CalendarDate::new(2011, 6, 1).unwrap();
        assert!(matches!(
            model.aberration_angle(date),
            Err(HermError::VisVivaDomain { .. })
        ));
        assert!(model.cache().is_empty());
    }

    #[test]
    fn test_smooth_day_to_day() {
        let params = AberrationParams::default();
        let d1 = aberration_angle_at_distance(0.307 * AU, &params).unwrap();
        let d2 = aberration_angle_at_distance(0.3071 * AU, &params).unwrap();
        assert!(d1 > d2);
        assert!((d1 - d2).abs() < 1e-3);
    }
}
