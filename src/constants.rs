//! # Physical constants and type aliases for hermrs
//!
//! This module centralizes the **physical constants** and **unit type aliases** shared by
//! the ephemeris adapter, the aberration model and the instrument readers.
//!
//! ## Overview
//!
//! - Mercury orbital and body constants
//! - Solar gravitational parameter and the assumed mean solar-wind speed
//! - Unit conversions (km ↔ m, AU ↔ km)
//! - Type aliases documenting the unit carried by a bare `f64`
//!
//! All values are read-only for the life of the process.

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Meters in one kilometer
pub const METERS_PER_KM: f64 = 1_000.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

// -------------------------------------------------------------------------------------------------
// Physical constants
// -------------------------------------------------------------------------------------------------

/// Mercury mean equatorial radius in meters
pub const MERCURY_RADIUS: Meter = 2_439_700.0;

/// Northward offset of Mercury's internal dipole from the planet centre, in kilometers
pub const DIPOLE_OFFSET: Kilometer = 479.0;

/// Dipole offset expressed in Mercury radii
pub const DIPOLE_OFFSET_RADII: f64 = DIPOLE_OFFSET * METERS_PER_KM / MERCURY_RADIUS;

/// Semi-major axis of Mercury's heliocentric orbit in kilometers
pub const MERCURY_SEMI_MAJOR_AXIS: Kilometer = 57_909_050.0;

/// Solar mass in kilograms
pub const SOLAR_MASS: f64 = 1.9891e30;

/// Newtonian constant of gravitation in N·m²/kg²
pub const G: f64 = 6.6743e-11;

/// Standard gravitational parameter of the Sun (G·M☉) in m³/s²
pub const SOLAR_GM: f64 = G * SOLAR_MASS;

/// Assumed average solar-wind speed in m/s
pub const SOLAR_WIND_SPEED_AVG: MeterPerSecond = 400_000.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Speed in meters per second
pub type MeterPerSecond = f64;
/// Magnetic field strength in nanotesla
pub type NanoTesla = f64;
