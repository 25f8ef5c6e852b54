//! Cone-search radius normalization.
//!
//! A radius arrives as two form values: a number and a unit token. The
//! normalizer converts them to degrees and applies the search policy:
//!
//! 1. the number must parse as a finite float,
//! 2. it must be positive,
//! 3. the unit must be `degrees`, `arcminutes` or `arcseconds`,
//! 4. the converted value must not exceed [`MAX_RADIUS_DEG`].
//!
//! Checks run in that order, so `("-5", "furlongs")` reports the sign, not
//! the unit. The cap is a rejection, never a clamp.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::InputError;

/// Largest accepted search radius, in degrees, regardless of input unit.
pub const MAX_RADIUS_DEG: f64 = 10.0;

/// Unit of a user-supplied radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadiusUnit {
    #[default]
    Degrees,
    Arcminutes,
    Arcseconds,
}

impl RadiusUnit {
    /// Token accepted by [`FromStr`] and emitted by [`Display`](fmt::Display).
    pub fn as_str(&self) -> &'static str {
        match self {
            RadiusUnit::Degrees => "degrees",
            RadiusUnit::Arcminutes => "arcminutes",
            RadiusUnit::Arcseconds => "arcseconds",
        }
    }

    /// Convert a value in this unit to degrees.
    #[inline]
    pub fn to_degrees(&self, value: f64) -> f64 {
        match self {
            RadiusUnit::Degrees => value,
            RadiusUnit::Arcminutes => value / 60.0,
            RadiusUnit::Arcseconds => value / 3600.0,
        }
    }
}

impl FromStr for RadiusUnit {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "degrees" => Ok(RadiusUnit::Degrees),
            "arcminutes" => Ok(RadiusUnit::Arcminutes),
            "arcseconds" => Ok(RadiusUnit::Arcseconds),
            other => Err(InputError::UnknownRadiusUnit {
                unit: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RadiusUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search radius in degrees, always in (0, [`MAX_RADIUS_DEG`]].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngularRadius {
    degrees: f64,
}

impl AngularRadius {
    /// Validate a numeric radius given in `unit`.
    pub fn new(value: f64, unit: RadiusUnit) -> Result<Self, InputError> {
        if !value.is_finite() {
            return Err(InputError::RadiusNotANumber {
                input: value.to_string(),
            });
        }
        if value <= 0.0 {
            return Err(InputError::RadiusNotPositive { value });
        }
        Self::checked(unit.to_degrees(value))
    }

    /// Build directly from degrees.
    pub fn from_degrees(degrees: f64) -> Result<Self, InputError> {
        Self::new(degrees, RadiusUnit::Degrees)
    }

    fn checked(degrees: f64) -> Result<Self, InputError> {
        // Subnormal inputs can underflow to zero once divided down.
        if degrees <= 0.0 {
            return Err(InputError::RadiusNotPositive { value: degrees });
        }
        if degrees > MAX_RADIUS_DEG {
            return Err(InputError::RadiusExceedsMaximum {
                degrees,
                max: MAX_RADIUS_DEG,
            });
        }
        Ok(Self { degrees })
    }

    #[inline]
    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    #[inline]
    pub fn arcminutes(&self) -> f64 {
        self.degrees * 60.0
    }

    #[inline]
    pub fn arcseconds(&self) -> f64 {
        self.degrees * 3600.0
    }
}

impl fmt::Display for AngularRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}°", self.degrees)
    }
}

/// Normalize raw radius and unit strings into an [`AngularRadius`].
///
/// # Errors
///
/// In check order: [`InputError::RadiusNotANumber`],
/// [`InputError::RadiusNotPositive`], [`InputError::UnknownRadiusUnit`],
/// [`InputError::RadiusExceedsMaximum`].
pub fn normalize_radius(value: &str, unit: &str) -> Result<AngularRadius, InputError> {
    let text = value.trim();
    let number: f64 = text
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| InputError::RadiusNotANumber {
            input: text.to_string(),
        })?;

    if number <= 0.0 {
        return Err(InputError::RadiusNotPositive { value: number });
    }

    let unit: RadiusUnit = unit.parse()?;
    AngularRadius::new(number, unit)
}
