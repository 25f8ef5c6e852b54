//! Validated sky positions and the parsers that produce them.
//!
//! - [`parse`] — combined and per-field coordinate parsing
//! - [`validate`] — RA/Dec range checks
//! - [`format`] — sexagesimal display for RA and Dec

pub mod format;
pub mod parse;
pub mod validate;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::InputError;

pub use format::{DmsFmt, HmsFmt};
pub use parse::{parse_coordinates, parse_ra_dec};
pub use validate::{validate_declination, validate_right_ascension};

/// An ICRS position in decimal degrees.
///
/// Only constructed through validation, so RA is always in [0°, 360°] and
/// Dec in [-90°, 90°].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyPosition {
    ra_degrees: f64,
    dec_degrees: f64,
}

impl SkyPosition {
    /// Build a position from decimal degrees, rejecting out-of-range values.
    pub fn new(ra_degrees: f64, dec_degrees: f64) -> Result<Self, InputError> {
        let ra_degrees = validate_right_ascension(ra_degrees)?;
        let dec_degrees = validate_declination(dec_degrees)?;
        Ok(Self {
            ra_degrees,
            dec_degrees,
        })
    }

    #[inline]
    pub fn ra_degrees(&self) -> f64 {
        self.ra_degrees
    }

    #[inline]
    pub fn dec_degrees(&self) -> f64 {
        self.dec_degrees
    }
}

impl FromStr for SkyPosition {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coordinates(s)
    }
}

impl fmt::Display for SkyPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RA {:.6}° Dec {:+.6}°", self.ra_degrees, self.dec_degrees)
    }
}
