use crate::errors::{Axis, InputError};

pub const RA_MIN_DEG: f64 = 0.0;
pub const RA_MAX_DEG: f64 = 360.0;
pub const DEC_MIN_DEG: f64 = -90.0;
pub const DEC_MAX_DEG: f64 = 90.0;

/// Checks right ascension against the inclusive range [0°, 360°].
///
/// No wrapping is applied: 360.0001° is an error, not 0.0001°.
pub fn validate_right_ascension(ra_deg: f64) -> Result<f64, InputError> {
    check_range(Axis::RightAscension, ra_deg, RA_MIN_DEG, RA_MAX_DEG)
}

/// Checks declination against the inclusive range [-90°, +90°].
pub fn validate_declination(dec_deg: f64) -> Result<f64, InputError> {
    check_range(Axis::Declination, dec_deg, DEC_MIN_DEG, DEC_MAX_DEG)
}

fn check_range(axis: Axis, value: f64, min: f64, max: f64) -> Result<f64, InputError> {
    if (min..=max).contains(&value) {
        return Ok(value);
    }

    // NaN fails both comparisons; report it against the upper bound.
    let bound = if value < min { min } else { max };
    Err(InputError::CoordinateOutOfRange { axis, value, bound })
}
