//! Sexagesimal formatting for RA and Dec.
//!
//! Output uses ASCII letter markers (`13h57m12.37s`, `+14d28m39.00s`) so a
//! formatted value can be pasted straight back into the coordinate parser.
//! Rounding carries into the higher fields, so 59.999s never prints as
//! `60.00s`.
//!
//! ```
//! use astro_search::position::{DmsFmt, HmsFmt};
//!
//! let hms = HmsFmt { frac_digits: 2 };
//! assert_eq!(hms.fmt(209.30154166666667), "13h57m12.37s");
//!
//! let dms = DmsFmt { frac_digits: 1 };
//! assert_eq!(dms.fmt(-5.375), "-05d22m30.0s");
//! ```

/// Formatter for hours-minutes-seconds (right ascension).
///
/// Takes decimal degrees; 15° is one hour.
pub struct HmsFmt {
    pub frac_digits: u8,
}

/// Formatter for signed degrees-minutes-seconds (declination).
pub struct DmsFmt {
    pub frac_digits: u8,
}

impl HmsFmt {
    pub fn fmt(&self, ra_degrees: f64) -> String {
        let (h, m, s) = split_sexagesimal(ra_degrees / 15.0, self.frac_digits);
        format!(
            "{:02}h{:02}m{}s",
            h,
            m,
            seconds_field(s, self.frac_digits)
        )
    }
}

impl DmsFmt {
    pub fn fmt(&self, degrees: f64) -> String {
        let sign = if degrees < 0.0 { '-' } else { '+' };
        let (d, m, s) = split_sexagesimal(degrees.abs(), self.frac_digits);
        format!(
            "{}{:02}d{:02}m{}s",
            sign,
            d,
            m,
            seconds_field(s, self.frac_digits)
        )
    }
}

/// Split a non-negative value into whole units, minutes and seconds,
/// rounding once at the requested seconds precision.
fn split_sexagesimal(value: f64, frac_digits: u8) -> (u64, u64, f64) {
    let scale = libm::pow(10.0, frac_digits as f64);
    let ticks_per_unit = 3600.0 * scale;
    let ticks_per_minute = 60.0 * scale;

    let total = libm::round(value * ticks_per_unit);
    let whole = libm::trunc(total / ticks_per_unit);
    let remainder = total - whole * ticks_per_unit;
    let minutes = libm::trunc(remainder / ticks_per_minute);
    let seconds = (remainder - minutes * ticks_per_minute) / scale;

    (whole as u64, minutes as u64, seconds)
}

fn seconds_field(seconds: f64, frac_digits: u8) -> String {
    let precision = frac_digits as usize;
    let width = if precision == 0 { 2 } else { precision + 3 };
    format!("{:0width$.precision$}", seconds, width = width, precision = precision)
}
