//! Sky-position parsing from free-form user text.
//!
//! Two input shapes are accepted:
//!
//! ```text
//! Combined string:   13h57m12.37s +14d28m39s      209.30 14.48
//! Separate fields:   RA "13h57m12.37s"  Dec "+14d28m39s"
//! ```
//!
//! # Format Detection
//!
//! The parser picks between a sexagesimal and a decimal reading by scanning
//! for unit marker characters. This is a best-effort heuristic, not a
//! grammar: any marker selects the sexagesimal parser for the whole text,
//! and no marker selects plain floating-point parsing.
//!
//! | Input | Markers (case-insensitive) |
//! |-------|----------------------------|
//! | Combined string | `h m s d ° ' "` |
//! | RA field | `h m s d` |
//! | Dec field | `d ° m ' s "` |
//!
//! # Sexagesimal Components
//!
//! Each component is `[sign] value unit [minutes] [seconds]`:
//!
//! ```text
//! 13h57m12.37s     hours (RA only), 1h = 15°
//! +14d28m39s       degrees
//! 14°28'39"        degrees, symbol markers
//! 14d 28' 39''     doubled apostrophe for seconds
//! 14d              degree-only
//! ```
//!
//! Only the last field present may carry a fraction, and minutes and
//! seconds must be below 60. The sign applies to the whole component.
//!
//! # Decimal Pairs
//!
//! Without markers a combined string must split on whitespace into exactly
//! two numbers, RA first. Any other token count is rejected outright.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use super::SkyPosition;
use crate::errors::InputError;

const COMBINED_MARKERS: &[char] = &['h', 'm', 's', 'd', '°', '\'', '"'];
const RA_MARKERS: &[char] = &['h', 'm', 's', 'd'];
const DEC_MARKERS: &[char] = &['d', '°', 'm', '\'', 's', '"'];

const RA_LEAD_UNITS: &str = "[hd°]";
const DEC_LEAD_UNITS: &str = "[d°]";

fn component_pattern(prefix: &str, lead_units: &str) -> String {
    format!(
        r#"(?P<{p}_sign>[+-])?\s*(?P<{p}_lead>\d+(?:\.\d*)?|\.\d+)\s*(?P<{p}_unit>{u})(?:\s*(?P<{p}_min>\d+(?:\.\d*)?|\.\d+)\s*(?:m|'))?(?:\s*(?P<{p}_sec>\d+(?:\.\d*)?|\.\d+)\s*(?:''|"|s))?"#,
        p = prefix,
        u = lead_units,
    )
}

static COMBINED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*{}\s*{}\s*$",
        component_pattern("ra", RA_LEAD_UNITS),
        component_pattern("dec", DEC_LEAD_UNITS),
    ))
    .unwrap()
});

static RA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*{}\s*$",
        component_pattern("ra", RA_LEAD_UNITS)
    ))
    .unwrap()
});

static DEC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*{}\s*$",
        component_pattern("dec", DEC_LEAD_UNITS)
    ))
    .unwrap()
});

/// Parse a combined RA/Dec string into a validated [`SkyPosition`].
///
/// Accepts sexagesimal text (`"13h57m12s +14d28m39s"`) or exactly two
/// decimal-degree numbers (`"209.30 14.48"`). See the module docs for the
/// detection rules.
///
/// # Errors
///
/// [`InputError::MalformedCoordinates`] for empty or unparsable text,
/// [`InputError::CoordinateOutOfRange`] if the parsed values fall outside
/// RA [0°, 360°] or Dec [-90°, 90°].
pub fn parse_coordinates(input: &str) -> Result<SkyPosition, InputError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(InputError::malformed(text, "no coordinates given"));
    }

    let (ra_deg, dec_deg) = if has_marker(text, COMBINED_MARKERS) {
        debug!(input = text, "parsing combined coordinates as sexagesimal");
        parse_combined_sexagesimal(text).map_err(|reason| InputError::malformed(text, reason))?
    } else {
        debug!(input = text, "parsing combined coordinates as decimal degrees");
        parse_decimal_pair(text).map_err(|reason| InputError::malformed(text, reason))?
    };

    SkyPosition::new(ra_deg, dec_deg)
}

/// Parse separate RA and Dec fields into a validated [`SkyPosition`].
///
/// Each field is independently sexagesimal or decimal. RA may use hours
/// (`"13h57m12.37s"`) or degrees (`"209.3d"`); Dec uses degrees only.
pub fn parse_ra_dec(ra: &str, dec: &str) -> Result<SkyPosition, InputError> {
    let ra_deg = parse_field(ra, RA_MARKERS, &RA_REGEX, "ra")?;
    let dec_deg = parse_field(dec, DEC_MARKERS, &DEC_REGEX, "dec")?;
    SkyPosition::new(ra_deg, dec_deg)
}

fn parse_field(input: &str, markers: &[char], pattern: &Regex, prefix: &str) -> Result<f64, InputError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(InputError::malformed(text, "no value given"));
    }

    let parsed = if has_marker(text, markers) {
        debug!(input = text, field = prefix, "parsing field as sexagesimal");
        pattern
            .captures(text)
            .ok_or_else(|| "not a recognised sexagesimal angle".to_string())
            .and_then(|caps| Sexagesimal::from_captures(&caps, prefix)?.degrees())
    } else {
        parse_decimal(text)
    };

    parsed.map_err(|reason| InputError::malformed(text, reason))
}

fn has_marker(text: &str, markers: &[char]) -> bool {
    text.chars()
        .any(|c| markers.contains(&c.to_ascii_lowercase()))
}

fn parse_combined_sexagesimal(text: &str) -> Result<(f64, f64), String> {
    let caps = COMBINED_REGEX
        .captures(text)
        .ok_or_else(|| "expected an RA and a Dec in sexagesimal notation".to_string())?;

    let ra = Sexagesimal::from_captures(&caps, "ra")?.degrees()?;
    let dec = Sexagesimal::from_captures(&caps, "dec")?.degrees()?;
    Ok((ra, dec))
}

fn parse_decimal_pair(text: &str) -> Result<(f64, f64), String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(format!(
            "expected exactly two values (RA and Dec), found {}",
            tokens.len()
        ));
    }

    Ok((parse_decimal(tokens[0])?, parse_decimal(tokens[1])?))
}

fn parse_decimal(token: &str) -> Result<f64, String> {
    let value: f64 = token
        .parse()
        .map_err(|_| format!("'{}' is not a number", token))?;

    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", token));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LeadUnit {
    Hours,
    Degrees,
}

#[derive(Debug, Clone, Copy)]
struct Sexagesimal {
    negative: bool,
    lead: f64,
    unit: LeadUnit,
    minutes: Option<f64>,
    seconds: Option<f64>,
}

impl Sexagesimal {
    fn from_captures(caps: &Captures<'_>, prefix: &str) -> Result<Self, String> {
        let group = |name: &str| caps.name(&format!("{}_{}", prefix, name));
        let number = |name: &str| -> Result<Option<f64>, String> {
            group(name)
                .map(|m| {
                    m.as_str()
                        .parse::<f64>()
                        .map_err(|_| format!("'{}' is not a number", m.as_str()))
                })
                .transpose()
        };

        let lead = number("lead")?.ok_or_else(|| "missing leading value".to_string())?;
        let unit = match group("unit").map(|m| m.as_str().to_ascii_lowercase()) {
            Some(u) if u == "h" => LeadUnit::Hours,
            Some(_) => LeadUnit::Degrees,
            None => return Err("missing unit marker".to_string()),
        };

        Ok(Self {
            negative: group("sign").is_some_and(|m| m.as_str() == "-"),
            lead,
            unit,
            minutes: number("min")?,
            seconds: number("sec")?,
        })
    }

    fn degrees(&self) -> Result<f64, String> {
        let fractional_lead = self.lead.fract() != 0.0
            && (self.minutes.is_some() || self.seconds.is_some());
        let fractional_minutes =
            self.seconds.is_some() && self.minutes.is_some_and(|m| m.fract() != 0.0);
        if fractional_lead || fractional_minutes {
            return Err("only the last sexagesimal field may have a fractional part".to_string());
        }

        if self.minutes.is_some_and(|m| m >= 60.0) {
            return Err("minutes must be less than 60".to_string());
        }
        if self.seconds.is_some_and(|s| s >= 60.0) {
            return Err("seconds must be less than 60".to_string());
        }

        let magnitude =
            self.lead + self.minutes.unwrap_or(0.0) / 60.0 + self.seconds.unwrap_or(0.0) / 3600.0;
        let scale = match self.unit {
            LeadUnit::Hours => 15.0,
            LeadUnit::Degrees => 1.0,
        };
        let sign = if self.negative { -1.0 } else { 1.0 };

        let degrees = sign * magnitude * scale;
        if !degrees.is_finite() {
            return Err("value is too large".to_string());
        }
        Ok(degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Axis, InputErrorKind};

    const EPSILON: f64 = 1e-6;

    fn kind_of(result: Result<SkyPosition, InputError>) -> InputErrorKind {
        result.expect_err("expected parse failure").kind()
    }

    #[test]
    fn test_decimal_pair() {
        let pos = parse_coordinates("209.30 14.48").unwrap();
        assert_eq!(pos.ra_degrees(), 209.30);
        assert_eq!(pos.dec_degrees(), 14.48);

        let pos = parse_coordinates("  0   -90 ").unwrap();
        assert_eq!(pos.ra_degrees(), 0.0);
        assert_eq!(pos.dec_degrees(), -90.0);

        let pos = parse_coordinates("360\t+90").unwrap();
        assert_eq!(pos.ra_degrees(), 360.0);
        assert_eq!(pos.dec_degrees(), 90.0);
    }

    #[test]
    fn test_decimal_round_trip_grid() {
        let ras = [0.0, 0.001, 12.5, 83.633, 180.0, 209.3015, 359.999999, 360.0];
        let decs = [-90.0, -45.25, -5.375, 0.0, 14.4775, 89.9999, 90.0];

        for &ra in &ras {
            for &dec in &decs {
                let pos = parse_coordinates(&format!("{} {}", ra, dec)).unwrap();
                assert_eq!(pos.ra_degrees(), ra);
                assert_eq!(pos.dec_degrees(), dec);
            }
        }
    }

    #[test]
    fn test_combined_sexagesimal() {
        let pos = parse_coordinates("13h57m12.37s +14d28m39s").unwrap();
        let expected_ra = (13.0 + 57.0 / 60.0 + 12.37 / 3600.0) * 15.0;
        let expected_dec = 14.0 + 28.0 / 60.0 + 39.0 / 3600.0;
        assert!((pos.ra_degrees() - expected_ra).abs() < EPSILON);
        assert!((pos.ra_degrees() - 209.3015).abs() < 1e-4);
        assert!((pos.dec_degrees() - expected_dec).abs() < EPSILON);
    }

    #[test]
    fn test_combined_sexagesimal_variants() {
        let expected_dec = -(5.0 + 22.0 / 60.0 + 30.0 / 3600.0);

        for input in [
            "5h35m17.3s -5d22m30s",
            "5H35M17.3S -5D22M30S",
            "5h 35m 17.3s  -5d 22m 30s",
            "5h35m17.3s -5°22'30\"",
            "5h35m17.3s -5d22'30''",
        ] {
            let pos = parse_coordinates(input).unwrap();
            let expected_ra = (5.0 + 35.0 / 60.0 + 17.3 / 3600.0) * 15.0;
            assert!((pos.ra_degrees() - expected_ra).abs() < EPSILON, "{}", input);
            assert!((pos.dec_degrees() - expected_dec).abs() < EPSILON, "{}", input);
        }
    }

    #[test]
    fn test_combined_degree_markers() {
        let pos = parse_coordinates("209.3d 14.48d").unwrap();
        assert!((pos.ra_degrees() - 209.3).abs() < EPSILON);
        assert!((pos.dec_degrees() - 14.48).abs() < EPSILON);

        let pos = parse_coordinates("83.633° -5.375°").unwrap();
        assert!((pos.ra_degrees() - 83.633).abs() < EPSILON);
        assert!((pos.dec_degrees() + 5.375).abs() < EPSILON);
    }

    #[test]
    fn test_split_fields() {
        let pos = parse_ra_dec("13h57m12.37s", "+14d28m39s").unwrap();
        assert!((pos.ra_degrees() - 209.30154166).abs() < EPSILON);
        assert!((pos.dec_degrees() - 14.4775).abs() < EPSILON);

        let pos = parse_ra_dec(" 209.30 ", " 14.48 ").unwrap();
        assert_eq!(pos.ra_degrees(), 209.30);
        assert_eq!(pos.dec_degrees(), 14.48);

        let pos = parse_ra_dec("13h57m12.37s", "14.48").unwrap();
        assert_eq!(pos.dec_degrees(), 14.48);
    }

    #[test]
    fn test_degree_only_dec_is_sexagesimal() {
        let pos = parse_ra_dec("209.3", "14d").unwrap();
        assert_eq!(pos.dec_degrees(), 14.0);

        let pos = parse_ra_dec("209.3", "-14.5d").unwrap();
        assert_eq!(pos.dec_degrees(), -14.5);

        let pos = parse_ra_dec("209.3d", "14°").unwrap();
        assert_eq!(pos.ra_degrees(), 209.3);
        assert_eq!(pos.dec_degrees(), 14.0);
    }

    #[test]
    fn test_dec_field_rejects_hours() {
        assert_eq!(
            kind_of(parse_ra_dec("209.3", "1h")),
            InputErrorKind::MalformedCoordinates
        );
    }

    #[test]
    fn test_ra_boundaries() {
        assert!(parse_coordinates("0 0").is_ok());
        assert!(parse_coordinates("360 0").is_ok());
        assert!(parse_coordinates("24h00m00s +0d").is_ok());
        assert_eq!(
            kind_of(parse_coordinates("-0.0001 0")),
            InputErrorKind::CoordinateOutOfRange
        );
        assert_eq!(
            kind_of(parse_coordinates("360.0001 0")),
            InputErrorKind::CoordinateOutOfRange
        );
        assert_eq!(
            kind_of(parse_coordinates("24h00m01s +0d")),
            InputErrorKind::CoordinateOutOfRange
        );
    }

    #[test]
    fn test_dec_boundaries() {
        assert!(parse_coordinates("10 -90").is_ok());
        assert!(parse_coordinates("10 90").is_ok());
        assert_eq!(
            kind_of(parse_coordinates("10 -90.0001")),
            InputErrorKind::CoordinateOutOfRange
        );
        assert_eq!(
            kind_of(parse_coordinates("10 90.0001")),
            InputErrorKind::CoordinateOutOfRange
        );

        match parse_ra_dec("10", "+91d") {
            Err(InputError::CoordinateOutOfRange { axis, value, bound }) => {
                assert_eq!(axis, Axis::Declination);
                assert_eq!(value, 91.0);
                assert_eq!(bound, 90.0);
            }
            other => panic!("Expected CoordinateOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_inputs() {
        for input in [
            "",
            "   ",
            "209.30",
            "209.30 14.48 1.0",
            "abc def",
            "209.30, 14.48",
            "nan 10",
            "10 inf",
            "13:57:12 +14:28:39",
        ] {
            assert_eq!(
                kind_of(parse_coordinates(input)),
                InputErrorKind::MalformedCoordinates,
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_malformed_sexagesimal() {
        for input in [
            "13h75m00s +14d",
            "13h57m61s +14d",
            "13.5h30m +14d",
            "13h +14h",
            "13h57m12s",
            "hms dms",
            "209.3 14d",
        ] {
            assert_eq!(
                kind_of(parse_coordinates(input)),
                InputErrorKind::MalformedCoordinates,
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_wrong_token_count_message() {
        let err = parse_coordinates("1 2 3").unwrap_err();
        match err {
            InputError::MalformedCoordinates { input, reason } => {
                assert_eq!(input, "1 2 3");
                assert!(reason.contains("found 3"), "{}", reason);
            }
            other => panic!("Expected MalformedCoordinates, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_message_has_no_parser_internals() {
        let msg = parse_ra_dec("12x", "10").unwrap_err().to_string();
        assert_eq!(msg, "Could not parse coordinates '12x': '12x' is not a number");
    }

    #[test]
    fn test_negative_ra_hours_out_of_range() {
        assert_eq!(
            kind_of(parse_ra_dec("-1h", "0")),
            InputErrorKind::CoordinateOutOfRange
        );
    }
}
