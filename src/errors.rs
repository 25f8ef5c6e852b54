//! Error types for search input validation and catalog queries.
//!
//! Three error types keep "the user typed something wrong" apart from
//! "the catalog could not answer":
//!
//! | Type | Raised by | Shown to the user as |
//! |------|-----------|----------------------|
//! | [`InputError`] | coordinate parser, radius normalizer, request validation | inline "invalid input" message |
//! | [`CatalogError`] | [`SourceCatalog`](crate::query::SourceCatalog) implementations | "search failed" |
//! | [`SearchError`] | [`run_cone_search`](crate::query::run_cone_search), [`search_objects`](crate::query::search_objects) | either of the above |
//!
//! Every message is written for direct display. Parser internals (regex
//! state, float-parsing diagnostics) never appear in them.
//!
//! ```
//! use astro_search::{normalize_radius, InputErrorKind};
//!
//! let err = normalize_radius("11", "degrees").unwrap_err();
//! assert_eq!(err.kind(), InputErrorKind::RadiusExceedsMaximum);
//! assert!(err.to_string().contains("maximum"));
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which sky coordinate a range error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    RightAscension,
    Declination,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::RightAscension => write!(f, "Right ascension"),
            Axis::Declination => write!(f, "Declination"),
        }
    }
}

/// Coarse classification of an [`InputError`], used by callers to route
/// messages (inline hint vs. aborted search) without matching on fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputErrorKind {
    MalformedCoordinates,
    CoordinateOutOfRange,
    RadiusNotANumber,
    RadiusNotPositive,
    UnknownRadiusUnit,
    RadiusExceedsMaximum,
    EmptyQuery,
}

/// Rejected search input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Unparsable sexagesimal text, wrong token count, or a non-numeric token.
    #[error("Could not parse coordinates '{input}': {reason}")]
    MalformedCoordinates { input: String, reason: String },

    /// Syntactically valid coordinate outside its allowed range.
    #[error("{axis} {value}° is outside the allowed range (limit {bound}°)")]
    CoordinateOutOfRange { axis: Axis, value: f64, bound: f64 },

    #[error("Radius '{input}' is not a number")]
    RadiusNotANumber { input: String },

    #[error("Radius must be positive, got {value}")]
    RadiusNotPositive { value: f64 },

    #[error("Unknown radius unit '{unit}' (expected degrees, arcminutes or arcseconds)")]
    UnknownRadiusUnit { unit: String },

    /// Policy limit on query cost, not a syntax problem.
    #[error("Radius {degrees}° exceeds the maximum search radius of {max}°")]
    RadiusExceedsMaximum { degrees: f64, max: f64 },

    #[error("Search query is empty")]
    EmptyQuery,
}

impl InputError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedCoordinates {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the routing category of this error.
    pub fn kind(&self) -> InputErrorKind {
        match self {
            Self::MalformedCoordinates { .. } => InputErrorKind::MalformedCoordinates,
            Self::CoordinateOutOfRange { .. } => InputErrorKind::CoordinateOutOfRange,
            Self::RadiusNotANumber { .. } => InputErrorKind::RadiusNotANumber,
            Self::RadiusNotPositive { .. } => InputErrorKind::RadiusNotPositive,
            Self::UnknownRadiusUnit { .. } => InputErrorKind::UnknownRadiusUnit,
            Self::RadiusExceedsMaximum { .. } => InputErrorKind::RadiusExceedsMaximum,
            Self::EmptyQuery => InputErrorKind::EmptyQuery,
        }
    }

    /// Returns `true` for errors about the coordinate text rather than the radius.
    pub fn is_coordinate_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedCoordinates { .. } | Self::CoordinateOutOfRange { .. }
        )
    }
}

/// Failure inside the catalog engine.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog file {path:?} is not a valid sources export: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Engine-side failure reported by a non-file backend.
    #[error("Catalog query failed: {0}")]
    Engine(String),
}

/// Error returned by the request-level search functions.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error("Search failed: {0}")]
    Query(#[from] CatalogError),
}

impl SearchError {
    /// Returns `true` if the request was rejected before the catalog was queried.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
