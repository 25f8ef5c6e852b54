//! Cone search: raw request → validated query → capped result set.
//!
//! [`ConeSearchRequest`] holds the strings a form or API call supplied.
//! [`ConeSearchRequest::validate`] turns them into a [`ConeQuery`], and
//! [`run_cone_search`] sends that to a [`SourceCatalog`], times the call and
//! caps what comes back at [`MAX_RESULTS`] rows.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use super::catalog::{SourceCatalog, SourceRecord};
use crate::errors::{InputError, SearchError};
use crate::position::{parse_coordinates, parse_ra_dec, SkyPosition};
use crate::radius::{normalize_radius, AngularRadius};

/// Largest result set handed back to the caller.
pub const MAX_RESULTS: usize = 10_000;

/// Coordinate text as the user supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateInput {
    /// RA and Dec in one string, e.g. `"209.30 14.48"`.
    Combined(String),
    /// RA and Dec from separate fields.
    Split { ra: String, dec: String },
}

impl CoordinateInput {
    pub fn parse(&self) -> Result<SkyPosition, InputError> {
        match self {
            CoordinateInput::Combined(text) => parse_coordinates(text),
            CoordinateInput::Split { ra, dec } => parse_ra_dec(ra, dec),
        }
    }
}

/// Unvalidated cone-search input for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConeSearchRequest {
    pub coordinates: CoordinateInput,
    pub radius: String,
    pub radius_unit: String,
}

impl ConeSearchRequest {
    pub fn combined(
        coordinates: impl Into<String>,
        radius: impl Into<String>,
        radius_unit: impl Into<String>,
    ) -> Self {
        Self {
            coordinates: CoordinateInput::Combined(coordinates.into()),
            radius: radius.into(),
            radius_unit: radius_unit.into(),
        }
    }

    pub fn split(
        ra: impl Into<String>,
        dec: impl Into<String>,
        radius: impl Into<String>,
        radius_unit: impl Into<String>,
    ) -> Self {
        Self {
            coordinates: CoordinateInput::Split {
                ra: ra.into(),
                dec: dec.into(),
            },
            radius: radius.into(),
            radius_unit: radius_unit.into(),
        }
    }

    /// Parse the coordinates, then the radius.
    ///
    /// When both are bad the coordinate error is reported.
    pub fn validate(&self) -> Result<ConeQuery, InputError> {
        let center = self.coordinates.parse()?;
        let radius = normalize_radius(&self.radius, &self.radius_unit)?;
        Ok(ConeQuery { center, radius })
    }
}

/// Validated `(ra, dec, radius)` triple ready for the catalog engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConeQuery {
    pub center: SkyPosition,
    pub radius: AngularRadius,
}

/// A result set after capping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CappedResults<R> {
    /// Kept rows, in the engine's order.
    pub records: Vec<R>,
    /// Row count before capping.
    pub total: usize,
    /// `true` if rows were dropped; the caller should say so.
    pub truncated: bool,
}

impl<R> CappedResults<R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cap a result set at [`MAX_RESULTS`] rows.
pub fn cap_results<R>(records: Vec<R>) -> CappedResults<R> {
    cap_results_at(records, MAX_RESULTS)
}

/// Keep the first `limit` rows, preserving order.
pub fn cap_results_at<R>(mut records: Vec<R>, limit: usize) -> CappedResults<R> {
    let total = records.len();
    let truncated = total > limit;
    records.truncate(limit);
    CappedResults {
        records,
        total,
        truncated,
    }
}

/// Everything the web layer needs to render a cone search.
#[derive(Debug, Clone, Serialize)]
pub struct ConeSearchOutcome {
    pub query: ConeQuery,
    pub results: CappedResults<SourceRecord>,
    /// Time spent inside the catalog engine.
    #[serde(serialize_with = "super::serialize_seconds")]
    pub elapsed: Duration,
}

/// Validate a raw request and run it against `catalog`.
///
/// # Errors
/// [`SearchError::InvalidInput`] before any query is attempted,
/// [`SearchError::Query`] if the engine fails.
pub fn run_cone_search<C>(
    catalog: &C,
    request: &ConeSearchRequest,
) -> Result<ConeSearchOutcome, SearchError>
where
    C: SourceCatalog + ?Sized,
{
    let query = request.validate()?;
    execute_cone_query(catalog, query, MAX_RESULTS)
}

/// Run an already-validated query, capping at `limit` (itself capped at
/// [`MAX_RESULTS`]).
pub fn execute_cone_query<C>(
    catalog: &C,
    query: ConeQuery,
    limit: usize,
) -> Result<ConeSearchOutcome, SearchError>
where
    C: SourceCatalog + ?Sized,
{
    let limit = limit.min(MAX_RESULTS);

    let start = Instant::now();
    let records = catalog.query_region(&query.center, &query.radius)?;
    let elapsed = start.elapsed();

    let results = cap_results_at(records, limit);

    info!(
        ra = query.center.ra_degrees(),
        dec = query.center.dec_degrees(),
        radius_deg = query.radius.degrees(),
        found = results.total,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "cone search completed"
    );
    if results.truncated {
        warn!(
            found = results.total,
            limit, "cone search results truncated"
        );
    }

    Ok(ConeSearchOutcome {
        query,
        results,
        elapsed,
    })
}
