//! Catalog queries and the request-level search flow.
//!
//! - [`catalog`] — the [`SourceCatalog`] engine trait and the in-memory [`SourceTable`]
//! - [`cone`] — cone-search requests, result capping and timing
//! - [`name`] — object-name search
//! - [`sphere`] — angular separation

pub mod catalog;
pub mod cone;
pub mod name;
pub mod sphere;

pub use catalog::{SourceCatalog, SourceRecord, SourceTable, TableSummary};
pub use cone::{
    cap_results, cap_results_at, execute_cone_query, run_cone_search, CappedResults, ConeQuery,
    ConeSearchOutcome, ConeSearchRequest, CoordinateInput, MAX_RESULTS,
};
pub use name::{search_objects, NameSearchOutcome};
pub use sphere::angular_separation_deg;

use std::time::Duration;

/// Query timings are reported as fractional seconds.
pub(crate) fn serialize_seconds<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
