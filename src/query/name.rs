//! Free-text object-name search, timed.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use super::catalog::{SourceCatalog, SourceRecord};
use crate::errors::{InputError, SearchError};

#[derive(Debug, Clone, Serialize)]
pub struct NameSearchOutcome {
    /// The trimmed query that was sent to the engine.
    pub query: String,
    pub records: Vec<SourceRecord>,
    #[serde(serialize_with = "super::serialize_seconds")]
    pub elapsed: Duration,
}

/// Look up objects by name and measure how long the engine took.
///
/// The query is trimmed first; a blank query is rejected as
/// [`InputError::EmptyQuery`] without calling the engine.
pub fn search_objects<C>(catalog: &C, query: &str) -> Result<NameSearchOutcome, SearchError>
where
    C: SourceCatalog + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(InputError::EmptyQuery.into());
    }

    let start = Instant::now();
    let records = catalog.search_object(query)?;
    let elapsed = start.elapsed();

    info!(
        query,
        found = records.len(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "name search completed"
    );

    Ok(NameSearchOutcome {
        query: query.to_string(),
        records,
        elapsed,
    })
}
