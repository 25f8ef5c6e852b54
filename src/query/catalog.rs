//! Catalog engine interface and an in-memory Sources table.
//!
//! The search core never talks to a database directly. It calls a
//! [`SourceCatalog`], which answers three questions:
//!
//! 1. **browse** — the first N rows of the Sources table ([`SourceCatalog::sources`])
//! 2. **name lookup** — free-text object search ([`SourceCatalog::search_object`])
//! 3. **region query** — everything inside a cone ([`SourceCatalog::query_region`])
//!
//! [`SourceTable`] implements the trait over a JSON export of the Sources
//! table, loaded once with [`SourceTable::open`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::sphere::angular_separation_deg;
use crate::errors::CatalogError;
use crate::position::SkyPosition;
use crate::radius::AngularRadius;

/// One row of the Sources table.
///
/// Columns beyond the known ones are kept in `extra` so that a
/// round-trip through JSON loses nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Primary object name.
    pub source: String,
    /// Right ascension, in degrees.
    #[serde(default)]
    pub ra: Option<f64>,
    /// Declination, in degrees.
    #[serde(default)]
    pub dec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SourceRecord {
    /// Minimal record with a name and optional position.
    pub fn new(source: impl Into<String>, ra: Option<f64>, dec: Option<f64>) -> Self {
        Self {
            source: source.into(),
            ra,
            dec,
            shortname: None,
            reference: None,
            comments: None,
            extra: BTreeMap::new(),
        }
    }

    /// The record's position, if both coordinates are present and in range.
    pub fn position(&self) -> Option<SkyPosition> {
        SkyPosition::new(self.ra?, self.dec?).ok()
    }

    /// Value of a named column as text, or `None` if the row has no such
    /// column or it is null.
    pub fn column(&self, name: &str) -> Option<String> {
        match name {
            "source" => Some(self.source.clone()),
            "ra" => self.ra.map(|v| v.to_string()),
            "dec" => self.dec.map(|v| v.to_string()),
            "shortname" => self.shortname.clone(),
            "reference" => self.reference.clone(),
            "comments" => self.comments.clone(),
            other => match self.extra.get(other)? {
                serde_json::Value::Null => None,
                serde_json::Value::String(text) => Some(text.clone()),
                value => Some(value.to_string()),
            },
        }
    }

    fn matches_name(&self, needle: &str) -> bool {
        self.source.to_lowercase().contains(needle)
            || self
                .shortname
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(needle))
    }
}

/// The external catalog engine as seen by the search core.
///
/// Implementations must be shareable across request handlers.
pub trait SourceCatalog: Send + Sync {
    /// Rows of the Sources table in storage order, optionally limited.
    fn sources(&self, limit: Option<usize>) -> Result<Vec<SourceRecord>, CatalogError>;

    /// Free-text object-name lookup.
    fn search_object(&self, query: &str) -> Result<Vec<SourceRecord>, CatalogError>;

    /// All rows within `radius` of `center`.
    fn query_region(
        &self,
        center: &SkyPosition,
        radius: &AngularRadius,
    ) -> Result<Vec<SourceRecord>, CatalogError>;
}

/// Row counts for a loaded [`SourceTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSummary {
    pub total: usize,
    pub with_position: usize,
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sources: {}", self.total)?;
        writeln!(f, "With valid position: {}", self.with_position)?;
        write!(f, "Without position: {}", self.total - self.with_position)
    }
}

/// In-memory Sources table.
///
/// Immutable once built, so a single instance can serve concurrent
/// requests behind a shared reference.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    records: Vec<SourceRecord>,
}

impl SourceTable {
    /// Load a JSON array of Sources rows.
    ///
    /// # Errors
    /// [`CatalogError::Io`] if the file cannot be read,
    /// [`CatalogError::Format`] if it is not an array of rows.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let records: Vec<SourceRecord> =
            serde_json::from_slice(&bytes).map_err(|source| CatalogError::Format {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = ?path, rows = records.len(), "loaded sources table");
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<SourceRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SourceRecord] {
        &self.records
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary {
            total: self.records.len(),
            with_position: self
                .records
                .iter()
                .filter(|r| r.position().is_some())
                .count(),
        }
    }
}

impl SourceCatalog for SourceTable {
    fn sources(&self, limit: Option<usize>) -> Result<Vec<SourceRecord>, CatalogError> {
        let take = limit.unwrap_or(self.records.len());
        Ok(self.records.iter().take(take).cloned().collect())
    }

    fn search_object(&self, query: &str) -> Result<Vec<SourceRecord>, CatalogError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .records
            .iter()
            .filter(|r| r.matches_name(&needle))
            .cloned()
            .collect())
    }

    fn query_region(
        &self,
        center: &SkyPosition,
        radius: &AngularRadius,
    ) -> Result<Vec<SourceRecord>, CatalogError> {
        let mut hits: Vec<(f64, &SourceRecord)> = self
            .records
            .iter()
            .filter_map(|record| {
                let position = record.position()?;
                let distance = angular_separation_deg(
                    center.ra_degrees(),
                    center.dec_degrees(),
                    position.ra_degrees(),
                    position.dec_degrees(),
                );
                (distance <= radius.degrees()).then_some((distance, record))
            })
            .collect();

        hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(hits.into_iter().map(|(_, record)| record.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_table() -> SourceTable {
        let mut gj = SourceRecord::new("GJ 3622", Some(209.30), Some(14.48));
        gj.shortname = Some("1357+1428".into());
        SourceTable::from_records(vec![
            gj,
            SourceRecord::new("2MASS J13571237+1428398", Some(209.3015), Some(14.4777)),
            SourceRecord::new("WISE J1357+1430", Some(209.40), Some(14.50)),
            SourceRecord::new("TWA 27", Some(180.0), Some(-39.0)),
            SourceRecord::new("Orphan", None, Some(14.48)),
        ])
    }

    fn write_json(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_sources_limit() {
        let table = sample_table();
        assert_eq!(table.sources(None).unwrap().len(), 5);

        let first = table.sources(Some(2)).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].source, "GJ 3622");
        assert_eq!(table.sources(Some(50)).unwrap().len(), 5);
    }

    #[test]
    fn test_search_object_case_insensitive() {
        let table = sample_table();
        let hits = table.search_object("  twa ").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source, "TWA 27");

        let hits = table.search_object("1357+14").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source, "GJ 3622");
        assert_eq!(hits[1].source, "WISE J1357+1430");
    }

    #[test]
    fn test_search_object_empty_query() {
        assert!(sample_table().search_object("   ").unwrap().is_empty());
    }

    #[test]
    fn test_query_region_orders_by_distance() {
        let table = sample_table();
        let center = SkyPosition::new(209.3015, 14.4777).unwrap();
        let radius = AngularRadius::from_degrees(0.5).unwrap();

        let hits = table.query_region(&center, &radius).unwrap();
        let names: Vec<&str> = hits.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(
            names,
            vec!["2MASS J13571237+1428398", "GJ 3622", "WISE J1357+1430"]
        );
    }

    #[test]
    fn test_query_region_skips_missing_coordinates() {
        let table = sample_table();
        let center = SkyPosition::new(209.30, 14.48).unwrap();
        let radius = AngularRadius::from_degrees(10.0).unwrap();

        let hits = table.query_region(&center, &radius).unwrap();
        assert!(hits.iter().all(|r| r.source != "Orphan"));
    }

    #[test]
    fn test_query_region_skips_out_of_range_rows() {
        let table = SourceTable::from_records(vec![
            SourceRecord::new("Bad RA", Some(400.0), Some(14.48)),
            SourceRecord::new("Bad Dec", Some(209.30), Some(95.0)),
            SourceRecord::new("GJ 3622", Some(209.30), Some(14.48)),
        ]);
        let center = SkyPosition::new(40.0, 14.48).unwrap();
        let radius = AngularRadius::from_degrees(10.0).unwrap();
        assert!(table.query_region(&center, &radius).unwrap().is_empty());

        let center = SkyPosition::new(209.30, 14.48).unwrap();
        let hits = table.query_region(&center, &radius).unwrap();
        assert_eq!(hits.len(), table.summary().with_position);
        assert_eq!(hits[0].source, "GJ 3622");
    }

    #[test]
    fn test_query_region_tight_radius() {
        let table = sample_table();
        let center = SkyPosition::new(209.30, 14.48).unwrap();
        let radius = AngularRadius::from_degrees(1.0 / 3600.0).unwrap();

        let hits = table.query_region(&center, &radius).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source, "GJ 3622");
    }

    #[test]
    fn test_open_json_export() {
        let file = write_json(
            r#"[
                {"source": "GJ 3622", "ra": 209.3, "dec": 14.48, "reference": "Gaia23", "epoch": 2000.0},
                {"source": "No Position", "ra": null, "dec": null}
            ]"#,
        );

        let table = SourceTable::open(file.path()).unwrap();
        assert_eq!(table.len(), 2);

        let first = &table.records()[0];
        assert_eq!(first.reference.as_deref(), Some("Gaia23"));
        assert_eq!(first.extra.get("epoch"), Some(&serde_json::json!(2000.0)));
        assert!(table.records()[1].position().is_none());

        let summary = table.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.with_position, 1);
    }

    #[test]
    fn test_open_missing_file() {
        let err = SourceTable::open("/nonexistent/sources.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("Failed to read catalog file"));
    }

    #[test]
    fn test_open_bad_json() {
        let file = write_json(r#"{"not": "an array"}"#);
        let err = SourceTable::open(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Format { .. }));
    }

    #[test]
    fn test_record_position_validates() {
        assert!(SourceRecord::new("a", Some(10.0), Some(10.0)).position().is_some());
        assert!(SourceRecord::new("b", Some(400.0), Some(10.0)).position().is_none());
        assert!(SourceRecord::new("c", Some(10.0), None).position().is_none());
    }

    #[test]
    fn test_record_columns() {
        let mut record = SourceRecord::new("TWA 27", Some(181.8893), None);
        record.shortname = Some("1207-3932".into());
        record.extra.insert("designation".into(), serde_json::json!("2M1207"));
        record.extra.insert("epoch".into(), serde_json::json!(2000));
        record.extra.insert("notes".into(), serde_json::Value::Null);

        assert_eq!(record.column("source").as_deref(), Some("TWA 27"));
        assert_eq!(record.column("shortname").as_deref(), Some("1207-3932"));
        assert_eq!(record.column("ra").as_deref(), Some("181.8893"));
        assert_eq!(record.column("dec"), None);
        assert_eq!(record.column("designation").as_deref(), Some("2M1207"));
        assert_eq!(record.column("epoch").as_deref(), Some("2000"));
        assert_eq!(record.column("notes"), None);
        assert_eq!(record.column("missing"), None);
    }

    #[test]
    fn test_summary_display() {
        let output = sample_table().summary().to_string();
        assert!(output.contains("Sources: 5"));
        assert!(output.contains("With valid position: 4"));
        assert!(output.contains("Without position: 1"));
    }
}
