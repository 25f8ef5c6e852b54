//! Deployment settings read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `ASTRO_WEB_DATABASE_URL` | `sqlite:///SIMPLE.sqlite` | Location of the sources database |
//! | `ASTRO_WEB_SOURCE_URL_BASE` | `/source/` | Prefix for per-source detail pages |
//! | `ASTRO_WEB_SOURCE_COLUMN` | `source` | Column whose value names the detail page |
//!
//! [`Settings`] is an ordinary value passed to whoever needs it; nothing
//! here is global.

use std::path::PathBuf;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::query::SourceRecord;

pub const DATABASE_URL_VAR: &str = "ASTRO_WEB_DATABASE_URL";
pub const SOURCE_URL_BASE_VAR: &str = "ASTRO_WEB_SOURCE_URL_BASE";
pub const SOURCE_COLUMN_VAR: &str = "ASTRO_WEB_SOURCE_COLUMN";

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///SIMPLE.sqlite";
pub const DEFAULT_SOURCE_URL_BASE: &str = "/source/";
pub const DEFAULT_SOURCE_COLUMN: &str = "source";

/// Characters left unescaped in a source-page path segment: RFC 3986
/// unreserved characters plus `/`.
const SOURCE_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub source_url_base: String,
    pub source_column: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            source_url_base: DEFAULT_SOURCE_URL_BASE.to_string(),
            source_column: DEFAULT_SOURCE_COLUMN.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            database_url: lookup(DATABASE_URL_VAR).unwrap_or(defaults.database_url),
            source_url_base: lookup(SOURCE_URL_BASE_VAR).unwrap_or(defaults.source_url_base),
            source_column: lookup(SOURCE_COLUMN_VAR).unwrap_or(defaults.source_column),
        }
    }

    /// Local file behind `database_url`.
    ///
    /// Handles `sqlite:///` and `file://` URLs and bare paths. Returns `None`
    /// for any other scheme (e.g. a network database).
    pub fn database_path(&self) -> Option<PathBuf> {
        let url = self.database_url.trim();
        if let Some(path) = url.strip_prefix("sqlite:///") {
            return Some(PathBuf::from(path));
        }
        if let Some(path) = url.strip_prefix("file://") {
            return Some(PathBuf::from(path));
        }
        if url.contains("://") {
            return None;
        }
        Some(PathBuf::from(url))
    }

    /// Detail-page URL for a source name.
    pub fn source_url(&self, source: &str) -> String {
        format!(
            "{}{}",
            self.source_url_base,
            utf8_percent_encode(source, SOURCE_PATH)
        )
    }

    /// Detail-page URL for a row, built from its `source_column` value.
    ///
    /// `None` when the row lacks that column or it is null.
    pub fn record_url(&self, record: &SourceRecord) -> Option<String> {
        record
            .column(&self.source_column)
            .map(|value| self.source_url(&value))
    }
}
