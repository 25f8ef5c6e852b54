//! Search core for an astronomical source-catalog browser.
//!
//! Turns the raw strings of a search form into a validated cone query,
//! hands it to a catalog engine, and caps what comes back. Object-name
//! lookup goes through the same engine.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`position`] | [`SkyPosition`], [`parse_coordinates`], [`parse_ra_dec`], sexagesimal formatting |
//! | [`radius`] | [`AngularRadius`], [`RadiusUnit`], [`normalize_radius`], the 10° cap |
//! | [`query`] | [`SourceCatalog`] trait, [`SourceTable`], [`run_cone_search`], [`cap_results`], [`search_objects`] |
//! | [`config`] | [`Settings`] from `ASTRO_WEB_*` environment variables |
//! | [`errors`] | [`InputError`], [`CatalogError`], [`SearchError`] |
//!
//! # Quick Start
//!
//! ```
//! use astro_search::{run_cone_search, ConeSearchRequest, SourceRecord, SourceTable};
//!
//! let table = SourceTable::from_records(vec![
//!     SourceRecord::new("GJ 3622", Some(209.30), Some(14.48)),
//! ]);
//!
//! let request = ConeSearchRequest::combined("13h57m12s +14d28m39s", "30", "arcminutes");
//! let outcome = run_cone_search(&table, &request)?;
//!
//! assert_eq!(outcome.query.radius.degrees(), 0.5);
//! assert_eq!(outcome.results.records[0].source, "GJ 3622");
//! assert!(!outcome.results.truncated);
//! # Ok::<(), astro_search::SearchError>(())
//! ```
//!
//! # Features
//!
//! - **`cli`** — builds the `astro-search` binary for browsing and searching
//!   a JSON export of the Sources table from the command line.

pub mod config;
pub mod errors;
pub mod position;
pub mod query;
pub mod radius;

pub use config::Settings;
pub use errors::{Axis, CatalogError, InputError, InputErrorKind, SearchError};
pub use position::{parse_coordinates, parse_ra_dec, SkyPosition};
pub use query::{
    cap_results, run_cone_search, search_objects, CappedResults, ConeQuery, ConeSearchOutcome,
    ConeSearchRequest, CoordinateInput, NameSearchOutcome, SourceCatalog, SourceRecord,
    SourceTable, MAX_RESULTS,
};
pub use radius::{normalize_radius, AngularRadius, RadiusUnit, MAX_RADIUS_DEG};
