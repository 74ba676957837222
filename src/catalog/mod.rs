//! Catalog documents and their validated, indexed form.
//!
//! This module wraps the JSON catalogs under `catalogs/` so callers can load
//! a validated snapshot with typed facet tokens. Callers use `CatalogIndex`
//! to query one catalog and `CatalogRepository` when several are loaded.

pub mod identity;
pub mod index;
pub mod model;
pub mod repository;

pub use identity::{CatalogKey, Facet, Health, Lifecycle, RecordType, UsageLevel};
pub use index::{CATALOG_SCHEMA_FILE, CatalogIndex};
pub use model::{
    CatalogDocument, CatalogMetadata, CatalogRecord, InvalidRecordError, RawRecord, RecordLinks,
    RecordVariant, parse_updated,
};
pub use repository::{CatalogRepository, catalog_files};
