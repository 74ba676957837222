//! Indexed view of one catalog document.
//!
//! The index enforces the catalog schema version, promotes every raw record
//! (surfacing `InvalidRecordError` for authoring mistakes), and rejects
//! duplicate names so lookups and display keys stay unambiguous.

use crate::catalog::model::{CatalogDocument, CatalogMetadata, CatalogRecord};
use crate::catalog::{CatalogKey, Facet, RecordType};
use crate::facets::facet_options;
use crate::query::{FilterState, SearchFields, query};
use crate::schema_loader::{
    SchemaLoadOptions, is_valid_token, load_json_schema, schema_version_from_file,
    validate_instance,
};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const DEFAULT_SCHEMA_VERSION: &str = "design_catalog_v1";
pub const CATALOG_SCHEMA_FILE: &str = "schema/design_catalog.schema.json";

#[derive(Debug, Clone)]
/// A validated catalog plus a name lookup table.
pub struct CatalogIndex {
    metadata: CatalogMetadata,
    search_fields: SearchFields,
    facets: Vec<Facet>,
    records: Vec<CatalogRecord>,
    by_name: BTreeMap<String, usize>,
}

impl CatalogIndex {
    /// Load a catalog file, validate it against the bundled schema, and index
    /// its records.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening catalog {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        validate_against_schema(path, &value)?;

        let document: CatalogDocument = serde_json::from_value(value)
            .with_context(|| format!("decoding catalog {}", path.display()))?;
        let index = Self::from_document(document)
            .with_context(|| format!("loading {}", path.display()))?;
        tracing::info!(
            catalog = %index.key().0,
            records = index.len(),
            path = %path.display(),
            "loaded catalog"
        );
        Ok(index)
    }

    /// Build an index from an already-decoded document. Skips JSON Schema
    /// validation but applies every other check.
    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        validate_schema_version(&document.schema_version)?;
        validate_catalog_metadata(&document.catalog)?;

        let default_type = document.default_type.unwrap_or(RecordType::Official);
        let mut records = Vec::with_capacity(document.records.len());
        for (idx, raw) in document.records.into_iter().enumerate() {
            records.push(raw.into_record(idx, &default_type)?);
        }
        let by_name = build_name_index(&records)?;

        Ok(Self {
            metadata: document.catalog,
            search_fields: SearchFields::new(document.search_fields),
            facets: document.facets,
            records,
            by_name,
        })
    }

    /// The catalog key declared in the loaded file.
    pub fn key(&self) -> &CatalogKey {
        &self.metadata.key
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Facet dimensions this catalog offers for filtering.
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn search_fields(&self) -> &SearchFields {
        &self.search_fields
    }

    /// Records in authored order.
    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a record by exact name.
    pub fn record(&self, name: &str) -> Option<&CatalogRecord> {
        self.by_name.get(name).map(|idx| &self.records[*idx])
    }

    /// Run `query` with this catalog's searchable fields.
    pub fn query(&self, state: &FilterState) -> Vec<CatalogRecord> {
        query(&self.records, state, &self.search_fields)
    }

    /// Option list for one facet across the whole catalog.
    pub fn facet_options(&self, facet: &Facet) -> Vec<String> {
        facet_options(&self.records, facet)
    }
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if !is_valid_token(schema_version) {
        bail!(
            "schema_version must match ^[A-Za-z0-9_.-]+$, got '{}'",
            schema_version
        );
    }

    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }
    Ok(())
}

fn allowed_schema_versions() -> BTreeSet<String> {
    let on_disk = schema_version_from_file(&canonical_catalog_schema_path());
    BTreeSet::from_iter([on_disk.unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_string())])
}

fn canonical_catalog_schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(CATALOG_SCHEMA_FILE)
}

fn validate_catalog_metadata(meta: &CatalogMetadata) -> Result<()> {
    if !is_valid_token(&meta.key.0) {
        bail!("catalog.key must match ^[A-Za-z0-9_.-]+$, got '{}'", meta.key.0);
    }
    if meta.title.trim().is_empty() {
        bail!("catalog.title must not be empty");
    }
    if meta.labels.iter().any(|label| label.trim().is_empty()) {
        bail!("catalog.labels must not contain empty entries");
    }
    Ok(())
}

fn build_name_index(records: &[CatalogRecord]) -> Result<BTreeMap<String, usize>> {
    let mut map = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        if let Some(first) = map.insert(record.name.clone(), idx) {
            bail!(
                "duplicate record name '{}' at records[{}] (first seen at records[{}])",
                record.name,
                idx,
                first
            );
        }
    }
    Ok(map)
}

fn validate_against_schema(catalog_path: &Path, catalog: &Value) -> Result<()> {
    let catalog_version = catalog
        .get("schema_version")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let schema_path = resolve_catalog_schema_path(catalog_path);
    let allowed = allowed_schema_versions();
    let schema = load_json_schema(
        &schema_path,
        SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            expected_version: Some(&catalog_version),
            patch_schema_version_const: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("loading catalog schema {}", schema_path.display()))?;

    validate_instance(
        &schema.compiled,
        catalog,
        &format!("catalog {}", catalog_path.display()),
    )
}

/// Prefer a schema shipped next to the catalog directory, then the crate's own.
fn resolve_catalog_schema_path(catalog_path: &Path) -> PathBuf {
    if let Some(base) = catalog_path.parent().and_then(|p| p.parent()) {
        let candidate = base.join(CATALOG_SCHEMA_FILE);
        if candidate.exists() {
            return candidate;
        }
    }
    canonical_catalog_schema_path()
}
