//! Holds several loaded catalogs for lookup by key.
//!
//! The site serves one catalog per page (components, patterns, community,
//! primitives); the repository keeps them side by side so cross-catalog checks
//! and key-based selection stay explicit.

use crate::catalog::identity::CatalogKey;
use crate::catalog::index::CatalogIndex;
use crate::catalog::model::CatalogRecord;
use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
/// In-memory store for catalogs keyed by `CatalogKey`.
pub struct CatalogRepository {
    catalogs: BTreeMap<CatalogKey, CatalogIndex>,
}

impl CatalogRepository {
    /// Load every `*.json` catalog directly under `dir`, in file-name order.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut repository = Self::default();
        for path in catalog_files(dir)? {
            let index = CatalogIndex::load(&path)?;
            if repository.get(index.key()).is_some() {
                bail!(
                    "catalog key '{}' declared twice (again in {})",
                    index.key().0,
                    path.display()
                );
            }
            repository.register(index);
        }
        Ok(repository)
    }

    /// Register a catalog, replacing any catalog with the same key.
    pub fn register(&mut self, catalog: CatalogIndex) {
        self.catalogs.insert(catalog.key().clone(), catalog);
    }

    /// Fetch a catalog by key, if present.
    pub fn get(&self, key: &CatalogKey) -> Option<&CatalogIndex> {
        self.catalogs.get(key)
    }

    /// Find the first catalog (in key order) holding a record with this name.
    pub fn locate(&self, name: &str) -> Option<(&CatalogKey, &CatalogRecord)> {
        self.catalogs
            .iter()
            .find_map(|(key, catalog)| catalog.record(name).map(|record| (key, record)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &CatalogKey> {
        self.catalogs.keys()
    }

    pub fn catalogs(&self) -> impl Iterator<Item = &CatalogIndex> {
        self.catalogs.values()
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

/// List `*.json` files directly under `dir`, sorted.
pub fn catalog_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
