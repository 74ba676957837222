//! Guard-rail checks over a directory of catalogs.
//!
//! Used by `catalog-lint` and the integration suite to make sure every
//! catalog loads and that community records only reference sub-components
//! that exist somewhere in the loaded catalogs.

use crate::catalog::{CatalogIndex, CatalogRepository, RecordVariant, catalog_files};
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

/// Load every catalog under `dir` and report all problems found.
///
/// Returns the problems rather than short-circuiting so authors see every
/// broken file and reference in one pass. Only a missing/unreadable directory
/// is a hard error.
pub fn lint_catalog_dir(dir: &Path) -> Result<Vec<String>> {
    let mut errors = Vec::new();
    let mut repository = CatalogRepository::default();

    for path in catalog_files(dir)? {
        match CatalogIndex::load(&path) {
            Ok(index) => {
                if repository.get(index.key()).is_some() {
                    errors.push(format!(
                        "{}: catalog key '{}' already declared by another file",
                        path.display(),
                        index.key().0
                    ));
                    continue;
                }
                repository.register(index);
            }
            Err(err) => errors.push(format!("{}: {err:#}", path.display())),
        }
    }

    errors.extend(validate_component_references(&repository));
    Ok(errors)
}

/// Every sub-component listed by a community record must name a record in
/// some registered catalog.
pub fn validate_component_references(repository: &CatalogRepository) -> Vec<String> {
    let mut errors = Vec::new();
    for catalog in repository.catalogs() {
        for record in catalog.records() {
            if !matches!(record.variant, RecordVariant::Community { .. }) {
                continue;
            }
            // Report each dangling name once per record even if listed twice.
            let mut seen = BTreeSet::new();
            for component in &record.components {
                if !seen.insert(component.as_str()) {
                    continue;
                }
                if repository.locate(component).is_none() {
                    errors.push(format!(
                        "{}/{} references unknown component '{}'",
                        catalog.key().0,
                        record.name,
                        component
                    ));
                }
            }
        }
    }
    errors
}
