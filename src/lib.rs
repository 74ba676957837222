//! Faceted search over design-system catalogs.
//!
//! The crate exposes the catalog types (typed facet tokens, validated
//! records, indexed catalogs) and the query engine that every catalog page
//! shares: a search term, a set of facet selections, and a sort key in; the
//! ordered matching records out. Public functions here also cover repository
//! discovery and record stream parsing used by the helper binaries.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::{
    env,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod facets;
pub mod lint;
pub mod query;
mod schema_loader;

pub use catalog::{
    CatalogIndex, CatalogKey, CatalogRecord, CatalogRepository, Facet, Health,
    InvalidRecordError, Lifecycle, RawRecord, RecordType, RecordVariant, UsageLevel,
};
pub use facets::{QuerySummary, facet_options, summarize};
pub use lint::{lint_catalog_dir, validate_component_references};
pub use query::{
    CatalogEntry, FacetValue, FilterState, SearchField, SearchFields, Selection, SortKey, query,
};

const ROOT_SENTINEL: &str = catalog::CATALOG_SCHEMA_FILE;
const CATALOG_DIR: &str = "catalogs";
const DEFAULT_CATALOG: &str = "components";

/// Returns true when `candidate` looks like the repository root.
fn is_repo_root(candidate: &Path) -> bool {
    candidate.join(ROOT_SENTINEL).is_file() && candidate.join(CATALOG_DIR).is_dir()
}

fn repo_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_repo_root(&hint_path) {
        return None;
    }
    hint_path.canonicalize().ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = start.canonicalize().ok()?;
    loop {
        if is_repo_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Locate the repository root holding `catalogs/` and the catalog schema.
///
/// Honors `CATALOG_ROOT` when it points at a real root, then climbs up from
/// the current executable, then falls back to the build-time hint.
pub fn find_repo_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var("CATALOG_ROOT") {
        if let Some(root) = repo_root_from_hint(&env_root) {
            return Ok(root);
        }
        tracing::warn!(root = %env_root, "CATALOG_ROOT does not look like a catalog root; ignoring");
    }

    if let Some(root) = env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .and_then(search_upwards)
    {
        return Ok(root);
    }

    if let Some(root) = option_env!("CATALOG_ROOT_HINT").and_then(repo_root_from_hint) {
        return Ok(root);
    }

    bail!("Unable to locate the catalog root. Set CATALOG_ROOT to the repository checkout.");
}

/// Directory holding the bundled catalog documents.
pub fn default_catalog_dir(repo_root: &Path) -> PathBuf {
    repo_root.join(CATALOG_DIR)
}

/// Resolve a catalog argument to a file path.
///
/// An existing path wins; otherwise the value names a bundled catalog
/// (`components` resolves to `catalogs/components.json`). Without an
/// argument the components catalog is used.
pub fn resolve_catalog_path(repo_root: &Path, requested: Option<&str>) -> PathBuf {
    let name = match requested.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => {
            let as_path = PathBuf::from(value);
            if as_path.is_file() {
                return as_path;
            }
            value
        }
        None => DEFAULT_CATALOG,
    };
    let file = if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{name}.json")
    };
    default_catalog_dir(repo_root).join(file)
}

/// Parse records from a JSON array, a single JSON object, or NDJSON.
///
/// Records are validated as they are read: the first record missing a
/// required field fails the whole stream with its position. Records without
/// a `type` tag are treated as `official`.
pub fn parse_record_stream(input: &str) -> Result<Vec<CatalogRecord>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let raws: Vec<RawRecord> = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()
            .context("Unable to parse JSON array of catalog records")?,
        Ok(value @ Value::Object(_)) => {
            vec![serde_json::from_value(value).context("Unable to parse catalog record")?]
        }
        Ok(_) => bail!("Unsupported JSON input; expected object or array"),
        Err(_) => {
            let mut raws = Vec::new();
            for (idx, line) in trimmed.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let raw: RawRecord = serde_json::from_str(line).with_context(|| {
                    format!("Unable to parse catalog record from line {}", idx + 1)
                })?;
                raws.push(raw);
            }
            raws
        }
    };

    let mut records = Vec::with_capacity(raws.len());
    for (idx, raw) in raws.into_iter().enumerate() {
        records.push(raw.into_record(idx, &RecordType::Official)?);
    }
    Ok(records)
}
