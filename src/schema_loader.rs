//! JSON Schema loading with schema-version enforcement.
//!
//! Catalog documents carry a `schema_version`; the loader checks it against
//! the allowed set, optionally pins the schema's `schema_version` const to the
//! document's version, and compiles a validator.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Result of loading and compiling a JSON Schema.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

/// Controls how schemas are normalized before compilation.
pub(crate) struct SchemaLoadOptions<'a> {
    /// Where to find the schema_version const inside the schema payload.
    pub schema_version_pointer: &'a str,
    /// Version the caller expects; overrides the schema's embedded const.
    pub expected_version: Option<&'a str>,
    /// Allowed schema_version values; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
    /// Rewrite the schema_version const to the resolved version.
    pub patch_schema_version_const: bool,
}

impl Default for SchemaLoadOptions<'_> {
    fn default() -> Self {
        Self {
            schema_version_pointer: "/properties/schema_version/const",
            expected_version: None,
            allowed_versions: None,
            patch_schema_version_const: false,
        }
    }
}

pub(crate) fn load_json_schema(
    path: &Path,
    options: SchemaLoadOptions<'_>,
) -> Result<SchemaLoadResult> {
    let file = File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
    let mut schema: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing schema {}", path.display()))?;

    let schema_version = match options.expected_version {
        Some(version) => version.to_string(),
        None => extract_schema_version(&schema, options.schema_version_pointer)
            .ok_or_else(|| anyhow!("schema {} missing schema_version const", path.display()))?,
    };

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    if options.patch_schema_version_const {
        let target = schema
            .pointer_mut(options.schema_version_pointer)
            .ok_or_else(|| {
                anyhow!(
                    "schema missing pointer {} for schema_version const",
                    options.schema_version_pointer
                )
            })?;
        *target = Value::String(schema_version.clone());
    }

    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling schema {}: {err}", path.display()))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

/// Validate `instance`, joining every violation into one error.
pub(crate) fn validate_instance(schema: &JSONSchema, instance: &Value, label: &str) -> Result<()> {
    if let Err(errors) = schema.validate(instance) {
        let details = errors
            .map(|err| format!("{}: {err}", err.instance_path))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{label} failed schema validation:\n{details}");
    }
    Ok(())
}

/// Read the `schema_version` const from a schema file, if it has a valid one.
pub(crate) fn schema_version_from_file(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let value: Value = serde_json::from_reader(BufReader::new(file)).ok()?;
    extract_schema_version(&value, "/properties/schema_version/const")
}

pub(crate) fn is_valid_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    is_valid_token(version).then(|| version.to_string())
}
