//! Deserializable representation of a catalog document under `catalogs/`.
//!
//! Records arrive as loosely-typed `RawRecord`s and are promoted into
//! `CatalogRecord`s once the required fields are confirmed. The record's
//! `type` tag picks a `RecordVariant`, which decides which status facets the
//! record exposes. Use `CatalogIndex` for loading and validation; use these
//! structs directly when building records in memory.

use crate::catalog::identity::{CatalogKey, Facet, Health, Lifecycle, RecordType, UsageLevel};
use crate::query::{CatalogEntry, FacetValue, SearchField};
use chrono::{DateTime, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Full catalog document as stored on disk.
pub struct CatalogDocument {
    #[serde(rename = "schema_version")]
    pub schema_version: String,
    pub catalog: CatalogMetadata,
    #[serde(default)]
    pub default_type: Option<RecordType>,
    #[serde(default)]
    pub search_fields: Vec<SearchField>,
    #[serde(default)]
    pub facets: Vec<Facet>,
    pub records: Vec<RawRecord>,
}

#[derive(Clone, Debug, Deserialize)]
/// Catalog identity and display metadata.
pub struct CatalogMetadata {
    pub key: CatalogKey,
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A record as authored, before required fields are checked.
pub struct RawRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<RecordType>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default, alias = "status")]
    pub lifecycle: Option<Lifecycle>,
    #[serde(default)]
    pub health: Option<Health>,
    #[serde(default)]
    pub usage: Option<UsageLevel>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub endorsed: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub storybook: Option<String>,
    #[serde(default)]
    pub figma: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A record is missing one of `name`, `description`, `category`, `owner`,
/// or `lastUpdated`.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("records[{index}]{} is missing required field '{field}'", describe_name(.name))]
pub struct InvalidRecordError {
    /// Zero-based position in the input collection.
    pub index: usize,
    /// The record's name when it has one.
    pub name: Option<String>,
    pub field: &'static str,
}

fn describe_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" (\"{name}\")"),
        None => String::new(),
    }
}

/// Type-specific part of a record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecordVariant {
    Official { lifecycle: Option<Lifecycle> },
    Community { health: Option<Health>, endorsed: bool },
    Other { kind: String },
}

impl RecordVariant {
    pub fn type_name(&self) -> &str {
        match self {
            RecordVariant::Official { .. } => RecordType::Official.as_str(),
            RecordVariant::Community { .. } => RecordType::Community.as_str(),
            RecordVariant::Other { kind } => kind.as_str(),
        }
    }

    pub fn record_type(&self) -> RecordType {
        RecordType::from_token(self.type_name())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
/// Documentation links shown next to a record.
pub struct RecordLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storybook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figma: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

impl RecordLinks {
    fn is_empty(&self) -> bool {
        self.documentation.is_none()
            && self.storybook.is_none()
            && self.figma.is_none()
            && self.github.is_none()
    }
}

/// A validated catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogRecord {
    pub name: String,
    pub description: String,
    pub category: String,
    pub owner: String,
    pub variant: RecordVariant,
    pub usage: Option<UsageLevel>,
    /// `lastUpdated` exactly as authored.
    pub last_updated: String,
    /// Parsed form of `last_updated`; `None` when the text is not a date.
    pub updated_on: Option<NaiveDate>,
    /// Sub-components a community record is assembled from.
    pub components: Vec<String>,
    /// Sub-component names, pattern examples, and free tags; searched as one
    /// list.
    pub tags: Vec<String>,
    pub links: RecordLinks,
    pub is_new: bool,
    pub extra: BTreeMap<String, Value>,
}

impl RawRecord {
    /// Promote a raw record, checking required fields in declaration order.
    ///
    /// `default_type` applies when the record carries no `type` tag. Status
    /// fields that do not belong to the resolved type are dropped.
    pub fn into_record(
        self,
        index: usize,
        default_type: &RecordType,
    ) -> Result<CatalogRecord, InvalidRecordError> {
        let authored_name = self.name.filter(|name| !name.trim().is_empty());
        let missing = |field: &'static str| InvalidRecordError {
            index,
            name: authored_name.clone(),
            field,
        };

        let name = authored_name.clone().ok_or_else(|| missing("name"))?;
        let description = self.description.ok_or_else(|| missing("description"))?;
        let category = self.category.ok_or_else(|| missing("category"))?;
        let owner = self.owner.ok_or_else(|| missing("owner"))?;
        let last_updated = self.last_updated.ok_or_else(|| missing("lastUpdated"))?;

        let variant = match self.kind.unwrap_or_else(|| default_type.clone()) {
            RecordType::Official => RecordVariant::Official {
                lifecycle: self.lifecycle,
            },
            RecordType::Community => RecordVariant::Community {
                health: self.health,
                endorsed: self.endorsed,
            },
            RecordType::Other(kind) => RecordVariant::Other { kind },
        };

        let mut tags = self.components.clone();
        tags.extend(self.examples);
        tags.extend(self.tags);

        Ok(CatalogRecord {
            updated_on: parse_updated(&last_updated),
            name,
            description,
            category,
            owner,
            variant,
            usage: self.usage,
            last_updated,
            components: self.components,
            tags,
            links: RecordLinks {
                documentation: self.documentation,
                storybook: self.storybook,
                figma: self.figma,
                github: self.github,
            },
            is_new: self.is_new,
            extra: self.extra,
        })
    }
}

/// Parse `lastUpdated` as a calendar date. Accepts `YYYY-MM-DD` and RFC 3339
/// timestamps (the date part is kept).
pub fn parse_updated(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

impl CatalogRecord {
    pub fn record_type(&self) -> RecordType {
        self.variant.record_type()
    }

    pub fn lifecycle(&self) -> Option<&Lifecycle> {
        match &self.variant {
            RecordVariant::Official { lifecycle } => lifecycle.as_ref(),
            _ => None,
        }
    }

    pub fn health(&self) -> Option<&Health> {
        match &self.variant {
            RecordVariant::Community { health, .. } => health.as_ref(),
            _ => None,
        }
    }

    pub fn is_endorsed(&self) -> bool {
        matches!(self.variant, RecordVariant::Community { endorsed: true, .. })
    }
}

impl CatalogEntry for CatalogRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn facet_value(&self, facet: &Facet) -> FacetValue<'_> {
        fn present(value: Option<&str>) -> FacetValue<'_> {
            value.map_or(FacetValue::Missing, FacetValue::Value)
        }

        match (facet, &self.variant) {
            (Facet::Type, variant) => FacetValue::Value(variant.type_name()),
            (Facet::Category, _) => FacetValue::Value(&self.category),
            (Facet::Owner, _) => FacetValue::Value(&self.owner),
            (Facet::Usage, _) => present(self.usage.as_ref().map(UsageLevel::as_str)),
            (Facet::Lifecycle, RecordVariant::Official { lifecycle }) => {
                present(lifecycle.as_ref().map(Lifecycle::as_str))
            }
            (Facet::Health, RecordVariant::Community { health, .. }) => {
                present(health.as_ref().map(Health::as_str))
            }
            (Facet::Endorsement, RecordVariant::Community { endorsed, .. }) => {
                if *endorsed {
                    FacetValue::Value("recommended")
                } else {
                    FacetValue::Missing
                }
            }
            (Facet::Lifecycle | Facet::Health | Facet::Endorsement, _) => {
                FacetValue::NotApplicable
            }
            (Facet::Other(key), _) => match self.extra.get(key).and_then(Value::as_str) {
                Some(value) => FacetValue::Value(value),
                None => FacetValue::NotApplicable,
            },
        }
    }

    fn search_text(&self, field: SearchField) -> Vec<&str> {
        match field {
            SearchField::Name => vec![self.name.as_str()],
            SearchField::Description => vec![self.description.as_str()],
            SearchField::Owner => vec![self.owner.as_str()],
            SearchField::Tags => self.tags.iter().map(String::as_str).collect(),
        }
    }

    fn updated_on(&self) -> Option<NaiveDate> {
        self.updated_on
    }

    fn usage_rank(&self) -> u8 {
        self.usage.as_ref().map_or(0, UsageLevel::rank)
    }
}

impl Serialize for CatalogRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("description", &self.description)?;
        map.serialize_entry("type", self.variant.type_name())?;
        map.serialize_entry("category", &self.category)?;
        map.serialize_entry("owner", &self.owner)?;
        match &self.variant {
            RecordVariant::Official {
                lifecycle: Some(lifecycle),
            } => map.serialize_entry("lifecycle", lifecycle)?,
            RecordVariant::Community { health, endorsed } => {
                if let Some(health) = health {
                    map.serialize_entry("health", health)?;
                }
                map.serialize_entry("endorsed", endorsed)?;
            }
            _ => {}
        }
        if let Some(usage) = &self.usage {
            map.serialize_entry("usage", usage)?;
        }
        map.serialize_entry("lastUpdated", &self.last_updated)?;
        if !self.components.is_empty() {
            map.serialize_entry("components", &self.components)?;
        }
        // `tags` leads with the components; write only the rest so a
        // serialized record reads back to the same search list.
        let rest = match self.tags.strip_prefix(self.components.as_slice()) {
            Some(rest) => rest,
            None => self.tags.as_slice(),
        };
        if !rest.is_empty() {
            map.serialize_entry("tags", rest)?;
        }
        if !self.links.is_empty() {
            map.serialize_entry("links", &self.links)?;
        }
        if self.is_new {
            map.serialize_entry("isNew", &true)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
