//! Faceted search and ordering over an in-memory record collection.
//!
//! `query` is the single entry point: it keeps the records that match the
//! search term and every active facet selection, then orders them by the
//! requested sort key. It never touches its inputs and always recomputes from
//! the full collection, so callers can invoke it on every filter change.

use crate::catalog::Facet;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Outcome of looking up a facet on one record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FacetValue<'a> {
    /// The record's type does not expose this facet; selections on it are
    /// vacuously satisfied.
    NotApplicable,
    /// The facet applies but the record has no value for it.
    Missing,
    Value(&'a str),
}

/// Text fields a catalog may search in addition to name and description.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Name,
    Description,
    Owner,
    Tags,
}

/// The searchable field set for one catalog. Always contains `name` and
/// `description`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchFields(Vec<SearchField>);

impl SearchFields {
    pub fn new(fields: impl IntoIterator<Item = SearchField>) -> Self {
        let mut all = vec![SearchField::Name, SearchField::Description];
        for field in fields {
            if !all.contains(&field) {
                all.push(field);
            }
        }
        Self(all)
    }

    pub fn fields(&self) -> &[SearchField] {
        &self.0
    }
}

impl Default for SearchFields {
    fn default() -> Self {
        Self::new([])
    }
}

/// Ordering applied to query results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    UpdatedDesc,
    UpdatedAsc,
    UsageDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::UpdatedDesc,
        SortKey::UpdatedAsc,
        SortKey::UsageDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::UpdatedDesc => "updated-desc",
            SortKey::UpdatedAsc => "updated-asc",
            SortKey::UsageDesc => "usage-desc",
        }
    }

    /// Parse a sort key; anything unrecognized falls back to `name-asc`.
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value.trim())
            .unwrap_or_default()
    }
}

impl Serialize for SortKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Self::parse).unwrap_or_default())
    }
}

/// One facet selection: the "all" sentinel or an exact value.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Selection {
    #[default]
    All,
    Value(String),
}

impl Selection {
    /// `all` (any case) and the empty string mean "no constraint"; everything
    /// else is kept verbatim for exact matching.
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Value(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Selection::All => "all",
            Selection::Value(value) => value,
        }
    }
}

impl Serialize for Selection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Search term, facet selections, and sort key chosen by the user.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub search_term: String,
    pub facet_selections: BTreeMap<Facet, Selection>,
    pub sort_key: SortKey,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_facet(mut self, facet: Facet, selection: &str) -> Self {
        self.facet_selections
            .insert(facet, Selection::parse(selection));
        self
    }

    pub fn with_sort(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Facets with a concrete (non-"all") selection.
    pub fn active_facets(&self) -> impl Iterator<Item = (&Facet, &str)> {
        self.facet_selections
            .iter()
            .filter_map(|(facet, selection)| match selection {
                Selection::All => None,
                Selection::Value(value) => Some((facet, value.as_str())),
            })
    }
}

/// Read access the engine needs from a record.
pub trait CatalogEntry {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn facet_value(&self, facet: &Facet) -> FacetValue<'_>;
    /// Text for a searchable field; multi-valued fields return every value.
    fn search_text(&self, field: SearchField) -> Vec<&str>;
    fn updated_on(&self) -> Option<NaiveDate>;
    fn usage_rank(&self) -> u8;
}

/// Compute the visible, ordered subset of `records` for `state`.
///
/// Matching is a case-insensitive substring test over `fields` plus an exact,
/// case-sensitive comparison for every active facet that applies to the
/// record. The sort is stable, so records that compare equal keep their input
/// order.
pub fn query<R>(records: &[R], state: &FilterState, fields: &SearchFields) -> Vec<R>
where
    R: CatalogEntry + Clone,
{
    let needle = state.search_term.to_lowercase();
    let active: Vec<(&Facet, &str)> = state.active_facets().collect();

    let mut matched: Vec<&R> = records
        .iter()
        .filter(|record| matches_search(*record, &needle, fields) && matches_facets(*record, &active))
        .collect();
    matched.sort_by(|a, b| compare(*a, *b, state.sort_key));

    tracing::debug!(
        total = records.len(),
        matched = matched.len(),
        active_facets = active.len(),
        sort = state.sort_key.as_str(),
        "catalog query"
    );

    matched.into_iter().cloned().collect()
}

fn matches_search<R: CatalogEntry>(record: &R, needle: &str, fields: &SearchFields) -> bool {
    if needle.is_empty() {
        return true;
    }
    fields.fields().iter().any(|field| {
        record
            .search_text(*field)
            .into_iter()
            .any(|text| text.to_lowercase().contains(needle))
    })
}

fn matches_facets<R: CatalogEntry>(record: &R, active: &[(&Facet, &str)]) -> bool {
    active
        .iter()
        .all(|(facet, wanted)| match record.facet_value(facet) {
            FacetValue::NotApplicable => true,
            FacetValue::Missing => false,
            FacetValue::Value(value) => value == *wanted,
        })
}

/// Comparator for `sort_key`.
pub fn compare<R: CatalogEntry>(a: &R, b: &R, sort_key: SortKey) -> Ordering {
    match sort_key {
        SortKey::NameAsc => compare_names(a.name(), b.name()),
        SortKey::NameDesc => compare_names(b.name(), a.name()),
        // `None` orders before any date, so undated records read as oldest.
        SortKey::UpdatedDesc => b.updated_on().cmp(&a.updated_on()),
        SortKey::UpdatedAsc => a.updated_on().cmp(&b.updated_on()),
        SortKey::UsageDesc => b
            .usage_rank()
            .cmp(&a.usage_rank())
            .then_with(|| compare_names(a.name(), b.name())),
    }
}

/// Case-insensitive name order with a byte-order tie-break, so `alert`
/// and `Alert` still order deterministically.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
