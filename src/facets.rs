//! Option lists and counts derived from a record collection.
//!
//! These feed the selection controls around a query: which values each facet
//! can take, and how many records of each type a result holds.

use crate::catalog::Facet;
use crate::query::{CatalogEntry, FacetValue};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct values of `facet`, sorted, over the records the facet applies to.
pub fn facet_options<R: CatalogEntry>(records: &[R], facet: &Facet) -> Vec<String> {
    let values: BTreeSet<&str> = records
        .iter()
        .filter_map(|record| match record.facet_value(facet) {
            FacetValue::Value(value) => Some(value),
            FacetValue::Missing | FacetValue::NotApplicable => None,
        })
        .collect();
    values.into_iter().map(str::to_string).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Record count in total and per record type.
pub struct QuerySummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

pub fn summarize<R: CatalogEntry>(records: &[R]) -> QuerySummary {
    let mut summary = QuerySummary {
        total: records.len(),
        ..Default::default()
    };
    for record in records {
        if let FacetValue::Value(kind) = record.facet_value(&Facet::Type) {
            *summary.by_type.entry(kind.to_string()).or_insert(0) += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RawRecord, RecordType};
    use crate::CatalogRecord;
    use serde_json::json;

    fn records() -> Vec<CatalogRecord> {
        let raw = json!([
            {"name": "Button", "description": "d", "type": "official", "lifecycle": "Stable",
             "category": "Actions", "owner": "Web Design Systems Team", "lastUpdated": "2024-01-15"},
            {"name": "Modal", "description": "d", "type": "official", "lifecycle": "Beta",
             "category": "Overlays", "owner": "Web Design Systems Team", "lastUpdated": "2024-01-10"},
            {"name": "Input", "description": "d", "type": "official",
             "category": "Forms", "owner": "Web Design Systems Team", "lastUpdated": "2024-01-12"},
            {"name": "SmartGrid", "description": "d", "type": "community", "health": "Caution",
             "category": "Data Display", "owner": "Budget Team", "lastUpdated": "2023-11-22"}
        ]);
        serde_json::from_value::<Vec<RawRecord>>(raw)
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| raw.into_record(idx, &RecordType::Official).unwrap())
            .collect()
    }

    #[test]
    fn options_are_sorted_distinct_and_type_scoped() {
        let records = records();
        assert_eq!(
            facet_options(&records, &Facet::Lifecycle),
            vec!["Beta", "Stable"]
        );
        assert_eq!(facet_options(&records, &Facet::Health), vec!["Caution"]);
        assert_eq!(
            facet_options(&records, &Facet::Owner),
            vec!["Budget Team", "Web Design Systems Team"]
        );
    }

    #[test]
    fn summary_counts_each_type() {
        let summary = summarize(&records());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_type.get("official"), Some(&3));
        assert_eq!(summary.by_type.get("community"), Some(&1));
    }
}
