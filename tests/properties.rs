//! Property checks for the query engine over generated record collections.
//!
//! Records are drawn from small token pools so facet selections and search
//! terms hit often enough to exercise the interesting paths.

use catalog_query::catalog::RecordLinks;
use catalog_query::query::compare;
use catalog_query::{
    CatalogEntry, CatalogRecord, Facet, FacetValue, FilterState, Health, Lifecycle,
    RecordVariant, SearchField, SearchFields, SortKey, UsageLevel, query,
};
use chrono::NaiveDate;
use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

const CATEGORIES: [&str; 4] = ["Actions", "Forms", "Feedback", "Data Display"];
const OWNERS: [&str; 2] = ["Web Design Systems Team", "Platform Team"];

fn arb_variant() -> impl Strategy<Value = RecordVariant> {
    prop_oneof![
        prop::option::of(prop_oneof![
            Just(Lifecycle::Stable),
            Just(Lifecycle::Beta),
            Just(Lifecycle::Experimental),
        ])
        .prop_map(|lifecycle| RecordVariant::Official { lifecycle }),
        (
            prop::option::of(prop_oneof![
                Just(Health::Healthy),
                Just(Health::Caution),
                Just(Health::Critical),
            ]),
            any::<bool>(),
        )
            .prop_map(|(health, endorsed)| RecordVariant::Community { health, endorsed }),
    ]
}

fn arb_usage() -> impl Strategy<Value = Option<UsageLevel>> {
    prop::option::of(prop_oneof![
        Just(UsageLevel::High),
        Just(UsageLevel::Growing),
        Just(UsageLevel::Medium),
        Just(UsageLevel::Low),
        Just(UsageLevel::Other("Unknown".to_string())),
    ])
}

prop_compose! {
    fn arb_record()(
        name in "[A-Za-z][A-Za-z ]{0,10}",
        description in "[a-z ]{0,24}",
        category in prop::sample::select(CATEGORIES.to_vec()),
        owner in prop::sample::select(OWNERS.to_vec()),
        variant in arb_variant(),
        usage in arb_usage(),
        day in prop::option::of(1u32..=28),
        tags in prop::collection::vec("[a-z]{2,6}", 0..3),
    ) -> CatalogRecord {
        let last_updated = match day {
            Some(day) => format!("2024-01-{day:02}"),
            None => "unknown".to_string(),
        };
        CatalogRecord {
            name,
            description,
            category: category.to_string(),
            owner: owner.to_string(),
            variant,
            usage,
            updated_on: day.and_then(|day| NaiveDate::from_ymd_opt(2024, 1, day)),
            last_updated,
            components: Vec::new(),
            tags,
            links: RecordLinks::default(),
            is_new: false,
            extra: BTreeMap::new(),
        }
    }
}

/// Records with a positional suffix so names stay unique within a collection.
fn arb_records() -> impl Strategy<Value = Vec<CatalogRecord>> {
    prop::collection::vec(arb_record(), 0..24).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(idx, mut record)| {
                record.name = format!("{}{idx}", record.name);
                record
            })
            .collect()
    })
}

fn arb_sort_key() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

prop_compose! {
    fn arb_state()(
        search in prop_oneof![Just(String::new()), "[a-zA-Z]{1,3}"],
        category in prop::option::of(prop::sample::select(CATEGORIES.to_vec())),
        lifecycle in prop::option::of(prop::sample::select(vec!["Stable", "Beta", "all"])),
        health in prop::option::of(prop::sample::select(vec!["Healthy", "Caution", "ALL"])),
        owner in prop::option::of(prop::sample::select(OWNERS.to_vec())),
        sort_key in arb_sort_key(),
    ) -> FilterState {
        let mut state = FilterState::new().with_search(search).with_sort(sort_key);
        for (facet, value) in [
            (Facet::Category, category),
            (Facet::Lifecycle, lifecycle),
            (Facet::Health, health),
            (Facet::Owner, owner),
        ] {
            if let Some(value) = value {
                state = state.with_facet(facet, value);
            }
        }
        state
    }
}

fn arb_search_fields() -> impl Strategy<Value = SearchFields> {
    prop_oneof![
        Just(SearchFields::default()),
        Just(SearchFields::new([SearchField::Owner, SearchField::Tags])),
    ]
}

/// Reference search test written against the record fields directly.
fn matches_term(record: &CatalogRecord, needle: &str, fields: &SearchFields) -> bool {
    if needle.is_empty() {
        return true;
    }
    let hit = |text: &str| text.to_lowercase().contains(needle);
    hit(&record.name)
        || hit(&record.description)
        || (fields.fields().contains(&SearchField::Owner) && hit(&record.owner))
        || (fields.fields().contains(&SearchField::Tags) && record.tags.iter().any(|tag| hit(tag)))
}

fn sorted_names(records: &[CatalogRecord]) -> Vec<String> {
    let mut names: Vec<String> = records.iter().map(|record| record.name.clone()).collect();
    names.sort();
    names
}

fn satisfies_facet(record: &CatalogRecord, facet: &Facet, wanted: &str) -> bool {
    match record.facet_value(facet) {
        FacetValue::NotApplicable => true,
        FacetValue::Missing => false,
        FacetValue::Value(value) => value == wanted,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn repeated_queries_agree(
        records in arb_records(),
        state in arb_state(),
        fields in arb_search_fields(),
    ) {
        let first = query(&records, &state, &fields);
        let second = query(&records, &state, &fields);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn query_leaves_inputs_untouched(records in arb_records(), state in arb_state()) {
        let before_records = records.clone();
        let before_state = state.clone();
        let _ = query(&records, &state, &SearchFields::default());
        prop_assert_eq!(records, before_records);
        prop_assert_eq!(state, before_state);
    }

    #[test]
    fn every_result_satisfies_each_constraint(
        records in arb_records(),
        state in arb_state(),
        fields in arb_search_fields(),
    ) {
        let result = query(&records, &state, &fields);
        let needle = state.search_term.to_lowercase();
        for record in &result {
            prop_assert!(records.contains(record));
            prop_assert!(matches_term(record, &needle, &fields));
            for (facet, wanted) in state.active_facets() {
                prop_assert!(satisfies_facet(record, facet, wanted));
            }
        }
    }

    #[test]
    fn every_matching_record_appears_exactly_once(
        records in arb_records(),
        state in arb_state(),
        fields in arb_search_fields(),
    ) {
        let result = query(&records, &state, &fields);
        let needle = state.search_term.to_lowercase();
        let expected: Vec<CatalogRecord> = records
            .iter()
            .filter(|record| {
                matches_term(record, &needle, &fields)
                    && state
                        .active_facets()
                        .all(|(facet, wanted)| satisfies_facet(record, facet, wanted))
            })
            .cloned()
            .collect();
        prop_assert_eq!(sorted_names(&result), sorted_names(&expected));
    }

    #[test]
    fn unconstrained_query_is_a_permutation(records in arb_records(), sort_key in arb_sort_key()) {
        let state = FilterState::new()
            .with_facet(Facet::Category, "all")
            .with_sort(sort_key);
        let result = query(&records, &state, &SearchFields::default());
        prop_assert_eq!(sorted_names(&result), sorted_names(&records));
    }

    #[test]
    fn results_are_ordered_by_sort_key(records in arb_records(), state in arb_state()) {
        let result = query(&records, &state, &SearchFields::default());
        for pair in result.windows(2) {
            prop_assert_ne!(compare(&pair[0], &pair[1], state.sort_key), Ordering::Greater);
        }
    }
}
