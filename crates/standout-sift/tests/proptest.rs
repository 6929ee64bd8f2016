//! Property-based tests for sift using proptest.

use proptest::prelude::*;
use serde_json::{json, Value as Json};
use standout_sift::{
    default_filter, filter_items, highlight_result, FilterMode, FilterOptions, FilterProps,
    FilterView, Highlight, MatchResult, Value,
};

// ============================================================================
// Test helpers
// ============================================================================

const KEYS: [&str; 3] = ["a", "b", "c"];

fn record_strategy() -> impl Strategy<Value = Json> {
    ("[a-c]{0,6}", "[a-c]{0,6}", "[a-c]{0,6}")
        .prop_map(|(a, b, c)| json!({ "a": a, "b": b, "c": c }))
}

fn mode_strategy() -> impl Strategy<Value = FilterMode> {
    prop_oneof![
        Just(FilterMode::Some),
        Just(FilterMode::Every),
        Just(FilterMode::Union),
        Just(FilterMode::Intersection),
    ]
}

fn key_hits(record: &Json, query: &str) -> Vec<bool> {
    KEYS.iter()
        .map(|key| {
            let value = Value::from(record[*key].as_str());
            default_filter(&value, Some(query)).is_match()
        })
        .collect()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Output indices are strictly increasing and within bounds.
    #[test]
    fn output_preserves_order(
        items in prop::collection::vec(record_strategy(), 0..40),
        query in "[a-c]{0,2}",
        mode in mode_strategy(),
    ) {
        let options = FilterOptions::new().mode(mode);
        let results = filter_items(&items, &query, &options);

        prop_assert!(results.len() <= items.len());
        for pair in results.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
        }
        if let Some(last) = results.last() {
            prop_assert!(last.index < items.len());
        }
    }

    /// An empty query keeps every record with empty matches.
    #[test]
    fn empty_query_keeps_all(
        items in prop::collection::vec(record_strategy(), 0..40),
        mode in mode_strategy(),
    ) {
        let results = filter_items(&items, "", &FilterOptions::new().mode(mode));
        prop_assert_eq!(results.len(), items.len());
        for (i, outcome) in results.iter().enumerate() {
            prop_assert_eq!(outcome.index, i);
            prop_assert!(outcome.matches.is_empty());
        }
    }

    /// no_filter keeps every record regardless of the query.
    #[test]
    fn no_filter_keeps_all(
        items in prop::collection::vec(record_strategy(), 0..40),
        query in "[a-z]{1,4}",
    ) {
        let options = FilterOptions::new().no_filter(true);
        let results = filter_items(&items, &query, &options);
        prop_assert_eq!(results.len(), items.len());
        prop_assert!(results.iter().all(|r| r.matches.is_empty()));
    }

    /// Stopping at the first miss in every mode keeps exactly the records
    /// whose keys all match.
    #[test]
    fn every_mode_equals_all_keys_matching(
        items in prop::collection::vec(record_strategy(), 0..40),
        query in "[a-c]{1,2}",
    ) {
        let options = FilterOptions::new().mode(FilterMode::Every);
        let kept: Vec<usize> = filter_items(&items, &query, &options)
            .iter()
            .map(|r| r.index)
            .collect();

        let expected: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, record)| key_hits(record, &query).iter().all(|hit| *hit))
            .map(|(i, _)| i)
            .collect();

        prop_assert_eq!(kept, expected);
    }

    /// Without custom evaluators, some, union and intersection all keep the
    /// records with at least one matching key.
    #[test]
    fn default_only_modes_agree(
        items in prop::collection::vec(record_strategy(), 0..40),
        query in "[a-c]{1,2}",
    ) {
        let expected: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, record)| key_hits(record, &query).iter().any(|hit| *hit))
            .map(|(i, _)| i)
            .collect();

        for mode in [FilterMode::Some, FilterMode::Union, FilterMode::Intersection] {
            let kept: Vec<usize> = filter_items(&items, &query, &FilterOptions::new().mode(mode))
                .iter()
                .map(|r| r.index)
                .collect();
            prop_assert_eq!(&kept, &expected);
        }
    }

    /// Recorded matches are always hits, and exactly the hitting keys.
    #[test]
    fn matches_are_hits(
        items in prop::collection::vec(record_strategy(), 0..40),
        query in "[a-c]{1,2}",
    ) {
        let results = filter_items(&items, &query, &FilterOptions::new().mode(FilterMode::Some));
        for outcome in results {
            let hits = key_hits(&items[outcome.index], &query);
            for (key, hit) in KEYS.iter().zip(hits) {
                prop_assert_eq!(outcome.matches.contains_key(*key), hit);
            }
            prop_assert!(outcome.matches.values().all(MatchResult::is_match));
        }
    }

    /// Scalar strings are kept iff they contain the query, ignoring case.
    #[test]
    fn scalar_strings_contain_query(
        items in prop::collection::vec("[a-cA-C]{0,8}".prop_map(String::from), 0..40),
        query in "[a-c]{1,2}",
    ) {
        let results = filter_items(&items, &query, &FilterOptions::new());
        let expected: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, s)| s.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(results.iter().map(|r| r.index).collect::<Vec<_>>(), expected);
    }

    /// A view always publishes the same result as a direct engine run.
    #[test]
    fn view_matches_direct_run(
        items in prop::collection::vec("[a-c]{1,6}".prop_map(String::from), 0..20),
        queries in prop::collection::vec("[a-c]{0,2}", 1..8),
    ) {
        let mut view = FilterView::new(FilterProps::new(), items.clone());
        for query in &queries {
            view.set_query(query.as_str());
        }

        let last = queries.last().map(String::as_str).unwrap_or("");
        let direct = filter_items(&items, last, &FilterOptions::new());
        let snapshot = view.snapshot();

        prop_assert_eq!(snapshot.query(), last);
        prop_assert_eq!(snapshot.outcomes(), direct.as_slice());
        for item in snapshot.filtered_items() {
            prop_assert!(snapshot.get_matches(item).is_some());
        }
    }

    /// Split highlight segments always rebuild the original text.
    #[test]
    fn highlight_segments_rebuild_text(
        text in "[a-zé ]{0,20}",
        index in 0i64..25,
        length in 0usize..25,
    ) {
        let highlight = highlight_result("c", &text, Some(&MatchResult::Index(index)), length)
            .unwrap();
        match highlight {
            Highlight::Split(split) => {
                let rebuilt = format!("{}{}{}", split.before, split.matched, split.after);
                prop_assert_eq!(rebuilt, text.clone());
                prop_assert!(split.matched.chars().count() <= length);
            }
            Highlight::Plain(_) => prop_assert!(false, "index results always split"),
        }
    }
}

// ============================================================================
// Additional edge case tests
// ============================================================================

#[test]
fn empty_collection_returns_empty() {
    let items: Vec<Json> = vec![];
    assert!(filter_items(&items, "a", &FilterOptions::new()).is_empty());
    assert!(filter_items(&items, "", &FilterOptions::new().no_filter(true)).is_empty());
}

#[test]
fn every_mode_record_with_one_failing_key_is_excluded() {
    let items = vec![json!({ "a": "match", "b": "match", "c": "nope" })];
    let options = FilterOptions::new().mode(FilterMode::Every);
    assert!(filter_items(&items, "mat", &options).is_empty());
}
