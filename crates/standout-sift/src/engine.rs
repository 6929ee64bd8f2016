//! The filter engine.
//!
//! [`filter_items`] walks a collection once, evaluates each record against
//! the query key by key, and keeps the records whose per-key results satisfy
//! the configured [`FilterMode`]. Every kept record carries the match results
//! that got it kept, keyed by field, for highlighting.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::matching::{Evaluator, MatchResult};
use crate::options::{FilterMode, FilterOptions};
use crate::record::property_value;
use crate::traits::Filterable;

/// Key under which scalar records store their match.
pub const TITLE_KEY: &str = "title";

/// Match metadata for one record: key to result.
pub type Matches = BTreeMap<String, MatchResult>;

/// A kept record: its position in the input and why it matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOutcome {
    /// Index of the record in the input collection.
    pub index: usize,
    /// Match result per key. Empty when filtering was skipped.
    pub matches: Matches,
}

impl FilterOutcome {
    /// Returns the match result recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&MatchResult> {
        self.matches.get(key)
    }
}

/// Filters `items` against `query`.
///
/// Returns one [`FilterOutcome`] per kept record, in input order. With an
/// empty query or [`no_filter`](FilterOptions::no_filter) set, every record is
/// kept with empty matches.
///
/// # Example
///
/// ```
/// use standout_sift::{filter_items, FilterOptions, MatchResult};
///
/// let fruits = ["apple", "banana", "grape"];
/// let results = filter_items(&fruits, "ap", &FilterOptions::new());
///
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].index, 0);
/// assert_eq!(results[1].get("title"), Some(&MatchResult::Index(2)));
/// ```
pub fn filter_items<R: Filterable>(
    items: &[R],
    query: &str,
    options: &FilterOptions,
) -> Vec<FilterOutcome> {
    if items.is_empty() {
        return Vec::new();
    }

    let matcher = RecordMatcher::new(options);
    let results: Vec<FilterOutcome> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            matcher
                .evaluate(item, query, index)
                .map(|matches| FilterOutcome { index, matches })
        })
        .collect();

    debug!(
        total = items.len(),
        kept = results.len(),
        mode = %options.filter_mode,
        "filtered items"
    );
    results
}

/// Evaluates a single record, returning its matches if it is kept.
///
/// This applies exactly the rules of [`filter_items`] to one record.
pub fn match_record(
    record: &dyn Filterable,
    query: &str,
    options: &FilterOptions,
) -> Option<Matches> {
    RecordMatcher::new(options).evaluate(record, query, 0)
}

/// Options resolved once per run.
struct RecordMatcher<'o> {
    options: &'o FilterOptions,
    default: Evaluator,
    keys: Option<Vec<String>>,
    custom_filters_len: usize,
}

impl<'o> RecordMatcher<'o> {
    fn new(options: &'o FilterOptions) -> Self {
        RecordMatcher {
            options,
            default: options.default_evaluator(),
            keys: options.resolved_keys(),
            custom_filters_len: options.custom_filters_len(),
        }
    }

    fn evaluate(&self, record: &dyn Filterable, query: &str, index: usize) -> Option<Matches> {
        if query.is_empty() || self.options.no_filter {
            return Some(Matches::new());
        }

        let mut custom_matches = Matches::new();
        let mut default_matches = Matches::new();

        match record.record_keys() {
            Some(own_keys) => {
                let keys: Vec<Cow<'_, str>> = match &self.keys {
                    Some(keys) => keys.iter().map(|k| Cow::Borrowed(k.as_str())).collect(),
                    None => own_keys,
                };

                for key in &keys {
                    let key = key.as_ref();
                    let value =
                        property_value(record, key).unwrap_or_else(|| record.record_value());

                    let (evaluator, target) = match self.options.key_evaluator_for(key) {
                        Some(evaluator) => (evaluator, &mut custom_matches),
                        None => (&self.default, &mut default_matches),
                    };
                    let result = evaluator.eval(&value, query, record);

                    if result.is_match() {
                        target.insert(key.to_string(), result);
                    } else if self.options.filter_mode == FilterMode::Every {
                        trace!(index, key, "discarded: key did not match in every mode");
                        return None;
                    }
                }
            }
            None => {
                let result = self.default.eval(&record.record_value(), query, record);
                if result.is_match() {
                    default_matches.insert(TITLE_KEY.to_string(), result);
                }
            }
        }

        if default_matches.is_empty() && custom_matches.is_empty() {
            trace!(index, "discarded: no key matched");
            return None;
        }

        let custom_complete = custom_matches.len() == self.custom_filters_len;
        let keep = match self.options.filter_mode {
            FilterMode::Union => custom_complete || !default_matches.is_empty(),
            FilterMode::Intersection => custom_complete && !default_matches.is_empty(),
            FilterMode::Some | FilterMode::Every => true,
        };
        if !keep {
            trace!(
                index,
                custom = custom_matches.len(),
                expected = self.custom_filters_len,
                default = default_matches.len(),
                mode = %self.options.filter_mode,
                "discarded: incomplete match"
            );
            return None;
        }

        default_matches.extend(custom_matches);
        Some(default_matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as Json};

    fn people() -> Vec<Json> {
        vec![
            json!({ "name": "Ada Lovelace", "city": "London", "role": "analyst" }),
            json!({ "name": "Alan Turing", "city": "Manchester", "role": "logician" }),
            json!({ "name": "Grace Hopper", "city": "New York", "role": "admiral" }),
        ]
    }

    fn indices(results: &[FilterOutcome]) -> Vec<usize> {
        results.iter().map(|r| r.index).collect()
    }

    #[test]
    fn empty_items() {
        let items: Vec<Json> = Vec::new();
        assert!(filter_items(&items, "a", &FilterOptions::new()).is_empty());
    }

    #[test]
    fn empty_query_keeps_everything() {
        let items = people();
        let results = filter_items(&items, "", &FilterOptions::new());
        assert_eq!(indices(&results), vec![0, 1, 2]);
        assert!(results.iter().all(|r| r.matches.is_empty()));
    }

    #[test]
    fn no_filter_keeps_everything() {
        let items = people();
        let options = FilterOptions::new().no_filter(true);
        let results = filter_items(&items, "zzz", &options);
        assert_eq!(indices(&results), vec![0, 1, 2]);
        assert!(results.iter().all(|r| r.matches.is_empty()));
    }

    #[test]
    fn intersection_without_custom_filters() {
        let items = people();
        let results = filter_items(&items, "lo", &FilterOptions::new());
        // Ada: name "Lovelace", city "London"; Alan: role "logician"
        assert_eq!(indices(&results), vec![0, 1]);
        assert_eq!(results[0].get("name"), Some(&MatchResult::Index(4)));
        assert_eq!(results[0].get("city"), Some(&MatchResult::Index(0)));
        assert_eq!(results[0].get("role"), None);
    }

    #[test]
    fn filter_keys_restrict_examined_fields() {
        let items = people();
        let options = FilterOptions::new().keys("city");
        let results = filter_items(&items, "lo", &options);
        assert_eq!(indices(&results), vec![0]);
        assert_eq!(results[0].matches.len(), 1);
    }

    #[test]
    fn every_mode_requires_all_keys() {
        let items = vec![
            json!({ "a": "xa", "b": "xb", "c": "xc" }),
            json!({ "a": "xa", "b": "yb", "c": "xc" }),
        ];
        let options = FilterOptions::new().mode(FilterMode::Every);
        let results = filter_items(&items, "x", &options);
        assert_eq!(indices(&results), vec![0]);
        assert_eq!(results[0].matches.len(), 3);
    }

    #[test]
    fn some_mode_needs_one_key() {
        let items = people();
        let options = FilterOptions::new().mode(FilterMode::Some);
        let results = filter_items(&items, "york", &options);
        assert_eq!(indices(&results), vec![2]);
    }

    #[test]
    fn scalar_records_match_under_title() {
        let items = ["apple", "banana", "pineapple"];
        let results = filter_items(&items, "app", &FilterOptions::new());
        assert_eq!(indices(&results), vec![0, 2]);
        assert_eq!(results[0].get(TITLE_KEY), Some(&MatchResult::Index(0)));
        assert_eq!(results[1].get(TITLE_KEY), Some(&MatchResult::Index(4)));
    }

    #[test]
    fn numeric_scalars_match_on_text() {
        let items = [10i64, 210, 33];
        let results = filter_items(&items, "10", &FilterOptions::new());
        assert_eq!(indices(&results), vec![0, 1]);
    }

    #[test]
    fn missing_key_falls_back_to_record_value() {
        let items: Vec<Json> = vec![json!({ "name": "x" })];
        let options = FilterOptions::new()
            .keys("missing")
            .custom_filter(|value, _query, _record| MatchResult::Bool(value.is_none()));
        let results = filter_items(&items, "q", &options);
        // The fallback for an object record is its (absent) record value
        assert_eq!(indices(&results), vec![0]);
    }

    #[test]
    fn nested_key_paths() {
        let items = vec![
            json!({ "owner": { "name": "Ada" } }),
            json!({ "owner": { "name": "Bob" } }),
        ];
        let options = FilterOptions::new().keys("owner.name");
        let results = filter_items(&items, "ada", &options);
        assert_eq!(indices(&results), vec![0]);
        assert_eq!(results[0].get("owner.name"), Some(&MatchResult::Index(0)));
    }

    #[test]
    fn custom_entries_override_default_on_same_key() {
        let items = vec![json!({ "name": "Ada" })];
        let options = FilterOptions::new()
            .mode(FilterMode::Some)
            .key_filter("name", |_, _, _| MatchResult::Span(0, 3));
        let results = filter_items(&items, "ada", &options);
        assert_eq!(results[0].get("name"), Some(&MatchResult::Span(0, 3)));
    }

    #[test]
    fn evaluator_receives_record() {
        let items = vec![json!({ "name": "Ada", "admin": true })];
        let options = FilterOptions::new()
            .mode(FilterMode::Some)
            .keys("name")
            .custom_filter(|_value, _query, record| {
                MatchResult::Bool(record.field_value("admin") == Some(crate::Value::Bool(true)))
            });
        assert_eq!(filter_items(&items, "zzz", &options).len(), 1);
    }

    #[test]
    #[should_panic(expected = "evaluator failed")]
    fn evaluator_panic_propagates() {
        let options = FilterOptions::new().custom_filter(|_, _, _| panic!("evaluator failed"));
        let _ = filter_items(&["apple"], "a", &options);
    }

    #[test]
    fn match_record_single() {
        let record = json!({ "name": "Ada" });
        let options = FilterOptions::new();
        assert!(match_record(&record, "ad", &options).is_some());
        assert!(match_record(&record, "zz", &options).is_none());
        assert_eq!(match_record(&record, "", &options), Some(Matches::new()));
    }

    #[test]
    fn outcome_serializes() {
        let items = ["apple"];
        let results = filter_items(&items, "pl", &FilterOptions::new());
        let encoded = serde_json::to_string(&results).unwrap();
        assert_eq!(encoded, r#"[{"index":0,"matches":{"title":2}}]"#);
    }
}
