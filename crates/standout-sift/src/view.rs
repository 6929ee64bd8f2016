//! Reactive filtering over a changing collection.
//!
//! A [`FilterView`] owns the inputs of a filter run (items, transform,
//! query, props) and re-runs [`filter_items`] synchronously whenever one of
//! them changes. Each run publishes a fresh [`FilterSnapshot`] holding both
//! the filtered items and the identity-to-matches lookup, so the two views
//! are always from the same run.
//!
//! # Example
//!
//! ```
//! use standout_sift::{FilterProps, FilterView};
//!
//! let mut view = FilterView::new(
//!     FilterProps::new(),
//!     vec!["apple".to_string(), "banana".to_string(), "cherry".to_string()],
//! );
//! assert_eq!(view.filtered_items().count(), 3);
//!
//! view.set_query("an");
//! let kept: Vec<&String> = view.filtered_items().collect();
//! assert_eq!(kept, vec!["banana"]);
//! assert!(view.get_matches(&"banana".to_string()).is_some());
//! assert!(view.get_matches(&"apple".to_string()).is_none());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::engine::{filter_items, FilterOutcome, Matches};
use crate::options::FilterProps;
use crate::traits::{Filterable, Identifiable};
use crate::value::Number;

/// Maps a source item to the record that is actually filtered.
pub type Transform<T, U> = Arc<dyn Fn(&T) -> U + Send + Sync>;

/// Query text as accepted by a [`FilterView`].
///
/// Strings and numbers become their text; anything else (absent values,
/// JSON booleans, arrays, objects) becomes the empty query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryText(String);

impl QueryText {
    /// Returns the query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the query, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for QueryText {
    fn from(s: &str) -> Self {
        QueryText(s.to_string())
    }
}

impl From<String> for QueryText {
    fn from(s: String) -> Self {
        QueryText(s)
    }
}

impl From<&String> for QueryText {
    fn from(s: &String) -> Self {
        QueryText(s.clone())
    }
}

impl<Q: Into<QueryText>> From<Option<Q>> for QueryText {
    fn from(query: Option<Q>) -> Self {
        query.map(Into::into).unwrap_or_default()
    }
}

impl From<i64> for QueryText {
    fn from(n: i64) -> Self {
        QueryText(Number::I64(n).to_string())
    }
}

impl From<i32> for QueryText {
    fn from(n: i32) -> Self {
        QueryText(Number::from(n).to_string())
    }
}

impl From<u64> for QueryText {
    fn from(n: u64) -> Self {
        QueryText(Number::U64(n).to_string())
    }
}

impl From<u32> for QueryText {
    fn from(n: u32) -> Self {
        QueryText(Number::from(n).to_string())
    }
}

impl From<usize> for QueryText {
    fn from(n: usize) -> Self {
        QueryText(Number::from(n).to_string())
    }
}

impl From<f64> for QueryText {
    fn from(n: f64) -> Self {
        QueryText(Number::F64(n).to_string())
    }
}

impl From<&serde_json::Value> for QueryText {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => QueryText(s.clone()),
            serde_json::Value::Number(n) => QueryText(n.to_string()),
            _ => QueryText::default(),
        }
    }
}

impl From<serde_json::Value> for QueryText {
    fn from(value: serde_json::Value) -> Self {
        QueryText::from(&value)
    }
}

/// The published result of one filter run.
///
/// Snapshots are immutable. A [`FilterView`] replaces its snapshot on every
/// run; holders of an older snapshot keep a consistent view of that run.
pub struct FilterSnapshot<T: Identifiable> {
    items: Arc<[T]>,
    outcomes: Vec<FilterOutcome>,
    lookup: HashMap<T::Id, usize>,
    query: String,
    revision: u64,
}

impl<T: Identifiable> FilterSnapshot<T> {
    fn empty(items: Arc<[T]>) -> Self {
        FilterSnapshot {
            items,
            outcomes: Vec::new(),
            lookup: HashMap::new(),
            query: String::new(),
            revision: 0,
        }
    }

    /// Kept items, in filter order.
    pub fn filtered_items(&self) -> impl Iterator<Item = &T> + '_ {
        self.outcomes.iter().map(move |outcome| &self.items[outcome.index])
    }

    /// Identity of each kept item with its matches.
    pub fn filtered_matches(&self) -> impl Iterator<Item = (&T::Id, &Matches)> + '_ {
        self.lookup
            .iter()
            .map(move |(id, &position)| (id, &self.outcomes[position].matches))
    }

    /// Returns the matches of `item`, or `None` if it was not kept.
    pub fn get_matches(&self, item: &T) -> Option<&Matches> {
        self.get_matches_by_id(&item.id())
    }

    /// Returns the matches of the item with identity `id`.
    pub fn get_matches_by_id(&self, id: &T::Id) -> Option<&Matches> {
        self.lookup
            .get(id)
            .map(|&position| &self.outcomes[position].matches)
    }

    /// Raw engine output for this run.
    pub fn outcomes(&self) -> &[FilterOutcome] {
        &self.outcomes
    }

    /// The query this snapshot was computed for.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Sequence number of the run that produced this snapshot.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of kept items.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if no item was kept.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Builds the matched records from the source items.
type Project<T, U> = Box<dyn Fn(&Arc<[T]>) -> Arc<[U]> + Send + Sync>;

/// A filter that tracks its inputs and keeps its results current.
///
/// `T` is the item type callers hold; `U` is what gets matched, produced by
/// the transform. Without a transform, `U` is `T` and the items are matched
/// directly, sharing the same allocation.
pub struct FilterView<T: Identifiable, U = T> {
    props: FilterProps,
    items: Arc<[T]>,
    project: Project<T, U>,
    records: Arc<[U]>,
    query: String,
    snapshot: Arc<FilterSnapshot<T>>,
}

impl<T> FilterView<T, T>
where
    T: Identifiable + Filterable + 'static,
{
    /// Creates a view that matches the items themselves.
    pub fn new(props: FilterProps, items: impl Into<Arc<[T]>>) -> Self {
        FilterView::build(props, items.into(), Box::new(share::<T>))
    }
}

impl<T, U> FilterView<T, U>
where
    T: Identifiable + 'static,
    U: Filterable + 'static,
{
    /// Creates a view that matches `transform(item)` for each item.
    pub fn with_transform<F>(props: FilterProps, items: impl Into<Arc<[T]>>, transform: F) -> Self
    where
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        FilterView::build(props, items.into(), project_with(Arc::new(transform)))
    }

    fn build(props: FilterProps, items: Arc<[T]>, project: Project<T, U>) -> Self {
        let records = project(&items);
        let mut view = FilterView {
            props,
            snapshot: Arc::new(FilterSnapshot::empty(Arc::clone(&items))),
            items,
            project,
            records,
            query: String::new(),
        };
        view.recompute();
        view
    }

    /// Replaces the item collection.
    pub fn set_items(&mut self, items: impl Into<Arc<[T]>>) {
        let items = items.into();
        let records = (self.project)(&items);
        self.items = items;
        self.records = records;
        self.recompute();
    }

    /// Replaces the transform.
    pub fn set_transform<F>(&mut self, transform: F)
    where
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let project = project_with(Arc::new(transform));
        let records = project(&self.items);
        self.project = project;
        self.records = records;
        self.recompute();
    }

    /// Sets the query. Does nothing if the text is unchanged.
    pub fn set_query(&mut self, query: impl Into<QueryText>) {
        let query = query.into().into_string();
        if query == self.query {
            return;
        }
        self.query = query;
        self.recompute();
    }

    /// Replaces the filter props.
    pub fn set_props(&mut self, props: FilterProps) {
        self.props = props;
        self.recompute();
    }

    /// Re-runs the filter with unchanged inputs, for evaluators that read
    /// external state.
    pub fn refresh(&mut self) {
        self.recompute();
    }

    /// Kept items of the latest run, in filter order.
    pub fn filtered_items(&self) -> impl Iterator<Item = &T> + '_ {
        self.snapshot.filtered_items()
    }

    /// Identity-to-matches lookup of the latest run.
    pub fn filtered_matches(&self) -> impl Iterator<Item = (&T::Id, &Matches)> + '_ {
        self.snapshot.filtered_matches()
    }

    /// Returns the matches of `item` from the latest run.
    pub fn get_matches(&self, item: &T) -> Option<&Matches> {
        self.snapshot.get_matches(item)
    }

    /// Shared handle to the latest snapshot.
    pub fn snapshot(&self) -> Arc<FilterSnapshot<T>> {
        Arc::clone(&self.snapshot)
    }

    /// Current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current props.
    pub fn props(&self) -> &FilterProps {
        &self.props
    }

    /// Current source items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of runs published so far.
    pub fn revision(&self) -> u64 {
        self.snapshot.revision
    }

    fn recompute(&mut self) {
        let outcomes = filter_items(&self.records, &self.query, &self.props);

        let mut lookup = HashMap::with_capacity(outcomes.len());
        for (position, outcome) in outcomes.iter().enumerate() {
            lookup.insert(self.items[outcome.index].id(), position);
        }

        let revision = self.snapshot.revision + 1;
        debug!(revision, query = %self.query, kept = outcomes.len(), "published filter snapshot");

        self.snapshot = Arc::new(FilterSnapshot {
            items: Arc::clone(&self.items),
            outcomes,
            lookup,
            query: self.query.clone(),
            revision,
        });
    }
}

fn share<T>(items: &Arc<[T]>) -> Arc<[T]> {
    Arc::clone(items)
}

fn project_with<T, U>(transform: Transform<T, U>) -> Project<T, U>
where
    T: 'static,
    U: 'static,
{
    Box::new(move |items: &Arc<[T]>| items.iter().map(transform.as_ref()).collect())
}
