//! Match results and evaluators.
//!
//! An evaluator looks at one field value of one record and reports whether
//! (and where) the query occurs in it. The answer is a [`MatchResult`], which
//! carries as much positional information as the evaluator cares to give.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::traits::Filterable;
use crate::value::Value;

/// Outcome of evaluating a query against a single value.
///
/// Serializes untagged: `null`, `true`, `6`, `[0, 3]`, `[[0, 1], [3, 1]]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchResult {
    /// Evaluator gave no answer.
    #[default]
    NoMatch,
    /// Matched or not, without a position.
    Bool(bool),
    /// Character offset of the match; the length is the query length.
    /// `-1` means no match.
    Index(i64),
    /// A single match as `(start, length)`.
    Span(usize, usize),
    /// Several non-overlapping matches as `(start, length)` pairs.
    Spans(Vec<(usize, usize)>),
}

impl MatchResult {
    /// Returns `true` unless this is `NoMatch`, `Bool(false)` or `Index(-1)`.
    pub fn is_match(&self) -> bool {
        match self {
            MatchResult::NoMatch => false,
            MatchResult::Bool(matched) => *matched,
            MatchResult::Index(index) => *index != -1,
            MatchResult::Span(..) | MatchResult::Spans(_) => true,
        }
    }

    /// Returns the start offset of the first match, if the result has one.
    pub fn start(&self) -> Option<usize> {
        match self {
            MatchResult::Index(index) => usize::try_from(*index).ok(),
            MatchResult::Span(start, _) => Some(*start),
            MatchResult::Spans(spans) => spans.first().map(|(start, _)| *start),
            MatchResult::NoMatch | MatchResult::Bool(_) => None,
        }
    }
}

impl From<bool> for MatchResult {
    fn from(matched: bool) -> Self {
        MatchResult::Bool(matched)
    }
}

impl From<i64> for MatchResult {
    fn from(index: i64) -> Self {
        MatchResult::Index(index)
    }
}

impl From<(usize, usize)> for MatchResult {
    fn from((start, length): (usize, usize)) -> Self {
        MatchResult::Span(start, length)
    }
}

impl From<Vec<(usize, usize)>> for MatchResult {
    fn from(spans: Vec<(usize, usize)>) -> Self {
        MatchResult::Spans(spans)
    }
}

/// Finds `query` in the string form of `value`, ignoring case.
///
/// Returns `Index(n)` with the character offset of the first occurrence in
/// the original text, or `Index(-1)` when either side is absent or there is
/// no occurrence. Both sides are folded character by character, so the
/// offset stays valid when folding changes the length (`İ` folds to two
/// characters).
///
/// ```
/// use standout_sift::{default_filter, MatchResult, Value};
///
/// assert_eq!(default_filter(&Value::from("Hello World"), Some("world")), MatchResult::Index(6));
/// assert_eq!(default_filter(&Value::None, Some("x")), MatchResult::Index(-1));
/// assert_eq!(default_filter(&Value::from("abc"), None), MatchResult::Index(-1));
/// ```
pub fn default_filter(value: &Value<'_>, query: Option<&str>) -> MatchResult {
    let (Some(text), Some(query)) = (value.to_text(), query) else {
        return MatchResult::Index(-1);
    };

    // Original character index of each folded character
    let mut origin = Vec::with_capacity(text.len());
    let mut haystack = String::with_capacity(text.len());
    for (index, c) in text.chars().enumerate() {
        for folded in c.to_lowercase() {
            haystack.push(folded);
            origin.push(index);
        }
    }
    let needle: String = query.chars().flat_map(char::to_lowercase).collect();

    match haystack.find(&needle) {
        Some(byte) => {
            let folded_index = haystack[..byte].chars().count();
            let index = origin.get(folded_index).copied().unwrap_or(0);
            MatchResult::Index(index as i64)
        }
        None => MatchResult::Index(-1),
    }
}

/// Signature of an evaluator function: `(value, query, record)`.
pub type EvalFn = dyn Fn(&Value<'_>, &str, &dyn Filterable) -> MatchResult + Send + Sync;

/// A shareable evaluator.
///
/// Cloning is cheap; clones call the same function.
///
/// # Example
///
/// ```
/// use standout_sift::{Evaluator, MatchResult, Value};
///
/// let exact = Evaluator::new(|value, query, _record| {
///     MatchResult::Bool(value.as_str() == Some(query))
/// });
///
/// assert!(exact.eval(&Value::from("ok"), "ok", &"ok").is_match());
/// assert!(!exact.eval(&Value::from("okay"), "ok", &"okay").is_match());
/// ```
#[derive(Clone)]
pub struct Evaluator(Arc<EvalFn>);

impl Evaluator {
    /// Wraps a function as an evaluator.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value<'_>, &str, &dyn Filterable) -> MatchResult + Send + Sync + 'static,
    {
        Evaluator(Arc::new(f))
    }

    /// Evaluates `query` against `value`, which was taken from `record`.
    pub fn eval(&self, value: &Value<'_>, query: &str, record: &dyn Filterable) -> MatchResult {
        (self.0)(value, query, record)
    }
}

/// The built-in case-insensitive substring evaluator.
impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(|value, query, _record| default_filter(value, Some(query)))
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Evaluator(..)")
    }
}
