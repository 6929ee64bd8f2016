//! Filter configuration.
//!
//! [`FilterOptions`] is the full set of knobs the engine understands,
//! including evaluator functions. [`FilterConfig`] is its serializable subset,
//! so the data-only part of a filter setup can live in JSON or YAML files.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftError};
use crate::matching::{Evaluator, MatchResult};
use crate::traits::Filterable;
use crate::value::Value;

/// Policy for combining per-key match results into a keep/discard decision.
///
/// | Mode | Keeps a record when |
/// |------|---------------------|
/// | `Some` | at least one key matched |
/// | `Every` | every examined key matched |
/// | `Union` | every custom key filter matched, or any default key matched |
/// | `Intersection` | every custom key filter matched, and any default key matched |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// At least one key matched.
    Some,
    /// All examined keys matched.
    Every,
    /// All custom key filters matched, or at least one default key did.
    Union,
    /// All custom key filters matched, and at least one default key did.
    #[default]
    Intersection,
}

impl FilterMode {
    /// Returns the lowercase name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::Some => "some",
            FilterMode::Every => "every",
            FilterMode::Union => "union",
            FilterMode::Intersection => "intersection",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "some" => Ok(FilterMode::Some),
            "every" => Ok(FilterMode::Every),
            "union" => Ok(FilterMode::Union),
            "intersection" => Ok(FilterMode::Intersection),
            other => Err(SiftError::InvalidFilterMode(other.to_string())),
        }
    }
}

/// A key allow-list: one key or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterKeys {
    /// A single key.
    One(String),
    /// An ordered list of keys.
    Many(Vec<String>),
}

impl FilterKeys {
    /// Returns the keys as a list, wrapping a single key.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            FilterKeys::One(key) => vec![key.clone()],
            FilterKeys::Many(keys) => keys.clone(),
        }
    }
}

impl From<&str> for FilterKeys {
    fn from(key: &str) -> Self {
        FilterKeys::One(key.to_string())
    }
}

impl From<String> for FilterKeys {
    fn from(key: String) -> Self {
        FilterKeys::One(key)
    }
}

impl From<Vec<String>> for FilterKeys {
    fn from(keys: Vec<String>) -> Self {
        FilterKeys::Many(keys)
    }
}

impl From<Vec<&str>> for FilterKeys {
    fn from(keys: Vec<&str>) -> Self {
        FilterKeys::Many(keys.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FilterKeys {
    fn from(keys: [&str; N]) -> Self {
        FilterKeys::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}

/// Per-key evaluators, overriding the default evaluator for their key.
pub type KeyFilterMap = BTreeMap<String, Evaluator>;

/// Options for [`filter_items`](crate::filter_items) and
/// [`FilterView`](crate::FilterView).
///
/// # Example
///
/// ```
/// use standout_sift::{FilterMode, FilterOptions, MatchResult};
///
/// let options = FilterOptions::new()
///     .mode(FilterMode::Some)
///     .keys(["title", "owner.name"])
///     .key_filter("id", |value, query, _record| {
///         MatchResult::Bool(value.to_text().as_deref() == Some(query))
///     })
///     .build();
///
/// assert_eq!(options.filter_mode, FilterMode::Some);
/// assert_eq!(options.custom_filters_len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Replaces the built-in default evaluator.
    pub custom_filter: Option<Evaluator>,
    /// Evaluators for specific keys.
    pub custom_key_filter: KeyFilterMap,
    /// Keys to examine; all of a record's keys when absent.
    pub filter_keys: Option<FilterKeys>,
    /// How per-key results combine.
    pub filter_mode: FilterMode,
    /// Keep every record without matching.
    pub no_filter: bool,
}

/// Props for a filtering component. Same shape as [`FilterOptions`].
pub type FilterProps = FilterOptions;

impl FilterOptions {
    /// Creates options with default settings: intersection mode, all keys,
    /// built-in evaluator.
    pub fn new() -> Self {
        FilterOptions::default()
    }

    /// Sets the filter mode.
    pub fn mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    /// Restricts matching to the given keys.
    pub fn keys(mut self, keys: impl Into<FilterKeys>) -> Self {
        self.filter_keys = Some(keys.into());
        self
    }

    /// Replaces the default evaluator.
    pub fn custom_filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value<'_>, &str, &dyn Filterable) -> MatchResult + Send + Sync + 'static,
    {
        self.custom_filter = Some(Evaluator::new(f));
        self
    }

    /// Adds an evaluator for one key.
    pub fn key_filter<F>(mut self, key: &str, f: F) -> Self
    where
        F: Fn(&Value<'_>, &str, &dyn Filterable) -> MatchResult + Send + Sync + 'static,
    {
        self.custom_key_filter.insert(key.to_string(), Evaluator::new(f));
        self
    }

    /// Adds an already wrapped evaluator for one key.
    pub fn key_evaluator(mut self, key: &str, evaluator: Evaluator) -> Self {
        self.custom_key_filter.insert(key.to_string(), evaluator);
        self
    }

    /// Disables matching; every record is kept.
    pub fn no_filter(mut self, no_filter: bool) -> Self {
        self.no_filter = no_filter;
        self
    }

    /// Finalizes the options.
    pub fn build(self) -> Self {
        self
    }

    /// Returns the evaluator used for keys without a custom one.
    pub fn default_evaluator(&self) -> Evaluator {
        self.custom_filter.clone().unwrap_or_default()
    }

    /// Returns the custom evaluator for `key`, if one is configured.
    pub fn key_evaluator_for(&self, key: &str) -> Option<&Evaluator> {
        self.custom_key_filter.get(key)
    }

    /// Returns the allow-list as a list, or `None` when keys come from each
    /// record. An empty single key counts as no allow-list.
    pub fn resolved_keys(&self) -> Option<Vec<String>> {
        match &self.filter_keys {
            None => None,
            Some(FilterKeys::One(key)) if key.is_empty() => None,
            Some(keys) => Some(keys.to_vec()),
        }
    }

    /// Number of configured per-key evaluators.
    pub fn custom_filters_len(&self) -> usize {
        self.custom_key_filter.len()
    }

    /// Returns the serializable part of these options.
    pub fn config(&self) -> FilterConfig {
        FilterConfig {
            filter_keys: self.filter_keys.clone(),
            filter_mode: self.filter_mode,
            no_filter: self.no_filter,
        }
    }
}

impl From<FilterConfig> for FilterOptions {
    fn from(config: FilterConfig) -> Self {
        FilterOptions {
            filter_keys: config.filter_keys,
            filter_mode: config.filter_mode,
            no_filter: config.no_filter,
            ..FilterOptions::default()
        }
    }
}

/// Data-only filter settings.
///
/// Field names accept both `snake_case` and the `camelCase` spelling used by
/// component props (`filterKeys`, `filterMode`, `noFilter`).
///
/// ```
/// use standout_sift::{FilterConfig, FilterMode, FilterOptions};
///
/// let json = r#"{ "filterKeys": "title", "filterMode": "every" }"#;
/// let config = FilterConfig::from_json(json).unwrap();
/// let options = FilterOptions::from(config);
/// assert_eq!(options.filter_mode, FilterMode::Every);
/// assert_eq!(options.resolved_keys(), Some(vec!["title".to_string()]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Keys to examine.
    #[serde(alias = "filterKeys", skip_serializing_if = "Option::is_none")]
    pub filter_keys: Option<FilterKeys>,
    /// How per-key results combine.
    #[serde(alias = "filterMode")]
    pub filter_mode: FilterMode,
    /// Keep every record without matching.
    #[serde(alias = "noFilter")]
    pub no_filter: bool,
}

impl FilterConfig {
    /// Parses a JSON document.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parses a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }
}
