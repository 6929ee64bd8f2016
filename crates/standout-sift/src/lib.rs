//! Sift - Item filtering with per-key match metadata.
//!
//! Sift filters collections of records against a text query and reports,
//! for every kept record, which keys matched and where. That metadata is what
//! a list or autocomplete widget needs to highlight the matched substrings.
//!
//! - Records can be structs, maps, JSON values or plain scalars
//! - Per-key custom evaluators, with a case-insensitive substring default
//! - Four combination modes: `some`, `every`, `union`, `intersection`
//! - A reactive [`FilterView`] that recomputes when inputs change
//! - Highlight splitting into component-scoped style segments
//!
//! # Quick Start
//!
//! ```rust
//! use standout_sift::{filter_items, FilterMode, FilterOptions, MatchResult};
//! use serde_json::json;
//!
//! let people = vec![
//!     json!({ "name": "Ada Lovelace", "city": "London" }),
//!     json!({ "name": "Alan Turing", "city": "Manchester" }),
//! ];
//!
//! let options = FilterOptions::new().mode(FilterMode::Some).build();
//! let results = filter_items(&people, "love", &options);
//!
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].index, 0);
//! assert_eq!(results[0].get("name"), Some(&MatchResult::Index(4)));
//! ```
//!
//! # Filter Semantics
//!
//! Each record is evaluated key by key. Keys with a custom evaluator record
//! their hits separately from keys using the default evaluator, and the mode
//! decides what is kept:
//!
//! ```text
//! some         = any key matched
//! every        = all examined keys matched
//! union        = any key matched ∧ (all custom keys matched ∨ any default key matched)
//! intersection = any key matched ∧ (all custom keys matched ∧ any default key matched)
//! ```
//!
//! An empty query, or `no_filter`, keeps every record with empty matches.
//! Scalar records are matched as a whole and report under the `"title"` key.

mod engine;
mod error;
mod highlight;
mod matching;
mod options;
mod record;
mod traits;
mod value;
mod view;

// Re-export public API
pub use engine::{filter_items, match_record, FilterOutcome, Matches, TITLE_KEY};
pub use error::{Result, SiftError};
pub use highlight::{highlight_result, Highlight, Segment, SplitText};
pub use matching::{default_filter, EvalFn, Evaluator, MatchResult};
pub use options::{FilterConfig, FilterKeys, FilterMode, FilterOptions, FilterProps, KeyFilterMap};
pub use record::{property_value, split_path};
pub use traits::{Filterable, Identifiable};
pub use value::{Number, Value};
pub use view::{FilterSnapshot, FilterView, QueryText, Transform};
