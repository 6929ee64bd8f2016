//! Key path extraction and dynamic record implementations.
//!
//! [`property_value`] resolves a key against a record the way filter keys are
//! written by users: an exact key first, then a dotted path where bracket
//! indexes are accepted (`"tags[0]"` is `"tags.0"`).
//!
//! [`Filterable`] is implemented here for `serde_json::Value` and for string
//! keyed maps, so schemaless data can be filtered without a hand-written impl.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use crate::traits::{Filterable, Identifiable};
use crate::value::{Number, Value};

/// Splits a key path into segments.
///
/// Bracket indexes become segments and a leading dot is dropped:
///
/// ```
/// use standout_sift::split_path;
///
/// assert_eq!(split_path("a.b"), vec!["a", "b"]);
/// assert_eq!(split_path("tags[1].name"), vec!["tags", "1", "name"]);
/// assert_eq!(split_path("[0]"), vec!["0"]);
/// ```
pub fn split_path(path: &str) -> Vec<String> {
    let mut normalized = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(open) = rest.find('[') {
        normalized.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close)
                if close > 0
                    && after[..close]
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_') =>
            {
                normalized.push('.');
                normalized.push_str(&after[..close]);
                rest = &after[close + 1..];
            }
            _ => {
                normalized.push('[');
                rest = after;
            }
        }
    }
    normalized.push_str(rest);

    let normalized = normalized.strip_prefix('.').unwrap_or(&normalized);
    normalized.split('.').map(str::to_string).collect()
}

/// Resolves `path` against `record`.
///
/// Returns `None` when the path cannot be followed: an intermediate segment
/// is missing, or the last segment does not exist. A key that exists but
/// holds nothing resolves to `Some(Value::None)`.
pub fn property_value<'a>(record: &'a dyn Filterable, path: &str) -> Option<Value<'a>> {
    if path.is_empty() {
        return None;
    }
    if let Some(value) = record.field_value(path) {
        return Some(value);
    }

    let segments = split_path(path);
    let (last, parents) = segments.split_last()?;
    let mut current = record;
    for segment in parents {
        current = current.field(segment)?;
    }
    current.field_value(last)
}

impl Filterable for serde_json::Value {
    fn record_keys(&self) -> Option<Vec<Cow<'_, str>>> {
        match self {
            serde_json::Value::Object(map) => {
                Some(map.keys().map(|k| Cow::Borrowed(k.as_str())).collect())
            }
            serde_json::Value::Array(items) => {
                Some((0..items.len()).map(|i| Cow::Owned(i.to_string())).collect())
            }
            _ => None,
        }
    }

    fn field(&self, key: &str) -> Option<&dyn Filterable> {
        let child = match self {
            serde_json::Value::Object(map) => map.get(key),
            serde_json::Value::Array(items) => {
                key.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            _ => None,
        };
        child.map(|value| value as &dyn Filterable)
    }

    /// Scalars map to their value; arrays of scalars join their elements with
    /// commas so a `tags` field is searchable as text. Objects and null have
    /// no value.
    fn record_value(&self) -> Value<'_> {
        match self {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => json_number(n),
            serde_json::Value::String(s) => Value::from(s.as_str()),
            serde_json::Value::Array(items) => {
                if items.iter().any(|item| item.is_object() || item.is_array()) {
                    return Value::None;
                }
                let joined = items
                    .iter()
                    .map(|item| {
                        item.record_value()
                            .to_text()
                            .map(Cow::into_owned)
                            .unwrap_or_default()
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                Value::from(joined)
            }
            serde_json::Value::Object(_) => Value::None,
        }
    }
}

fn json_number(n: &serde_json::Number) -> Value<'static> {
    if let Some(i) = n.as_i64() {
        Value::Number(Number::I64(i))
    } else if let Some(u) = n.as_u64() {
        Value::Number(Number::U64(u))
    } else {
        n.as_f64()
            .map_or(Value::None, |f| Value::Number(Number::F64(f)))
    }
}

/// JSON records are identified by their `value` member, or by the whole
/// record when there is none. The identity is the compact JSON text.
impl Identifiable for serde_json::Value {
    type Id = String;

    fn id(&self) -> String {
        match self.get("value") {
            Some(value) => value.to_string(),
            None => self.to_string(),
        }
    }
}

impl<V: Filterable> Filterable for BTreeMap<String, V> {
    fn record_keys(&self) -> Option<Vec<Cow<'_, str>>> {
        Some(self.keys().map(|k| Cow::Borrowed(k.as_str())).collect())
    }

    fn field(&self, key: &str) -> Option<&dyn Filterable> {
        self.get(key).map(|value| value as &dyn Filterable)
    }
}

impl<V: Filterable> Filterable for HashMap<String, V> {
    fn record_keys(&self) -> Option<Vec<Cow<'_, str>>> {
        Some(self.keys().map(|k| Cow::Borrowed(k.as_str())).collect())
    }

    fn field(&self, key: &str) -> Option<&dyn Filterable> {
        self.get(key).map(|value| value as &dyn Filterable)
    }
}
