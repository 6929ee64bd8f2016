//! Record access traits.
//!
//! The filter engine never inspects records directly. It asks them, through
//! [`Filterable`], for their key names and the values stored under those
//! keys. Scalar records (strings, numbers, booleans) expose only a single
//! [`Value`] and no keys.

use std::borrow::Cow;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

use crate::value::{Number, Value};

/// Trait for records that can be filtered.
///
/// A record is *keyed* when [`record_keys`](Filterable::record_keys) returns
/// `Some`, and *scalar* otherwise. Keyed records hand out their fields either
/// as nested records ([`field`](Filterable::field)), which enables dotted key
/// paths like `"owner.name"`, or as computed values
/// ([`field_value`](Filterable::field_value)).
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
/// use standout_sift::{Filterable, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Filterable for Task {
///     fn record_keys(&self) -> Option<Vec<Cow<'_, str>>> {
///         Some(vec!["name".into(), "priority".into()])
///     }
///
///     fn field(&self, key: &str) -> Option<&dyn Filterable> {
///         match key {
///             "name" => Some(&self.name),
///             "priority" => Some(&self.priority),
///             _ => None,
///         }
///     }
/// }
///
/// let task = Task { name: "Write docs".into(), priority: 3 };
/// assert_eq!(task.field_value("name"), Some(Value::from("Write docs")));
/// ```
pub trait Filterable {
    /// Returns the keys examined when no key allow-list is configured, or
    /// `None` if this record is a scalar.
    fn record_keys(&self) -> Option<Vec<Cow<'_, str>>> {
        None
    }

    /// Returns the nested record stored under `key`, if any.
    fn field(&self, _key: &str) -> Option<&dyn Filterable> {
        None
    }

    /// Returns the value stored under `key`.
    ///
    /// `None` means the key does not exist; `Some(Value::None)` means it
    /// exists but holds nothing. The default looks up [`field`](Filterable::field)
    /// and takes its [`record_value`](Filterable::record_value).
    fn field_value(&self, key: &str) -> Option<Value<'_>> {
        self.field(key).map(|field| field.record_value())
    }

    /// Returns the record as a single value.
    ///
    /// This is what scalar records are matched on, and what keyed records
    /// fall back to when a key cannot be extracted.
    fn record_value(&self) -> Value<'_> {
        Value::None
    }

    /// Returns `true` if this record exposes keys.
    fn is_keyed(&self) -> bool {
        self.record_keys().is_some()
    }
}

/// Trait for records with a stable identity.
///
/// The reactive [`FilterView`](crate::FilterView) uses the identity to look up
/// a record's match metadata after filtering.
pub trait Identifiable {
    /// The identity type.
    type Id: Eq + Hash + Clone;

    /// Returns the identity of this record.
    fn id(&self) -> Self::Id;
}

impl Filterable for str {
    fn record_value(&self) -> Value<'_> {
        Value::from(self)
    }
}

impl Filterable for String {
    fn record_value(&self) -> Value<'_> {
        Value::from(self.as_str())
    }
}

impl Filterable for Cow<'_, str> {
    fn record_value(&self) -> Value<'_> {
        Value::from(self.as_ref())
    }
}

impl Filterable for bool {
    fn record_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl Filterable for Value<'_> {
    fn record_value(&self) -> Value<'_> {
        match self {
            Value::String(s) => Value::from(s.as_ref()),
            other => other.clone(),
        }
    }
}

impl Filterable for i32 {
    fn record_value(&self) -> Value<'_> {
        Value::Number(Number::from(*self))
    }
}

impl Filterable for i64 {
    fn record_value(&self) -> Value<'_> {
        Value::Number(Number::I64(*self))
    }
}

impl Filterable for u8 {
    fn record_value(&self) -> Value<'_> {
        Value::Number(Number::from(*self))
    }
}

impl Filterable for u32 {
    fn record_value(&self) -> Value<'_> {
        Value::Number(Number::from(*self))
    }
}

impl Filterable for u64 {
    fn record_value(&self) -> Value<'_> {
        Value::Number(Number::U64(*self))
    }
}

impl Filterable for usize {
    fn record_value(&self) -> Value<'_> {
        Value::Number(Number::from(*self))
    }
}

impl Filterable for f64 {
    fn record_value(&self) -> Value<'_> {
        Value::Number(Number::F64(*self))
    }
}

impl<T: Filterable> Filterable for Option<T> {
    fn record_keys(&self) -> Option<Vec<Cow<'_, str>>> {
        self.as_ref().and_then(Filterable::record_keys)
    }

    fn field(&self, key: &str) -> Option<&dyn Filterable> {
        self.as_ref().and_then(|inner| inner.field(key))
    }

    fn field_value(&self, key: &str) -> Option<Value<'_>> {
        self.as_ref().and_then(|inner| inner.field_value(key))
    }

    fn record_value(&self) -> Value<'_> {
        self.as_ref().map_or(Value::None, Filterable::record_value)
    }
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn record_keys(&self) -> Option<Vec<Cow<'_, str>>> {
        (**self).record_keys()
    }

    fn field(&self, key: &str) -> Option<&dyn Filterable> {
        (**self).field(key)
    }

    fn field_value(&self, key: &str) -> Option<Value<'_>> {
        (**self).field_value(key)
    }

    fn record_value(&self) -> Value<'_> {
        (**self).record_value()
    }
}

impl<T: Filterable + ?Sized> Filterable for Box<T> {
    fn record_keys(&self) -> Option<Vec<Cow<'_, str>>> {
        (**self).record_keys()
    }

    fn field(&self, key: &str) -> Option<&dyn Filterable> {
        (**self).field(key)
    }

    fn field_value(&self, key: &str) -> Option<Value<'_>> {
        (**self).field_value(key)
    }

    fn record_value(&self) -> Value<'_> {
        (**self).record_value()
    }
}

impl<T: Filterable + ?Sized> Filterable for Rc<T> {
    fn record_keys(&self) -> Option<Vec<Cow<'_, str>>> {
        (**self).record_keys()
    }

    fn field(&self, key: &str) -> Option<&dyn Filterable> {
        (**self).field(key)
    }

    fn field_value(&self, key: &str) -> Option<Value<'_>> {
        (**self).field_value(key)
    }

    fn record_value(&self) -> Value<'_> {
        (**self).record_value()
    }
}

impl<T: Filterable + ?Sized> Filterable for Arc<T> {
    fn record_keys(&self) -> Option<Vec<Cow<'_, str>>> {
        (**self).record_keys()
    }

    fn field(&self, key: &str) -> Option<&dyn Filterable> {
        (**self).field(key)
    }

    fn field_value(&self, key: &str) -> Option<Value<'_>> {
        (**self).field_value(key)
    }

    fn record_value(&self) -> Value<'_> {
        (**self).record_value()
    }
}

impl Identifiable for String {
    type Id = String;

    fn id(&self) -> String {
        self.clone()
    }
}

impl Identifiable for &str {
    type Id = String;

    fn id(&self) -> String {
        (*self).to_string()
    }
}

impl Identifiable for i64 {
    type Id = i64;

    fn id(&self) -> i64 {
        *self
    }
}

impl Identifiable for u64 {
    type Id = u64;

    fn id(&self) -> u64 {
        *self
    }
}
