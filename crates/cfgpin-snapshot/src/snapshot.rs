//! The [`Snapshot`] key/value model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SnapshotError, SnapshotResult};

/// An ordered mapping from configuration key to string value.
///
/// Insertion order is preserved for display. Equality ignores order: two
/// snapshots are equal when they hold the same key/value pairs.
///
/// Collecting pairs with [`FromIterator`] silently drops empty keys; use
/// [`insert`](Self::insert) to have them reported as
/// [`SnapshotError::EmptyKey`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: IndexMap<String, String>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a key. Returns the previous value, if any.
    ///
    /// New keys are appended; overwriting keeps the key's position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> SnapshotResult<Option<String>> {
        let key = key.into();
        if key.is_empty() {
            return Err(SnapshotError::EmptyKey);
        }
        Ok(self.entries.insert(key, value.into()))
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> SnapshotResult<String> {
        self.entries
            .shift_remove(key)
            .ok_or_else(|| SnapshotError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Rename a key in place, keeping its value and position.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> SnapshotResult<()> {
        let to = to.into();
        if to.is_empty() {
            return Err(SnapshotError::EmptyKey);
        }
        if from == to {
            return if self.entries.contains_key(from) {
                Ok(())
            } else {
                Err(SnapshotError::KeyNotFound {
                    key: from.to_string(),
                })
            };
        }
        if self.entries.contains_key(&to) {
            return Err(SnapshotError::KeyExists { key: to });
        }
        let (index, _, value) =
            self.entries
                .shift_remove_full(from)
                .ok_or_else(|| SnapshotError::KeyNotFound {
                    key: from.to_string(),
                })?;
        self.entries.shift_insert(index, to, value);
        Ok(())
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a snapshot from a JSON object, coercing scalars to strings.
    ///
    /// Numbers and booleans take their canonical JSON spelling (`42`,
    /// `1.5`, `true`) and `null` becomes `"null"`. The coercion is lossy and
    /// is never reversed: the snapshot only ever holds strings. Arrays and
    /// nested objects are rejected.
    pub fn from_json_object(value: &Value) -> SnapshotResult<Self> {
        let object = match value {
            Value::Object(map) => map,
            other => return Err(SnapshotError::NotAnObject(json_kind(other))),
        };
        let mut snapshot = Self::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => "null".to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(SnapshotError::UnsupportedValue {
                        key: key.clone(),
                        kind: json_kind(value),
                    })
                }
            };
            snapshot.insert(key.clone(), text)?;
        }
        Ok(snapshot)
    }
}

/// Lossy: pairs with an empty key are dropped without error.
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        Self { entries }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
