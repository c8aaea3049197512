//! Flat index settings.
//!
//! Settings are addressed by dotted keys without the `index.` prefix
//! (`number_of_replicas`, `search.slowlog.level`). The remote API reports
//! settings nested and stringly typed; [`SettingsMap::from_remote`] flattens
//! them into this shape.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

const INDEX_PREFIX: &str = "index.";

/// Whole floats at or beyond this magnitude do not fit an `i64`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Keys the server assigns on its own. They are never user-configurable and
/// are dropped when decoding a remote settings document.
const SERVER_MANAGED: &[&str] = &[
    "creation_date",
    "uuid",
    "provided_name",
    "version.created",
    "version.upgraded",
    "history.uuid",
    "routing.allocation.include._tier_preference",
];

/// A setting value: a scalar or a list of strings.
///
/// Equality is by canonical string form for scalars, so a configured `5`
/// matches the `"5"` the remote reports back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<String>),
}

impl SettingValue {
    /// Canonical string form of a scalar. `None` for lists.
    #[must_use]
    pub fn canonical(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) if f.fract() == 0.0 && f.abs() < I64_LIMIT => {
                Some(format!("{}", *f as i64))
            }
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::List(_) => None,
        }
    }

    /// Decodes a JSON value. Arrays must contain scalars only.
    pub fn from_json(key: &str, value: &Value) -> ModelResult<Self> {
        match value {
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(invalid(key, format!("number {n} is out of range")))
                }
            }
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match Self::from_json(key, item)? {
                    Self::List(_) => Err(invalid(key, "nested arrays are not supported")),
                    scalar => Ok(scalar.canonical().unwrap_or_default()),
                })
                .collect::<ModelResult<Vec<_>>>()
                .map(Self::List),
            Value::Null => Err(invalid(key, "null is not a setting value")),
            Value::Object(_) => Err(invalid(key, "objects must be flattened into dotted keys")),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::String(s) => Value::String(s.clone()),
            Self::List(items) => Value::from(items.clone()),
        }
    }
}

impl PartialEq for SettingValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => a == b,
            (Self::List(_), _) | (_, Self::List(_)) => false,
            _ => self.canonical() == other.canonical(),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical() {
            Some(s) => f.write_str(&s),
            None => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for SettingValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for SettingValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Settings keyed by dotted name (without `index.`).
///
/// Every construction path, serde included, goes through
/// [`insert`](Self::insert), so keys are always stored without the prefix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, SettingValue>",
    into = "BTreeMap<String, SettingValue>"
)]
pub struct SettingsMap {
    entries: BTreeMap<String, SettingValue>,
}

impl SettingsMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a setting, stripping any `index.` prefix from the key.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<SettingValue>) {
        self.entries
            .insert(strip_index_prefix(key.as_ref()).to_string(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<SettingValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.get(strip_index_prefix(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the subset of entries whose key satisfies `keep`.
    #[must_use]
    pub fn filtered(&self, mut keep: impl FnMut(&str) -> bool) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| keep(k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Decodes an already-flat object (`{"index.number_of_replicas": "1"}`).
    pub fn from_flat(value: &Value) -> ModelResult<Self> {
        let Some(obj) = value.as_object() else {
            return Err(invalid("<root>", format!("expected a JSON object, got {value}")));
        };
        let mut map = Self::new();
        for (key, v) in obj {
            map.insert(key, SettingValue::from_json(key, v)?);
        }
        Ok(map)
    }

    /// Decodes a remote settings document, flattening nested objects into
    /// dotted keys and dropping server-managed keys. Accepts both
    /// `{"settings": {"index": {...}}}` and the inner `{"index": {...}}`.
    pub fn from_remote(value: &Value) -> ModelResult<Self> {
        let inner = value.get("settings").unwrap_or(value);
        let Some(obj) = inner.as_object() else {
            return Err(invalid("<root>", format!("expected a JSON object, got {inner}")));
        };
        let mut map = Self::new();
        flatten_into(&mut map, "", obj)?;
        Ok(map)
    }

    /// Flat JSON object of the settings.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<K: AsRef<str>, V: Into<SettingValue>> FromIterator<(K, V)> for SettingsMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl From<BTreeMap<String, SettingValue>> for SettingsMap {
    fn from(entries: BTreeMap<String, SettingValue>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<SettingsMap> for BTreeMap<String, SettingValue> {
    fn from(map: SettingsMap) -> Self {
        map.entries
    }
}

fn flatten_into(map: &mut SettingsMap, prefix: &str, obj: &Map<String, Value>) -> ModelResult<()> {
    for (key, value) in obj {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(map, &full, nested)?,
            _ if SERVER_MANAGED.contains(&strip_index_prefix(&full)) => {}
            other => map.insert(&full, SettingValue::from_json(&full, other)?),
        }
    }
    Ok(())
}

fn strip_index_prefix(key: &str) -> &str {
    key.strip_prefix(INDEX_PREFIX).unwrap_or(key)
}

fn invalid(key: &str, reason: impl Into<String>) -> ModelError {
    ModelError::InvalidSetting {
        key: key.to_string(),
        reason: reason.into(),
    }
}
