use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A named alias pointing at the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    /// Query DSL object restricting the documents visible through the alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_routing: Option<String>,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_write_index: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_routing: Option<String>,
}

impl Alias {
    /// An alias with every attribute at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter: None,
            index_routing: None,
            is_hidden: false,
            is_write_index: false,
            routing: None,
            search_routing: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    #[must_use]
    pub fn write_index(mut self, is_write_index: bool) -> Self {
        self.is_write_index = is_write_index;
        self
    }

    #[must_use]
    pub fn hidden(mut self, is_hidden: bool) -> Self {
        self.is_hidden = is_hidden;
        self
    }

    /// Body for the remote `PUT /<index>/_alias/<name>` call.
    #[must_use]
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        if let Some(filter) = &self.filter {
            body.insert("filter".into(), filter.clone());
        }
        if let Some(r) = &self.index_routing {
            body.insert("index_routing".into(), Value::String(r.clone()));
        }
        body.insert("is_hidden".into(), Value::Bool(self.is_hidden));
        body.insert("is_write_index".into(), Value::Bool(self.is_write_index));
        if let Some(r) = &self.routing {
            body.insert("routing".into(), Value::String(r.clone()));
        }
        if let Some(r) = &self.search_routing {
            body.insert("search_routing".into(), Value::String(r.clone()));
        }
        Value::Object(body)
    }

    /// Decodes an alias from the remote representation, where the name is the
    /// map key and the body carries the attributes.
    pub fn from_remote(name: &str, body: &Value) -> ModelResult<Self> {
        let Some(obj) = body.as_object() else {
            return Err(invalid(name, format!("expected a JSON object, got {body}")));
        };
        let string_attr = |key: &str| -> ModelResult<Option<String>> {
            match obj.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(invalid(name, format!("`{key}` must be a string, got {other}"))),
            }
        };
        let bool_attr = |key: &str| -> ModelResult<bool> {
            match obj.get(key) {
                None | Some(Value::Null) => Ok(false),
                Some(Value::Bool(b)) => Ok(*b),
                Some(other) => Err(invalid(name, format!("`{key}` must be a boolean, got {other}"))),
            }
        };

        Ok(Self {
            name: name.to_string(),
            filter: obj.get("filter").filter(|f| !f.is_null()).cloned(),
            index_routing: string_attr("index_routing")?,
            is_hidden: bool_attr("is_hidden")?,
            is_write_index: bool_attr("is_write_index")?,
            routing: string_attr("routing")?,
            search_routing: string_attr("search_routing")?,
        })
    }
}

/// Aliases owned by one index, keyed by name.
///
/// Deserializes from `{"<name>": {"name": "<name>", ...}}`; a key that
/// disagrees with the alias's own `name` is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Alias>",
    into = "BTreeMap<String, Alias>"
)]
pub struct AliasSet {
    aliases: BTreeMap<String, Alias>,
}

impl AliasSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an alias, replacing any alias with the same name.
    pub fn insert(&mut self, alias: Alias) -> Option<Alias> {
        self.aliases.insert(alias.name.clone(), alias)
    }

    #[must_use]
    pub fn with(mut self, alias: Alias) -> Self {
        self.insert(alias);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Alias> {
        self.aliases.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alias> {
        self.aliases.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Decodes the remote `{"<name>": {...}, ...}` alias object.
    pub fn from_remote(value: &Value) -> ModelResult<Self> {
        let Some(obj) = value.as_object() else {
            return Err(invalid("<root>", format!("expected a JSON object, got {value}")));
        };
        obj.iter()
            .map(|(name, body)| Alias::from_remote(name, body))
            .collect()
    }
}

impl FromIterator<Alias> for AliasSet {
    fn from_iter<I: IntoIterator<Item = Alias>>(iter: I) -> Self {
        let mut set = Self::new();
        for alias in iter {
            set.insert(alias);
        }
        set
    }
}

impl TryFrom<BTreeMap<String, Alias>> for AliasSet {
    type Error = ModelError;

    fn try_from(aliases: BTreeMap<String, Alias>) -> ModelResult<Self> {
        if let Some((key, alias)) = aliases.iter().find(|(key, alias)| **key != alias.name) {
            return Err(invalid(
                key,
                format!("keyed as `{key}` but named `{}`", alias.name),
            ));
        }
        Ok(Self { aliases })
    }
}

impl From<AliasSet> for BTreeMap<String, Alias> {
    fn from(set: AliasSet) -> Self {
        set.aliases
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> ModelError {
    ModelError::InvalidAlias {
        name: name.to_string(),
        reason: reason.into(),
    }
}
