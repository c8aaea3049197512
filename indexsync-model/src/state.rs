use crate::alias::AliasSet;
use crate::error::{ModelError, ModelResult};
use crate::mapping::MappingTree;
use crate::settings::SettingsMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One full index configuration: what the user declared, or what the remote
/// reported at the last read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexState {
    pub name: String,
    #[serde(default)]
    pub mappings: MappingTree,
    #[serde(default)]
    pub settings: SettingsMap,
    #[serde(default)]
    pub aliases: AliasSet,
}

impl IndexState {
    /// An index with no mappings, settings or aliases.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_mappings(mut self, mappings: MappingTree) -> Self {
        self.mappings = mappings;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SettingsMap) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasSet) -> Self {
        self.aliases = aliases;
        self
    }

    /// Decodes the body of a remote `GET /<index>` response.
    ///
    /// Accepts either the full response keyed by index name or the inner
    /// `{"aliases": .., "mappings": .., "settings": ..}` object. Missing
    /// sections decode as empty.
    pub fn from_remote(name: &str, body: &Value) -> ModelResult<Self> {
        let inner = body.get(name).unwrap_or(body);
        if !inner.is_object() {
            return Err(ModelError::MalformedField {
                path: name.to_string(),
                reason: format!("expected a JSON object, got {inner}"),
            });
        }

        let mappings = match inner.get("mappings") {
            Some(m) => MappingTree::from_json(m)?,
            None => MappingTree::new(),
        };
        let settings = match inner.get("settings") {
            Some(s) => SettingsMap::from_remote(s)?,
            None => SettingsMap::new(),
        };
        let aliases = match inner.get("aliases") {
            Some(a) => AliasSet::from_remote(a)?,
            None => AliasSet::new(),
        };

        Ok(Self {
            name: name.to_string(),
            mappings,
            settings,
            aliases,
        })
    }
}
