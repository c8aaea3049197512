use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of an attribute inside the `mappings` document.
///
/// Rendered the way the configuration framework prints attribute paths,
/// e.g. `mappings["properties"]["user"]["properties"]["name"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    root: String,
    keys: Vec<String>,
}

impl FieldPath {
    /// The `mappings` attribute itself.
    #[must_use]
    pub fn mappings() -> Self {
        Self {
            root: "mappings".to_string(),
            keys: Vec::new(),
        }
    }

    /// The `mappings["properties"]` block, where field reconciliation starts.
    #[must_use]
    pub fn mapping_properties() -> Self {
        Self::mappings().at_key("properties")
    }

    /// Returns a new path with `key` appended.
    #[must_use]
    pub fn at_key(&self, key: &str) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key.to_string());
        Self {
            root: self.root.clone(),
            keys,
        }
    }

    /// Map keys below the root, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// The last key, or the root name for an empty path.
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        self.keys.last().unwrap_or(&self.root)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for key in &self.keys {
            write!(f, "[\"{key}\"]")?;
        }
        Ok(())
    }
}

/// A non-fatal diagnostic attached to a mapping path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingWarning {
    pub path: FieldPath,
    pub summary: String,
    pub detail: String,
}

impl MappingWarning {
    /// Warning for a field (or nested block) dropped from the desired mapping.
    /// The remote index keeps such fields, so the removal is not applied.
    #[must_use]
    pub fn removal_ignored(path: FieldPath) -> Self {
        Self {
            summary: format!("removing field [{path}] in mappings is ignored"),
            detail: "Elasticsearch will maintain the current field in its mapping. \
                     Re-index to remove the field completely"
                .to_string(),
            path,
        }
    }
}

impl fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary, self.detail)
    }
}
