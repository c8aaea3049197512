//! Field-mapping tree.
//!
//! A mapping is a tree of named fields. Each field is either a leaf with a
//! declared storage `type`, or an object grouping nested `properties`, never
//! both. The remote JSON shape is:
//!
//! ```json
//! {"properties": {"title": {"type": "text"}, "user": {"properties": {"id": {"type": "keyword"}}}}}
//! ```

use crate::error::{ModelError, ModelResult};
use crate::path::FieldPath;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const TYPE_KEY: &str = "type";
const PROPERTIES_KEY: &str = "properties";

/// A named entry in a mapping tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum FieldNode {
    /// Terminal field. `params` holds the remaining mapping parameters
    /// (`analyzer`, `format`, multi-`fields`, ...) verbatim.
    Leaf {
        field_type: String,
        params: Map<String, Value>,
    },
    /// Nested grouping of fields. `params` holds object-level parameters
    /// (`dynamic`, `enabled`, ...) verbatim.
    Object {
        properties: BTreeMap<String, FieldNode>,
        params: Map<String, Value>,
    },
}

impl FieldNode {
    /// A leaf with no extra parameters.
    pub fn leaf(field_type: impl Into<String>) -> Self {
        Self::Leaf {
            field_type: field_type.into(),
            params: Map::new(),
        }
    }

    /// An object node built from `(name, node)` pairs.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldNode)>,
        K: Into<String>,
    {
        Self::Object {
            properties: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            params: Map::new(),
        }
    }

    /// Adds a mapping parameter next to `type` or `properties`.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        match &mut self {
            Self::Leaf { params, .. } | Self::Object { params, .. } => {
                params.insert(key.into(), value);
            }
        }
        self
    }

    /// Parameters other than `type` and `properties`.
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        match self {
            Self::Leaf { params, .. } | Self::Object { params, .. } => params,
        }
    }

    /// Declared type of a leaf.
    #[must_use]
    pub fn field_type(&self) -> Option<&str> {
        match self {
            Self::Leaf { field_type, .. } => Some(field_type),
            Self::Object { .. } => None,
        }
    }

    /// Nested fields of an object.
    #[must_use]
    pub fn properties(&self) -> Option<&BTreeMap<String, FieldNode>> {
        match self {
            Self::Leaf { .. } => None,
            Self::Object { properties, .. } => Some(properties),
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Number of leaves at or below this node.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Object { properties, .. } => properties.values().map(FieldNode::leaf_count).sum(),
        }
    }

    /// Decodes a node, reporting errors against `path`.
    pub fn from_json_at(path: &FieldPath, value: &Value) -> ModelResult<Self> {
        let Some(obj) = value.as_object() else {
            return Err(malformed(path, format!("expected a JSON object, got {value}")));
        };

        match (obj.get(TYPE_KEY), obj.get(PROPERTIES_KEY)) {
            (Some(_), Some(_)) => Err(malformed(
                path,
                "field declares both `type` and `properties`",
            )),
            (Some(Value::String(field_type)), None) => {
                let mut params = obj.clone();
                params.remove(TYPE_KEY);
                Ok(Self::Leaf {
                    field_type: field_type.clone(),
                    params,
                })
            }
            (Some(other), None) => Err(malformed(
                path,
                format!("`type` must be a string, got {other}"),
            )),
            (None, Some(props)) => {
                let properties = decode_properties(&path.at_key(PROPERTIES_KEY), props)?;
                let mut params = obj.clone();
                params.remove(PROPERTIES_KEY);
                Ok(Self::Object { properties, params })
            }
            (None, None) => Err(malformed(
                path,
                "field declares neither `type` nor `properties`",
            )),
        }
    }

    /// Encodes the node to its remote JSON shape.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Leaf { field_type, params } => {
                let mut obj = params.clone();
                obj.insert(TYPE_KEY.to_string(), Value::String(field_type.clone()));
                Value::Object(obj)
            }
            Self::Object { properties, params } => {
                let mut obj = params.clone();
                obj.insert(PROPERTIES_KEY.to_string(), encode_properties(properties));
                Value::Object(obj)
            }
        }
    }
}

impl TryFrom<Value> for FieldNode {
    type Error = ModelError;

    fn try_from(value: Value) -> ModelResult<Self> {
        Self::from_json_at(&FieldPath::mappings(), &value)
    }
}

impl From<FieldNode> for Value {
    fn from(node: FieldNode) -> Self {
        node.to_json()
    }
}

/// Root of a mapping: the top-level `properties` plus root-level mapping
/// parameters (`dynamic`, `_source`, ...), which are carried but not diffed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct MappingTree {
    pub properties: BTreeMap<String, FieldNode>,
    pub params: Map<String, Value>,
}

impl MappingTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from `(name, node)` pairs.
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldNode)>,
        K: Into<String>,
    {
        Self {
            properties: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            params: Map::new(),
        }
    }

    /// Adds or replaces a top-level field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, node: FieldNode) -> Self {
        self.properties.insert(name.into(), node);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldNode> {
        self.properties.get(name)
    }

    /// Returns true when the tree declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Number of leaves in the whole tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.properties.values().map(FieldNode::leaf_count).sum()
    }

    /// Decodes a remote mapping document. `{}` decodes to an empty tree.
    pub fn from_json(value: &Value) -> ModelResult<Self> {
        let root = FieldPath::mappings();
        let Some(obj) = value.as_object() else {
            return Err(malformed(&root, format!("expected a JSON object, got {value}")));
        };

        let mut params = obj.clone();
        let properties = match params.remove(PROPERTIES_KEY) {
            Some(props) => decode_properties(&root.at_key(PROPERTIES_KEY), &props)?,
            None => BTreeMap::new(),
        };
        Ok(Self { properties, params })
    }

    /// Parses a mapping from JSON text.
    pub fn from_json_str(s: &str) -> ModelResult<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_json(&value)
    }

    /// Encodes to the remote mapping-update shape `{"properties": {...}}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut obj = self.params.clone();
        obj.insert(PROPERTIES_KEY.to_string(), encode_properties(&self.properties));
        Value::Object(obj)
    }
}

impl TryFrom<Value> for MappingTree {
    type Error = ModelError;

    fn try_from(value: Value) -> ModelResult<Self> {
        Self::from_json(&value)
    }
}

impl From<MappingTree> for Value {
    fn from(tree: MappingTree) -> Self {
        tree.to_json()
    }
}

fn decode_properties(path: &FieldPath, value: &Value) -> ModelResult<BTreeMap<String, FieldNode>> {
    let Some(obj) = value.as_object() else {
        return Err(malformed(path, format!("`properties` must be an object, got {value}")));
    };
    obj.iter()
        .map(|(name, node)| Ok((name.clone(), FieldNode::from_json_at(&path.at_key(name), node)?)))
        .collect()
}

fn encode_properties(properties: &BTreeMap<String, FieldNode>) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(name, node)| (name.clone(), node.to_json()))
            .collect(),
    )
}

fn malformed(path: &FieldPath, reason: impl Into<String>) -> ModelError {
    ModelError::MalformedField {
        path: path.to_string(),
        reason: reason.into(),
    }
}
