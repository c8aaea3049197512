//! Index configuration model for indexsync.
//!
//! Defines the value types the reconcilers operate on:
//! - [`MappingTree`] / [`FieldNode`]: the nested field-mapping tree
//! - [`SettingsMap`] / [`SettingValue`]: flat index settings keyed by dotted name
//! - [`Alias`] / [`AliasSet`]: named aliases owned by the index
//! - [`IndexState`]: one full configuration (desired or observed)
//! - [`FieldPath`] / [`MappingWarning`]: user-facing diagnostics
//!
//! Every type here is a plain value. Decoding from the remote JSON shapes
//! validates the structural invariants up front, so the reconcilers never see
//! a malformed node.

mod alias;
mod error;
mod mapping;
mod path;
mod settings;
mod state;

pub use alias::{Alias, AliasSet};
pub use error::{ModelError, ModelResult};
pub use mapping::{FieldNode, MappingTree};
pub use path::{FieldPath, MappingWarning};
pub use settings::{SettingValue, SettingsMap};
pub use state::IndexState;
