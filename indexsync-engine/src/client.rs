//! Remote index API abstraction.
//!
//! The engine never talks to the network itself. It hands the computed
//! patches to an [`IndexClient`], which issues the partial-update calls.

use crate::error::ClientError;
use async_trait::async_trait;
use indexsync_diff::SettingsPatch;
use indexsync_model::{Alias, MappingTree};

/// Partial-update calls against one live index.
///
/// Implementations own transport, authentication and any retry policy.
/// The engine calls these sequentially and stops at the first error.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Removes the alias `name` from `index`.
    async fn delete_alias(&self, index: &str, name: &str) -> Result<(), ClientError>;

    /// Creates or replaces an alias on `index`. The request body is
    /// [`Alias::body`].
    async fn put_alias(&self, index: &str, alias: &Alias) -> Result<(), ClientError>;

    /// Applies a dynamic-settings patch. The request body is
    /// [`SettingsPatch::to_json`], where `null` unsets a key.
    async fn put_settings(&self, index: &str, patch: &SettingsPatch) -> Result<(), ClientError>;

    /// Submits a mapping update. The request body is
    /// [`MappingTree::to_json`]; the remote merges it additively.
    async fn put_mapping(&self, index: &str, mappings: &MappingTree) -> Result<(), ClientError>;
}
