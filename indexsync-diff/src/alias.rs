//! Alias set differ.
//!
//! Aliases are matched by name only. Every desired alias is re-submitted as an
//! upsert, changed or not: the remote upsert is idempotent, and comparing
//! attribute values would misfire on attributes the remote fills in with
//! defaults.

use indexsync_model::{Alias, AliasSet};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Alias operations converging the observed set to the desired one.
///
/// Apply every delete before any upsert.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AliasPatch {
    pub to_delete: BTreeSet<String>,
    pub to_upsert: Vec<Alias>,
}

impl AliasPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_upsert.is_empty()
    }

    /// Total number of remote calls the patch needs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_delete.len() + self.to_upsert.len()
    }
}

/// Diffs the desired alias set against the observed one.
#[must_use]
pub fn diff_aliases(desired: &AliasSet, observed: &AliasSet) -> AliasPatch {
    let to_delete: BTreeSet<String> = observed
        .names()
        .filter(|name| !desired.contains(name))
        .map(str::to_string)
        .collect();
    let to_upsert: Vec<Alias> = desired.iter().cloned().collect();

    debug!(
        delete = to_delete.len(),
        upsert = to_upsert.len(),
        "Computed alias patch"
    );
    AliasPatch {
        to_delete,
        to_upsert,
    }
}
