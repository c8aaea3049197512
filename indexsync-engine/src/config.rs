//! Engine configuration, usually read from the `[reconcile]` table of a TOML
//! file.

use crate::error::EngineResult;
use indexsync_diff::WarningMode;
use serde::{Deserialize, Serialize};

/// Tunables for [`ReconciliationOrchestrator`](crate::ReconciliationOrchestrator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Whether the mapping walk stops at the first replace-forcing change
    /// (`short_circuit`) or keeps going to report every ignored removal
    /// (`collect_all`).
    #[serde(default)]
    pub mapping_warnings: WarningMode,
    /// Compute the plan but issue no remote calls.
    #[serde(default)]
    pub dry_run: bool,
    /// Skip the mapping update when the merged tree equals the observed one.
    #[serde(default = "default_skip_unchanged_mappings")]
    pub skip_unchanged_mappings: bool,
}

fn default_skip_unchanged_mappings() -> bool {
    true
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            mapping_warnings: WarningMode::default(),
            dry_run: false,
            skip_unchanged_mappings: default_skip_unchanged_mappings(),
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    reconcile: Option<ReconcileConfig>,
}

impl ReconcileConfig {
    /// Parses a TOML document. Settings are read from a `[reconcile]` table;
    /// a document without one yields the defaults.
    pub fn from_toml_str(toml_str: &str) -> EngineResult<Self> {
        let file: ConfigFile = toml::from_str(toml_str)?;
        Ok(file.reconcile.unwrap_or_default())
    }
}
