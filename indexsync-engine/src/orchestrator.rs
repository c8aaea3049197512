//! Reconciliation orchestrator.
//!
//! Runs the three reconcilers against one (desired, observed) pair, folds
//! their decisions into a [`ReconciliationResult`], and drives the remote
//! calls in a fixed order:
//!
//! ```text
//! Pending → Diffing → ApplyingAliases → ApplyingSettings → ApplyingMappings → Done
//! Pending → Diffing → ReplaceRequired → Done
//! ```
//!
//! Once a replace is required no partial update is issued; destroying and
//! recreating the index is the caller's job.

use crate::client::IndexClient;
use crate::config::ReconcileConfig;
use crate::error::{ClientError, EngineError, EngineResult};
use indexsync_diff::{
    diff_aliases, diff_settings, reconcile_mappings, static_changes, AliasPatch, SettingsPatch,
    StaticChange,
};
use indexsync_model::{IndexState, MappingTree, MappingWarning};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Position in the reconciliation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStage {
    Pending,
    Diffing,
    ApplyingAliases,
    ApplyingSettings,
    ApplyingMappings,
    ReplaceRequired,
    Done,
}

/// Why an index cannot be updated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ReplaceReason {
    /// The desired index name differs from the live one.
    NameChanged { observed: String, desired: String },
    /// A creation-time setting differs.
    StaticSetting(StaticChange),
    /// A mapping field changed type or kind.
    MappingChanged,
}

/// Everything the caller needs after one reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationResult {
    pub requires_replace: bool,
    pub replace_reasons: Vec<ReplaceReason>,
    /// Desired mapping with removed fields restored from the observed one.
    pub merged_mappings: MappingTree,
    pub warnings: Vec<MappingWarning>,
    pub settings_patch: SettingsPatch,
    pub alias_patch: AliasPatch,
    /// Tree to submit to the mapping-update call, if any.
    pub mapping_update: Option<MappingTree>,
    /// States visited, in order.
    pub stages: Vec<ReconcileStage>,
}

impl ReconciliationResult {
    /// Whether an in-place update would issue any remote call.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.requires_replace
            && (!self.alias_patch.is_empty()
                || !self.settings_patch.is_empty()
                || self.mapping_update.is_some())
    }

    /// The last state reached.
    #[must_use]
    pub fn stage(&self) -> ReconcileStage {
        self.stages.last().copied().unwrap_or(ReconcileStage::Pending)
    }
}

/// Composes the mapping, settings and alias reconcilers for one index.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationOrchestrator {
    config: ReconcileConfig,
}

impl ReconciliationOrchestrator {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Computes the reconciliation without any remote call.
    ///
    /// Used at plan time to predict whether the index must be replaced, and
    /// by [`apply`](Self::apply) before it drives the client. When a replace
    /// is required the returned patches are empty.
    pub fn plan(
        &self,
        desired: &IndexState,
        observed: &IndexState,
    ) -> EngineResult<ReconciliationResult> {
        let mut stages = vec![ReconcileStage::Pending, ReconcileStage::Diffing];
        debug!(index = %observed.name, "Diffing index configuration");

        let mut replace_reasons = Vec::new();
        if desired.name != observed.name {
            replace_reasons.push(ReplaceReason::NameChanged {
                observed: observed.name.clone(),
                desired: desired.name.clone(),
            });
        }
        replace_reasons.extend(
            static_changes(&desired.settings, &observed.settings)?
                .into_iter()
                .map(ReplaceReason::StaticSetting),
        );

        let mapping = reconcile_mappings(
            &observed.mappings,
            &desired.mappings,
            self.config.mapping_warnings,
        );
        if mapping.requires_replace {
            replace_reasons.push(ReplaceReason::MappingChanged);
        }

        let settings_patch = diff_settings(&desired.settings, &observed.settings)?;
        let alias_patch = diff_aliases(&desired.aliases, &observed.aliases);

        if !replace_reasons.is_empty() {
            info!(
                index = %observed.name,
                reasons = replace_reasons.len(),
                "Index must be replaced"
            );
            stages.push(ReconcileStage::ReplaceRequired);
            stages.push(ReconcileStage::Done);
            return Ok(ReconciliationResult {
                requires_replace: true,
                replace_reasons,
                merged_mappings: mapping.merged,
                warnings: mapping.warnings,
                settings_patch: SettingsPatch::default(),
                alias_patch: AliasPatch::default(),
                mapping_update: None,
                stages,
            });
        }

        let blank = mapping.merged.is_empty() && mapping.merged.params.is_empty();
        let unchanged = self.config.skip_unchanged_mappings && mapping.merged == observed.mappings;
        let mapping_update = if blank || unchanged {
            None
        } else {
            Some(mapping.merged.clone())
        };

        Ok(ReconciliationResult {
            requires_replace: false,
            replace_reasons,
            merged_mappings: mapping.merged,
            warnings: mapping.warnings,
            settings_patch,
            alias_patch,
            mapping_update,
            stages,
        })
    }

    /// Plans, then issues the partial updates through `client`.
    ///
    /// Aliases go first (every delete before any upsert), then settings when
    /// the patch is non-empty, then the mapping update when there is one.
    /// Calls are sequential; the first failure aborts the run.
    pub async fn apply<C>(
        &self,
        client: &C,
        desired: &IndexState,
        observed: &IndexState,
    ) -> EngineResult<ReconciliationResult>
    where
        C: IndexClient + ?Sized,
    {
        let mut result = self.plan(desired, observed)?;
        if result.requires_replace {
            return Ok(result);
        }
        for warning in &result.warnings {
            warn!(index = %observed.name, path = %warning.path, "{}", warning.summary);
        }
        if self.config.dry_run {
            info!(index = %observed.name, "Dry run, skipping remote calls");
            result.stages.push(ReconcileStage::Done);
            return Ok(result);
        }

        let index = observed.name.as_str();

        let stage = ReconcileStage::ApplyingAliases;
        result.stages.push(stage);
        for name in &result.alias_patch.to_delete {
            client
                .delete_alias(index, name)
                .await
                .map_err(|source| failed(stage, source))?;
        }
        for alias in &result.alias_patch.to_upsert {
            client
                .put_alias(index, alias)
                .await
                .map_err(|source| failed(stage, source))?;
        }
        info!(
            index,
            deleted = result.alias_patch.to_delete.len(),
            upserted = result.alias_patch.to_upsert.len(),
            "Aliases applied"
        );

        let stage = ReconcileStage::ApplyingSettings;
        result.stages.push(stage);
        if !result.settings_patch.is_empty() {
            client
                .put_settings(index, &result.settings_patch)
                .await
                .map_err(|source| failed(stage, source))?;
            info!(index, keys = result.settings_patch.len(), "Settings applied");
        }

        let stage = ReconcileStage::ApplyingMappings;
        result.stages.push(stage);
        if let Some(mappings) = &result.mapping_update {
            client
                .put_mapping(index, mappings)
                .await
                .map_err(|source| failed(stage, source))?;
            info!(index, fields = mappings.leaf_count(), "Mappings applied");
        }

        result.stages.push(ReconcileStage::Done);
        Ok(result)
    }
}

fn failed(stage: ReconcileStage, source: ClientError) -> EngineError {
    warn!(?stage, error = %source, "Remote call failed");
    EngineError::Client { stage, source }
}
