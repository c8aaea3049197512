//! Settings differ.
//!
//! Dynamic settings converge through a partial update. Omitting a key from
//! that update leaves the remote value untouched, so removals are sent as
//! explicit `null`s. Static settings cannot be patched; any drift on them is
//! reported separately and forces a replace.

use crate::error::{DiffError, DiffResult};
use crate::registry::{self, SettingKind};
use indexsync_model::{SettingValue, SettingsMap};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Partial update for dynamic settings. `None` means "unset".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SettingsPatch {
    entries: BTreeMap<String, Option<SettingValue>>,
}

impl SettingsPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `Some(None)` when the key is being unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&SettingValue>> {
        self.entries.get(key).map(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&SettingValue>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Keys set to a new value.
    pub fn updated(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, v)| v.is_some()).map(|(k, _)| k)
    }

    /// Keys being unset.
    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, v)| v.is_none()).map(|(k, _)| k)
    }

    /// Flat JSON body for the remote settings call; unset keys become `null`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| {
                    let value = v.as_ref().map_or(Value::Null, SettingValue::to_json);
                    (k.clone(), value)
                })
                .collect(),
        )
    }

    fn set(&mut self, key: &str, value: Option<SettingValue>) {
        self.entries.insert(key.to_string(), value);
    }
}

/// A static setting whose desired value differs from the observed one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticChange {
    pub key: String,
    pub desired: Option<SettingValue>,
    pub observed: Option<SettingValue>,
}

/// Computes the dynamic-settings patch converging `observed` to `desired`.
///
/// Static keys are ignored here. Unknown keys in either map are rejected.
/// The patch holds only keys whose value changes: new or different desired
/// values, and `null` for observed keys the desired map no longer declares.
pub fn diff_settings(desired: &SettingsMap, observed: &SettingsMap) -> DiffResult<SettingsPatch> {
    ensure_known(desired)?;
    ensure_known(observed)?;

    let desired_dynamic = desired.filtered(registry::is_dynamic);
    let observed_dynamic = observed.filtered(registry::is_dynamic);

    let mut patch = SettingsPatch::default();
    if desired_dynamic == observed_dynamic {
        debug!("Dynamic settings unchanged");
        return Ok(patch);
    }

    for (key, value) in desired_dynamic.iter() {
        if observed_dynamic.get(key) != Some(value) {
            patch.set(key, Some(value.clone()));
        }
    }
    for key in observed_dynamic.keys() {
        if !desired_dynamic.contains_key(key) {
            patch.set(key, None);
        }
    }

    debug!(
        updated = patch.updated().count(),
        removed = patch.removed().count(),
        "Computed dynamic settings patch"
    );
    Ok(patch)
}

/// Lists static settings declared in `desired` whose value differs from
/// `observed`. Static keys the desired map leaves out keep whatever the
/// remote chose at creation and are not compared.
pub fn static_changes(
    desired: &SettingsMap,
    observed: &SettingsMap,
) -> DiffResult<Vec<StaticChange>> {
    ensure_known(desired)?;
    ensure_known(observed)?;

    let changes: Vec<StaticChange> = desired
        .iter()
        .filter(|(key, _)| registry::is_static(key))
        .filter(|(key, value)| observed.get(key) != Some(*value))
        .map(|(key, value)| StaticChange {
            key: key.to_string(),
            desired: Some(value.clone()),
            observed: observed.get(key).cloned(),
        })
        .collect();

    for change in &changes {
        debug!(key = %change.key, "Static setting differs");
    }
    Ok(changes)
}

fn ensure_known(settings: &SettingsMap) -> DiffResult<()> {
    for key in settings.keys() {
        require_kind(key)?;
    }
    Ok(())
}

/// Kind lookup that treats unknown keys as a precondition violation.
fn require_kind(key: &str) -> DiffResult<SettingKind> {
    registry::setting_kind(key).ok_or_else(|| DiffError::UnknownSettingKey(key.to_string()))
}
