//! Mapping reconciler.
//!
//! Walks the observed tree depth-first and folds it into the desired tree.
//! The remote mapping API is additive only: fields can be added but never
//! dropped or retyped. So:
//!
//! - a field missing from the desired tree is restored from the observed tree
//!   and reported as an ignored removal;
//! - a leaf whose type changes, or that turns into an object, forces the
//!   index to be recreated;
//! - an object whose nested block is missing from the desired tree is
//!   restored and reported, like a removed field;
//! - desired-only fields pass through untouched.

use indexsync_model::{FieldNode, FieldPath, MappingTree, MappingWarning};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// How far the walk continues once a replace is detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningMode {
    /// Stop at the first field that forces a replace. Removal warnings for
    /// fields visited later are not reported.
    #[default]
    ShortCircuit,
    /// Keep walking the whole tree so every ignored removal is reported.
    /// The replace decision is the same as with `ShortCircuit`.
    CollectAll,
}

/// Result of reconciling two mapping trees.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingOutcome {
    pub requires_replace: bool,
    pub merged: MappingTree,
    pub warnings: Vec<MappingWarning>,
}

/// Reconciles the last-observed mapping with the desired one.
///
/// Observed fields are visited in name order, so warnings come out in a
/// stable order. Neither input is modified.
#[must_use]
pub fn reconcile_mappings(
    observed: &MappingTree,
    desired: &MappingTree,
    mode: WarningMode,
) -> MappingOutcome {
    let mut walk = Walk {
        mode,
        requires_replace: false,
        warnings: Vec::new(),
    };
    let properties = walk.merge_properties(
        &FieldPath::mapping_properties(),
        &observed.properties,
        desired.properties.clone(),
    );

    if walk.requires_replace {
        info!(
            warnings = walk.warnings.len(),
            "Mapping change requires index replacement"
        );
    }

    MappingOutcome {
        requires_replace: walk.requires_replace,
        merged: MappingTree {
            properties,
            params: desired.params.clone(),
        },
        warnings: walk.warnings,
    }
}

struct Walk {
    mode: WarningMode,
    requires_replace: bool,
    warnings: Vec<MappingWarning>,
}

impl Walk {
    fn halted(&self) -> bool {
        self.requires_replace && self.mode == WarningMode::ShortCircuit
    }

    fn merge_properties(
        &mut self,
        path: &FieldPath,
        observed: &BTreeMap<String, FieldNode>,
        mut desired: BTreeMap<String, FieldNode>,
    ) -> BTreeMap<String, FieldNode> {
        for (name, old) in observed {
            let field_path = path.at_key(name);
            let merged = match desired.remove(name) {
                Some(new) => self.merge_field(&field_path, old, new),
                None => {
                    self.removal_ignored(field_path);
                    old.clone()
                }
            };
            desired.insert(name.clone(), merged);

            if self.halted() {
                break;
            }
        }
        desired
    }

    fn merge_field(&mut self, path: &FieldPath, old: &FieldNode, new: FieldNode) -> FieldNode {
        match (old, new) {
            (
                FieldNode::Leaf { field_type: old_type, .. },
                FieldNode::Leaf { field_type, params },
            ) if *old_type == field_type => FieldNode::Leaf { field_type, params },
            (FieldNode::Leaf { field_type: old_type, .. }, new) => {
                info!(
                    path = %path,
                    observed = %old_type,
                    desired = new.field_type().unwrap_or("object"),
                    "Field type changed"
                );
                self.requires_replace = true;
                new
            }
            (
                FieldNode::Object { properties: old_props, .. },
                FieldNode::Object { properties, params },
            ) => {
                debug!(path = %path, "Descending into object field");
                let properties =
                    self.merge_properties(&path.at_key("properties"), old_props, properties);
                FieldNode::Object { properties, params }
            }
            (FieldNode::Object { .. }, FieldNode::Leaf { .. }) => {
                self.removal_ignored(path.at_key("properties"));
                old.clone()
            }
        }
    }

    fn removal_ignored(&mut self, path: FieldPath) {
        warn!(path = %path, "Field removal ignored; remote index keeps the field");
        self.warnings.push(MappingWarning::removal_ignored(path));
    }
}
