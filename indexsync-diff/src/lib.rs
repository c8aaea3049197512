//! Reconcilers for indexsync.
//!
//! Pure functions that compare a desired index configuration against the
//! last-observed remote one:
//!
//! - [`reconcile_mappings`]: merges mapping trees and decides whether a
//!   field change forces the index to be recreated
//! - [`diff_settings`] / [`static_changes`]: dynamic-settings patch and
//!   static-setting drift, driven by the compiled-in [`registry`]
//! - [`diff_aliases`]: alias deletes and upserts
//!
//! None of these touch the network. They take borrowed inputs and return new
//! values, so the same call can back both a plan preview and an apply.
//!
//! The mapping reconciler guarantees:
//! - **Idempotent**: reconciling a tree with itself changes nothing
//! - **Additive**: new fields never force a replace
//! - **Removal tolerant**: dropped fields are restored with a warning

mod alias;
mod error;
mod mapping;
pub mod registry;
mod settings;

pub use alias::{diff_aliases, AliasPatch};
pub use error::{DiffError, DiffResult};
pub use mapping::{reconcile_mappings, MappingOutcome, WarningMode};
pub use registry::{setting_kind, SettingKind};
pub use settings::{diff_settings, static_changes, SettingsPatch, StaticChange};
