//! Reconciliation engine for indexsync.
//!
//! Brings a live search index in line with a declared configuration:
//!
//! 1. **Diff**: run the mapping, settings and alias reconcilers against the
//!    last-observed state
//! 2. **Decide**: a renamed index, a changed static setting or an incompatible
//!    mapping change means the index must be replaced
//! 3. **Apply**: otherwise issue alias, settings and mapping updates, in that
//!    order, through an [`IndexClient`]
//!
//! # Example
//!
//! ```
//! use indexsync_engine::{ReconcileConfig, ReconciliationOrchestrator};
//! use indexsync_model::{FieldNode, IndexState, MappingTree};
//!
//! let observed = IndexState::new("logs")
//!     .with_mappings(MappingTree::new().with_field("msg", FieldNode::leaf("text")));
//! let desired = IndexState::new("logs")
//!     .with_mappings(MappingTree::new().with_field("msg", FieldNode::leaf("keyword")));
//!
//! let engine = ReconciliationOrchestrator::new(ReconcileConfig::default());
//! let result = engine.plan(&desired, &observed).unwrap();
//! assert!(result.requires_replace);
//! ```

mod client;
mod config;
mod error;
mod orchestrator;

pub use client::IndexClient;
pub use config::ReconcileConfig;
pub use error::{ClientError, EngineError, EngineResult};
pub use orchestrator::{
    ReconcileStage, ReconciliationOrchestrator, ReconciliationResult, ReplaceReason,
};
