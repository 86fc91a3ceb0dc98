//! Batch synchronization

pub mod orchestrator;
pub mod summary;

pub use orchestrator::{SyncCollaborators, SyncOrchestrator};
pub use summary::{RunCounters, RunSummary};
