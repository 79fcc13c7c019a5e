// Module declarations
mod engine;
mod status;

// Re-export public types and functions
pub use engine::{classify, ensure_metadata, sync_statuses, sync_trees, SyncOutcome, SyncPlan};
pub use status::TreeStatus;
