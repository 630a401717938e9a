//! Application layer - routing, adapters and batch orchestration
//!
//! Coordinates the infrastructure page sources and parsers into the
//! per-URL extraction workflow.

pub mod adapter;
pub mod dedup;
pub mod orchestrator;
pub mod router;

// Re-export commonly used items
pub use adapter::{JobAdapter, ProfileAdapter};
pub use dedup::dedup;
pub use orchestrator::{AdapterSet, BatchOrchestrator};
pub use router::{AdapterRouter, Route, SiteId};
