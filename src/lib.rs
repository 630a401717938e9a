//! jobscrape - job listing extraction service
//!
//! Routes each submitted URL to a static, rendered or site-specific
//! extractor and returns normalized, deduplicated job records. Per-URL
//! failures become error records instead of failing the batch.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod server;

pub use application::BatchOrchestrator;
pub use domain::JobRecord;
