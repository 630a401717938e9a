//! Domain module - listing records and the pure transforms applied to them

pub mod job_record;
pub mod normalize;

// Re-export commonly used items
pub use job_record::{DEFAULT_STATUS, JobDraft, JobRecord, RecordKey};
pub use normalize::normalize_whitespace;
