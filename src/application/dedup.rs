//! Record deduplication

use std::collections::HashSet;

use crate::domain::{JobRecord, RecordKey};

/// Keep the first record for every identity key, preserving order
pub fn dedup(records: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen: HashSet<RecordKey> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.identity_key()))
        .collect()
}
