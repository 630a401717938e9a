//! Profile compilation errors
//!
//! Raised once, when a site profile is turned into compiled selectors.
//! Extraction itself never fails on a missing field.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile '{profile}' has no valid card selector (tried: {tried:?})")]
    NoCardSelectors { profile: String, tried: Vec<String> },

    #[error("profile '{profile}' has an invalid link pattern '{pattern}': {reason}")]
    InvalidLinkPattern {
        profile: String,
        pattern: String,
        reason: String,
    },
}

pub type ProfileResult<T> = Result<T, ProfileError>;
