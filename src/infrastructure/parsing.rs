//! Profile-driven HTML parsing
//!
//! A [`SiteProfile`] is compiled once into a [`CardParser`]; the parser turns a
//! loaded page into job records without ever failing on missing fields.

pub mod card_parser;
pub mod config;
pub mod context;
pub mod error;
pub mod selector_chain;

// Re-export public types
pub use card_parser::CardParser;
pub use config::{FieldDefaults, SiteProfile, SourceLabel};
pub use context::ParseContext;
pub use error::{ProfileError, ProfileResult};
pub use selector_chain::{CardSelectors, FieldChain, FieldSource};
