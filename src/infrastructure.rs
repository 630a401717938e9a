//! Infrastructure layer: configuration, logging, page loading and HTML parsing
//!
//! Everything that talks to the network, a browser or raw HTML lives here.
//! The application layer only sees [`PageSource`] and [`CardParser`].

pub mod browser; // Headless Chrome page source
pub mod config; // Layered application configuration
pub mod extract_error; // Per-URL error taxonomy
pub mod http_client; // Static page source with retry
pub mod logging; // Logging infrastructure
pub mod page_source; // Loader seam shared by both extractors
pub mod parsing; // Site profiles and card parsing
pub mod retry; // Backoff policy

// Re-export commonly used items
pub use browser::ChromeRenderer;
pub use config::{AppConfig, ConfigLoader};
pub use extract_error::{ExtractError, ExtractResult};
pub use http_client::HttpClient;
pub use logging::init_logging_with_config;
pub use page_source::{LoadHints, LoadedPage, PageSource};
pub use parsing::{CardParser, SiteProfile};
pub use retry::BackoffPolicy;
