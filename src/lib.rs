//! Etalase: a browser-driven storefront listing harvester
//!
//! This crate extracts structured product listings (name, price, monthly-sold
//! count, link) from JS-rendered storefront and search-result pages, driving a
//! real browser through infinite scroll and pagination, and persisting each
//! completed run as one timestamped CSV dataset.

pub mod browser;
pub mod config;
pub mod extract;
pub mod output;
pub mod target;
pub mod traverse;

use thiserror::Error;

/// Main error type for Etalase operations
#[derive(Debug, Error)]
pub enum EtalaseError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Listing container for {url} did not appear within {timeout_secs}s")]
    ListingTimeout { url: String, timeout_secs: u64 },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Etalase operations
pub type Result<T> = std::result::Result<T, EtalaseError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::ProductRecord;
pub use target::{classify_target, ClassifiedTarget, TraversalMode};
pub use traverse::{start_traversal, RunOutcome, TraversalHandle, TraversalRequest};
