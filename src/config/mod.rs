//! Configuration module for Etalase
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every section is optional; missing sections fall back to defaults
//! that match the operational constants of the traversal engine.
//!
//! # Example
//!
//! ```no_run
//! use etalase::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("etalase.toml")).unwrap();
//! println!("Output directory: {}", config.output.directory);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BrowserConfig, Config, OutputConfig, SiteConfig, TraversalConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Re-export validation for callers constructing configs programmatically
pub use validation::validate;
