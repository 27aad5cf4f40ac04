//! Configuration module for examharvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Configuration is optional: without a file, built-in defaults are
//! used, and the per-run surface (provider, filter, output) comes from the
//! command line.
//!
//! # Example
//!
//! ```no_run
//! use examharvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Fetch concurrency: {}", config.limits.fetch_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, LimitsConfig, SourceConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Re-export validation
pub use validation::validate;
