//! Examharvest: a concurrent exam-question harvester
//!
//! This crate downloads question/answer discussions from a paginated exam
//! discussion site (or a cached JSON mirror hosted on GitHub), deduplicates
//! and orders them, and renders the result into a document.

pub mod cache;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod links;
pub mod output;

use thiserror::Error;

/// Main error type for examharvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Could not determine page count from {url}: {reason}")]
    Discovery { url: String, reason: String },

    #[error("No question links found for provider '{provider}' (filter: '{filter}')")]
    NoLinks { provider: String, filter: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

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

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Failed to resolve link '{link}': {reason}")]
    Resolve { link: String, reason: String },
}

/// Result type alias for examharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::QuestionRecord;
pub use fetch::{Pipeline, RunReport};
pub use links::order_unique;
