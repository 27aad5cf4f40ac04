use crate::config::types::{CacheConfig, Config, LimitsConfig, SourceConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source(&config.source)?;
    validate_limits(&config.limits)?;
    validate_cache(&config.cache)?;
    Ok(())
}

/// Validates source configuration
fn validate_source(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must be HTTP or HTTPS, got scheme '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

/// Validates concurrency and rate limits
fn validate_limits(config: &LimitsConfig) -> Result<(), ConfigError> {
    if config.discovery_concurrency < 1 || config.discovery_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "discovery-concurrency must be between 1 and 100, got {}",
            config.discovery_concurrency
        )));
    }

    if config.fetch_concurrency < 1 || config.fetch_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "fetch-concurrency must be between 1 and 100, got {}",
            config.fetch_concurrency
        )));
    }

    if !(config.requests_per_second > 0.0) || config.requests_per_second > 100.0 {
        return Err(ConfigError::Validation(format!(
            "requests-per-second must be between 0 and 100, got {}",
            config.requests_per_second
        )));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache(config: &CacheConfig) -> Result<(), ConfigError> {
    Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid cache api-base: {}", e)))?;

    // Repo must look like "owner/name"
    let mut parts = config.repo.split('/');
    let owner = parts.next().unwrap_or("");
    let name = parts.next().unwrap_or("");
    if owner.is_empty() || name.is_empty() || parts.next().is_some() {
        return Err(ConfigError::Validation(format!(
            "cache repo must be of the form 'owner/name', got '{}'",
            config.repo
        )));
    }

    Ok(())
}
