use serde::Deserialize;

/// Main configuration structure for examharvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Discussion-site source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the discussion site
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Concurrency and rate tuning
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum concurrent listing-page fetches during discovery
    #[serde(rename = "discovery-concurrency")]
    pub discovery_concurrency: usize,

    /// Maximum concurrent question fetches
    #[serde(rename = "fetch-concurrency")]
    pub fetch_concurrency: usize,

    /// Requests per second, shared by all workers of a stage
    #[serde(rename = "requests-per-second")]
    pub requests_per_second: f64,
}

/// Snapshot-cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Base URL of the cache API
    #[serde(rename = "api-base")]
    pub api_base: String,

    /// Repository holding the snapshots, as "owner/name"
    pub repo: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.examtopics.com/".to_string(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            discovery_concurrency: 8,
            fetch_concurrency: 8,
            requests_per_second: 10.0,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com/".to_string(),
            repo: "exam-archive/examtopics-snapshots".to_string(),
        }
    }
}
