//! Pipeline orchestration
//!
//! Sequences the run: an optional cache probe that can short-circuit
//! everything, then discovery, link normalization, content fetching and
//! compaction. Each stage joins completely before the next starts; the only
//! branch point is the cache probe, evaluated once per run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Client;
use url::Url;

use crate::cache::CacheClient;
use crate::config::Config;
use crate::extract::QuestionRecord;
use crate::fetch::content::{compact, ContentFetcher};
use crate::fetch::discover::PageDiscoverer;
use crate::fetch::http::build_http_client;
use crate::fetch::pool::ProgressObserver;
use crate::{links, HarvestError};

/// Per-run inputs
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Provider identifier, e.g. "google"
    pub provider: String,

    /// Substring filter over listing anchor text; empty matches everything
    pub filter: String,

    /// Whether to probe the snapshot cache before scraping live
    pub use_cache: bool,

    /// Optional auth token, passed through to the cache backend only
    pub token: Option<String>,
}

/// Summary of a completed run, for detecting silent partial loss
#[derive(Debug, Clone)]
pub struct RunReport {
    pub provider: String,
    pub filter: String,

    /// Whether the cache short-circuited the live pipeline
    pub from_cache: bool,

    /// Listing pages scanned during discovery (0 on the cache path)
    pub pages_scanned: usize,

    /// Links discovered before deduplication
    pub links_discovered: usize,

    /// Unique links scheduled for fetching
    pub scheduled: usize,

    /// Records actually produced
    pub produced: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Items scheduled but not produced
    pub fn lost(&self) -> usize {
        self.scheduled.saturating_sub(self.produced)
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// The discovery-and-fetch pipeline
pub struct Pipeline {
    config: Config,
    client: Client,
    base: Url,
}

impl Pipeline {
    /// Builds a pipeline from validated configuration
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = build_http_client()?;
        let base = Url::parse(&config.source.base_url)
            .map_err(|e| crate::UrlError::Parse(e.to_string()))?;

        Ok(Self {
            config,
            client,
            base,
        })
    }

    /// Runs the full pipeline and returns the ordered records with a report
    ///
    /// With `use_cache` enabled, a non-empty cache result is returned as-is
    /// (it is already ordered) and the live stages never run; cache errors
    /// and empty results are both treated as a miss. On the live path, zero
    /// discovered links is a run-level failure, while zero records after
    /// compaction is a legitimate empty outcome left to the caller.
    pub async fn run(
        &self,
        options: &RunOptions,
        observer: Arc<dyn ProgressObserver>,
    ) -> crate::Result<(Vec<QuestionRecord>, RunReport)> {
        let started_at = Utc::now();

        if options.use_cache {
            if let Some(records) = self.probe_cache(options).await {
                let report = RunReport {
                    provider: options.provider.clone(),
                    filter: options.filter.clone(),
                    from_cache: true,
                    pages_scanned: 0,
                    links_discovered: records.len(),
                    scheduled: records.len(),
                    produced: records.len(),
                    started_at,
                    finished_at: Utc::now(),
                };
                return Ok((records, report));
            }
        }

        let discoverer = PageDiscoverer::new(
            self.client.clone(),
            self.base.clone(),
            self.config.limits.discovery_concurrency,
            self.config.limits.requests_per_second,
        );

        let discovery = discoverer
            .discover(&options.provider, &options.filter, observer.clone())
            .await?;
        let links_discovered = discovery.links.len();

        let ordered = links::order_unique(discovery.links);
        if ordered.is_empty() {
            return Err(HarvestError::NoLinks {
                provider: options.provider.clone(),
                filter: options.filter.clone(),
            });
        }
        tracing::info!("{} unique links after normalization", ordered.len());

        let fetcher = ContentFetcher::new(
            self.client.clone(),
            self.base.clone(),
            self.config.limits.fetch_concurrency,
            self.config.limits.requests_per_second,
        );

        let results = fetcher.fetch_all(ordered, observer).await;
        let scheduled = results.len();
        let records = compact(results);

        let report = RunReport {
            provider: options.provider.clone(),
            filter: options.filter.clone(),
            from_cache: false,
            pages_scanned: discovery.pages,
            links_discovered,
            scheduled,
            produced: records.len(),
            started_at,
            finished_at: Utc::now(),
        };

        if report.lost() > 0 {
            tracing::warn!(
                "{} of {} scheduled questions were lost to per-item failures",
                report.lost(),
                report.scheduled
            );
        }

        Ok((records, report))
    }

    /// Probes the cache; any error or empty result is a miss
    async fn probe_cache(&self, options: &RunOptions) -> Option<Vec<QuestionRecord>> {
        let api_base = match Url::parse(&self.config.cache.api_base) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("invalid cache API base: {}", e);
                return None;
            }
        };

        let cache = CacheClient::new(
            self.client.clone(),
            api_base,
            self.config.cache.repo.clone(),
            options.token.clone(),
        );

        match cache.lookup(&options.provider, &options.filter).await {
            Ok(records) if !records.is_empty() => Some(records),
            Ok(_) => {
                tracing::info!("cache empty, switching to live scraping");
                None
            }
            Err(e) => {
                tracing::warn!("cache probe failed ({}), switching to live scraping", e);
                None
            }
        }
    }

    /// Lists the exams available for a provider
    pub async fn list_exams(&self, provider: &str) -> crate::Result<Vec<String>> {
        let discoverer = PageDiscoverer::new(
            self.client.clone(),
            self.base.clone(),
            self.config.limits.discovery_concurrency,
            self.config.limits.requests_per_second,
        );
        discoverer.list_exams(provider).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(scheduled: usize, produced: usize) -> RunReport {
        RunReport {
            provider: "acme".to_string(),
            filter: String::new(),
            from_cache: false,
            pages_scanned: 1,
            links_discovered: scheduled,
            scheduled,
            produced,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn test_lost_counts_partial_loss() {
        assert_eq!(report(10, 7).lost(), 3);
        assert_eq!(report(5, 5).lost(), 0);
    }

    #[test]
    fn test_lost_never_underflows() {
        // produced > scheduled should not happen, but must not panic
        assert_eq!(report(1, 2).lost(), 0);
    }
}
