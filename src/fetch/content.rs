//! Fetch stage: retrieving and parsing one question per link
//!
//! Links arrive already deduplicated and ordered. Each worker resolves its
//! link against the site base, fetches the page, and runs the extraction
//! rules; any network or parse error logs a warning and leaves an absent
//! entry at that index instead of aborting the batch. A final compaction
//! pass drops the absent entries while preserving relative order.

use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::extract::{self, QuestionRecord};
use crate::fetch::http::fetch_text;
use crate::fetch::limiter::RateLimiter;
use crate::fetch::pool::{BoundedPool, ProgressObserver};

/// Retrieves and parses question pages for an ordered list of links
pub struct ContentFetcher {
    client: Client,
    base: Url,
    concurrency: usize,
    rate: f64,
}

impl ContentFetcher {
    pub fn new(client: Client, base: Url, concurrency: usize, rate: f64) -> Self {
        Self {
            client,
            base,
            concurrency,
            rate,
        }
    }

    /// Fetches every link, returning one slot per input in input order
    ///
    /// The returned vector always has the same length as `links`; failed
    /// fetches or parses are `None`. Use [`compact`] to obtain the final
    /// record sequence.
    pub async fn fetch_all(
        &self,
        links: Vec<String>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Vec<Option<QuestionRecord>> {
        let limiter = Arc::new(RateLimiter::new(self.rate));
        let pool = BoundedPool::new(self.concurrency, limiter.clone());

        let client = self.client.clone();
        let base = self.base.clone();

        let results = pool
            .run("fetch", links, observer, move |link| {
                let client = client.clone();
                let base = base.clone();
                async move { fetch_one(&client, &base, &link).await }
            })
            .await;
        limiter.stop();

        results
    }
}

/// Fetches and parses a single question page, absorbing failures as `None`
async fn fetch_one(client: &Client, base: &Url, link: &str) -> Option<QuestionRecord> {
    let url = match base.join(link) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("could not resolve link '{}': {}", link, e);
            return None;
        }
    };

    let html = match fetch_text(client, url.as_str()).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("fetch failed for {}: {}", url, e);
            return None;
        }
    };

    match extract::parse_question(&html, url.as_str(), base) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!("parse failed: {}", e);
            None
        }
    }
}

/// Drops absent entries while preserving the relative order of survivors
pub fn compact(results: Vec<Option<QuestionRecord>>) -> Vec<QuestionRecord> {
    results.into_iter().flatten().collect()
}
