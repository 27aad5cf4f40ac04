//! Discovery stage: enumerating listing pages and collecting question links
//!
//! Discovery runs in two steps. A single synchronous probe of the provider's
//! listing root determines the total page count; failure there is fatal, as
//! no work can be scheduled without it. The listing pages 1..=N are then
//! scanned through the bounded pool, each worker extracting the question
//! links whose anchor text matches the filter.

use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::extract;
use crate::fetch::http::fetch_text;
use crate::fetch::limiter::RateLimiter;
use crate::fetch::pool::{BoundedPool, ProgressObserver};
use crate::HarvestError;

/// Result of a discovery pass
#[derive(Debug)]
pub struct Discovery {
    /// All matching links, flattened across pages in completion order
    pub links: Vec<String>,

    /// Number of listing pages scanned
    pub pages: usize,
}

/// Scans all listing pages of a provider for question links
pub struct PageDiscoverer {
    client: Client,
    base: Url,
    concurrency: usize,
    rate: f64,
}

impl PageDiscoverer {
    pub fn new(client: Client, base: Url, concurrency: usize, rate: f64) -> Self {
        Self {
            client,
            base,
            concurrency,
            rate,
        }
    }

    /// Discovers all question links for `provider` matching `filter`
    ///
    /// An empty filter matches every link. The order of the returned links
    /// follows worker completion and carries no guarantee; callers restore
    /// determinism with [`crate::links::order_unique`].
    pub async fn discover(
        &self,
        provider: &str,
        filter: &str,
        observer: Arc<dyn ProgressObserver>,
    ) -> crate::Result<Discovery> {
        let pages = self.probe_page_count(provider).await?;
        tracing::info!("provider '{}' has {} listing pages", provider, pages);

        let limiter = Arc::new(RateLimiter::new(self.rate));
        let pool = BoundedPool::new(self.concurrency, limiter.clone());

        let client = self.client.clone();
        let base = self.base.clone();
        let provider = provider.to_string();
        let filter = filter.to_string();

        let per_page = pool
            .run(
                "discovery",
                (1..=pages).collect::<Vec<usize>>(),
                observer,
                move |page| {
                    let client = client.clone();
                    let base = base.clone();
                    let provider = provider.clone();
                    let filter = filter.clone();
                    async move {
                        let url = match listing_url(&base, &provider, Some(page)) {
                            Ok(url) => url,
                            Err(e) => {
                                tracing::warn!("bad listing URL for page {}: {}", page, e);
                                return None;
                            }
                        };

                        match fetch_text(&client, url.as_str()).await {
                            Ok(html) => Some(extract::question_links(&html, &filter)),
                            Err(e) => {
                                tracing::warn!("listing page {} failed: {}", page, e);
                                None
                            }
                        }
                    }
                },
            )
            .await;
        limiter.stop();

        let links: Vec<String> = per_page.into_iter().flatten().flatten().collect();
        tracing::info!("discovered {} candidate links", links.len());

        Ok(Discovery { links, pages })
    }

    /// Probes the listing root for the total page count
    ///
    /// This is a single fetch outside the bounded pool, done once per run.
    async fn probe_page_count(&self, provider: &str) -> crate::Result<usize> {
        let url = listing_url(&self.base, provider, None)?;

        let html = fetch_text(&self.client, url.as_str())
            .await
            .map_err(|e| HarvestError::Discovery {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        extract::page_count(&html).ok_or_else(|| HarvestError::Discovery {
            url: url.to_string(),
            reason: "no pagination indicator in listing".to_string(),
        })
    }

    /// Lists the exams available for a provider
    pub async fn list_exams(&self, provider: &str) -> crate::Result<Vec<String>> {
        let url = self.base.join(&format!("exams/{}/", provider))?;
        let html = fetch_text(&self.client, url.as_str()).await?;

        let mut exams = Vec::new();
        for link in extract::exam_links(&html) {
            exams.push(self.base.join(&link)?.to_string());
        }
        Ok(exams)
    }
}

/// Builds a listing URL: the provider root, or one numbered page of it
fn listing_url(base: &Url, provider: &str, page: Option<usize>) -> crate::Result<Url> {
    let path = match page {
        Some(n) => format!("discussions/{}/{}/", provider, n),
        None => format!("discussions/{}/", provider),
    };
    Ok(base.join(&path)?)
}
