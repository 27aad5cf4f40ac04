//! Shared HTTP client construction and fetch helpers

use std::time::Duration;

use reqwest::Client;

use crate::HarvestError;

/// Builds the HTTP client shared by every stage of a run
///
/// The request timeout doubles as the answer to "should a stuck call be
/// abandoned": a hung fetch resolves into a per-item failure after 30
/// seconds instead of stalling its pool slot forever.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format!("examharvest/{}", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body as text
///
/// Non-2xx statuses and transport errors both map to [`HarvestError`]
/// variants carrying the offending URL.
pub async fn fetch_text(client: &Client, url: &str) -> crate::Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })
}
