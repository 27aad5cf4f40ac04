//! Cache-backed snapshot probe
//!
//! Before scraping live, the pipeline can probe a GitHub repository holding
//! pre-extracted question snapshots. The GitHub contents API is asked for the
//! provider's snapshot entry, whose `download_url` points at the snapshot
//! JSON itself. Decoding is strictly typed: a response missing required
//! fields is a decode error, not a silently-empty result.

use std::collections::BTreeMap;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::extract::{clean_text, QuestionRecord};

/// Errors from the cache backend
///
/// The pipeline treats every variant as a cache miss; these exist so the
/// miss can be logged with a reason.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache request failed for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Cache returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode cache response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid cache URL: {0}")]
    Url(#[from] url::ParseError),
}

/// GitHub contents-API entry for the snapshot file
#[derive(Debug, Deserialize)]
struct ContentsEntry {
    download_url: String,
}

/// Snapshot payload: the pre-rendered page state of a question dump
#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(rename = "pageProps")]
    page_props: PageProps,
}

#[derive(Debug, Default, Deserialize)]
struct PageProps {
    #[serde(default)]
    questions: Vec<CachedQuestion>,
}

#[derive(Debug, Deserialize)]
struct CachedQuestion {
    #[serde(rename = "questionText", default)]
    question_text: String,

    // BTreeMap keeps choice keys in letter order
    #[serde(default)]
    choices: BTreeMap<String, String>,

    #[serde(default)]
    answer: String,

    #[serde(default)]
    timestamp: String,

    #[serde(default)]
    url: String,

    #[serde(default)]
    discussion: Vec<DiscussionEntry>,

    #[serde(rename = "questionImages", default)]
    question_images: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DiscussionEntry {
    #[serde(default)]
    poster: String,

    #[serde(default)]
    content: String,
}

/// Client for the snapshot cache
pub struct CacheClient {
    client: Client,
    api_base: Url,
    repo: String,
    token: Option<String>,
}

impl CacheClient {
    pub fn new(client: Client, api_base: Url, repo: String, token: Option<String>) -> Self {
        Self {
            client,
            api_base,
            repo,
            token,
        }
    }

    /// Looks up cached records for a provider, filtered by `filter`
    ///
    /// Returns the records in snapshot order, numbered by a sequence scoped
    /// to this lookup. An empty result means "no cache available"; the
    /// caller falls back to the live pipeline.
    pub async fn lookup(
        &self,
        provider: &str,
        filter: &str,
    ) -> Result<Vec<QuestionRecord>, CacheError> {
        let contents_url = self
            .api_base
            .join(&format!("repos/{}/contents/data/{}.json", self.repo, provider))?;

        let entry: ContentsEntry = self.get_json(&contents_url).await?;
        tracing::debug!("cache snapshot at {}", entry.download_url);

        let snapshot_url = Url::parse(&entry.download_url)?;
        let snapshot: Snapshot = self.get_json(&snapshot_url).await?;

        let records = ingest_snapshot(snapshot, filter);
        tracing::info!(
            "cache returned {} records for provider '{}'",
            records.len(),
            provider
        );
        Ok(records)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &Url) -> Result<T, CacheError> {
        let mut request = self.client.get(url.as_str());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| CacheError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| CacheError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(serde_json::from_str(&body)?)
    }
}

/// Converts a decoded snapshot into records, numbering them with a sequence
/// scoped to this one ingestion
fn ingest_snapshot(snapshot: Snapshot, filter: &str) -> Vec<QuestionRecord> {
    let mut records = Vec::new();
    let mut sequence = 0usize;

    for question in snapshot.page_props.questions {
        if !filter.is_empty()
            && !question.question_text.contains(filter)
            && !question.url.contains(filter)
        {
            continue;
        }

        sequence += 1;

        let mut content = question.question_text.clone();
        for image in &question.question_images {
            content.push_str(&format!("\n![Exhibit]({})", image));
        }

        let choices = question
            .choices
            .iter()
            .map(|(key, value)| format!("**{}:** {}", key, value))
            .collect();

        let comments = clean_text(
            &question
                .discussion
                .iter()
                .map(|entry| format!("[{}] {}\n", entry.poster, entry.content))
                .collect::<String>(),
        );

        records.push(QuestionRecord {
            title: format!("Exam Question #{}", sequence),
            content,
            choices,
            answer: question.answer,
            timestamp: question.timestamp,
            link: question.url,
            comments,
        });
    }

    records
}
