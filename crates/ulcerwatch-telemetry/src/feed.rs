use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Errors from one telemetry poll. Surfaced verbatim to the caller; no
/// retry or backoff is performed here.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("telemetry upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("telemetry request timed out")]
    Timeout,
    #[error("telemetry transport error: {0}")]
    Transport(String),
    #[error("telemetry feed returned no entries")]
    Empty,
}

/// One polling cycle's worth of raw field values from the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FeedPage {
    feeds: Vec<FeedEntry>,
}

/// Server-side client for a ThingSpeak-style channel feed.
///
/// Owns the channel API key so it never has to reach a browser; callers
/// hand the returned raw record straight to the normalizer.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    base_url: String,
    channel_id: String,
    api_key: String,
    results: u32,
}

impl FeedClient {
    pub fn new(
        base_url: impl Into<String>,
        channel_id: impl Into<String>,
        api_key: impl Into<String>,
        results: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            channel_id: channel_id.into(),
            api_key: api_key.into(),
            results,
        }
    }

    /// Fetches the newest feed entry for the channel.
    ///
    /// Entries arrive oldest-first, so the newest is the last element of
    /// the page.
    pub async fn latest(&self) -> Result<FeedEntry, FeedError> {
        let url = format!(
            "{}/channels/{}/feeds.json?results={}&api_key={}",
            self.base_url, self.channel_id, self.results, self.api_key
        );

        let resp = self.client.get(&url).send().await.map_err(into_feed_error)?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FeedError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let page: FeedPage = resp.json().await.map_err(into_feed_error)?;
        page.feeds.into_iter().last().ok_or(FeedError::Empty)
    }
}

fn into_feed_error(err: reqwest::Error) -> FeedError {
    if err.is_timeout() {
        FeedError::Timeout
    } else {
        FeedError::Transport(err.to_string())
    }
}
