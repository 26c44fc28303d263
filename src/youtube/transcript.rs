use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::{HarvestConfig, DEFAULT_TRANSCRIPT_BASE};

#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The uploader turned captions off.
    #[error("transcripts disabled for {0}")]
    Disabled(String),
    #[error("no transcript found for {0}")]
    NotFound(String),
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("network: {0}")]
    Net(#[from] reqwest::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranscriptError {
    /// Disabled and not-found mean "no transcript", not a failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, TranscriptError::Disabled(_) | TranscriptError::NotFound(_))
    }
}

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Full transcript text for a video, fragments joined with spaces.
    async fn fetch_transcript(&self, video_id: &str) -> Result<String, TranscriptError>;
}

/// Reads captions from the public `timedtext` endpoint in `json3` form.
#[derive(Debug, Clone)]
pub struct TimedTextClient {
    base_url: String,
    language: String,
    http: Client,
}

impl TimedTextClient {
    pub fn new(base_url: Option<&str>, language: &str, timeout_secs: Option<u64>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent("yt-harvest/0.1")
            .timeout(Duration::from_secs(timeout_secs.unwrap_or(15)))
            .build()?;
        Ok(Self {
            base_url: base_url
                .unwrap_or(DEFAULT_TRANSCRIPT_BASE)
                .trim_end_matches('/')
                .to_string(),
            language: language.to_string(),
            http,
        })
    }

    pub fn from_config(cfg: &HarvestConfig) -> anyhow::Result<Self> {
        Self::new(
            Some(&cfg.transcript_base),
            &cfg.transcript_lang,
            Some(cfg.http_timeout_secs),
        )
    }
}

#[async_trait]
impl TranscriptSource for TimedTextClient {
    async fn fetch_transcript(&self, video_id: &str) -> Result<String, TranscriptError> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("v", video_id),
                ("lang", self.language.as_str()),
                ("fmt", "json3"),
            ])
            .send()
            .await?;
        match resp.status() {
            StatusCode::FORBIDDEN => return Err(TranscriptError::Disabled(video_id.to_string())),
            StatusCode::NOT_FOUND => return Err(TranscriptError::NotFound(video_id.to_string())),
            s if !s.is_success() => {
                let body = resp.text().await.unwrap_or_default();
                return Err(TranscriptError::Http {
                    status: s.as_u16(),
                    body: body.chars().take(500).collect(),
                });
            }
            _ => {}
        }
        let raw = resp.text().await?;
        if raw.trim().is_empty() {
            return Err(TranscriptError::NotFound(video_id.to_string()));
        }
        let body: Value = serde_json::from_str(&raw)?;
        let text = join_json3_fragments(&body);
        if text.is_empty() {
            return Err(TranscriptError::NotFound(video_id.to_string()));
        }
        Ok(text)
    }
}

/// `events[].segs[].utf8` -> one string; segments of an event are
/// concatenated, events are joined with single spaces.
pub fn join_json3_fragments(body: &Value) -> String {
    let Some(events) = body.get("events").and_then(|v| v.as_array()) else {
        return String::new();
    };
    events
        .iter()
        .filter_map(|event| {
            event.get("segs").and_then(|s| s.as_array()).map(|segs| {
                segs.iter()
                    .filter_map(|seg| seg.get("utf8").and_then(|u| u.as_str()))
                    .collect::<String>()
            })
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
