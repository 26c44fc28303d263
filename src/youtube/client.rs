use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::catalog::CategoryCatalog;
use super::metadata::{parse_assignable_categories, parse_search_page, parse_video_details};
use super::models::{SearchPage, VideoRecord};
use crate::config::{HarvestConfig, DEFAULT_API_BASE};

fn truncate_for_log(mut s: String, max_len: usize) -> String {
    if s.len() > max_len {
        let mut cut = max_len;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push('…');
    }
    s
}

/// The two Data API calls the collector needs. Implemented by
/// [`YoutubeClient`] and by in-memory fakes in tests.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// One page of `search` results for a category in a region.
    async fn search_page(
        &self,
        category_id: &str,
        region_code: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<SearchPage>;

    /// Metadata for a batch of ids in a single call.
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoRecord>>;
}

/// YouTube Data API v3 client.
///
/// Endpoints used (all GET, authenticated with `key=`):
/// - /videoCategories?part=snippet&regionCode=..
/// - /search?part=snippet&type=video&videoCategoryId=..&pageToken=..
/// - /videos?part=snippet,contentDetails,statistics&id=a,b,c
///
/// No retries: a failed call surfaces as an error to the caller.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl YoutubeClient {
    pub fn new(
        base_url: Option<&str>,
        api_key: impl Into<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let base_url = base_url
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
            .to_string();
        let http = Client::builder()
            .user_agent("yt-harvest/0.1")
            .timeout(Duration::from_secs(timeout_secs.unwrap_or(15)))
            .build()?;
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            http,
        })
    }

    pub fn from_config(cfg: &HarvestConfig) -> Result<Self> {
        if cfg.api_key.trim().is_empty() {
            return Err(anyhow!("YOUTUBE_API_KEY is not set"));
        }
        Self::new(
            Some(&cfg.api_base),
            cfg.api_key.clone(),
            Some(cfg.http_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = truncate_for_log(resp.text().await.unwrap_or_default(), 2000);
            return Err(anyhow!(
                "YouTube {endpoint} failed: {status} url={url} body={body}"
            ));
        }
        let body: Value = resp
            .json()
            .await
            .with_context(|| format!("decoding {endpoint} response"))?;
        Ok(body)
    }

    /// Assignable categories for a region, straight from the API.
    pub async fn fetch_categories(&self, region_code: &str) -> Result<CategoryCatalog> {
        let body = self
            .get_json(
                "videoCategories",
                &[("part", "snippet"), ("regionCode", region_code)],
            )
            .await?;
        Ok(parse_assignable_categories(&body))
    }
}

#[async_trait]
impl VideoApi for YoutubeClient {
    async fn search_page(
        &self,
        category_id: &str,
        region_code: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<SearchPage> {
        let max_results = max_results.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("videoCategoryId", category_id),
            ("type", "video"),
            ("regionCode", region_code),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let body = self.get_json("search", &params).await?;
        let page = parse_search_page(&body);
        debug!(
            category_id,
            ids = page.video_ids.len(),
            has_next = page.next_page_token.is_some(),
            "search page fetched"
        );
        Ok(page)
    }

    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoRecord>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = video_ids.join(",");
        let body = self
            .get_json(
                "videos",
                &[("part", "snippet,contentDetails,statistics"), ("id", ids.as_str())],
            )
            .await?;
        Ok(parse_video_details(&body))
    }
}
