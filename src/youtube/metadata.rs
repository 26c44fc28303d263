//! Response parsing for the Data API endpoints. Pure functions over
//! `serde_json::Value` so they can be exercised without the network.
use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::{debug, warn};

use super::catalog::CategoryCatalog;
use super::duration::parse_iso8601_minutes;
use super::models::{watch_url, SearchPage, VideoRecord, UNKNOWN_CATEGORY};

/// Extract one record from a `videos` item. `id` and `snippet.title` are
/// required; everything else falls back to an empty/unknown value.
pub fn extract_video_record(item: &Value) -> Result<VideoRecord> {
    let video_id = item
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("item has no string `id`"))?;
    let snippet = item
        .get("snippet")
        .filter(|s| s.is_object())
        .ok_or_else(|| anyhow!("video {video_id}: missing `snippet`"))?;
    let title = snippet
        .get("title")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("video {video_id}: missing `snippet.title`"))?;

    let description = snippet
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let category_id = snippet
        .get("categoryId")
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN_CATEGORY)
        .to_string();
    let tags = snippet
        .get("tags")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|t| t.as_str())
                .map(|t| t.to_string())
                .collect()
        })
        .unwrap_or_default();

    let duration_minutes = match item
        .get("contentDetails")
        .and_then(|c| c.get("duration"))
        .and_then(|d| d.as_str())
    {
        Some(raw) => match parse_iso8601_minutes(raw) {
            Ok(m) => Some(m),
            Err(err) => {
                debug!(video_id, error = %err, "unparsable duration");
                None
            }
        },
        None => None,
    };

    Ok(VideoRecord {
        video_id: video_id.to_string(),
        title: title.to_string(),
        description,
        category_id,
        tags,
        video_url: watch_url(video_id),
        duration_minutes,
        category: None,
        transcript: None,
    })
}

/// All extractable records of a `videos` response; broken items are logged
/// and skipped so one bad item never sinks the batch.
pub fn parse_video_details(body: &Value) -> Vec<VideoRecord> {
    let Some(items) = body.get("items").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match extract_video_record(item) {
            Ok(rec) => out.push(rec),
            Err(err) => warn!(error = %err, "skipping video due to error"),
        }
    }
    out
}

/// Video ids of a `search` response (channels/playlists have no `videoId`).
pub fn parse_search_page(body: &Value) -> SearchPage {
    let video_ids = body
        .get("items")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|it| it.get("id").and_then(|id| id.get("videoId")))
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();
    let next_page_token = body
        .get("nextPageToken")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    SearchPage {
        video_ids,
        next_page_token,
    }
}

/// Assignable categories of a `videoCategories` response.
pub fn parse_assignable_categories(body: &Value) -> CategoryCatalog {
    let items = body
        .get("items")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    CategoryCatalog::from_pairs(items.iter().filter_map(|item| {
        let id = item.get("id")?.as_str()?;
        let snippet = item.get("snippet")?;
        if !snippet.get("assignable")?.as_bool()? {
            return None;
        }
        let title = snippet.get("title")?.as_str()?;
        Some((id.to_string(), title.to_string()))
    }))
}
