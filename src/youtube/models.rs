use serde::{Deserialize, Serialize};

/// One harvested video as it is written to the store.
///
/// `category` is attached by the orchestrator and `transcript` by the
/// enricher; both are omitted from JSON while unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl VideoRecord {
    /// Minimal record with a derived watch URL; the rest left empty.
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        let video_id = video_id.into();
        Self {
            video_url: watch_url(&video_id),
            video_id,
            title: title.into(),
            description: String::new(),
            category_id: UNKNOWN_CATEGORY.to_string(),
            tags: Vec::new(),
            duration_minutes: None,
            category: None,
            transcript: None,
        }
    }
}

pub const UNKNOWN_CATEGORY: &str = "Unknown";

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Video ids from one page of `search` results plus the cursor for the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub video_ids: Vec<String>,
    pub next_page_token: Option<String>,
}
