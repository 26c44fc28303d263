use anyhow::Result;
use tracing::debug;

use crate::config::{DurationWindow, HarvestConfig};
use crate::youtube::{VideoApi, VideoRecord};

/// Whether a record survives the duration filter. With a window set, a
/// record must carry a parsed duration inside it; with none, all pass.
pub fn passes_duration_policy(window: Option<&DurationWindow>, record: &VideoRecord) -> bool {
    match window {
        None => true,
        Some(w) => record.duration_minutes.is_some_and(|m| w.contains(m)),
    }
}

/// Pages through `search` for one category until the target is met or the
/// results run out.
pub struct CategoryCollector<'a> {
    api: &'a dyn VideoApi,
    region_code: String,
    batch_size: u32,
    duration_window: Option<DurationWindow>,
}

impl<'a> CategoryCollector<'a> {
    pub fn new(api: &'a dyn VideoApi, cfg: &HarvestConfig) -> Self {
        Self {
            api,
            region_code: cfg.region_code.clone(),
            batch_size: cfg.batch_size,
            duration_window: cfg.duration_window,
        }
    }

    pub fn duration_window(&self) -> Option<&DurationWindow> {
        self.duration_window.as_ref()
    }

    /// At most `target` records of `category_id`, in search order.
    pub async fn collect(&self, category_id: &str, target: usize) -> Result<Vec<VideoRecord>> {
        let mut videos: Vec<VideoRecord> = Vec::new();
        if target == 0 {
            return Ok(videos);
        }

        let mut cursor: Option<String> = None;
        let mut page_no: u32 = 0;
        loop {
            let page = self
                .api
                .search_page(
                    category_id,
                    &self.region_code,
                    self.batch_size,
                    cursor.as_deref(),
                )
                .await?;
            page_no += 1;

            let mut kept = 0usize;
            if !page.video_ids.is_empty() {
                let details = self.api.video_details(&page.video_ids).await?;
                for video in details {
                    if passes_duration_policy(self.duration_window.as_ref(), &video) {
                        videos.push(video);
                        kept += 1;
                    }
                }
            }
            debug!(
                category_id,
                page = page_no,
                ids = page.video_ids.len(),
                kept,
                total = videos.len(),
                "category page processed"
            );

            cursor = page.next_page_token;
            if cursor.is_none() || videos.len() >= target {
                break;
            }
        }

        videos.truncate(target);
        Ok(videos)
    }
}
