use anyhow::Result;
use tracing::info;

use crate::harvest::collector::CategoryCollector;
use crate::youtube::{CategoryCatalog, VideoRecord};

/// Walks the configured categories in order, labels what each one yields
/// and stops starting new categories once `overall_target` is reached.
pub struct Orchestrator<'a> {
    catalog: &'a CategoryCatalog,
    collector: CategoryCollector<'a>,
    per_category_target: usize,
    overall_target: usize,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        catalog: &'a CategoryCatalog,
        collector: CategoryCollector<'a>,
        per_category_target: usize,
        overall_target: usize,
    ) -> Self {
        Self {
            catalog,
            collector,
            per_category_target,
            overall_target,
        }
    }

    /// The last category may push the total past `overall_target`; the
    /// overshoot is kept.
    pub async fn collect(&self, categories: &[String]) -> Result<Vec<VideoRecord>> {
        let mut videos: Vec<VideoRecord> = Vec::new();
        for category_id in categories {
            let name = self.catalog.require(category_id)?;
            info!(
                category_id = %category_id,
                category = name,
                "fetching videos for category"
            );

            let mut batch = self
                .collector
                .collect(category_id, self.per_category_target)
                .await?;
            for video in &mut batch {
                video.category = Some(name.to_string());
            }
            info!(
                category_id = %category_id,
                collected = batch.len(),
                "category done"
            );
            videos.extend(batch);

            if videos.len() >= self.overall_target {
                info!(
                    total = videos.len(),
                    target = self.overall_target,
                    "overall target reached; skipping remaining categories"
                );
                break;
            }
        }
        Ok(videos)
    }
}
