use std::collections::HashMap;

use anyhow::{Context, Result};
use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::youtube::{TranscriptError, TranscriptSource, VideoRecord};

/// Attaches transcripts to records, fetching up to `concurrency` at a time.
pub struct TranscriptEnricher<'a> {
    source: &'a dyn TranscriptSource,
    concurrency: usize,
}

impl<'a> TranscriptEnricher<'a> {
    pub fn new(source: &'a dyn TranscriptSource, concurrency: usize) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
        }
    }

    /// Returns the same records in the same order, each with `transcript`
    /// set or cleared. Disabled or missing captions become `None`; any other
    /// fetch failure aborts enrichment with that error.
    pub async fn enrich(&self, mut videos: Vec<VideoRecord>) -> Result<Vec<VideoRecord>> {
        let mut ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
        ids.sort_unstable();
        ids.dedup();

        let source = self.source;
        let results: HashMap<String, Option<String>> = stream::iter(ids)
            .map(move |id| async move {
                let transcript = fetch_one(source, &id)
                    .await
                    .with_context(|| format!("fetching transcript for {id}"))?;
                Ok::<_, anyhow::Error>((id, transcript))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        let mut attached = 0usize;
        for video in &mut videos {
            video.transcript = results.get(&video.video_id).cloned().flatten();
            if video.transcript.is_some() {
                attached += 1;
            }
        }
        info!(
            total = videos.len(),
            with_transcript = attached,
            "transcript enrichment finished"
        );
        Ok(videos)
    }
}

async fn fetch_one(
    source: &dyn TranscriptSource,
    video_id: &str,
) -> Result<Option<String>, TranscriptError> {
    match source.fetch_transcript(video_id).await {
        Ok(text) if !text.trim().is_empty() => Ok(Some(text)),
        Ok(_) => Ok(None),
        Err(err) if err.is_unavailable() => {
            debug!(video_id, reason = %err, "no transcript");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
