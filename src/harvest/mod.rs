pub mod collector;
pub mod enricher;
pub mod store;

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::config::HarvestConfig;
use crate::orchestrator::Orchestrator;
use crate::youtube::{CategoryCatalog, TranscriptSource, VideoApi};
use collector::CategoryCollector;
use enricher::TranscriptEnricher;
use store::VideoStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub collected: usize,
    pub with_transcripts: usize,
    pub chunks_written: usize,
}

/// Collect -> (optionally) attach transcripts -> save in chunks.
///
/// Transcripts are fetched only when `transcripts` is given. Chunks that
/// were flushed before an error stay on disk.
pub async fn run_harvest(
    cfg: &HarvestConfig,
    catalog: &CategoryCatalog,
    api: &dyn VideoApi,
    transcripts: Option<&dyn TranscriptSource>,
) -> Result<HarvestSummary> {
    cfg.validate()?;
    let started = Utc::now();
    info!(
        started_at = %started.to_rfc3339(),
        categories = cfg.categories.len(),
        "harvest starting"
    );

    let collector = CategoryCollector::new(api, cfg);
    let orchestrator = Orchestrator::new(
        catalog,
        collector,
        cfg.per_category_target,
        cfg.overall_target,
    );
    let mut videos = orchestrator.collect(&cfg.categories).await?;

    let mut with_transcripts = 0;
    if let Some(source) = transcripts {
        videos = TranscriptEnricher::new(source, cfg.transcript_concurrency)
            .enrich(videos)
            .await?;
        with_transcripts = videos.iter().filter(|v| v.transcript.is_some()).count();
    }

    let store = VideoStore::new(&cfg.output_path, cfg.store_format);
    let chunks_written = store.save_in_chunks(&videos, cfg.chunk_size)?;

    let summary = HarvestSummary {
        collected: videos.len(),
        with_transcripts,
        chunks_written,
    };
    let elapsed_ms = (Utc::now() - started).num_milliseconds();
    if transcripts.is_some() {
        info!(
            collected = summary.collected,
            with_transcripts = summary.with_transcripts,
            elapsed_ms,
            "Fetched {} videos with transcripts.",
            summary.collected
        );
    } else {
        info!(
            collected = summary.collected,
            elapsed_ms,
            "Fetched {} videos.",
            summary.collected
        );
    }
    Ok(summary)
}
