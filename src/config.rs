//! Harvest configuration: every tunable the pipeline reads, in one struct
//! that is handed to each component at construction.
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;

use crate::util::env::{env_flag, env_list, env_opt, env_parse, log_snapshot};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_TRANSCRIPT_BASE: &str = "https://www.youtube.com/api/timedtext";
pub const DEFAULT_REGION: &str = "IN";
pub const DEFAULT_CATEGORIES: [&str; 8] = ["1", "2", "10", "20", "25", "26", "24", "27"];
pub const DEFAULT_TARGET: usize = 2000;
/// The search endpoint caps `maxResults` at 50.
pub const MAX_BATCH_SIZE: u32 = 50;
pub const DEFAULT_CHUNK_SIZE: usize = 50;
pub const DEFAULT_OUTPUT: &str = "videos_metadata.json";

/// Inclusive window of accepted video lengths, in minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationWindow {
    pub min_minutes: f64,
    pub max_minutes: f64,
}

impl DurationWindow {
    pub fn new(min_minutes: f64, max_minutes: f64) -> Self {
        Self {
            min_minutes,
            max_minutes,
        }
    }

    pub fn contains(&self, minutes: f64) -> bool {
        minutes >= self.min_minutes && minutes <= self.max_minutes
    }
}

impl Default for DurationWindow {
    fn default() -> Self {
        Self::new(3.0, 15.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StoreFormat {
    /// Single JSON array, rewritten on every chunk.
    #[default]
    #[value(name = "json", alias = "array")]
    JsonArray,
    /// One record per line, appended.
    #[value(name = "jsonl", alias = "ndjson", alias = "lines")]
    JsonLines,
}

/// Same names as the `--format` flag, for `HARVEST_STORE_FORMAT`.
impl FromStr for StoreFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        <StoreFormat as ValueEnum>::from_str(s.trim(), true)
            .map_err(|_| anyhow!("unknown store format {s:?} (expected json or jsonl)"))
    }
}

impl fmt::Display for StoreFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(v) => f.write_str(v.get_name()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub api_key: String,
    pub api_base: String,
    pub region_code: String,
    /// Category ids in the order they are harvested.
    pub categories: Vec<String>,
    pub per_category_target: usize,
    /// Stop starting new categories once this many records are held.
    pub overall_target: usize,
    /// `maxResults` per search page.
    pub batch_size: u32,
    /// `None` disables duration filtering.
    pub duration_window: Option<DurationWindow>,
    pub chunk_size: usize,
    pub output_path: PathBuf,
    pub store_format: StoreFormat,
    pub fetch_transcripts: bool,
    pub transcript_concurrency: usize,
    pub transcript_lang: String,
    pub transcript_base: String,
    pub http_timeout_secs: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            region_code: DEFAULT_REGION.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            per_category_target: DEFAULT_TARGET,
            overall_target: DEFAULT_TARGET,
            batch_size: MAX_BATCH_SIZE,
            duration_window: Some(DurationWindow::default()),
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            store_format: StoreFormat::JsonArray,
            fetch_transcripts: false,
            transcript_concurrency: 8,
            transcript_lang: "en".to_string(),
            transcript_base: DEFAULT_TRANSCRIPT_BASE.to_string(),
            http_timeout_secs: 15,
        }
    }
}

impl HarvestConfig {
    /// Build from `HARVEST_*` / `YOUTUBE_*` / `TRANSCRIPT_*` env vars over the defaults.
    ///
    /// Not validated here: callers apply their own overrides first and then
    /// call [`HarvestConfig::validate`].
    pub fn from_env() -> Result<Self> {
        let d = Self::default();

        let duration_window = if env_flag("HARVEST_DURATION_FILTER", true) {
            let base = DurationWindow::default();
            Some(DurationWindow::new(
                env_parse("HARVEST_MIN_MINUTES", base.min_minutes),
                env_parse("HARVEST_MAX_MINUTES", base.max_minutes),
            ))
        } else {
            None
        };

        let store_format = match env_opt("HARVEST_STORE_FORMAT") {
            Some(raw) => raw.parse()?,
            None => d.store_format,
        };

        Ok(Self {
            api_key: env_opt("YOUTUBE_API_KEY").unwrap_or_default(),
            api_base: env_opt("YOUTUBE_API_BASE").unwrap_or(d.api_base),
            region_code: env_opt("HARVEST_REGION").unwrap_or(d.region_code),
            categories: env_list("HARVEST_CATEGORIES").unwrap_or(d.categories),
            per_category_target: env_parse("HARVEST_PER_CATEGORY", d.per_category_target),
            overall_target: env_parse("HARVEST_TOTAL", d.overall_target),
            batch_size: env_parse("HARVEST_BATCH_SIZE", d.batch_size),
            duration_window,
            chunk_size: env_parse("HARVEST_CHUNK_SIZE", d.chunk_size),
            output_path: env_opt("HARVEST_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(d.output_path),
            store_format,
            fetch_transcripts: env_flag("HARVEST_TRANSCRIPTS", d.fetch_transcripts),
            transcript_concurrency: env_parse(
                "TRANSCRIPT_CONCURRENCY",
                d.transcript_concurrency,
            ),
            transcript_lang: env_opt("TRANSCRIPT_LANG").unwrap_or(d.transcript_lang),
            transcript_base: env_opt("TRANSCRIPT_BASE").unwrap_or(d.transcript_base),
            http_timeout_secs: env_parse("HTTP_TIMEOUT_SECS", d.http_timeout_secs),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            bail!(
                "batch size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            );
        }
        if self.chunk_size == 0 {
            bail!("chunk size must be at least 1");
        }
        if self.transcript_concurrency == 0 {
            bail!("transcript concurrency must be at least 1");
        }
        if let Some(w) = self.duration_window {
            if w.min_minutes.is_nan() || w.max_minutes.is_nan() || w.min_minutes > w.max_minutes {
                bail!(
                    "duration window is empty: min {} > max {}",
                    w.min_minutes,
                    w.max_minutes
                );
            }
        }
        if self.categories.is_empty() {
            bail!("no categories configured");
        }
        Ok(())
    }

    pub fn log_snapshot(&self) {
        let window = match self.duration_window {
            Some(w) => format!("[{}, {}]", w.min_minutes, w.max_minutes),
            None => "off".to_string(),
        };
        log_snapshot(
            "harvest",
            &[
                ("YOUTUBE_API_KEY", self.api_key.clone()),
                ("YOUTUBE_API_BASE", self.api_base.clone()),
                ("HARVEST_REGION", self.region_code.clone()),
                ("HARVEST_CATEGORIES", self.categories.join(",")),
                ("HARVEST_PER_CATEGORY", self.per_category_target.to_string()),
                ("HARVEST_TOTAL", self.overall_target.to_string()),
                ("HARVEST_BATCH_SIZE", self.batch_size.to_string()),
                ("HARVEST_DURATION_WINDOW", window),
                ("HARVEST_CHUNK_SIZE", self.chunk_size.to_string()),
                ("HARVEST_OUTPUT", self.output_path.display().to_string()),
                ("HARVEST_STORE_FORMAT", self.store_format.to_string()),
                ("HARVEST_TRANSCRIPTS", self.fetch_transcripts.to_string()),
            ],
        );
    }
}
