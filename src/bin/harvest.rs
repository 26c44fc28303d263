use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{error, info};

use yt_harvest::config::{HarvestConfig, StoreFormat};
use yt_harvest::logging::init_tracing;
use yt_harvest::youtube::{CategoryCatalog, TimedTextClient, TranscriptSource, YoutubeClient};
use yt_harvest::run_harvest;

#[derive(Parser, Debug)]
#[command(name = "harvest", version, about = "Collect YouTube video metadata by category")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    // Allow `harvest --total 100` without the explicit `run` subcommand.
    // If a subcommand is present, these args are ignored.
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect videos and append them to the store (default)
    Run(RunArgs),
    /// List known categories
    Categories(CategoriesArgs),
}

#[derive(Debug, Default, Args)]
struct RunArgs {
    /// Category ids to harvest, in order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,
    /// Region code for search (e.g. IN, US)
    #[arg(long)]
    region: Option<String>,
    /// Maximum records per category
    #[arg(long)]
    per_category: Option<usize>,
    /// Stop starting new categories once this many records are collected
    #[arg(long)]
    total: Option<usize>,
    /// Store path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Store format
    #[arg(long, value_enum)]
    format: Option<StoreFormat>,
    /// Records per store write
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Fetch and attach transcripts
    #[arg(long, action = ArgAction::SetTrue)]
    transcripts: bool,
    /// Keep videos of any length
    #[arg(long = "no-duration-filter", action = ArgAction::SetTrue)]
    no_duration_filter: bool,
}

#[derive(Debug, Default, Args)]
struct CategoriesArgs {
    /// Ask the API for the assignable categories of a region
    #[arg(long, action = ArgAction::SetTrue)]
    live: bool,
    #[arg(long)]
    region: Option<String>,
}

impl RunArgs {
    fn apply(self, cfg: &mut HarvestConfig) {
        if !self.categories.is_empty() {
            cfg.categories = self.categories;
        }
        if let Some(region) = self.region {
            cfg.region_code = region;
        }
        if let Some(n) = self.per_category {
            cfg.per_category_target = n;
        }
        if let Some(n) = self.total {
            cfg.overall_target = n;
        }
        if let Some(path) = self.output {
            cfg.output_path = path;
        }
        if let Some(format) = self.format {
            cfg.store_format = format;
        }
        if let Some(n) = self.chunk_size {
            cfg.chunk_size = n;
        }
        if self.transcripts {
            cfg.fetch_transcripts = true;
        }
        if self.no_duration_filter {
            cfg.duration_window = None;
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = init_tracing("info") {
        eprintln!("{err}");
    }
    if let Err(err) = real_main().await {
        error!(error = ?err, "harvest failed");
        std::process::exit(1);
    }
}

async fn real_main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = HarvestConfig::from_env().context("loading configuration")?;

    // Overrides first; `run` validates the merged result.
    match cli.command {
        Some(Command::Categories(args)) => list_categories(&cfg, args).await,
        Some(Command::Run(args)) => {
            args.apply(&mut cfg);
            run(cfg).await
        }
        None => {
            cli.run.apply(&mut cfg);
            run(cfg).await
        }
    }
}

async fn run(cfg: HarvestConfig) -> Result<()> {
    cfg.validate()?;
    cfg.log_snapshot();

    let catalog = CategoryCatalog::default();
    let api = YoutubeClient::from_config(&cfg)?;
    let transcripts = if cfg.fetch_transcripts {
        Some(TimedTextClient::from_config(&cfg)?)
    } else {
        None
    };

    let summary = run_harvest(
        &cfg,
        &catalog,
        &api,
        transcripts.as_ref().map(|t| t as &dyn TranscriptSource),
    )
    .await?;
    info!(
        collected = summary.collected,
        chunks = summary.chunks_written,
        path = %cfg.output_path.display(),
        "done"
    );
    Ok(())
}

async fn list_categories(cfg: &HarvestConfig, args: CategoriesArgs) -> Result<()> {
    let catalog = if args.live {
        let region = args.region.unwrap_or_else(|| cfg.region_code.clone());
        let api = YoutubeClient::from_config(cfg)?;
        api.fetch_categories(&region)
            .await
            .with_context(|| format!("listing categories for {region}"))?
    } else {
        CategoryCatalog::default()
    };
    for (id, name) in catalog.iter() {
        println!("{id:>3}  {name}");
    }
    Ok(())
}
