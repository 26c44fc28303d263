//! Log output for the `harvest` binary. Per-category progress and the
//! "N rows added" lines from the store are `info!` events, so the default
//! `info` filter shows a run's progress and `RUST_LOG=yt_harvest=debug`
//! adds per-page and per-transcript detail.
use anyhow::anyhow;
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

/// Install the global fmt subscriber. `default_filter` applies when
/// `RUST_LOG` is unset or unparsable; a second call returns an error.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow!("tracing subscriber already installed: {e}"))
}
