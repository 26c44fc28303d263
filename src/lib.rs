//! Category-bounded YouTube metadata harvester.
//!
//! Pages through the Data API `search` endpoint per category, keeps videos
//! whose length falls in a configured window, optionally attaches caption
//! text, and appends everything to a JSON store in chunks.
pub mod config;
pub mod harvest;
pub mod orchestrator;
pub mod logging;
pub mod youtube;

pub mod util {
    pub mod env;
}

pub use config::HarvestConfig;
pub use harvest::{run_harvest, HarvestSummary};
