//! YouTube Data API access: category catalog, search/metadata client,
//! response parsing, and caption retrieval.
pub mod catalog;
pub mod client;
pub mod duration;
pub mod metadata;
pub mod models;
pub mod transcript;

pub use catalog::CategoryCatalog;
pub use client::{VideoApi, YoutubeClient};
pub use models::{SearchPage, VideoRecord};
pub use transcript::{TimedTextClient, TranscriptError, TranscriptSource};
