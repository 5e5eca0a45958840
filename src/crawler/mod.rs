//! Crawler module for the incremental crawl engine
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching, with permit-limited retries for discussion pages
//! - Front-page and discussion-page parsing
//! - Per-story link registration
//! - The bounded download worker pool
//! - Cycle orchestration and the periodic loop

pub mod driver;
pub mod fetcher;
pub mod frontier;
pub mod parser;
pub mod pool;
pub mod registrar;

pub use driver::{CycleReport, Driver};
pub use fetcher::{build_http_client, fetch_page, fetch_text, fetch_with_retry, FetchOutcome};
pub use frontier::{build_frontier, parse_front_page, StoryItem};
pub use parser::extract_comment_links;
pub use pool::{DownloadPool, WorkItem};
pub use registrar::{is_throttle_page, register_story};

use crate::config::Config;
use crate::MagpieError;

/// Runs the periodic crawl loop until externally interrupted
pub async fn run(config: Config) -> Result<(), MagpieError> {
    Driver::new(config)?.run_forever().await
}
