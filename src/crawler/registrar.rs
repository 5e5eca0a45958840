//! Per-story link registration
//!
//! Registration is the discovery half of a cycle: for one story, make sure
//! its ledger exists, fetch the discussion page through the permit-limited
//! retrying fetcher, and append whichever extracted links the ledger has
//! not seen yet. Each story registers independently; a failure here never
//! touches other stories.

use crate::crawler::fetcher::fetch_with_retry;
use crate::crawler::frontier::StoryItem;
use crate::crawler::parser::extract_comment_links;
use crate::storage::{ContentStore, Ledger};
use crate::MagpieError;
use reqwest::Client;
use std::collections::HashSet;
use tokio::sync::Semaphore;

/// Marker text of the aggregator's throttling page
const THROTTLE_MARKER: &str = "not able to serve your requests this quickly";

/// Detects a well-formed but useless throttle response body
pub fn is_throttle_page(body: &str) -> bool {
    body.contains(THROTTLE_MARKER)
}

/// Registers one story's newly discovered links into its ledger
///
/// Steps: ensure the story directory and ledger exist (initializing the
/// ledger with the discussion URL and canonical link), read the known set,
/// fetch the discussion page, extract outbound links, append the
/// difference. An unavailable discussion page aborts this story for the
/// cycle with a warning; the next cycle tries again.
///
/// Returns the number of links appended.
pub async fn register_story(
    client: &Client,
    permits: &Semaphore,
    store: &ContentStore,
    story: &StoryItem,
    retries: u32,
) -> Result<usize, MagpieError> {
    let story_dir = store.ensure_story_dir(&story.id).await?;

    let ledger = Ledger::new(&story_dir);
    ledger
        .init(story.discussion_url.as_str(), story.link.as_str())
        .await?;

    let known: HashSet<String> = ledger.read().await?.into_iter().collect();

    let body = fetch_with_retry(
        client,
        permits,
        story.discussion_url.as_str(),
        retries,
        is_throttle_page,
    )
    .await;

    if body.is_empty() {
        tracing::warn!(
            "Discussion page for story {} unavailable, skipping this cycle",
            story.id
        );
        return Ok(0);
    }

    let extracted = extract_comment_links(&body, &story.discussion_url);
    let fresh: Vec<String> = extracted
        .into_iter()
        .filter(|link| !known.contains(link))
        .collect();

    if fresh.is_empty() {
        tracing::debug!("No new links for story {}", story.id);
        return Ok(0);
    }

    let appended = ledger.append(&fresh).await?;
    tracing::info!("Registered {} new links for story {}", appended, story.id);
    Ok(appended)
}
