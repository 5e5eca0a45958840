//! Front-page frontier builder
//!
//! Parses the link-aggregator front page into the current story list. The
//! page layout is a fixed table: one `tr.athing` row per story carrying the
//! story id and the title anchor. Malformed rows are skipped; the frontier
//! is re-derived from the live page every cycle and never persisted.

use crate::crawler::fetcher::fetch_text;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

/// One front-page story
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryItem {
    /// Stable external story identifier; doubles as the ledger/storage key
    pub id: String,
    /// Story title
    pub title: String,
    /// Canonical outbound link (resolved against the root when relative)
    pub link: Url,
    /// Synthesized discussion-page URL
    pub discussion_url: Url,
}

/// Fetches the front page and parses the current story list
///
/// Fails soft: an empty or unreachable front page yields an empty list, and
/// the caller decides whether that aborts the cycle.
pub async fn build_frontier(client: &Client, root: &Url) -> Vec<StoryItem> {
    let html = fetch_text(client, root.as_str()).await;
    if html.is_empty() {
        tracing::warn!("Front page {} returned no content", root);
        return Vec::new();
    }

    let stories = parse_front_page(&html, root);
    tracing::debug!("Frontier holds {} stories", stories.len());
    stories
}

/// Parses front-page HTML into an ordered story list
///
/// Rows missing an id or a title anchor, and rows whose link cannot be
/// resolved to a URL, are skipped silently.
pub fn parse_front_page(html: &str, root: &Url) -> Vec<StoryItem> {
    let document = Html::parse_document(html);

    // Static selectors, known valid
    let row_selector = Selector::parse("tr.athing").unwrap();
    let title_selector = Selector::parse(".titleline a, a.titlelink").unwrap();

    let mut stories = Vec::new();
    for row in document.select(&row_selector) {
        let Some(id) = row.value().attr("id") else {
            tracing::debug!("Skipping story row without id attribute");
            continue;
        };

        let Some(anchor) = row.select(&title_selector).next() else {
            tracing::debug!("Skipping story {} without title anchor", id);
            continue;
        };

        let Some(href) = anchor.value().attr("href") else {
            tracing::debug!("Skipping story {} without href", id);
            continue;
        };

        // Relative hrefs point back into the root site
        let Ok(link) = root.join(href) else {
            tracing::debug!("Skipping story {} with unresolvable link {}", id, href);
            continue;
        };

        let Ok(discussion_url) = root.join(&format!("item?id={}", id)) else {
            continue;
        };

        let title = anchor.text().collect::<String>().trim().to_string();

        stories.push(StoryItem {
            id: id.to_string(),
            title,
            link,
            discussion_url,
        });
    }

    stories
}
