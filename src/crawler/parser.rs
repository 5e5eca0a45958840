//! Discussion-page link extraction
//!
//! Pulls outbound links out of a story's comment thread. Only syntactically
//! absolute http(s) URLs short enough to plausibly be content links are
//! kept, and links pointing back at the aggregator's own discussion pages
//! are dropped. The result has set semantics: each URL at most once.

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Longest href accepted as a content link; anything longer is assumed to
/// be tracking noise
const MAX_LINK_LEN: usize = 150;

/// Extracts the set of outbound links from a discussion page body
///
/// `discussion_url` anchors the self-reference check: links to `item` pages
/// on the same host are other discussion threads, not downloadable content.
pub fn extract_comment_links(html: &str, discussion_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    // Static selector, known valid
    let comment_anchor = Selector::parse(".commtext a[href]").unwrap();

    let mut links = BTreeSet::new();
    for anchor in document.select(&comment_anchor) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        if !href.starts_with("http://") && !href.starts_with("https://") {
            continue;
        }
        if href.len() > MAX_LINK_LEN {
            continue;
        }
        if is_self_discussion_link(href, discussion_url) {
            continue;
        }

        links.insert(href.to_string());
    }

    tracing::debug!(
        "Extracted {} outbound links from {}",
        links.len(),
        discussion_url
    );
    links.into_iter().collect()
}

/// Returns whether a link points at a discussion page on the same host
fn is_self_discussion_link(href: &str, discussion_url: &Url) -> bool {
    let Ok(url) = Url::parse(href) else {
        return false;
    };

    url.host_str() == discussion_url.host_str() && url.path() == "/item"
}
