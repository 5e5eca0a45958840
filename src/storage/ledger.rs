//! Per-story link ledger
//!
//! The ledger is an append-only text file recording every link URL seen for
//! a story so far, one per line. The first line is always the story's
//! discussion-page URL. Appends never introduce duplicates, and existing
//! lines are never rewritten or removed.

use crate::storage::{StorageError, LEDGER_FILE};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Handle to one story's ledger file
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Creates a ledger handle for the given story directory
    pub fn new(story_dir: &Path) -> Self {
        Self {
            path: story_dir.join(LEDGER_FILE),
        }
    }

    /// Path of the underlying ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the ledger file exists on disk
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Initializes the ledger on first encounter of a story
    ///
    /// The discussion-page URL becomes the first line; the canonical story
    /// link is recorded as the second line unless it equals the discussion
    /// URL. An existing ledger is trusted as source of truth and left alone.
    pub async fn init(&self, discussion_url: &str, story_link: &str) -> Result<(), StorageError> {
        if self.exists().await {
            return Ok(());
        }

        let mut contents = format!("{}\n", discussion_url);
        if story_link != discussion_url {
            contents.push_str(story_link);
            contents.push('\n');
        }

        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| StorageError::io(&self.path, e))
    }

    /// Reads all recorded links in file order
    pub async fn read(&self) -> Result<Vec<String>, StorageError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        Ok(contents
            .lines()
            .map(str::to_string)
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// Appends links that are not already present
    ///
    /// The current contents are re-read before writing so that an append can
    /// never duplicate an entry, regardless of what the caller diffed
    /// against. Returns the number of links actually written.
    pub async fn append(&self, links: &[String]) -> Result<usize, StorageError> {
        let known: HashSet<String> = self.read().await?.into_iter().collect();
        let fresh: Vec<&String> = links
            .iter()
            .filter(|link| !known.contains(link.as_str()))
            .collect();

        if fresh.is_empty() {
            return Ok(0);
        }

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        let mut buffer = String::new();
        for link in &fresh {
            buffer.push_str(link);
            buffer.push('\n');
        }

        file.write_all(buffer.as_bytes())
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        Ok(fresh.len())
    }
}
