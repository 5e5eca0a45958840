//! Content-addressed download store
//!
//! Downloaded bodies live under one directory per story id. Each file is
//! named by the SHA-256 of its source URL, so the same URL always maps to
//! the same path and a present file means "already downloaded, skip".
//! Entries are never rewritten once stored.

use crate::storage::{StorageError, CONTENT_EXT};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// On-disk mapping from source URL to downloaded body
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Creates a store rooted at the given downloads directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root downloads directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Computes the storage key for a source URL
    ///
    /// The key is a hex-encoded SHA-256 of the URL string, deterministic
    /// across runs.
    pub fn content_key(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Directory holding one story's ledger and content files
    pub fn story_dir(&self, story_id: &str) -> PathBuf {
        self.root.join(story_id)
    }

    /// Full path a URL's body would be stored at for a story
    pub fn content_path(&self, story_id: &str, url: &str) -> PathBuf {
        self.story_dir(story_id)
            .join(format!("{}.{}", Self::content_key(url), CONTENT_EXT))
    }

    /// Ensures the downloads root exists
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::io(&self.root, e))
    }

    /// Ensures a story's directory exists
    pub async fn ensure_story_dir(&self, story_id: &str) -> Result<PathBuf, StorageError> {
        let dir = self.story_dir(story_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::io(&dir, e))?;
        Ok(dir)
    }

    /// Returns whether a URL's body is already stored for a story
    pub async fn contains(&self, story_id: &str, url: &str) -> bool {
        tokio::fs::try_exists(self.content_path(story_id, url))
            .await
            .unwrap_or(false)
    }

    /// Stores a downloaded body under its URL key
    ///
    /// An already-present entry is left untouched; stored content is
    /// immutable.
    pub async fn save(&self, story_id: &str, url: &str, body: &str) -> Result<PathBuf, StorageError> {
        let path = self.content_path(story_id, url);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!("Content for {} already stored at {}", url, path.display());
            return Ok(path);
        }

        tokio::fs::write(&path, body)
            .await
            .map_err(|e| StorageError::io(&path, e))?;
        tracing::debug!("Stored {} as {}", url, path.display());
        Ok(path)
    }

    /// Filters a candidate set down to the URLs not yet stored for a story
    pub async fn missing(&self, story_id: &str, candidates: &[String]) -> Vec<String> {
        let mut out = Vec::new();
        for url in candidates {
            if !self.contains(story_id, url).await {
                out.push(url.clone());
            }
        }
        out
    }

    /// Lists all story ids that have a directory under the downloads root
    ///
    /// Plain files (and anything that is not a directory) are ignored, so a
    /// stray file next to the story folders cannot break enumeration.
    pub async fn story_ids(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| StorageError::io(&self.root, e))?;

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&self.root, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                ids.push(name);
            }
        }

        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_content_key_is_stable() {
        let a = ContentStore::content_key("https://example.com/article");
        let b = ContentStore::content_key("https://example.com/article");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_content_key_differs_per_url() {
        let a = ContentStore::content_key("https://example.com/a");
        let b = ContentStore::content_key("https://example.com/b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_content_path_layout() {
        let store = ContentStore::new("/tmp/downloads");
        let path = store.content_path("42", "https://example.com/a");
        assert!(path.starts_with("/tmp/downloads/42"));
        assert_eq!(path.extension().unwrap(), "html");
    }

    #[tokio::test]
    async fn test_save_and_contains() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        store.ensure_story_dir("7").await.unwrap();

        assert!(!store.contains("7", "https://example.com/x").await);
        store
            .save("7", "https://example.com/x", "<html>body</html>")
            .await
            .unwrap();
        assert!(store.contains("7", "https://example.com/x").await);
    }

    #[tokio::test]
    async fn test_save_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        store.ensure_story_dir("7").await.unwrap();

        let path = store
            .save("7", "https://example.com/x", "first")
            .await
            .unwrap();
        store
            .save("7", "https://example.com/x", "second")
            .await
            .unwrap();

        let body = tokio::fs::read_to_string(path).await.unwrap();
        assert_eq!(body, "first");
    }

    #[tokio::test]
    async fn test_missing_excludes_stored_urls() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        store.ensure_story_dir("9").await.unwrap();

        let a = "https://a.example/".to_string();
        let b = "https://b.example/".to_string();
        let c = "https://c.example/".to_string();

        store.save("9", &a, "body-a").await.unwrap();

        let missing = store
            .missing("9", &[a.clone(), b.clone(), c.clone()])
            .await;
        assert_eq!(missing, vec![b, c]);
    }

    #[tokio::test]
    async fn test_story_ids_lists_only_directories() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        store.ensure_story_dir("100").await.unwrap();
        store.ensure_story_dir("200").await.unwrap();
        tokio::fs::write(dir.path().join("stray.txt"), "junk")
            .await
            .unwrap();

        let ids = store.story_ids().await.unwrap();
        assert_eq!(ids, vec!["100".to_string(), "200".to_string()]);
    }

    #[tokio::test]
    async fn test_disjoint_keys_across_stories() {
        let store = ContentStore::new("/tmp/downloads");
        let p1 = store.content_path("1", "https://example.com/a");
        let p2 = store.content_path("2", "https://example.com/a");
        assert_ne!(p1, p2);
    }
}
