//! Storage module for persisting crawl data
//!
//! This module owns the on-disk layout under the downloads root:
//! one directory per story id, containing a `links.txt` ledger (one URL per
//! line, append-only, first line = discussion URL) and zero or more content
//! files named by a hash of their source URL.

mod content;
mod ledger;

pub use content::ContentStore;
pub use ledger::Ledger;

use std::path::PathBuf;
use thiserror::Error;

/// Name of the per-story ledger file
pub const LEDGER_FILE: &str = "links.txt";

/// Extension given to stored content files
pub const CONTENT_EXT: &str = "html";

/// Errors raised by the storage layer
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
