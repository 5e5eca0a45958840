//! Magpie: an incremental news thread link archiver
//!
//! This crate crawls a link-aggregator front page on a fixed period,
//! records every outbound link found in each story's discussion thread in a
//! per-story append-only ledger, and downloads the links that are not yet
//! present in a content-addressed on-disk store. Re-runs only fetch what is
//! new.

pub mod config;
pub mod crawler;
pub mod stats;
pub mod storage;

use thiserror::Error;

/// Main error type for Magpie operations
#[derive(Debug, Error)]
pub enum MagpieError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frontier unavailable: {0}")]
    Frontier(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Magpie operations
pub type Result<T> = std::result::Result<T, MagpieError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::frontier::StoryItem;
pub use crawler::pool::WorkItem;
pub use stats::Counters;
