//! Configuration module for Magpie
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every option has a default, so the config file itself is optional.
//!
//! # Example
//!
//! ```no_run
//! use magpie::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("magpie.toml")).unwrap();
//! println!("Cycle period: {}s", config.crawler.cycle_period_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};

// Re-export validation entry point
pub use validation::validate;
