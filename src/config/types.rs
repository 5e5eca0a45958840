use serde::Deserialize;

/// Main configuration structure for Magpie
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Root URL of the front page to crawl
    #[serde(rename = "root-url", default = "default_root_url")]
    pub root_url: String,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum number of concurrent discussion-page fetches.
    /// Discussion pages are served by the throttling-prone root host, so
    /// this limit is independent of the download worker count.
    #[serde(
        rename = "max-discussion-fetches",
        default = "default_discussion_fetches"
    )]
    pub max_discussion_fetches: usize,

    /// Number of download workers
    #[serde(rename = "max-workers", default = "default_workers")]
    pub max_workers: usize,

    /// Capacity of the bounded download queue
    #[serde(rename = "queue-depth", default = "default_queue_depth")]
    pub queue_depth: usize,

    /// Seconds to sleep between crawl cycles
    #[serde(rename = "cycle-period-secs", default = "default_cycle_period")]
    pub cycle_period_secs: u64,

    /// Retry attempts for a throttled discussion-page fetch
    #[serde(rename = "max-retries", default = "default_retries")]
    pub max_retries: u32,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for per-story download folders
    #[serde(rename = "downloads-dir", default = "default_downloads_dir")]
    pub downloads_dir: String,
}

fn default_root_url() -> String {
    "https://news.ycombinator.com/".to_string()
}

fn default_request_timeout() -> u64 {
    5
}

fn default_discussion_fetches() -> usize {
    3
}

fn default_workers() -> usize {
    5
}

fn default_queue_depth() -> usize {
    10
}

fn default_cycle_period() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}

fn default_downloads_dir() -> String {
    "downloads".to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            request_timeout_secs: default_request_timeout(),
            max_discussion_fetches: default_discussion_fetches(),
            max_workers: default_workers(),
            queue_depth: default_queue_depth(),
            cycle_period_secs: default_cycle_period(),
            max_retries: default_retries(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            downloads_dir: default_downloads_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}
