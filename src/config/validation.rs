use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let root = Url::parse(&config.root_url).map_err(|e| {
        ConfigError::Validation(format!("root-url '{}' is not a valid URL: {}", config.root_url, e))
    })?;

    if root.scheme() != "http" && root.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "root-url must use http or https, got '{}'",
            root.scheme()
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_discussion_fetches < 1 || config.max_discussion_fetches > 32 {
        return Err(ConfigError::Validation(format!(
            "max-discussion-fetches must be between 1 and 32, got {}",
            config.max_discussion_fetches
        )));
    }

    if config.max_workers < 1 || config.max_workers > 64 {
        return Err(ConfigError::Validation(format!(
            "max-workers must be between 1 and 64, got {}",
            config.max_workers
        )));
    }

    if config.queue_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "queue-depth must be >= 1, got {}",
            config.queue_depth
        )));
    }

    if config.cycle_period_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "cycle-period-secs must be >= 1, got {}",
            config.cycle_period_secs
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.downloads_dir.is_empty() {
        return Err(ConfigError::Validation(
            "downloads-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_bad_root_url() {
        let mut config = Config::default();
        config.crawler.root_url = "not a url".to_string();
        assert!(validate(&config).is_err());

        config.crawler.root_url = "ftp://example.com/".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_workers() {
        let mut config = Config::default();
        config.crawler.max_workers = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_queue_depth() {
        let mut config = Config::default();
        config.crawler.queue_depth = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_retries() {
        let mut config = Config::default();
        config.crawler.max_retries = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_empty_downloads_dir() {
        let mut config = Config::default();
        config.output.downloads_dir = String::new();
        assert!(validate(&config).is_err());
    }
}
