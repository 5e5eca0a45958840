use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration from an optional path
///
/// With no path, built-in defaults are used. A path that cannot be read or
/// parsed is an error: a present-but-broken config file should stop the
/// process rather than silently fall back to defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
root-url = "https://news.ycombinator.com/"
request-timeout-secs = 5
max-discussion-fetches = 3
max-workers = 8
queue-depth = 20
cycle-period-secs = 120
max-retries = 4

[output]
downloads-dir = "./archive"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_workers, 8);
        assert_eq!(config.crawler.queue_depth, 20);
        assert_eq!(config.crawler.cycle_period_secs, 120);
        assert_eq!(config.crawler.max_retries, 4);
        assert_eq!(config.output.downloads_dir, "./archive");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config_content = r#"
[crawler]
max-workers = 2
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_workers, 2);
        assert_eq!(config.crawler.queue_depth, 10);
        assert_eq!(config.output.downloads_dir, "downloads");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/magpie.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
max-workers = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_config_or_default_without_path() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.crawler.max_workers, 5);
    }

    #[test]
    fn test_load_config_or_default_with_broken_path() {
        let result = load_config_or_default(Some(Path::new("/nonexistent/magpie.toml")));
        assert!(result.is_err());
    }
}
