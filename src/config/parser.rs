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
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitemap_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::StoreBackend;
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
max-depth = 5
threads = 8
total-link-limit = 200
links-per-file = 100
user-agent = "TestBot/1.0"

[timeouts]
request = 5
sleep = 0.25

[filters]
exclude-patterns = ["/admin*", "?print="]
content-exclude-patterns = ["under construction"]

[storage]
backend = "sqlite"
directory = "/tmp"

[progress]
frequency = 25
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 5);
        assert_eq!(config.crawler.threads, 8);
        assert_eq!(config.crawler.total_link_limit, 200);
        assert_eq!(config.crawler.user_agent, "TestBot/1.0");
        assert_eq!(config.timeouts.request, 5);
        assert!((config.timeouts.sleep - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.filters.exclude_patterns.len(), 2);
        assert_eq!(config.storage.backend, StoreBackend::Sqlite);
        assert_eq!(config.progress.frequency, 25);
        assert!(config.download.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.threads, 3);
        assert_eq!(config.crawler.total_link_limit, 1000);
        assert_eq!(config.crawler.links_per_file, 50_000);
        assert_eq!(config.timeouts.request, 20);
        assert_eq!(config.timeouts.cooldown, 300);
        assert_eq!(config.storage.backend, StoreBackend::Memory);
        assert!(config
            .filters
            .exclude_extensions
            .contains(&"pdf".to_string()));
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[crawler]\nthreads = 1\n").unwrap();

        assert_eq!(config.crawler.threads, 1);
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_retries, 3);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = parse_config("[crawler]\nthreadz = 4\n");
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let result = parse_config("[limits]\nthreads = 4\n");
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_download_section() {
        let config = parse_config("[download]\ndirectory = \"./pages\"\n").unwrap();
        let download = config.download.unwrap();
        assert_eq!(download.directory, std::path::PathBuf::from("./pages"));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/crawler.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nthreads = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
