use crate::config::types::{Config, CrawlerConfig, FilterConfig, ProgressConfig, TimeoutConfig};
use crate::url::PatternMatcher;
use crate::ConfigError;

/// Largest number of URLs the sitemap protocol allows in one file
pub const SITEMAP_MAX_LINKS: usize = 50_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_timeout_config(&config.timeouts)?;
    validate_filter_config(&config.filters)?;
    validate_progress_config(&config.progress)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 {
        return Err(ConfigError::Validation(
            "max-depth must be >= 1".to_string(),
        ));
    }

    if config.threads < 1 {
        return Err(ConfigError::Validation(format!(
            "threads must be >= 1, got {}",
            config.threads
        )));
    }

    if config.total_link_limit < 1 {
        return Err(ConfigError::Validation(
            "total-link-limit must be >= 1".to_string(),
        ));
    }

    if config.links_per_file < 1 || config.links_per_file > SITEMAP_MAX_LINKS {
        return Err(ConfigError::Validation(format!(
            "links-per-file must be between 1 and {}, got {}",
            SITEMAP_MAX_LINKS, config.links_per_file
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates timing configuration
fn validate_timeout_config(config: &TimeoutConfig) -> Result<(), ConfigError> {
    if config.request == 0 {
        return Err(ConfigError::Validation(
            "request timeout must be > 0 seconds".to_string(),
        ));
    }

    if !config.sleep.is_finite() || config.sleep < 0.0 {
        return Err(ConfigError::Validation(format!(
            "sleep must be a non-negative number of seconds, got {}",
            config.sleep
        )));
    }

    if !config.backoff_step.is_finite() || config.backoff_step < 0.0 {
        return Err(ConfigError::Validation(format!(
            "backoff-step must be a non-negative number of seconds, got {}",
            config.backoff_step
        )));
    }

    Ok(())
}

/// Validates that every exclusion pattern compiles
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    PatternMatcher::for_urls(&config.exclude_patterns)?;
    PatternMatcher::for_content(&config.content_exclude_patterns)?;

    for ext in &config.exclude_extensions {
        if ext.trim().is_empty() || ext.contains('/') {
            return Err(ConfigError::Validation(format!(
                "Invalid exclude extension '{}'",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates progress configuration
fn validate_progress_config(config: &ProgressConfig) -> Result<(), ConfigError> {
    if config.frequency < 1 {
        return Err(ConfigError::Validation(
            "progress frequency must be >= 1".to_string(),
        ));
    }
    Ok(())
}
