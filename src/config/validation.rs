use crate::config::types::{ClassifierConfig, Config, CrawlerConfig, DownloadConfig, HttpConfig};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_classifier_config(&config.classifier)?;
    validate_download_config(&config.download)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be >= 1, got {}",
            config.max_depth
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "http timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    HeaderValue::from_str(&config.user_agent)
        .map_err(|_| ConfigError::InvalidHeader(format!("user-agent '{}'", config.user_agent)))?;

    for (name, value) in &config.headers {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(format!("name '{}'", name)))?;
        HeaderValue::from_str(value)
            .map_err(|_| ConfigError::InvalidHeader(format!("value for '{}'", name)))?;
    }

    Ok(())
}

/// Validates the download extension allow-list
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    if config.download_extensions.is_empty() {
        return Err(ConfigError::Validation(
            "download_extensions cannot be empty".to_string(),
        ));
    }

    for ext in &config.download_extensions {
        validate_extension(ext)?;
    }

    Ok(())
}

/// Validates a single extension entry such as `.pdf`
fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    if !ext.starts_with('.') || ext.len() < 2 {
        return Err(ConfigError::Validation(format!(
            "extension '{}' must start with '.' and name an extension",
            ext
        )));
    }

    if ext[1..].contains('.') || ext.contains('/') || ext.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "extension '{}' contains invalid characters",
            ext
        )));
    }

    if ext != ext.to_lowercase() {
        return Err(ConfigError::Validation(format!(
            "extension '{}' must be lower-case",
            ext
        )));
    }

    Ok(())
}

/// Validates download configuration
fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "download directory cannot be empty".to_string(),
        ));
    }

    if config.chunk_size < 1 {
        return Err(ConfigError::Validation(
            "chunk_size must be >= 1".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "download timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}
