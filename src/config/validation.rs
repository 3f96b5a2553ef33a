use crate::config::types::{BrowserConfig, Config, OutputConfig, SiteConfig, TraversalConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_browser_config(&config.browser)?;
    validate_traversal_config(&config.traversal)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use HTTPS scheme, got '{}'",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "base-url must have a host, got '{}'",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates browser session configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    Url::parse(&config.webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver-url: {}", e)))?;

    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window dimensions must be non-zero, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates traversal pacing and timeout configuration
fn validate_traversal_config(config: &TraversalConfig) -> Result<(), ConfigError> {
    if config.page_load_timeout == 0 {
        return Err(ConfigError::Validation(
            "page-load-timeout must be >= 1 second".to_string(),
        ));
    }

    if config.control_wait_timeout == 0 {
        return Err(ConfigError::Validation(
            "control-wait-timeout must be >= 1 second".to_string(),
        ));
    }

    if config.max_scroll_passes == 0 {
        return Err(ConfigError::Validation(
            "max-scroll-passes must be >= 1".to_string(),
        ));
    }

    if config.scroll_pause_min_ms > config.scroll_pause_max_ms {
        return Err(ConfigError::Validation(format!(
            "scroll-pause range is inverted: {}ms > {}ms",
            config.scroll_pause_min_ms, config.scroll_pause_max_ms
        )));
    }

    if config.page_delay_min_ms > config.page_delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "page-delay range is inverted: {}ms > {}ms",
            config.page_delay_min_ms, config.page_delay_max_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
