use crate::config::types::{
    ClassRule, Config, FetcherConfig, SelectorConfig, TargetConfig, UserAgentConfig,
};
use crate::crawler::SelectorSet;
use crate::ConfigError;
use url::Url;

/// Lowest pause accepted from a config file
const MIN_POLITENESS_DELAY_MS: u64 = 1000;

/// Highest request timeout accepted from a config file
const MAX_TIMEOUT_SECS: u64 = 120;

/// The listing stage only reads the first results page
const MAX_RESULT_LIMIT: usize = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target_config(&config.target)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_selector_config(&config.selectors)?;
    Ok(())
}

/// Validates the target site and query
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&config.site_origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site-origin: {}", e)))?;

    if origin.scheme() != "https" && origin.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "site-origin '{}' must use http or https",
            config.site_origin
        )));
    }

    if !config.listing_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "listing-path must start with '/', got '{}'",
            config.listing_path
        )));
    }

    if config.review_list_suffix.trim_matches('/').is_empty() {
        return Err(ConfigError::Validation(
            "review-list-suffix cannot be empty".to_string(),
        ));
    }

    if config.result_limit < 1 || config.result_limit > MAX_RESULT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "result-limit must be between 1 and {}, got {}",
            MAX_RESULT_LIMIT, config.result_limit
        )));
    }

    Ok(())
}

/// Validates timeout and politeness settings
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    if config.politeness_delay_ms < MIN_POLITENESS_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "politeness-delay-ms must be >= {}ms, got {}ms",
            MIN_POLITENESS_DELAY_MS, config.politeness_delay_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    if let Some(email) = &config.contact_email {
        validate_email(email)?;
    }

    Ok(())
}

/// Validates that every rule is usable and that the whole set compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, rule) in [
        ("restaurant-name", &config.restaurant_name),
        ("rating", &config.rating),
        ("area-genre", &config.area_genre),
        ("review-summary", &config.review_summary),
        ("review-comment", &config.review_comment),
    ] {
        validate_class_rule(name, rule)?;
    }

    if config.detail_url_attribute.trim().is_empty() {
        return Err(ConfigError::Validation(
            "detail-url-attribute cannot be empty".to_string(),
        ));
    }

    SelectorSet::compile(config)?;
    Ok(())
}

fn validate_class_rule(name: &str, rule: &ClassRule) -> Result<(), ConfigError> {
    if rule.element.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "selector '{}' needs an element name",
            name
        )));
    }

    if rule.class.split_whitespace().next().is_none() {
        return Err(ConfigError::Validation(format!(
            "selector '{}' needs at least one class token",
            name
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
