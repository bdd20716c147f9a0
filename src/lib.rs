//! Gourmet-Scout: a polite restaurant ranking scraper
//!
//! This crate fetches a restaurant-discovery site's ranked search results,
//! follows each listing to its newest review, and assembles one record per
//! restaurant. Every request is followed by a fixed politeness pause, and a
//! failure on one restaurant never discards the others.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Gourmet-Scout operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request to {url} timed out after {timeout:?}")]
    ConnectTimeout { url: String, timeout: Duration },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error(
        "Listing fields are misaligned: {names} names, {ratings} ratings, {genres} area/genres, {urls} urls"
    )]
    PartialPage {
        names: usize,
        ratings: usize,
        genres: usize,
        urls: usize,
    },

    #[error("Malformed page {url}: {message}")]
    MalformedPage { url: String, message: String },

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl ScrapeError {
    /// Returns the taxonomy name of this error, as shown in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::Network { .. } => "NetworkError",
            Self::ConnectTimeout { .. } => "ConnectTimeout",
            Self::Http { .. } => "HTTPError",
            Self::PartialPage { .. } => "PartialPageError",
            Self::MalformedPage { .. } => "MalformedPageError",
            Self::InvalidUrl { .. } => "InvalidUrl",
            Self::Client(_) => "ClientError",
        }
    }

    pub(crate) fn malformed(url: &str, message: impl Into<String>) -> Self {
        Self::MalformedPage {
            url: url.to_string(),
            message: message.into(),
        }
    }
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Gourmet-Scout operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Pipeline, RunReport};
pub use record::{CompleteRecord, PartialRecord, RecordFailure, RecordOutcome, Review};
