//! Configuration module for Gourmet-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. A config file is optional; `Config::default()` describes the
//! built-in target.
//!
//! # Example
//!
//! ```no_run
//! use gourmet_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Politeness delay: {}ms", config.fetcher.politeness_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    ClassRule, Config, FetcherConfig, LengthMismatchPolicy, OutputConfig, SelectorConfig,
    TargetConfig, UserAgentConfig,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
