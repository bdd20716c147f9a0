//! Scraping pipeline
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with timeout, politeness pause and encoding detection
//! - HTML parsing behind configurable selectors
//! - Listing extraction from the ranked results page
//! - Two-hop review resolution per listing
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod listing;
mod parser;
mod review;
mod throttle;

pub use coordinator::{Pipeline, RunReport};
pub use fetcher::{build_http_client, decode_body, FetchedPage, Fetcher};
pub use listing::{extract_listings, parse_rating};
pub use parser::{first_descendant, node_attr, node_text, Document, SelectorSet};
pub use review::ReviewResolver;
pub use throttle::Throttle;
