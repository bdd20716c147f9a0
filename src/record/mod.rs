//! Restaurant record definitions
//!
//! A `PartialRecord` is what the listing page alone tells us about a
//! restaurant. Resolving its newest review turns it into a `CompleteRecord`,
//! or into a `RecordFailure` when one of the review fetches fails.

mod outcome;

pub use outcome::{RecordFailure, RecordOutcome};

use std::fmt;

/// A restaurant as extracted from the ranked listing page
#[derive(Debug, Clone, PartialEq)]
pub struct PartialRecord {
    /// 1-based position on the listing page
    pub rank: usize,

    /// Restaurant name (trimmed)
    pub name: String,

    /// Site rating, always finite and non-negative
    pub rating: f64,

    /// Area and genre line, trailing whitespace removed
    pub area_genre: String,

    /// Absolute URL of the restaurant page
    pub detail_url: String,
}

/// The newest review of a restaurant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Review {
    /// Trimmed body text of the newest review
    Latest(String),

    /// The review list had no entries
    NotAvailable,
}

impl Review {
    /// Returns the review text, if one exists
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Latest(text) => Some(text),
            Self::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Latest(_))
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest(text) => f.write_str(text),
            Self::NotAvailable => f.write_str("(no review yet)"),
        }
    }
}

/// A listing together with its resolved review
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteRecord {
    pub listing: PartialRecord,
    pub review: Review,
}

impl CompleteRecord {
    pub fn new(listing: PartialRecord, review: Review) -> Self {
        Self { listing, review }
    }
}
