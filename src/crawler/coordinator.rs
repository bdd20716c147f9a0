//! Pipeline coordinator - main scrape orchestration logic
//!
//! This module contains the run that ties the stages together:
//! - Fetching the listing page once
//! - Extracting ranked listings
//! - Resolving each listing's newest review, in rank order
//! - Collecting one outcome per listing and the elapsed time
//!
//! Construction does no I/O; everything happens in `Pipeline::run`.

use crate::config::{Config, LengthMismatchPolicy};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::listing::extract_listings;
use crate::crawler::parser::{Document, SelectorSet};
use crate::crawler::review::ReviewResolver;
use crate::record::{CompleteRecord, PartialRecord, RecordFailure, RecordOutcome};
use crate::url::{listing_url, parse_url};
use crate::ScrapeError;
use chrono::{DateTime, Local};
use std::time::{Duration, Instant};
use url::Url;

/// Everything a run produced
#[derive(Debug)]
pub struct RunReport {
    /// Wall-clock start of the run
    pub started_at: DateTime<Local>,

    /// The listing page that was requested
    pub listing_url: String,

    /// One outcome per listing, in ascending rank order
    pub outcomes: Vec<RecordOutcome>,

    /// Set when the listing stage failed; `outcomes` is then empty
    pub fatal: Option<ScrapeError>,

    /// Total run time, recorded whatever the outcome
    pub elapsed: Duration,

    /// HTTP requests attempted
    pub requests: u64,

    /// Politeness pauses taken
    pub pauses: u64,
}

impl RunReport {
    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    /// Completed records in rank order
    pub fn complete_records(&self) -> impl Iterator<Item = &CompleteRecord> {
        self.outcomes.iter().filter_map(RecordOutcome::as_complete)
    }

    /// Failed records in rank order
    pub fn failures(&self) -> impl Iterator<Item = &RecordFailure> {
        self.outcomes.iter().filter_map(RecordOutcome::as_failure)
    }
}

/// Main scrape pipeline
pub struct Pipeline {
    listing_url: Url,
    result_limit: usize,
    mismatch_policy: LengthMismatchPolicy,
    selectors: SelectorSet,
    resolver: ReviewResolver,
    fetcher: Fetcher,
}

impl Pipeline {
    /// Creates a pipeline from configuration
    ///
    /// Compiles selectors, builds URLs and the HTTP client. No request is
    /// sent until `run` is called.
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(ScrapeError)` - Bad URL, bad selector, or client construction failure
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let fetcher = Fetcher::new(config)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a pipeline around an existing fetcher
    pub fn with_fetcher(config: &Config, fetcher: Fetcher) -> Result<Self, ScrapeError> {
        let selectors = SelectorSet::compile(&config.selectors)?;
        let site_origin = parse_url(&config.target.site_origin)?;
        let resolver = ReviewResolver::new(
            site_origin,
            &config.target.review_list_suffix,
            selectors.clone(),
        );

        Ok(Self {
            listing_url: listing_url(&config.target)?,
            result_limit: config.target.result_limit,
            mismatch_policy: config.output.on_length_mismatch,
            selectors,
            resolver,
            fetcher,
        })
    }

    pub fn listing_url(&self) -> &Url {
        &self.listing_url
    }

    /// Runs the scrape
    ///
    /// 1. Fetch the listing page (failure here is fatal to the run)
    /// 2. Extract up to `result-limit` listings
    /// 3. For each listing in rank order, resolve its newest review
    /// 4. Record a complete record or a failure for every listing
    ///
    /// The elapsed time is always filled in.
    pub async fn run(&mut self) -> RunReport {
        let started_at = Local::now();
        let start_time = Instant::now();
        tracing::info!(
            "Fetching listing page {} (timeout {:?}, pause {:?})",
            self.listing_url,
            self.fetcher.timeout(),
            self.fetcher.politeness_delay()
        );

        let (outcomes, fatal) = match self.fetch_listings().await {
            Ok(listings) => {
                tracing::info!("Resolving reviews for {} listing(s)", listings.len());
                (self.resolve_all(listings).await, None)
            }
            Err(e) => {
                tracing::error!("Listing stage failed: {}", e);
                (Vec::new(), Some(e))
            }
        };

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Run finished in {:?}: {} outcome(s), {} request(s)",
            elapsed,
            outcomes.len(),
            self.fetcher.requests()
        );

        RunReport {
            started_at,
            listing_url: self.listing_url.to_string(),
            outcomes,
            fatal,
            elapsed,
            requests: self.fetcher.requests(),
            pauses: self.fetcher.pauses(),
        }
    }

    /// Fetches and parses the listing page
    async fn fetch_listings(&mut self) -> Result<Vec<PartialRecord>, ScrapeError> {
        let page = self.fetcher.fetch(self.listing_url.as_str()).await?;
        let page_url = parse_url(&page.url)?;

        let document = Document::parse(&page.body);
        extract_listings(
            &page_url,
            &document,
            &self.selectors,
            self.result_limit,
            self.mismatch_policy,
        )
    }

    /// Resolves every listing, turning errors into per-record failures
    async fn resolve_all(&mut self, listings: Vec<PartialRecord>) -> Vec<RecordOutcome> {
        let mut outcomes = Vec::with_capacity(listings.len());

        for listing in listings {
            let result = self
                .resolver
                .resolve(&mut self.fetcher, &listing.detail_url)
                .await;

            let outcome = match result {
                Ok(review) => {
                    tracing::debug!("Rank {} resolved: {}", listing.rank, listing.name);
                    RecordOutcome::Complete(CompleteRecord::new(listing, review))
                }
                Err(error) => {
                    tracing::warn!(
                        "Rank {} ({}) failed [{}]: {}",
                        listing.rank,
                        listing.name,
                        error.kind(),
                        error
                    );
                    RecordOutcome::Failed(RecordFailure { listing, error })
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}
