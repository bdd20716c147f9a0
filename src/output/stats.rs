//! Run statistics
//!
//! Counts derived from a `RunReport` for the report footer.

use crate::crawler::RunReport;
use crate::record::RecordOutcome;
use std::collections::BTreeMap;

/// Run statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Listings extracted from the listing page
    pub listed: usize,

    /// Listings whose review resolution finished
    pub completed: usize,

    /// Completed listings that had no review yet
    pub without_review: usize,

    /// Listings whose review resolution failed
    pub failed: usize,

    /// Ranks that failed, ascending
    pub failed_ranks: Vec<usize>,

    /// Failure count by error kind
    pub failures_by_kind: BTreeMap<&'static str, usize>,

    /// HTTP requests attempted
    pub requests: u64,

    /// Politeness pauses taken
    pub pauses: u64,
}

impl RunStatistics {
    /// Computes statistics for a report
    pub fn from_report(report: &RunReport) -> Self {
        let mut stats = Self {
            listed: report.outcomes.len(),
            requests: report.requests,
            pauses: report.pauses,
            ..Self::default()
        };

        for outcome in &report.outcomes {
            match outcome {
                RecordOutcome::Complete(record) => {
                    stats.completed += 1;
                    if !record.review.is_available() {
                        stats.without_review += 1;
                    }
                }
                RecordOutcome::Failed(failure) => {
                    stats.failed += 1;
                    stats.failed_ranks.push(failure.listing.rank);
                    *stats.failures_by_kind.entry(failure.error.kind()).or_insert(0) += 1;
                }
            }
        }

        stats
    }

    /// Percentage of listings that completed
    pub fn success_rate(&self) -> f64 {
        if self.listed == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.listed as f64) * 100.0
    }

    /// One-line summary, e.g. `Listed 10, completed 9 (1 without review), failed 1 (ranks 4)`
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "Listed {}, completed {} ({} without review), failed {}",
            self.listed, self.completed, self.without_review, self.failed
        );

        if !self.failed_ranks.is_empty() {
            let ranks: Vec<String> = self.failed_ranks.iter().map(|r| r.to_string()).collect();
            line.push_str(&format!(" (ranks {})", ranks.join(", ")));
        }

        line
    }

    /// Failure counts per error kind, e.g. `Failures by kind: HTTPError 2, NetworkError 1`
    ///
    /// `None` when nothing failed.
    pub fn failure_breakdown(&self) -> Option<String> {
        if self.failures_by_kind.is_empty() {
            return None;
        }
        let kinds: Vec<String> = self
            .failures_by_kind
            .iter()
            .map(|(kind, count)| format!("{} {}", kind, count))
            .collect();
        Some(format!("Failures by kind: {}", kinds.join(", ")))
    }
}
