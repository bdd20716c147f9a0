//! Per-record outcome of review resolution
//!
//! The pipeline produces exactly one outcome per listing, in rank order.

use crate::record::{CompleteRecord, PartialRecord};
use crate::ScrapeError;

/// A listing whose review could not be resolved
#[derive(Debug)]
pub struct RecordFailure {
    pub listing: PartialRecord,
    pub error: ScrapeError,
}

/// Result of resolving one listing
#[derive(Debug)]
pub enum RecordOutcome {
    Complete(CompleteRecord),
    Failed(RecordFailure),
}

impl RecordOutcome {
    /// The listing this outcome belongs to
    pub fn listing(&self) -> &PartialRecord {
        match self {
            Self::Complete(record) => &record.listing,
            Self::Failed(failure) => &failure.listing,
        }
    }

    pub fn rank(&self) -> usize {
        self.listing().rank
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn as_complete(&self) -> Option<&CompleteRecord> {
        match self {
            Self::Complete(record) => Some(record),
            Self::Failed(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&RecordFailure> {
        match self {
            Self::Complete(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}
