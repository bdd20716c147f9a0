//! Output sink traits
//!
//! A sink receives the finished `RunReport` and presents it somewhere.

use crate::crawler::RunReport;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for report sinks
pub trait ReportSink {
    /// Presents a finished run
    ///
    /// Called once per run, after the last record, including runs whose
    /// listing stage failed.
    fn write_report(&mut self, report: &RunReport) -> OutputResult<()>;
}
