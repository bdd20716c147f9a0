//! Output module for presenting run results
//!
//! This module handles:
//! - The plain-text report written to stdout
//! - Optional markdown export of the same report
//! - Run statistics for the report footer

mod markdown;
pub mod stats;
mod text;
mod traits;

pub use markdown::{format_markdown_report, generate_markdown_report, MarkdownReport};
pub use stats::RunStatistics;
pub use text::{format_text_report, TextReport};
pub use traits::{OutputError, OutputResult, ReportSink};
