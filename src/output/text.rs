//! Plain-text report
//!
//! One block per listing in rank order, then the statistics line and the
//! elapsed time. The elapsed-time line is written for every run, including
//! runs whose listing stage failed.

use crate::crawler::RunReport;
use crate::output::stats::RunStatistics;
use crate::output::traits::{OutputResult, ReportSink};
use crate::record::RecordOutcome;
use std::io::Write;

/// Writes the text report to any `Write` (usually stdout)
pub struct TextReport<W: Write> {
    writer: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn write_report(&mut self, report: &RunReport) -> OutputResult<()> {
        self.writer.write_all(format_text_report(report).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Formats a run report as plain text
pub fn format_text_report(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str("=== Gourmet-Scout Report ===\n");
    out.push_str(&format!(
        "Started: {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("Listing: {}\n\n", report.listing_url));

    for outcome in &report.outcomes {
        out.push_str(&format_outcome(outcome));
        out.push('\n');
    }

    if let Some(error) = &report.fatal {
        out.push_str(&format!(
            "Listing stage failed [{}]: {}\n",
            error.kind(),
            error
        ));
    } else {
        let stats = RunStatistics::from_report(report);
        out.push_str(&stats.summary_line());
        out.push('\n');
        if let Some(breakdown) = stats.failure_breakdown() {
            out.push_str(&breakdown);
            out.push('\n');
        }
        out.push_str(&format!(
            "Requests: {}, politeness pauses: {}\n",
            stats.requests, stats.pauses
        ));
    }

    out.push_str(&format!(
        "Finished in {:.3} seconds\n",
        report.elapsed.as_secs_f64()
    ));
    out
}

/// Formats one listing block
fn format_outcome(outcome: &RecordOutcome) -> String {
    let listing = outcome.listing();
    let header = format!("#{} 「{}」", listing.rank, listing.name);

    match outcome {
        RecordOutcome::Complete(record) => format!(
            "{} rating {:.2} {}\nURL {}\n{}\n",
            header, listing.rating, listing.area_genre, listing.detail_url, record.review
        ),
        RecordOutcome::Failed(failure) => format!(
            "{} rating {:.2} {}\nURL {}\nFAILED [{}]: {}\n",
            header,
            listing.rating,
            listing.area_genre,
            listing.detail_url,
            failure.error.kind(),
            failure.error
        ),
    }
}
