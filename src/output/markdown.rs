//! Markdown report generation
//!
//! Writes the same content as the text report as a markdown document:
//! a run section, a ranking table, the review texts, and failures.

use crate::crawler::RunReport;
use crate::output::stats::RunStatistics;
use crate::output::traits::{OutputResult, ReportSink};
use crate::record::RecordOutcome;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink that writes a markdown file
pub struct MarkdownReport {
    path: PathBuf,
}

impl MarkdownReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for MarkdownReport {
    fn write_report(&mut self, report: &RunReport) -> OutputResult<()> {
        generate_markdown_report(report, &self.path)
    }
}

/// Writes a markdown report to `output_path`
pub fn generate_markdown_report(report: &RunReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_report(report: &RunReport) -> String {
    let mut md = String::new();

    md.push_str("# Gourmet-Scout Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Started**: {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S %z")
    ));
    md.push_str(&format!("- **Listing**: <{}>\n", report.listing_url));
    md.push_str(&format!(
        "- **Duration**: {:.3} seconds\n",
        report.elapsed.as_secs_f64()
    ));

    if let Some(error) = &report.fatal {
        md.push_str(&format!(
            "- **Status**: failed ({}: {})\n",
            error.kind(),
            escape_cell(&error.to_string())
        ));
        return md;
    }

    let stats = RunStatistics::from_report(report);
    md.push_str(&format!("- **Requests**: {}\n", stats.requests));
    md.push_str(&format!("- **Success Rate**: {:.1}%\n\n", stats.success_rate()));

    // Ranking table
    md.push_str("## Ranking\n\n");
    md.push_str("| Rank | Name | Rating | Area / Genre | Status |\n");
    md.push_str("|------|------|--------|--------------|--------|\n");
    for outcome in &report.outcomes {
        let listing = outcome.listing();
        let status = match outcome {
            RecordOutcome::Complete(record) if record.review.is_available() => "ok".to_string(),
            RecordOutcome::Complete(_) => "no review".to_string(),
            RecordOutcome::Failed(failure) => failure.error.kind().to_string(),
        };
        md.push_str(&format!(
            "| {} | [{}]({}) | {:.2} | {} | {} |\n",
            listing.rank,
            escape_cell(&listing.name),
            listing.detail_url,
            listing.rating,
            escape_cell(&listing.area_genre),
            status
        ));
    }
    md.push('\n');

    // Reviews
    let completed: Vec<_> = report.complete_records().collect();
    if !completed.is_empty() {
        md.push_str("## Latest Reviews\n\n");
        for record in completed {
            md.push_str(&format!(
                "### {}. {}\n\n{}\n\n",
                record.listing.rank, record.listing.name, record.review
            ));
        }
    }

    // Failures
    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        md.push_str("## Failures\n\n");
        if let Some(breakdown) = stats.failure_breakdown() {
            md.push_str(&format!("{}\n\n", breakdown));
        }
        for failure in failures {
            md.push_str(&format!(
                "- **Rank {}** ({}): `{}` {}\n",
                failure.listing.rank,
                failure.listing.name,
                failure.error.kind(),
                failure.error
            ));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
