//! Output rendering for the run report

use console::{style, Term};
use precheck_builder::{PipelineReport, StageStatus};
use std::io;

/// Output renderer for the final report
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool) -> Self {
        Self {
            json_output,
            term: Term::stdout(),
        }
    }

    /// Render the report of a successful run
    pub fn render_report(&self, report: &PipelineReport) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
            self.term.write_line(&json)
        } else {
            for line in summary_lines(report) {
                self.term.write_line(&line)?;
            }
            Ok(())
        }
    }
}

fn summary_lines(report: &PipelineReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}",
        style("Platform:").bold(),
        report.platform
    )];

    for outcome in &report.stages {
        let line = match &outcome.status {
            StageStatus::Ran {
                duration_ms,
                advisory_failures,
            } if advisory_failures.is_empty() => format!(
                "  {} {:<18} {:>8} ms",
                style("ok").green(),
                outcome.stage,
                duration_ms
            ),
            StageStatus::Ran {
                duration_ms,
                advisory_failures,
            } => format!(
                "  {} {:<18} {:>8} ms ({} tolerated failure(s))",
                style("ok").yellow(),
                outcome.stage,
                duration_ms,
                advisory_failures.len()
            ),
            StageStatus::Skipped { reason } => format!(
                "  {} {:<18} {}",
                style("--").dim(),
                outcome.stage,
                style(reason).dim()
            ),
        };
        lines.push(line);
    }

    lines
}
