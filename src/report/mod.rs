//! Run report rendering
//!
//! Reporters only see the data a run produced: step names, allotted and
//! remaining milliseconds, and the final outcome.

use crate::errors::Result;
use crate::sequencer::{RunOutcome, RunReport};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;

const RULE: &str = "=====================";
const HEADER: [&str; 3] = ["Name", "Max Timeout(ms)", "Remaining(ms)"];

/// Output format selectable from the CLI and the scenario file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}

/// Consumer of finished runs
pub trait Reporter {
    fn report(&mut self, report: &RunReport) -> Result<()>;
}

/// Column-aligned text table
pub struct TableReporter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TableReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TableReporter<W> {
    fn report(&mut self, report: &RunReport) -> Result<()> {
        let rendered = render_table(report, self.color);
        self.out.write_all(rendered.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// One JSON document per run, newline separated
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, report: &RunReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Build a boxed reporter writing to `out`
pub fn reporter_for<'a, W: Write + 'a>(
    format: ReportFormat,
    out: W,
    color: bool,
) -> Box<dyn Reporter + 'a> {
    match format {
        ReportFormat::Table => Box::new(TableReporter::new(out, color)),
        ReportFormat::Json => Box::new(JsonReporter::new(out)),
    }
}

/// Render a report as an aligned table followed by its outcome
pub fn render_table(report: &RunReport, color: bool) -> String {
    let mut cells: Vec<[String; 3]> = Vec::with_capacity(report.rows.len() + 2);
    cells.push(HEADER.map(String::from));
    cells.push([
        "Init".to_string(),
        report.root_timeout_ms.to_string(),
        report.root_timeout_ms.to_string(),
    ]);
    for row in &report.rows {
        cells.push([
            row.step.clone(),
            row.allotted_ms.to_string(),
            row.remaining_ms.to_string(),
        ]);
    }

    let mut widths = [0usize; 3];
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("SIMULATOR:{}\n", report.simulator));
    for line in &cells {
        for (width, cell) in widths.iter().zip(line) {
            out.push_str(&format!("{:<w$}|", cell, w = width + 1));
        }
        out.push('\n');
    }

    match &report.outcome {
        RunOutcome::Completed { remaining_ms } => {
            let line = format!("Done with time left {} ms", remaining_ms);
            out.push_str(&paint(line, color, true));
            out.push('\n');
        }
        RunOutcome::Expired { unexecuted } => {
            let line = "Time out reached with unexecuted function: ".to_string();
            out.push_str(&paint(line, color, false));
            out.push('\n');
            for name in unexecuted {
                out.push_str(&format!("- {}\n", name));
            }
        }
    }

    out.push_str(RULE);
    out.push('\n');
    out
}

fn paint(line: String, color: bool, ok: bool) -> String {
    match (color, ok) {
        (false, _) => line,
        (true, true) => line.green().to_string(),
        (true, false) => line.red().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::ReportRow;
    use chrono::Utc;

    fn row(step: &str, allotted_ms: i64, remaining_ms: i64) -> ReportRow {
        ReportRow {
            step: step.to_string(),
            allotted_ms,
            remaining_ms,
        }
    }

    fn completed_report() -> RunReport {
        RunReport {
            simulator: "checkout".to_string(),
            root_timeout_ms: 600,
            started_at: Utc::now(),
            rows: vec![row("auth", 20, 580), row("pricing", 290, 290)],
            outcome: RunOutcome::Completed { remaining_ms: 290 },
        }
    }

    #[test]
    fn test_table_layout() {
        let table = render_table(&completed_report(), false);
        let expected = "\
=====================
SIMULATOR:checkout
Name    |Max Timeout(ms) |Remaining(ms) |
Init    |600             |600           |
auth    |20              |580           |
pricing |290             |290           |
Done with time left 290 ms
=====================
";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_table_expired_lists_steps() {
        let report = RunReport {
            simulator: "overrun".to_string(),
            root_timeout_ms: 50,
            started_at: Utc::now(),
            rows: vec![],
            outcome: RunOutcome::Expired {
                unexecuted: vec!["slow".to_string(), "render".to_string()],
            },
        };
        let table = render_table(&report, false);
        assert!(table.contains("Time out reached with unexecuted function: \n- slow\n- render\n"));
        assert!(!table.contains("Done with time left"));
    }

    #[test]
    fn test_table_reporter_writes() {
        let mut reporter = TableReporter::new(Vec::new(), false);
        reporter.report(&completed_report()).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.starts_with(RULE));
        assert!(text.contains("SIMULATOR:checkout"));
    }

    #[test]
    fn test_json_reporter() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.report(&completed_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(value["simulator"], "checkout");
        assert_eq!(value["rows"][1]["allotted_ms"], 290);
        assert_eq!(value["outcome"]["kind"], "completed");
    }

    #[test]
    fn test_reporter_for_selects_format() {
        let mut buf = Vec::new();
        {
            let mut reporter = reporter_for(ReportFormat::Json, &mut buf, true);
            reporter.report(&completed_report()).unwrap();
        }
        assert!(String::from_utf8(buf).unwrap().trim_start().starts_with('{'));
    }
}
