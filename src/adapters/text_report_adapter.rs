//! Plain-text report adapter implementing ReportPort.
//!
//! Writes the daily summary as a fixed-width table, one row per asset,
//! with the guard columns alongside the decision so a blocked asset is
//! visible at a glance. Blocked and failed rows get an extra marker line
//! carrying the reason verbatim.

use crate::domain::error::SentradeError;
use crate::domain::pipeline::{AssetReport, TerminalAction};
use crate::ports::report_port::ReportPort;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn format_close(close: Option<f64>) -> String {
        match close {
            Some(value) => format!("{value:>9.1}"),
            None => format!("{:>9}", "NA"),
        }
    }

    fn format_last_bar(last_bar: Option<DateTime<Utc>>) -> String {
        match last_bar {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "NA".to_string(),
        }
    }

    pub fn render(reports: &[AssetReport], generated_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Run time (UTC): {}\n",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&"=".repeat(150));
        out.push('\n');
        out.push_str(
            "ASSET            CLOSE   SCORE  ACTION             1-5D      2-3W  \
             GPT 1-5D  GPT 2-3W  SIZING   DATA_OK  LAST_BAR             AGE_s   ROWS  REASON\n",
        );
        out.push_str(&"-".repeat(150));
        out.push('\n');

        for r in reports {
            out.push_str(&format!(
                "{:<13}  {}  {:>6.3}  {:<14}  {:>8.4}  {:>8.4}  {:<8}  {:<8}  {:<7}  {:<7}  {:<19}  {:>5}  {:>5}  {}\n",
                r.asset.name(),
                Self::format_close(r.close),
                r.score,
                r.action.to_string(),
                r.trend_short,
                r.trend_medium,
                r.overlay.short_term.to_string(),
                r.overlay.medium_term.to_string(),
                r.overlay.sizing.to_string(),
                r.verdict.usable,
                Self::format_last_bar(r.verdict.last_bar),
                r.verdict.age_secs,
                r.verdict.rows,
                r.verdict.reason,
            ));

            if !matches!(r.action, TerminalAction::Decided(_)) {
                out.push_str(&format!("{:<13}  >>> BLOCKED: {}\n", "", r.rationale));
            }
        }

        out.push_str(&"=".repeat(150));
        out.push('\n');
        out
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        reports: &[AssetReport],
        generated_at: DateTime<Utc>,
        output_path: &str,
    ) -> Result<(), SentradeError> {
        let mut file = fs::File::create(output_path)?;
        file.write_all(Self::render(reports, generated_at).as_bytes())?;
        Ok(())
    }
}
