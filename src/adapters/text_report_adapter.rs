//! Plain-text and JSON report writers.
//!
//! Two [`ReportPort`] implementations: a fixed-width text rendering for
//! terminals/cron mail and a JSON document for downstream tooling.

use std::fs;
use std::path::Path;

use crate::domain::error::QuantlabError;
use crate::domain::report::DailyReport;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn render(report: &DailyReport) -> String {
        let mut lines = vec![
            "=".repeat(60),
            format!("{:^60}", "DAILY MARKET REPORT"),
            format!("{:^60}", report.date),
            "=".repeat(60),
            String::new(),
            "SUMMARY".to_string(),
            "-".repeat(40),
            format!("  Assets:          {}", report.asset_count()),
            format!(
                "  Up / Down:       {} / {}",
                report.gainers, report.losers
            ),
            format!("  Average change:  {:+.2}%", report.average_change_pct()),
            String::new(),
            "DETAILED DATA".to_string(),
            "-".repeat(40),
            format!(
                "{:<12} {:>10} {:>9} {:>9} {:>9}",
                "Symbol", "Close", "Change", "Vol(ann)", "MaxDD"
            ),
        ];

        let mut sorted: Vec<_> = report.assets.iter().collect();
        sorted.sort_by(|a, b| {
            b.change_pct
                .partial_cmp(&a.change_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for asset in sorted {
            lines.push(format!(
                "{:<12} {:>10.2} {:>+8.2}% {:>8.2}% {:>8.2}%",
                asset.symbol,
                asset.last_close,
                asset.change_pct,
                asset.annualized_volatility * 100.0,
                asset.max_drawdown * 100.0,
            ));
        }

        if !report.failures.is_empty() {
            lines.push(String::new());
            lines.push("FAILURES".to_string());
            lines.push("-".repeat(40));
            for failure in &report.failures {
                lines.push(format!("  {failure}"));
            }
        }

        lines.push(String::new());
        lines.push("=".repeat(60));
        lines.join("\n")
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, report: &DailyReport, output_path: &Path) -> Result<(), QuantlabError> {
        fs::write(output_path, Self::render(report))?;
        Ok(())
    }
}

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &DailyReport, output_path: &Path) -> Result<(), QuantlabError> {
        let json = serde_json::to_string_pretty(report).map_err(|e| {
            QuantlabError::InvalidParameter {
                name: "report".into(),
                reason: format!("serialization failed: {e}"),
            }
        })?;
        fs::write(output_path, json)?;
        Ok(())
    }
}
