//! Report generation port trait.

use std::path::Path;

use crate::domain::error::QuantlabError;
use crate::domain::report::DailyReport;

/// Port for writing daily watchlist reports.
pub trait ReportPort {
    fn write(&self, report: &DailyReport, output_path: &Path) -> Result<(), QuantlabError>;
}
