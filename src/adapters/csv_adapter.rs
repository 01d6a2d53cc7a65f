//! CSV file price provider.
//!
//! One `{symbol}.csv` file per asset under a base directory, with
//! `date,close` rows (header skipped by the reader). Rows outside the
//! requested range are dropped before the series is validated.

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::QuantlabError;
use crate::domain::series::PriceSeries;
use crate::ports::data_port::{Interval, PriceProvider};

pub struct CsvPriceProvider {
    base_path: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }
}

impl PriceProvider for CsvPriceProvider {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        _interval: Interval,
    ) -> Result<PriceSeries, QuantlabError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| QuantlabError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut rows: Vec<(NaiveDate, f64)> = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QuantlabError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = record.get(0).ok_or_else(|| QuantlabError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                QuantlabError::DataUnavailable {
                    symbol: symbol.to_string(),
                    reason: format!("invalid date format: {e}"),
                }
            })?;

            if date < start || date > end {
                continue;
            }

            let close: f64 = record
                .get(1)
                .ok_or_else(|| QuantlabError::DataUnavailable {
                    symbol: symbol.to_string(),
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| QuantlabError::DataUnavailable {
                    symbol: symbol.to_string(),
                    reason: format!("invalid close value: {e}"),
                })?;

            rows.push((date, close));
        }

        rows.sort_by_key(|&(date, _)| date);

        let (dates, prices) = rows.into_iter().unzip();
        PriceSeries::new(symbol, dates, prices)
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantlabError> {
        let mut symbols = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    symbols.push(stem.to_string());
                }
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}
