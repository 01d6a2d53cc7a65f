//! Aligned multi-asset price table and table assembly.
//!
//! Alignment is the one boundary step between the price provider and the
//! core: after [`PriceTable::align`] every column is gap-free on a shared
//! date index, so simulators never handle missing values.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use super::error::QuantlabError;
use super::series::{simple_returns, PriceSeries};
use crate::ports::data_port::{Interval, PriceProvider};

/// Minimum observations a symbol must have to enter a table.
pub const MIN_OBSERVATIONS: usize = 2;

/// Prices for several assets on a common date index (column-major).
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    symbols: Vec<String>,
    dates: Vec<NaiveDate>,
    columns: Vec<Vec<f64>>,
}

impl PriceTable {
    /// Inner-join alignment: keep only dates present in every series.
    pub fn align(series: Vec<PriceSeries>) -> Result<Self, QuantlabError> {
        if series.is_empty() {
            return Err(QuantlabError::DataUnavailable {
                symbol: "(none)".into(),
                reason: "no series to align".into(),
            });
        }

        let mut shared: BTreeSet<NaiveDate> = series[0].dates().iter().copied().collect();
        for s in &series[1..] {
            let dates: BTreeSet<NaiveDate> = s.dates().iter().copied().collect();
            shared = shared.intersection(&dates).copied().collect();
        }
        let dates: Vec<NaiveDate> = shared.into_iter().collect();

        let mut symbols = Vec::with_capacity(series.len());
        let mut columns = Vec::with_capacity(series.len());
        for s in &series {
            let by_date: HashMap<NaiveDate, f64> = s
                .dates()
                .iter()
                .copied()
                .zip(s.prices().iter().copied())
                .collect();
            let column: Vec<f64> = dates.iter().map(|d| by_date[d]).collect();
            symbols.push(s.symbol().to_string());
            columns.push(column);
        }

        Ok(Self {
            symbols,
            dates,
            columns,
        })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn asset_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn column(&self, i: usize) -> &[f64] {
        &self.columns[i]
    }

    /// Columns rebased so each starts at 1, for chart-style comparison
    /// across assets with different price levels.
    pub fn normalized_columns(&self) -> Vec<Vec<f64>> {
        self.columns
            .iter()
            .map(|column| {
                let first = column.first().copied().unwrap_or(1.0);
                column.iter().map(|v| v / first).collect()
            })
            .collect()
    }

    /// Per-asset simple returns on the date index minus its first row.
    pub fn returns(&self) -> ReturnsTable {
        ReturnsTable {
            symbols: self.symbols.clone(),
            dates: self.dates.iter().skip(1).copied().collect(),
            columns: self.columns.iter().map(|c| simple_returns(c)).collect(),
        }
    }
}

/// Per-asset period returns on a shared date index.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnsTable {
    pub symbols: Vec<String>,
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<Vec<f64>>,
}

impl ReturnsTable {
    pub fn asset_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    /// Returns for every asset in period `t`.
    pub fn row(&self, t: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c[t]).collect()
    }
}

/// A symbol that could not be included in a fetched table.
#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub enum SkipReason {
    FetchFailed(String),
    NoData,
    InsufficientObservations { observations: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::FetchFailed(reason) => write!(f, "fetch failed: {reason}"),
            SkipReason::NoData => write!(f, "no data returned"),
            SkipReason::InsufficientObservations { observations } => {
                write!(f, "only {observations} observations")
            }
        }
    }
}

/// Result of assembling a table from a provider: the aligned table plus
/// a visible tally of per-symbol failures.
pub struct FetchReport {
    pub table: PriceTable,
    pub skipped: Vec<SkippedSymbol>,
}

/// Fetch each requested symbol through the provider, skip failures with
/// a recorded reason, and align whatever remains. Errors only when fewer
/// than `min_assets` symbols survive.
pub fn fetch_table(
    provider: &dyn PriceProvider,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    interval: Interval,
    min_assets: usize,
) -> Result<FetchReport, QuantlabError> {
    let mut available = Vec::new();
    let mut skipped = Vec::new();

    for symbol in symbols {
        let series = match provider.fetch_prices(symbol, start, end, interval) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Warning: skipping {symbol} ({e})");
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: SkipReason::FetchFailed(e.to_string()),
                });
                continue;
            }
        };

        if series.is_empty() {
            eprintln!("Warning: skipping {symbol} (no data found)");
            skipped.push(SkippedSymbol {
                symbol: symbol.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        if series.len() < MIN_OBSERVATIONS {
            eprintln!(
                "Warning: skipping {symbol} (only {} observations, minimum {} required)",
                series.len(),
                MIN_OBSERVATIONS
            );
            skipped.push(SkippedSymbol {
                symbol: symbol.clone(),
                reason: SkipReason::InsufficientObservations {
                    observations: series.len(),
                },
            });
            continue;
        }

        eprintln!("  {symbol}: {} observations [OK]", series.len());
        available.push(series);
    }

    if available.len() < min_assets {
        return Err(QuantlabError::InsufficientAssets {
            available: available.len(),
            minimum: min_assets,
        });
    }

    let table = PriceTable::align(available)?;

    if !skipped.is_empty() {
        eprintln!(
            "Using {} of {} requested symbols",
            table.asset_count(),
            table.asset_count() + skipped.len()
        );
    }

    Ok(FetchReport { table, skipped })
}
