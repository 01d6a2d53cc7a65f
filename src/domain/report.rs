//! Daily watchlist report assembly.
//!
//! Per-symbol stats for a watchlist, with failures carried alongside the
//! successes so report consumers always see the full tally.

use chrono::NaiveDate;
use serde::Serialize;

use super::metrics::{annualized_volatility, correlation_matrix, max_drawdown};
use super::series::{EquityCurve, PriceSeries};
use super::table::ReturnsTable;

/// Stats for one symbol that fetched successfully.
#[derive(Debug, Clone, Serialize)]
pub struct AssetReport {
    pub symbol: String,
    pub last_close: f64,
    pub change_pct: f64,
    pub annualized_volatility: f64,
    pub max_drawdown: f64,
    pub observations: usize,
}

/// Aggregate daily report over a watchlist.
#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub assets: Vec<AssetReport>,
    pub failures: Vec<String>,
    pub gainers: usize,
    pub losers: usize,
}

impl DailyReport {
    pub fn new(date: NaiveDate) -> Self {
        DailyReport {
            date,
            assets: Vec::new(),
            failures: Vec::new(),
            gainers: 0,
            losers: 0,
        }
    }

    /// Compute and append per-symbol stats from its recent prices.
    /// Requires at least 2 observations for a day-over-day change.
    pub fn add_asset(&mut self, series: &PriceSeries, periods_per_year: f64) {
        if series.len() < 2 {
            self.add_failure(series.symbol(), "fewer than 2 observations");
            return;
        }

        let prices = series.prices();
        let last = prices[prices.len() - 1];
        let prev = prices[prices.len() - 2];
        let change_pct = (last / prev - 1.0) * 100.0;

        // Drawdown of the cumulative path the asset itself traced.
        let path = EquityCurve {
            dates: series.dates().to_vec(),
            values: prices.to_vec(),
        };

        let returns = ReturnsTable {
            symbols: vec![series.symbol().to_string()],
            dates: series.dates().iter().skip(1).copied().collect(),
            columns: vec![series.returns()],
        };
        let vol = annualized_volatility(&returns, periods_per_year)[0];

        if change_pct > 0.0 {
            self.gainers += 1;
        } else if change_pct < 0.0 {
            self.losers += 1;
        }

        self.assets.push(AssetReport {
            symbol: series.symbol().to_string(),
            last_close: last,
            change_pct,
            annualized_volatility: vol,
            max_drawdown: max_drawdown(&path),
            observations: series.len(),
        });
    }

    pub fn add_failure(&mut self, symbol: &str, reason: &str) {
        self.failures.push(format!("{symbol}: {reason}"));
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Average day-over-day change across fetched assets, in percent.
    pub fn average_change_pct(&self) -> f64 {
        if self.assets.is_empty() {
            return 0.0;
        }
        self.assets.iter().map(|a| a.change_pct).sum::<f64>() / self.assets.len() as f64
    }
}

/// Diagnostics attached to portfolio runs.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioDiagnostics {
    pub symbols: Vec<String>,
    pub correlation: Vec<Vec<f64>>,
    pub annualized_volatility: Vec<f64>,
}

impl PortfolioDiagnostics {
    pub fn compute(returns: &ReturnsTable, periods_per_year: f64) -> Self {
        PortfolioDiagnostics {
            symbols: returns.symbols.clone(),
            correlation: correlation_matrix(returns),
            annualized_volatility: annualized_volatility(returns, periods_per_year),
        }
    }
}
