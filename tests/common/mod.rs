#![allow(dead_code)]

use chrono::NaiveDate;
use quantlab::domain::error::QuantlabError;
use quantlab::domain::series::PriceSeries;
use quantlab::ports::data_port::{Interval, PriceProvider};
use std::collections::HashMap;

pub struct MockProvider {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.symbol().to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceProvider for MockProvider {
    fn fetch_prices(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
        _interval: Interval,
    ) -> Result<PriceSeries, QuantlabError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(QuantlabError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| QuantlabError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "not in mock".into(),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantlabError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily series starting 2024-01-01.
pub fn make_series(symbol: &str, prices: &[f64]) -> PriceSeries {
    make_series_from(symbol, date(2024, 1, 1), prices)
}

pub fn make_series_from(symbol: &str, start: NaiveDate, prices: &[f64]) -> PriceSeries {
    let dates = (0..prices.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    PriceSeries::new(symbol, dates, prices.to_vec()).unwrap()
}

/// Geometric walk of `count` prices with a fixed per-period return.
pub fn generate_prices(start_price: f64, per_period_return: f64, count: usize) -> Vec<f64> {
    let mut prices = Vec::with_capacity(count);
    let mut price = start_price;
    for _ in 0..count {
        prices.push(price);
        price *= 1.0 + per_period_return;
    }
    prices
}
