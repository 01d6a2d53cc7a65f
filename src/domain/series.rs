//! Price series and equity curve representations.
//!
//! A [`PriceSeries`] is immutable once built: the constructor validates
//! ordering and value domain so downstream code never re-checks.

use chrono::NaiveDate;

use super::error::QuantlabError;

/// Close prices for one asset on a strictly increasing date index.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

impl PriceSeries {
    /// Build a validated series. Dates must be strictly increasing and
    /// prices positive finite, one per date.
    pub fn new(
        symbol: impl Into<String>,
        dates: Vec<NaiveDate>,
        prices: Vec<f64>,
    ) -> Result<Self, QuantlabError> {
        let symbol = symbol.into();
        if dates.len() != prices.len() {
            return Err(QuantlabError::InvalidParameter {
                name: "prices".into(),
                reason: format!(
                    "{}: {} dates but {} prices",
                    symbol,
                    dates.len(),
                    prices.len()
                ),
            });
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(QuantlabError::InvalidParameter {
                    name: "dates".into(),
                    reason: format!("{}: dates not strictly increasing at {}", symbol, pair[1]),
                });
            }
        }
        for (date, &price) in dates.iter().zip(&prices) {
            if !price.is_finite() || price <= 0.0 {
                return Err(QuantlabError::InvalidParameter {
                    name: "prices".into(),
                    reason: format!("{}: non-positive or non-finite price on {}", symbol, date),
                });
            }
        }
        Ok(Self {
            symbol,
            dates,
            prices,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Simple period returns, one shorter than the price index.
    pub fn returns(&self) -> Vec<f64> {
        simple_returns(&self.prices)
    }
}

/// Cumulative portfolio value over time.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityCurve {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl EquityCurve {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn final_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }

    /// Simple period returns of the curve.
    pub fn returns(&self) -> Vec<f64> {
        simple_returns(&self.values)
    }

    /// Curve rebased so the first value is 1. For display only; metric
    /// functions take the raw curve.
    pub fn normalized(&self) -> EquityCurve {
        let first = self.values.first().copied().unwrap_or(1.0);
        EquityCurve {
            dates: self.dates.clone(),
            values: self.values.iter().map(|v| v / first).collect(),
        }
    }
}

/// `v[t]/v[t-1] - 1` for t >= 1. Empty for inputs shorter than 2.
pub fn simple_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| if w[0] != 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}
