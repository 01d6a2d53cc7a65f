//! Price data access port trait.

use chrono::NaiveDate;
use std::str::FromStr;

use crate::domain::error::QuantlabError;
use crate::domain::series::PriceSeries;

/// Sampling granularity a provider is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    D1,
    H1,
    M30,
    M15,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::D1 => "1d",
            Interval::H1 => "1h",
            Interval::M30 => "30m",
            Interval::M15 => "15m",
        }
    }
}

impl FromStr for Interval {
    type Err = QuantlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Interval::D1),
            "1h" => Ok(Interval::H1),
            "30m" => Ok(Interval::M30),
            "15m" => Ok(Interval::M15),
            other => Err(QuantlabError::InvalidParameter {
                name: "interval".into(),
                reason: format!("expected 1d, 1h, 30m or 15m, got {other}"),
            }),
        }
    }
}

/// Provider of validated close-price series, one symbol at a time.
/// Fetching is the only I/O in a run and happens before the core
/// computes anything.
pub trait PriceProvider {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceSeries, QuantlabError>;

    fn list_symbols(&self) -> Result<Vec<String>, QuantlabError>;
}
