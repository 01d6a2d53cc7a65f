//! Single-asset backtest engine.
//!
//! The engine turns a price series plus a position series into an
//! equity curve under the one-period lag rule: the exposure realized
//! over the return from t-1 to t is `positions[t-1]`. Yesterday's
//! decision determines today's exposure, so a generator can never trade
//! on information from the period it is being evaluated over.

use super::error::QuantlabError;
use super::series::{EquityCurve, PriceSeries};

/// Run parameters shared by the single-asset and portfolio flows.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub risk_free_per_period: f64,
    pub periods_per_year: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 10_000.0,
            risk_free_per_period: 0.0,
            periods_per_year: 252.0,
        }
    }
}

/// Compound `initial_capital` through the lagged position returns.
///
/// Exposures are generic scalars: values outside `{-1, 0, 1}` model
/// leverage or shorting and are applied as-is. A series with fewer than
/// two observations yields a single-point curve at `initial_capital`.
pub fn run_backtest(
    prices: &PriceSeries,
    positions: &[f64],
    initial_capital: f64,
) -> Result<EquityCurve, QuantlabError> {
    if positions.len() != prices.len() {
        return Err(QuantlabError::InvalidParameter {
            name: "positions".into(),
            reason: format!(
                "length {} does not match price series length {}",
                positions.len(),
                prices.len()
            ),
        });
    }
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(QuantlabError::InvalidParameter {
            name: "initial_capital".into(),
            reason: "must be positive and finite".into(),
        });
    }

    let values = prices.prices();
    let mut equity = Vec::with_capacity(values.len());
    let mut current = initial_capital;

    for t in 0..values.len() {
        if t > 0 {
            let r = values[t] / values[t - 1] - 1.0;
            current *= 1.0 + positions[t - 1] * r;
        }
        equity.push(current);
    }

    Ok(EquityCurve {
        dates: prices.dates().to_vec(),
        values: equity,
    })
}
