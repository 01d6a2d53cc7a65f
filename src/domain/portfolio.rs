//! Equal-weight portfolio simulator with scheduled rebalancing.
//!
//! Between rebalance points weights drift with relative asset
//! performance; on a rebalance point they reset to uniform 1/N before
//! that period's return is applied. The no-rebalancing benchmark is the
//! same loop with [`Rebalancing::None`] — the reset condition is the
//! only difference, which lets callers attribute performance deltas to
//! the rebalancing rule alone.

use chrono::Datelike;
use std::str::FromStr;

use super::error::QuantlabError;
use super::series::EquityCurve;
use super::table::PriceTable;

/// Portfolios must hold at least this many assets.
pub const MIN_PORTFOLIO_ASSETS: usize = 3;

/// When portfolio weights reset to the uniform target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rebalancing {
    /// Uniform weights at inception only, then drift.
    None,
    /// Reset on the first period and every Monday.
    Weekly,
    /// Reset on the first period and every calendar-month change.
    Monthly,
}

impl Rebalancing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rebalancing::None => "none",
            Rebalancing::Weekly => "weekly",
            Rebalancing::Monthly => "monthly",
        }
    }
}

impl FromStr for Rebalancing {
    type Err = QuantlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Rebalancing::None),
            "weekly" => Ok(Rebalancing::Weekly),
            "monthly" => Ok(Rebalancing::Monthly),
            other => Err(QuantlabError::InvalidParameter {
                name: "rebalancing".into(),
                reason: format!("expected none, weekly or monthly, got {other}"),
            }),
        }
    }
}

/// Simulate an equal-weight portfolio over an aligned price table.
///
/// The equity curve is indexed like the table's returns: one entry per
/// period from the second table row onward.
pub fn simulate_equal_weight(
    table: &PriceTable,
    rebalancing: Rebalancing,
    initial_value: f64,
) -> Result<EquityCurve, QuantlabError> {
    if table.asset_count() < MIN_PORTFOLIO_ASSETS {
        return Err(QuantlabError::InsufficientAssets {
            available: table.asset_count(),
            minimum: MIN_PORTFOLIO_ASSETS,
        });
    }
    if !initial_value.is_finite() || initial_value <= 0.0 {
        return Err(QuantlabError::InvalidParameter {
            name: "initial_value".into(),
            reason: "must be positive and finite".into(),
        });
    }

    let rets = table.returns();
    let n = rets.asset_count();
    let target = 1.0 / n as f64;
    let mut weights = vec![target; n];

    let mut values = Vec::with_capacity(rets.row_count());
    let mut value = initial_value;

    for t in 0..rets.row_count() {
        if is_rebalance_point(&rets.dates, t, rebalancing) {
            weights.iter_mut().for_each(|w| *w = target);
        }

        let row = rets.row(t);
        let portfolio_return: f64 = weights.iter().zip(&row).map(|(w, r)| w * r).sum();
        value *= 1.0 + portfolio_return;
        values.push(value);

        // drift, then renormalize unless the weights collapsed to zero
        for (w, r) in weights.iter_mut().zip(&row) {
            *w *= 1.0 + r;
        }
        let sum: f64 = weights.iter().sum();
        if sum != 0.0 {
            weights.iter_mut().for_each(|w| *w /= sum);
        }
    }

    Ok(EquityCurve {
        dates: rets.dates,
        values,
    })
}

fn is_rebalance_point(
    dates: &[chrono::NaiveDate],
    t: usize,
    rebalancing: Rebalancing,
) -> bool {
    if t == 0 {
        return true;
    }
    match rebalancing {
        Rebalancing::None => false,
        Rebalancing::Weekly => dates[t].weekday() == chrono::Weekday::Mon,
        Rebalancing::Monthly => dates[t].month() != dates[t - 1].month(),
    }
}
