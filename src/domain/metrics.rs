//! Risk/return statistics over equity curves and return tables.
//!
//! All functions are pure and total: degenerate inputs (empty, single
//! point, zero variance) produce 0 rather than NaN or an error. Standard
//! deviations are sample deviations (n-1 denominator).

use serde::Serialize;

use super::series::EquityCurve;
use super::table::ReturnsTable;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Per-run summary record, serialized as-is by report writers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub final_value: f64,
}

impl Metrics {
    pub fn compute(curve: &EquityCurve, periods_per_year: f64, rf_per_period: f64) -> Self {
        Metrics {
            total_return: total_return(curve),
            sharpe_ratio: sharpe_ratio(curve, periods_per_year, rf_per_period),
            max_drawdown: max_drawdown(curve),
            final_value: curve.final_value(),
        }
    }
}

/// `equity[-1]/equity[0] - 1`, 0 for curves shorter than 2 points.
pub fn total_return(curve: &EquityCurve) -> f64 {
    if curve.len() < 2 {
        return 0.0;
    }
    let first = curve.values[0];
    if first == 0.0 {
        return 0.0;
    }
    curve.values[curve.len() - 1] / first - 1.0
}

/// Annualized mean excess period return over its sample deviation.
/// 0 on constant curves or fewer than two returns.
pub fn sharpe_ratio(curve: &EquityCurve, periods_per_year: f64, rf_per_period: f64) -> f64 {
    let returns = curve.returns();
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        ((mean - rf_per_period) / stddev) * periods_per_year.sqrt()
    } else {
        0.0
    }
}

/// Most negative peak-to-trough decline as a fraction of the peak.
/// Always <= 0; exactly 0 for non-decreasing curves.
pub fn max_drawdown(curve: &EquityCurve) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for &value in &curve.values {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (value - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// Pairwise Pearson correlation of per-asset returns. Zero-variance
/// columns correlate 0 with everything (diagonal stays 1).
pub fn correlation_matrix(returns: &ReturnsTable) -> Vec<Vec<f64>> {
    let n = returns.asset_count();
    let periods = returns.row_count() as f64;

    let means: Vec<f64> = returns
        .columns
        .iter()
        .map(|c| {
            if c.is_empty() {
                0.0
            } else {
                c.iter().sum::<f64>() / periods
            }
        })
        .collect();

    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let a = &returns.columns[i];
            let b = &returns.columns[j];
            let cov: f64 = a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - means[i]) * (y - means[j]))
                .sum();
            let var_a: f64 = a.iter().map(|x| (x - means[i]).powi(2)).sum();
            let var_b: f64 = b.iter().map(|y| (y - means[j]).powi(2)).sum();

            let corr = if var_a > 0.0 && var_b > 0.0 {
                cov / (var_a.sqrt() * var_b.sqrt())
            } else {
                0.0
            };
            matrix[i][j] = corr;
            matrix[j][i] = corr;
        }
    }

    matrix
}

/// Per-asset `std(returns) * sqrt(periods_per_year)`. 0 with fewer than
/// two returns.
pub fn annualized_volatility(returns: &ReturnsTable, periods_per_year: f64) -> Vec<f64> {
    returns
        .columns
        .iter()
        .map(|c| {
            if c.len() < 2 {
                return 0.0;
            }
            let n = c.len() as f64;
            let mean = c.iter().sum::<f64>() / n;
            let variance = c.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt() * periods_per_year.sqrt()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PriceSeries;
    use crate::domain::table::PriceTable;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn curve(values: &[f64]) -> EquityCurve {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        EquityCurve {
            dates: (0..values.len())
                .map(|i| start + chrono::Duration::days(i as i64))
                .collect(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn total_return_basic() {
        assert_relative_eq!(
            total_return(&curve(&[100.0, 110.0])),
            0.10,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            total_return(&curve(&[100.0, 90.0])),
            -0.10,
            max_relative = 1e-12
        );
    }

    #[test]
    fn total_return_degenerate_curves() {
        assert_eq!(total_return(&curve(&[])), 0.0);
        assert_eq!(total_return(&curve(&[100.0])), 0.0);
    }

    #[test]
    fn sharpe_of_constant_curve_is_zero() {
        assert_eq!(
            sharpe_ratio(&curve(&[100.0; 10]), TRADING_DAYS_PER_YEAR, 0.0),
            0.0
        );
        assert_eq!(
            sharpe_ratio(&curve(&[100.0]), TRADING_DAYS_PER_YEAR, 0.0),
            0.0
        );
    }

    #[test]
    fn sharpe_positive_for_steady_gains() {
        let values: Vec<f64> = (0..100).map(|i| 100.0 * 1.001f64.powi(i)).collect();
        let sharpe = sharpe_ratio(&curve(&values), TRADING_DAYS_PER_YEAR, 0.0);
        assert!(sharpe > 0.0);
        assert!(sharpe.is_finite());
    }

    #[test]
    fn sharpe_hand_computed() {
        // returns [0.1, -0.05]: mean 0.025, sample std of the pair
        let c = curve(&[100.0, 110.0, 104.5]);
        let mean = 0.025;
        let std = ((0.1f64 - mean).powi(2) + (-0.05 - mean).powi(2)).sqrt();
        let expected = (mean / std) * TRADING_DAYS_PER_YEAR.sqrt();
        assert_relative_eq!(
            sharpe_ratio(&c, TRADING_DAYS_PER_YEAR, 0.0),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn sharpe_uses_caller_periods_per_year() {
        let c = curve(&[100.0, 110.0, 104.5, 115.0]);
        let daily = sharpe_ratio(&c, 252.0, 0.0);
        let hourly = sharpe_ratio(&c, 252.0 * 24.0, 0.0);
        assert_relative_eq!(hourly, daily * 24.0f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn max_drawdown_single_dip() {
        // Buy-and-hold over [100,105,103,110,120]: the only dip is
        // 103 after the 105 peak.
        let dd = max_drawdown(&curve(&[100.0, 105.0, 103.0, 110.0, 120.0]));
        assert_relative_eq!(dd, (103.0 - 105.0) / 105.0, max_relative = 1e-12);
    }

    #[test]
    fn max_drawdown_non_decreasing_is_zero() {
        assert_eq!(max_drawdown(&curve(&[100.0, 100.0, 105.0, 120.0])), 0.0);
        assert_eq!(max_drawdown(&curve(&[100.0])), 0.0);
        assert_eq!(max_drawdown(&curve(&[])), 0.0);
    }

    #[test]
    fn max_drawdown_is_never_positive() {
        let dd = max_drawdown(&curve(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]));
        assert!(dd <= 0.0);
        assert_relative_eq!(dd, (80.0 - 110.0) / 110.0, max_relative = 1e-12);
    }

    #[test]
    fn metrics_record_fields() {
        let c = curve(&[10_000.0, 10_500.0, 10_300.0]);
        let m = Metrics::compute(&c, TRADING_DAYS_PER_YEAR, 0.0);
        assert_relative_eq!(m.total_return, 0.03, max_relative = 1e-12);
        assert_relative_eq!(m.final_value, 10_300.0, max_relative = 1e-12);
        assert_relative_eq!(
            m.max_drawdown,
            (10_300.0 - 10_500.0) / 10_500.0,
            max_relative = 1e-12
        );
    }

    fn two_period_table() -> PriceTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..4)
            .map(|i| start + chrono::Duration::days(i))
            .collect();
        let series = vec![
            PriceSeries::new("A", dates.clone(), vec![100.0, 110.0, 99.0, 108.9]).unwrap(),
            PriceSeries::new("B", dates.clone(), vec![50.0, 55.0, 49.5, 54.45]).unwrap(),
            PriceSeries::new("C", dates.clone(), vec![20.0, 19.0, 20.9, 19.855]).unwrap(),
        ];
        PriceTable::align(series).unwrap()
    }

    #[test]
    fn correlation_of_identical_paths_is_one() {
        // A and B move by the same returns each period.
        let corr = correlation_matrix(&two_period_table().returns());
        assert_relative_eq!(corr[0][1], 1.0, max_relative = 1e-9);
        assert_relative_eq!(corr[0][0], 1.0, max_relative = 1e-12);
        assert_relative_eq!(corr[1][0], corr[0][1], max_relative = 1e-12);
    }

    #[test]
    fn correlation_zero_variance_column() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..3)
            .map(|i| start + chrono::Duration::days(i))
            .collect();
        let series = vec![
            PriceSeries::new("A", dates.clone(), vec![100.0, 110.0, 99.0]).unwrap(),
            PriceSeries::new("FLAT", dates.clone(), vec![50.0, 50.0, 50.0]).unwrap(),
        ];
        let corr = correlation_matrix(&PriceTable::align(series).unwrap().returns());
        assert_eq!(corr[0][1], 0.0);
        assert_eq!(corr[1][1], 1.0);
    }

    #[test]
    fn annualized_volatility_flat_asset_is_zero() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..3)
            .map(|i| start + chrono::Duration::days(i))
            .collect();
        let series = vec![
            PriceSeries::new("A", dates.clone(), vec![100.0, 110.0, 99.0]).unwrap(),
            PriceSeries::new("FLAT", dates.clone(), vec![50.0, 50.0, 50.0]).unwrap(),
        ];
        let table = PriceTable::align(series).unwrap();
        let vols = annualized_volatility(&table.returns(), TRADING_DAYS_PER_YEAR);
        assert!(vols[0] > 0.0);
        assert_eq!(vols[1], 0.0);
    }

    #[test]
    fn annualized_volatility_scales_with_sqrt_periods() {
        let table = two_period_table();
        let daily = annualized_volatility(&table.returns(), 252.0);
        let weekly = annualized_volatility(&table.returns(), 52.0);
        for (d, w) in daily.iter().zip(&weekly) {
            assert_relative_eq!(d / w, (252.0f64 / 52.0).sqrt(), max_relative = 1e-12);
        }
    }
}
