//! Linear extrapolation baseline.
//!
//! Fits an ordinary-least-squares line to the last `lookback` prices and
//! extends it `horizon` periods past the final observation. A visual
//! reference curve only, never a trading signal.

use chrono::NaiveDate;

use super::error::QuantlabError;
use super::series::PriceSeries;

/// Extrapolated prices on future dates.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

/// OLS degree-1 fit over the trailing window, extrapolated `horizon`
/// steps at the series' period granularity.
pub fn linear_extrapolation(
    prices: &PriceSeries,
    horizon: usize,
    lookback: usize,
) -> Result<Prediction, QuantlabError> {
    if lookback < 2 {
        return Err(QuantlabError::InvalidParameter {
            name: "lookback".into(),
            reason: "must be at least 2".into(),
        });
    }
    if horizon == 0 {
        return Err(QuantlabError::InvalidParameter {
            name: "horizon".into(),
            reason: "must be at least 1".into(),
        });
    }
    if prices.len() < lookback {
        return Err(QuantlabError::InsufficientData {
            symbol: prices.symbol().to_string(),
            observations: prices.len(),
            minimum: lookback,
        });
    }

    let window = &prices.prices()[prices.len() - lookback..];
    let (slope, intercept) = fit_line(window);

    let dates = prices.dates();
    let step = if dates.len() >= 2 {
        dates[dates.len() - 1] - dates[dates.len() - 2]
    } else {
        chrono::Duration::days(1)
    };
    let last_date = dates[dates.len() - 1];

    let mut out_dates = Vec::with_capacity(horizon);
    let mut out_values = Vec::with_capacity(horizon);
    for i in 0..horizon {
        let x = (lookback + i) as f64;
        out_dates.push(last_date + step * (i as i32 + 1));
        out_values.push(intercept + slope * x);
    }

    Ok(Prediction {
        dates: out_dates,
        values: out_values,
    })
}

/// Least-squares slope and intercept for y over x = 0..n-1.
fn fit_line(y: &[f64]) -> (f64, f64) {
    let n = y.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (i, &yi) in y.iter().enumerate() {
        let dx = i as f64 - x_mean;
        cov += dx * (yi - y_mean);
        var += dx * dx;
    }

    let slope = cov / var;
    (slope, y_mean - slope * x_mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..prices.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        PriceSeries::new("TEST", dates, prices.to_vec()).unwrap()
    }

    #[test]
    fn exact_line_extrapolates_exactly() {
        // y = 100 + 2x over the whole window.
        let s = series(&[100.0, 102.0, 104.0, 106.0]);
        let pred = linear_extrapolation(&s, 3, 4).unwrap();
        assert_relative_eq!(pred.values[0], 108.0, max_relative = 1e-12);
        assert_relative_eq!(pred.values[1], 110.0, max_relative = 1e-12);
        assert_relative_eq!(pred.values[2], 112.0, max_relative = 1e-12);
    }

    #[test]
    fn window_restricts_fit_to_trailing_prices() {
        // Noise before the window must not influence the fit: the last
        // three prices lie on y = 10 + 5x in window coordinates.
        let s = series(&[500.0, 3.0, 10.0, 15.0, 20.0]);
        let pred = linear_extrapolation(&s, 2, 3).unwrap();
        assert_relative_eq!(pred.values[0], 25.0, max_relative = 1e-9);
        assert_relative_eq!(pred.values[1], 30.0, max_relative = 1e-9);
    }

    #[test]
    fn constant_prices_extrapolate_flat() {
        let s = series(&[50.0; 6]);
        let pred = linear_extrapolation(&s, 4, 5).unwrap();
        for v in &pred.values {
            assert_relative_eq!(*v, 50.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn future_dates_continue_the_daily_index() {
        let s = series(&[100.0, 101.0, 102.0]);
        let pred = linear_extrapolation(&s, 2, 2).unwrap();
        assert_eq!(pred.dates[0], NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(pred.dates[1], NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn weekly_spacing_carries_into_prediction() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..3)
            .map(|i| start + chrono::Duration::weeks(i))
            .collect();
        let s = PriceSeries::new("W", dates, vec![10.0, 11.0, 12.0]).unwrap();
        let pred = linear_extrapolation(&s, 1, 3).unwrap();
        assert_eq!(pred.dates[0], start + chrono::Duration::weeks(3));
    }

    #[test]
    fn short_series_reports_unavailable() {
        let s = series(&[100.0, 101.0]);
        let result = linear_extrapolation(&s, 5, 10);
        assert!(matches!(
            result,
            Err(QuantlabError::InsufficientData {
                observations: 2,
                minimum: 10,
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_parameters() {
        let s = series(&[100.0, 101.0, 102.0]);
        assert!(matches!(
            linear_extrapolation(&s, 5, 1),
            Err(QuantlabError::InvalidParameter { .. })
        ));
        assert!(matches!(
            linear_extrapolation(&s, 0, 2),
            Err(QuantlabError::InvalidParameter { .. })
        ));
    }
}
