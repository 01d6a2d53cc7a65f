//! Position generators: price series in, target exposure series out.
//!
//! Generators never look ahead: the position at index `t` depends only
//! on prices at indices `<= t`. The backtest engine applies the
//! one-period lag on top of that.

use super::error::QuantlabError;
use super::series::PriceSeries;

/// Fully invested for every period.
pub fn buy_and_hold(prices: &PriceSeries) -> Vec<f64> {
    vec![1.0; prices.len()]
}

/// Sign of the trailing return over `lookback` periods: +1 long, -1
/// short, 0 when flat or with fewer than `lookback` prior observations.
pub fn momentum(prices: &PriceSeries, lookback: usize) -> Result<Vec<f64>, QuantlabError> {
    if lookback < 2 {
        return Err(QuantlabError::InvalidParameter {
            name: "lookback".into(),
            reason: "must be at least 2".into(),
        });
    }
    if lookback > prices.len() {
        return Err(QuantlabError::InvalidParameter {
            name: "lookback".into(),
            reason: format!(
                "must not exceed series length ({} > {})",
                lookback,
                prices.len()
            ),
        });
    }

    let values = prices.prices();
    let positions = (0..values.len())
        .map(|t| {
            if t < lookback {
                return 0.0;
            }
            let trailing = values[t] / values[t - lookback] - 1.0;
            if trailing > 0.0 {
                1.0
            } else if trailing < 0.0 {
                -1.0
            } else {
                0.0
            }
        })
        .collect();

    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..prices.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        PriceSeries::new("TEST", dates, prices.to_vec()).unwrap()
    }

    #[test]
    fn buy_and_hold_is_constant_one() {
        let s = series(&[100.0, 105.0, 103.0]);
        assert_eq!(buy_and_hold(&s), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn momentum_known_scenario() {
        // 103 > 100, 110 > 105, 120 > 103: long from t=2 onward.
        let s = series(&[100.0, 105.0, 103.0, 110.0, 120.0]);
        let pos = momentum(&s, 2).unwrap();
        assert_eq!(pos, vec![0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn momentum_goes_short_on_negative_trailing_return() {
        let s = series(&[100.0, 98.0, 95.0, 94.0]);
        let pos = momentum(&s, 2).unwrap();
        assert_eq!(pos, vec![0.0, 0.0, -1.0, -1.0]);
    }

    #[test]
    fn momentum_flat_trailing_return_gives_zero() {
        let s = series(&[100.0, 101.0, 100.0, 102.0]);
        let pos = momentum(&s, 2).unwrap();
        assert_eq!(pos[2], 0.0);
    }

    #[test]
    fn momentum_rejects_lookback_below_two() {
        let s = series(&[100.0, 101.0, 102.0]);
        for lookback in [0, 1] {
            assert!(matches!(
                momentum(&s, lookback),
                Err(QuantlabError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn momentum_rejects_lookback_beyond_series() {
        let s = series(&[100.0, 101.0, 102.0]);
        assert!(matches!(
            momentum(&s, 4),
            Err(QuantlabError::InvalidParameter { .. })
        ));
    }

    proptest! {
        #[test]
        fn momentum_values_restricted_to_sign_set(
            prices in proptest::collection::vec(1.0f64..1000.0, 4..60),
            lookback in 2usize..8,
        ) {
            prop_assume!(lookback <= prices.len());
            let s = series(&prices);
            let pos = momentum(&s, lookback).unwrap();

            prop_assert_eq!(pos.len(), prices.len());
            for (t, &p) in pos.iter().enumerate() {
                prop_assert!(p == 0.0 || p == 1.0 || p == -1.0);
                if t < lookback {
                    prop_assert_eq!(p, 0.0);
                }
            }
        }
    }
}
