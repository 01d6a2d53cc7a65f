//! Fail-fast validation of run configuration.
//!
//! Every parameter is checked before any data is fetched or any
//! simulation runs; the only silent fallback in the system is the
//! momentum generator's zero exposure on insufficient history, which is
//! a per-timestamp policy rather than a config concern.

use chrono::NaiveDate;
use std::str::FromStr;

use super::error::QuantlabError;
use super::portfolio::Rebalancing;
use crate::ports::config_port::ConfigPort;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    validate_initial_capital(config)?;
    validate_risk_free(config)?;
    validate_periods_per_year(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_portfolio_config(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    validate_run_config(config)?;
    validate_rebalancing(config)?;
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    let value = config.get_double("run", "initial_capital", 10_000.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(QuantlabError::ConfigInvalid {
            section: "run".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    let value = config.get_double("run", "risk_free_per_period", 0.0);
    if !value.is_finite() || value < 0.0 || value >= 1.0 {
        return Err(QuantlabError::ConfigInvalid {
            section: "run".to_string(),
            key: "risk_free_per_period".to_string(),
            reason: "risk_free_per_period must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_periods_per_year(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    let value = config.get_double("run", "periods_per_year", 252.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(QuantlabError::ConfigInvalid {
            section: "run".to_string(),
            key: "periods_per_year".to_string(),
            reason: "periods_per_year must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_rebalancing(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    if let Some(value) = config.get_string("portfolio", "rebalancing") {
        Rebalancing::from_str(&value).map_err(|_| QuantlabError::ConfigInvalid {
            section: "portfolio".to_string(),
            key: "rebalancing".to_string(),
            reason: format!("unknown rebalancing mode: {value}"),
        })?;
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(QuantlabError::ConfigInvalid {
                section: "run".to_string(),
                key: "end_date".to_string(),
                reason: "end_date must not precede start_date".to_string(),
            });
        }
    }
    Ok(())
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, QuantlabError> {
    match config.get_string("run", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map(Some).map_err(|_| {
            QuantlabError::ConfigInvalid {
                section: "run".to_string(),
                key: key.to_string(),
                reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
            }
        }),
    }
}
