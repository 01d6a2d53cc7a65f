//! Core domain types and logic.

pub mod series;
pub mod table;
pub mod signal;
pub mod backtest;
pub mod portfolio;
pub mod metrics;
pub mod predict;
pub mod report;
pub mod config_validation;
pub mod error;
