//! Port traits decoupling the core from data, config and report I/O.

pub mod config_port;
pub mod data_port;
pub mod report_port;
