//! Domain error types.

/// Top-level error type for quantlab.
#[derive(Debug, thiserror::Error)]
pub enum QuantlabError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("no data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("insufficient data for {symbol}: have {observations} observations, need {minimum}")]
    InsufficientData {
        symbol: String,
        observations: usize,
        minimum: usize,
    },

    #[error("portfolio requires at least {minimum} assets, got {available}")]
    InsufficientAssets { available: usize, minimum: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuantlabError> for std::process::ExitCode {
    fn from(err: &QuantlabError) -> Self {
        let code: u8 = match err {
            QuantlabError::Io(_) => 1,
            QuantlabError::ConfigParse { .. }
            | QuantlabError::ConfigMissing { .. }
            | QuantlabError::ConfigInvalid { .. } => 2,
            QuantlabError::InvalidParameter { .. } => 4,
            QuantlabError::DataUnavailable { .. }
            | QuantlabError::InsufficientData { .. }
            | QuantlabError::InsufficientAssets { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
