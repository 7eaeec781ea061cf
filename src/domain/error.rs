//! Domain error types.
//!
//! Data-quality problems are deliberately not represented here: the guard
//! reports them through an unusable [`GuardVerdict`](crate::domain::guard::GuardVerdict)
//! and never fails. These errors cover the repository surface around the
//! core: configuration, data access, I/O.

/// Top-level error type for sentrade.
#[derive(Debug, thiserror::Error)]
pub enum SentradeError {
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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {asset}")]
    NoData { asset: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SentradeError> for std::process::ExitCode {
    fn from(err: &SentradeError) -> Self {
        let code: u8 = match err {
            SentradeError::Io(_) => 1,
            SentradeError::ConfigParse { .. }
            | SentradeError::ConfigMissing { .. }
            | SentradeError::ConfigInvalid { .. } => 2,
            SentradeError::Data { .. } | SentradeError::NoData { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}
