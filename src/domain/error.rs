//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for goldencross.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    #[error("invalid windows: short={short}, long={long} ({reason})")]
    InvalidWindow {
        short: usize,
        long: usize,
        reason: String,
    },

    #[error("non-positive price {price} at {date}")]
    InvalidPrice { date: NaiveDate, price: f64 },

    #[error("cannot evaluate an empty value series")]
    EmptySeries,

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("price series not strictly ascending at index {index}")]
    UnorderedSeries { index: usize },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BacktestError> for std::process::ExitCode {
    fn from(err: &BacktestError) -> Self {
        let code: u8 = match err {
            BacktestError::Io(_) => 1,
            BacktestError::ConfigParse { .. }
            | BacktestError::ConfigMissing { .. }
            | BacktestError::ConfigInvalid { .. } => 2,
            BacktestError::Data { .. } | BacktestError::UnorderedSeries { .. } => 3,
            BacktestError::InvalidWindow { .. } | BacktestError::InvalidPrice { .. } => 4,
            BacktestError::EmptySeries | BacktestError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
