//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for trendsignal.
#[derive(Debug, thiserror::Error)]
pub enum TrendSignalError {
    #[error("no data found for '{ticker}'")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("invalid bar for {ticker} on {date}: {reason}")]
    InvalidBar {
        ticker: String,
        date: NaiveDate,
        reason: String,
    },

    #[error("bars for {ticker} out of order: {date} does not follow {previous}")]
    UnorderedDates {
        ticker: String,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("{field} is required")]
    MissingInput { field: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TrendSignalError {
    /// HTTP-style status for the evaluation endpoint contract.
    pub fn status_code(&self) -> u16 {
        match self {
            TrendSignalError::MissingInput { .. } => 400,
            TrendSignalError::NoData { .. } => 404,
            _ => 500,
        }
    }
}

impl From<&TrendSignalError> for std::process::ExitCode {
    fn from(err: &TrendSignalError) -> Self {
        let code: u8 = match err {
            TrendSignalError::Io(_) | TrendSignalError::Json(_) => 1,
            TrendSignalError::ConfigParse { .. } | TrendSignalError::ConfigInvalid { .. } => 2,
            TrendSignalError::DataSource { .. }
            | TrendSignalError::InvalidBar { .. }
            | TrendSignalError::UnorderedDates { .. } => 3,
            TrendSignalError::NoData { .. } | TrendSignalError::InsufficientData { .. } => 5,
            TrendSignalError::MissingInput { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
