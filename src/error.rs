use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenGptsError {
    #[error("Network error: {0}")]
    NetworkError(reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// An `error` frame arrived on a run stream.
    #[error("Run failed: {message}")]
    Protocol { message: String, payload: Value },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Malformed stream frame `{line}`: {reason}")]
    MalformedFrame { line: String, reason: String },

    #[error("Run stream ended without producing any messages")]
    EmptyStream,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl OpenGptsError {
    /// Connection failures, timeouts and non-success statuses.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            OpenGptsError::NetworkError(_) | OpenGptsError::Timeout | OpenGptsError::ApiError { .. }
        )
    }

    pub(crate) fn malformed(line: &str, reason: impl ToString) -> Self {
        OpenGptsError::MalformedFrame {
            line: line.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for OpenGptsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OpenGptsError::Timeout
        } else {
            OpenGptsError::NetworkError(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, OpenGptsError>;
