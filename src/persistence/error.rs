//! Persistence errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("deviceId required")]
    InvalidDeviceId,
    #[error("name required")]
    InvalidName,
    #[error("invalid score")]
    InvalidScore,
    #[error("play time of {0} ms is too short to be legit")]
    ImplausiblePlaytime(i64),
    #[error("unknown deviceId (register first)")]
    UnknownDevice,
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP-equivalent status code
    pub fn status(&self) -> u16 {
        match self {
            ApiError::InvalidDeviceId
            | ApiError::InvalidName
            | ApiError::InvalidScore
            | ApiError::ImplausiblePlaytime(_)
            | ApiError::UnknownDevice
            | ApiError::Decode(_) => 400,
            ApiError::Timeout => 504,
            ApiError::Network(_) => 503,
            ApiError::Server { status, .. } => *status,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
