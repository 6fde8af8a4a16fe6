//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// Exporter error type
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wrong number of positional arguments
    #[error("Usage error: {0}")]
    Usage(String),

    /// HTTP client error (transport, TLS, timeout)
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Pingdom API returned an error response
    #[error("Pingdom API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message reported by the API
        message: String,
    },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Metric registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// I/O error (socket bind, signal handler install)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ExporterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// Result alias used across the crate
pub type ExporterResult<T> = Result<T, ExporterError>;
