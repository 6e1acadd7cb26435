//! # Client Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ClientError                                    │
//! │                                                                         │
//! │  Configuration        Transport            Backend                      │
//! │  ─────────────        ─────────            ───────                      │
//! │  InvalidConfig        Http (reqwest)       Api {status, message}        │
//! │  InvalidUrl           Timeout              NotFound                     │
//! │  ConfigLoadFailed                          Rejected (success: false)    │
//! │  ConfigSaveFailed                          Core (bad payload)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mostrador_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// Non-2xx response. `message` comes from the `{error}` body when present.
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    /// 2xx response whose body says `success: false`.
    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid JSON from backend: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(err)
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl ClientError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Timeout | ClientError::Http(_) => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
