//! Shared error type across sentio crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Model not ready to serve predictions.
    Unavailable,
    /// Model failed to load.
    ModelLoad,
    /// Backend classification failed.
    Inference,
    /// Invalid configuration or metric registration.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Unavailable => "SERVICE_UNAVAILABLE",
            ClientCode::ModelLoad => "MODEL_LOAD_FAILED",
            ClientCode::Inference => "INFERENCE_FAILED",
            ClientCode::Config => "CONFIG_ERROR",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SentioError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum SentioError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("model load failed: {0}")]
    ModelLoad(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SentioError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            SentioError::BadRequest(_) => ClientCode::BadRequest,
            SentioError::Unavailable(_) => ClientCode::Unavailable,
            SentioError::ModelLoad(_) => ClientCode::ModelLoad,
            SentioError::Inference(_) => ClientCode::Inference,
            SentioError::Config(_) => ClientCode::Config,
            SentioError::Internal(_) => ClientCode::Internal,
        }
    }
}
