//! Error types for the Paperless-ngx sensor

/// Errors that can occur in the Paperless-ngx sensor
#[derive(Debug, thiserror::Error)]
pub enum PaperlessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Unexpected response payload: {0}")]
    Payload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config entry store error: {0}")]
    Store(String),
}

/// Result type alias for sensor operations
pub type Result<T> = std::result::Result<T, PaperlessError>;
