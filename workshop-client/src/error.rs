use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error: {status}{}", message_suffix(.message))]
    HttpStatus {
        status: u16,
        message: Option<String>,
    },
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Invalid response for {operation}")]
    Shape { operation: &'static str },
    #[error("Unexpected payload for {operation}: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode request body: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl ApiError {
    /// Numeric status of an `HttpStatus` failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum AuthStoreError {
    #[error("Auth store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode auth store: {0}")]
    Encode(#[from] serde_json::Error),
}
