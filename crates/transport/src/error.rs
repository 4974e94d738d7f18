//! Typed error enum for the transport crate.

use thiserror::Error;

/// Errors from read/write operations against the spreadsheet API.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("endpoint misconfigured: {0}")]
    Config(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl TransportError {
    /// Whether this failure is likely transient (network hiccup, backend
    /// overload). Configuration errors never are; they require operator
    /// action.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503),
            _ => false,
        }
    }

    /// Whether this is a fail-fast configuration problem.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::ClientInit(_))
    }
}
