use thiserror::Error;

/// Errors returned by the OpenCellID lookup client.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Network failure, timeout, or a non-2xx status from the service.
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body is not a well-formed XML document.
    #[error("could not parse lookup response: {0}")]
    ResponseParse(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid attribute path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}
