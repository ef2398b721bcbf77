//! Error types for the gateway layer.

use thiserror::Error;

/// Errors that can occur while talking to the inference service.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The completion carried no choices.
    #[error("completion contained no choices")]
    EmptyCompletion,

    /// I/O error when reading the document to upload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
