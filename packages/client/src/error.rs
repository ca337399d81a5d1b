//! Error types for the Touchline CLI client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the handshake token
    #[error("connection rejected: token was not accepted")]
    Unauthorized,

    /// Connection error
    #[error("connection error: {0}")]
    ConnectionError(String),
}
