//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transport-level failure (connect, read or write)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The server closed the connection
    #[error("Connection closed by server")]
    ConnectionClosed,

    /// The configured endpoint cannot be used as a WebSocket URL
    #[error("Invalid WebSocket URL '{0}'")]
    InvalidUrl(String),

    /// The outbound frame channel is gone (writer task has stopped)
    #[error("Outbound frame channel is closed")]
    SinkClosed,
}
