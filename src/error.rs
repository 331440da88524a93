//! Crate-level error type.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong in a chat session.
///
/// Malformed inbound frames are reported per frame and never end the session;
/// socket errors always do.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The page origin could not be turned into a WebSocket endpoint.
    #[error("invalid origin '{origin}': {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid time format '{0}'")]
    InvalidTimeFormat(String),

    /// An inbound frame was not a valid envelope.
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    #[error("websocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
