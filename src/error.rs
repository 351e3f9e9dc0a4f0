use std::time::Duration;
use tokio_tungstenite::tungstenite;

/// Errors surfaced by the session layer. Per-frame problems (malformed
/// inbound JSON, unknown tool names) are absorbed where they occur and never
/// show up here.
#[derive(Debug, thiserror::Error)]
pub enum LiveError {
    #[error("failed to open connection: {0}")]
    Connect(tungstenite::Error),

    #[error("setup handshake failed: {0}")]
    Handshake(String),

    #[error("session is not connected")]
    NotConnected,

    #[error("failed to send frame: {0}")]
    Send(String),

    #[error("transport failed: {0}")]
    Transport(tungstenite::Error),

    #[error("no frame received within {0:?}")]
    IdleTimeout(Duration),
}
