use std::time::Duration;

use thiserror::Error;

use crate::types::UserId;

/// Errors raised inside the relay.
///
/// None of these reach clients: delivery failures collapse into a `false`
/// from `send`, transport failures close the affected connection.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("user not connected: {0}")]
    NotConnected(UserId),

    #[error("outbound queue full for user {0}")]
    QueueFull(UserId),

    #[error("channel closed for user {0}")]
    ChannelClosed(UserId),

    #[error("socket write timed out after {0:?}")]
    WriteTimeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
