//! `callhub-core`: shared vocabulary of the signaling relay.
//!
//! Identifier types, the JSON wire protocol spoken over the signaling
//! websocket, and the error type used by the relay internals.

pub mod error;
pub mod protocol;
pub mod types;

pub use error::HubError;
pub use protocol::{decode_client_message, ClientMessage, ServerMessage, DEFAULT_CALL_TYPE};
pub use types::{ConnectionId, RoomId, UserId};
