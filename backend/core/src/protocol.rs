//! Signaling wire protocol.
//!
//! Every frame is a JSON object tagged by `type`. Inbound frames decode into
//! [`ClientMessage`] once, at the socket boundary; anything that does not
//! decode (unknown type, missing field, garbage) is dropped by the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{RoomId, UserId};

/// `call_type` used when a `call_user` frame does not name one.
pub const DEFAULT_CALL_TYPE: &str = "video";

/// Client -> hub frames.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Enter a room, leaving any room the user is currently in.
    JoinRoom { room_id: RoomId },
    /// Leave the current room.
    LeaveRoom,
    /// SDP offer for `target`. The payload is relayed untouched.
    Offer { target: UserId, offer: Value },
    /// SDP answer for `target`.
    Answer { target: UserId, answer: Value },
    /// ICE candidate for `target`.
    IceCandidate { target: UserId, candidate: Value },
    /// Ring `target`.
    CallUser {
        target: UserId,
        #[serde(default)]
        call_type: Option<String>,
        #[serde(default)]
        caller_name: Option<String>,
    },
    CallAccepted { target: UserId },
    CallRejected { target: UserId },
    CallEnded { target: UserId },
    /// Application-level liveness probe.
    Ping,
    /// Any `type` this hub does not know about.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Wire name of the frame, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join_room",
            Self::LeaveRoom => "leave_room",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice_candidate",
            Self::CallUser { .. } => "call_user",
            Self::CallAccepted { .. } => "call_accepted",
            Self::CallRejected { .. } => "call_rejected",
            Self::CallEnded { .. } => "call_ended",
            Self::Ping => "ping",
            Self::Unknown => "unknown",
        }
    }
}

/// Hub -> client frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to `join_room`: who else is in the room.
    RoomJoined { room_id: RoomId, users: Vec<UserId> },
    /// Reply to `leave_room`. `room_id` is absent when the user was in no room.
    RoomLeft {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomId>,
    },
    UserJoined { user_id: UserId, room_id: RoomId },
    UserLeft { user_id: UserId, room_id: RoomId },
    Offer { offer: Value, from: UserId },
    Answer { answer: Value, from: UserId },
    IceCandidate { candidate: Value, from: UserId },
    IncomingCall {
        from: UserId,
        call_type: String,
        caller_name: Option<String>,
    },
    CallAccepted { from: UserId },
    CallRejected { from: UserId },
    CallEnded { from: UserId },
    Pong,
}

impl ServerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoomJoined { .. } => "room_joined",
            Self::RoomLeft { .. } => "room_left",
            Self::UserJoined { .. } => "user_joined",
            Self::UserLeft { .. } => "user_left",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice_candidate",
            Self::IncomingCall { .. } => "incoming_call",
            Self::CallAccepted { .. } => "call_accepted",
            Self::CallRejected { .. } => "call_rejected",
            Self::CallEnded { .. } => "call_ended",
            Self::Pong => "pong",
        }
    }
}

/// Decode one text frame.
pub fn decode_client_message(text: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(text)
}
