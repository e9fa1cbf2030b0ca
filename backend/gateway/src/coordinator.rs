//! Signaling Coordinator.
//!
//! [`SignalingHub`] owns the connection registry and the room directory
//! behind a single async mutex. Every state change and the fan-out it causes
//! happen inside that critical section; fan-out only ever `try_send`s into
//! bounded per-connection queues, so a slow peer cannot hold the lock.

use std::time::Duration;

use callhub_config::defaults::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WRITE_TIMEOUT_MS};
use callhub_core::{
    decode_client_message, ClientMessage, ConnectionId, RoomId, ServerMessage, UserId,
    DEFAULT_CALL_TYPE,
};
use callhub_logging::{SignalEvent, SignalEventLogger};
use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::directory::{Departure, RoomDirectory};
use crate::registry::{ClientHandle, ConnectionRegistry};

/// Tunables for delivery to clients.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Frames buffered per connection before new ones are dropped.
    pub queue_capacity: usize,
    /// How long the writer waits on one socket write before giving up on
    /// the connection.
    pub write_timeout: Duration,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            write_timeout: Duration::from_millis(DEFAULT_WRITE_TIMEOUT_MS),
        }
    }
}

/// Lifecycle of one connection. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Per-connection handle held by the task reading that socket.
#[derive(Debug)]
pub struct Session {
    user_id: UserId,
    connection_id: ConnectionId,
    state: ConnectionState,
    reply: ClientHandle,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Answer on this connection, even if the user has since reconnected
    /// elsewhere.
    fn reply(&self, msg: ServerMessage) -> bool {
        match self.reply.try_send(&self.user_id, msg) {
            Ok(()) => true,
            Err(e) => {
                debug!(user_id = %self.user_id, error = %e, "Dropped reply");
                false
            }
        }
    }
}

/// Point-in-time counters for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub connections: usize,
    pub rooms: usize,
}

#[derive(Debug, Default)]
struct HubState {
    registry: ConnectionRegistry,
    directory: RoomDirectory,
}

/// The signaling relay. Share it behind an `Arc`.
#[derive(Debug)]
pub struct SignalingHub {
    state: Mutex<HubState>,
    settings: RelaySettings,
}

impl Default for SignalingHub {
    fn default() -> Self {
        Self::new(RelaySettings::default())
    }
}

impl SignalingHub {
    pub fn new(settings: RelaySettings) -> Self {
        Self {
            state: Mutex::new(HubState::default()),
            settings,
        }
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Register a new connection for `user_id` and open it.
    ///
    /// The returned receiver carries every frame addressed to this
    /// connection; the caller drains it into the socket.
    pub async fn connect(&self, user_id: UserId) -> (Session, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(self.settings.queue_capacity.max(1));
        let connection_id = ConnectionId::new();
        let handle = ClientHandle::new(connection_id, tx);
        let mut session = Session {
            user_id,
            connection_id,
            state: ConnectionState::Connecting,
            reply: handle.clone(),
        };

        let superseded = {
            let mut state = self.state.lock().await;
            state
                .registry
                .register(session.user_id.clone(), handle)
                .is_some()
        };
        session.state = ConnectionState::Open;

        if superseded {
            info!(
                user_id = %session.user_id,
                connection_id = %connection_id,
                "New connection supersedes an existing one"
            );
        }
        SignalEventLogger::log(SignalEvent::Connected {
            user_id: session.user_id.clone(),
            connection_id: connection_id.to_string(),
            superseded,
        });

        (session, rx)
    }

    /// Decode and dispatch one text frame. Frames that do not decode are
    /// dropped without a reply.
    pub async fn handle_frame(&self, session: &Session, text: &str) {
        match decode_client_message(text) {
            Ok(msg) => self.handle_message(session, msg).await,
            Err(e) => {
                debug!(user_id = %session.user_id, error = %e, "Ignoring undecodable frame");
            }
        }
    }

    pub async fn handle_message(&self, session: &Session, msg: ClientMessage) {
        if session.state != ConnectionState::Open {
            debug!(user_id = %session.user_id, kind = msg.kind(), "Frame on non-open connection");
            return;
        }

        let from = session.user_id.clone();
        match msg {
            ClientMessage::Ping => {
                session.reply(ServerMessage::Pong);
            }
            ClientMessage::JoinRoom { room_id } => self.join_room(session, room_id).await,
            ClientMessage::LeaveRoom => self.leave_room(session).await,
            ClientMessage::Offer { target, offer } => {
                self.relay(&target, ServerMessage::Offer { offer, from }).await;
            }
            ClientMessage::Answer { target, answer } => {
                self.relay(&target, ServerMessage::Answer { answer, from }).await;
            }
            ClientMessage::IceCandidate { target, candidate } => {
                self.relay(&target, ServerMessage::IceCandidate { candidate, from })
                    .await;
            }
            ClientMessage::CallUser {
                target,
                call_type,
                caller_name,
            } => {
                let call_type = call_type.unwrap_or_else(|| DEFAULT_CALL_TYPE.to_string());
                let msg = ServerMessage::IncomingCall {
                    from,
                    call_type,
                    caller_name,
                };
                self.relay(&target, msg).await;
            }
            ClientMessage::CallAccepted { target } => {
                self.relay(&target, ServerMessage::CallAccepted { from }).await;
            }
            ClientMessage::CallRejected { target } => {
                self.relay(&target, ServerMessage::CallRejected { from }).await;
            }
            ClientMessage::CallEnded { target } => {
                self.relay(&target, ServerMessage::CallEnded { from }).await;
            }
            ClientMessage::Unknown => {
                debug!(user_id = %session.user_id, "Ignoring unknown message type");
            }
        }
    }

    /// Close the session and release what it holds. Runs once; later calls
    /// are no-ops.
    ///
    /// While a newer connection for the same user is live, the registry
    /// entry and the user's room belong to it and are left alone. Once no
    /// connection is registered for the user, the last one to close cleans up.
    pub async fn disconnect(&self, session: &mut Session) {
        if session.state == ConnectionState::Closed {
            return;
        }
        session.state = ConnectionState::Closed;

        {
            let mut state = self.state.lock().await;
            let replaced = state
                .registry
                .lookup(&session.user_id)
                .is_some_and(|h| h.connection_id != session.connection_id);
            if replaced {
                debug!(
                    user_id = %session.user_id,
                    connection_id = %session.connection_id,
                    "Superseded connection closed"
                );
                return;
            }
            if let Some(departure) = state.directory.leave(&session.user_id) {
                notify_departure(&state.registry, &session.user_id, &departure);
            }
            state
                .registry
                .unregister_connection(&session.user_id, session.connection_id);
        }

        SignalEventLogger::log(SignalEvent::Disconnected {
            user_id: session.user_id.clone(),
            connection_id: session.connection_id.to_string(),
        });
    }

    pub async fn room_of(&self, user_id: &str) -> Option<RoomId> {
        self.state.lock().await.directory.room_of(user_id).cloned()
    }

    pub async fn room_members(&self, room_id: &str) -> Vec<UserId> {
        self.state.lock().await.directory.members(room_id)
    }

    pub async fn is_connected(&self, user_id: &str) -> bool {
        self.state.lock().await.registry.lookup(user_id).is_some()
    }

    pub async fn stats(&self) -> HubStats {
        let state = self.state.lock().await;
        HubStats {
            connections: state.registry.len(),
            rooms: state.directory.room_count(),
        }
    }

    async fn join_room(&self, session: &Session, room_id: RoomId) {
        let user_id = session.user_id();
        let joined = {
            let mut state = self.state.lock().await;
            let joined = state.directory.join(user_id, &room_id);
            if let Some(departure) = &joined.previous {
                notify_departure(&state.registry, user_id, departure);
            }

            let announcement = ServerMessage::UserJoined {
                user_id: user_id.to_string(),
                room_id: room_id.clone(),
            };
            for other in &joined.others {
                state.registry.send(other, announcement.clone());
            }
            session.reply(ServerMessage::RoomJoined {
                room_id: room_id.clone(),
                users: joined.others.clone(),
            });
            joined
        };

        SignalEventLogger::log(SignalEvent::RoomJoined {
            user_id: user_id.to_string(),
            room_id,
            members: joined.others.len() + 1,
        });
    }

    async fn leave_room(&self, session: &Session) {
        let user_id = session.user_id();
        let mut state = self.state.lock().await;
        let departure = state.directory.leave(user_id);
        if let Some(departure) = &departure {
            notify_departure(&state.registry, user_id, departure);
        }
        session.reply(ServerMessage::RoomLeft {
            room_id: departure.map(|d| d.room_id),
        });
    }

    async fn relay(&self, target: &str, msg: ServerMessage) {
        let kind = msg.kind();
        let from = relay_sender(&msg);
        let payload_bytes = payload_size(&msg);

        let delivered = self.state.lock().await.registry.send(target, msg);

        SignalEventLogger::log(SignalEvent::Relayed {
            kind,
            from,
            target: target.to_string(),
            delivered,
            payload_bytes,
        });
    }

    #[cfg(test)]
    async fn check_invariants(&self) -> Result<(), String> {
        self.state.lock().await.directory.check_invariants()
    }
}

/// Tell the rest of a room that `user_id` has gone.
fn notify_departure(registry: &ConnectionRegistry, user_id: &str, departure: &Departure) {
    let msg = ServerMessage::UserLeft {
        user_id: user_id.to_string(),
        room_id: departure.room_id.clone(),
    };
    for member in &departure.remaining {
        registry.send(member, msg.clone());
    }
    SignalEventLogger::log(SignalEvent::RoomLeft {
        user_id: user_id.to_string(),
        room_id: departure.room_id.clone(),
        remaining: departure.remaining.len(),
    });
}

fn relay_sender(msg: &ServerMessage) -> String {
    match msg {
        ServerMessage::Offer { from, .. }
        | ServerMessage::Answer { from, .. }
        | ServerMessage::IceCandidate { from, .. }
        | ServerMessage::IncomingCall { from, .. }
        | ServerMessage::CallAccepted { from }
        | ServerMessage::CallRejected { from }
        | ServerMessage::CallEnded { from } => from.clone(),
        _ => String::new(),
    }
}

/// Encoded size of a relayed SDP/ICE payload.
fn payload_size(msg: &ServerMessage) -> Option<usize> {
    let payload = match msg {
        ServerMessage::Offer { offer, .. } => offer,
        ServerMessage::Answer { answer, .. } => answer,
        ServerMessage::IceCandidate { candidate, .. } => candidate,
        _ => return None,
    };
    serde_json::to_vec(payload).map(|b| b.len()).ok()
}
