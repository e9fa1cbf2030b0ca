//! Connection Registry.
//!
//! Maps each user to the outbound queue of its current websocket. The
//! registry does no locking of its own; the signaling hub owns it inside its
//! critical section.

use std::collections::HashMap;

use callhub_core::{ConnectionId, HubError, ServerMessage, UserId};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

pub type ClientSender = mpsc::Sender<ServerMessage>;

/// Outbound side of one live connection.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub connection_id: ConnectionId,
    sender: ClientSender,
}

impl ClientHandle {
    pub fn new(connection_id: ConnectionId, sender: ClientSender) -> Self {
        Self {
            connection_id,
            sender,
        }
    }

    /// Queue a frame without waiting. Fails when the queue is full or the
    /// connection's writer is gone.
    pub fn try_send(&self, user_id: &str, msg: ServerMessage) -> Result<(), HubError> {
        self.sender.try_send(msg).map_err(|e| match e {
            TrySendError::Full(_) => HubError::QueueFull(user_id.to_string()),
            TrySendError::Closed(_) => HubError::ChannelClosed(user_id.to_string()),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// user id -> live connection. Last registration wins.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<UserId, ClientHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace the connection for `user_id`.
    ///
    /// The replaced handle is returned but not closed; the old socket is left
    /// to fail on its own.
    pub fn register(&mut self, user_id: UserId, handle: ClientHandle) -> Option<ClientHandle> {
        let previous = self.connections.insert(user_id, handle);
        debug!(replaced = previous.is_some(), "Connection registered");
        previous
    }

    /// Remove whatever connection is registered for `user_id`.
    pub fn unregister(&mut self, user_id: &str) -> Option<ClientHandle> {
        self.connections.remove(user_id)
    }

    /// Remove the entry for `user_id` only if it still belongs to
    /// `connection_id`. Returns whether an entry was removed.
    pub fn unregister_connection(&mut self, user_id: &str, connection_id: ConnectionId) -> bool {
        self.is_current(user_id, connection_id) && self.unregister(user_id).is_some()
    }

    pub fn lookup(&self, user_id: &str) -> Option<&ClientHandle> {
        self.connections.get(user_id)
    }

    /// Whether `connection_id` is the authoritative connection for `user_id`.
    pub fn is_current(&self, user_id: &str, connection_id: ConnectionId) -> bool {
        self.connections
            .get(user_id)
            .is_some_and(|h| h.connection_id == connection_id)
    }

    /// Queue `msg` for `user_id`.
    pub fn deliver(&self, user_id: &str, msg: ServerMessage) -> Result<(), HubError> {
        match self.connections.get(user_id) {
            Some(handle) => handle.try_send(user_id, msg),
            None => Err(HubError::NotConnected(user_id.to_string())),
        }
    }

    /// Best-effort delivery. `false` means the frame was dropped; it is
    /// never retried.
    pub fn send(&self, user_id: &str, msg: ServerMessage) -> bool {
        match self.deliver(user_id, msg) {
            Ok(()) => true,
            Err(e) => {
                debug!(user_id = %user_id, error = %e, "Dropped outbound frame");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(capacity: usize) -> (ClientHandle, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (ClientHandle::new(ConnectionId::new(), tx), rx)
    }

    #[tokio::test]
    async fn send_to_registered_user() {
        let mut registry = ConnectionRegistry::new();
        let (h, mut rx) = handle(4);
        registry.register("alice".into(), h);

        assert!(registry.send("alice", ServerMessage::Pong));
        assert_eq!(rx.recv().await, Some(ServerMessage::Pong));
    }

    #[test]
    fn send_to_unknown_user_is_false() {
        let registry = ConnectionRegistry::new();
        assert!(!registry.send("ghost", ServerMessage::Pong));
        assert!(matches!(
            registry.deliver("ghost", ServerMessage::Pong),
            Err(HubError::NotConnected(_))
        ));
    }

    #[test]
    fn send_to_closed_channel_is_false() {
        let mut registry = ConnectionRegistry::new();
        let (h, rx) = handle(4);
        registry.register("alice".into(), h);
        drop(rx);

        assert!(registry.lookup("alice").unwrap().is_closed());
        assert!(!registry.send("alice", ServerMessage::Pong));
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let mut registry = ConnectionRegistry::new();
        let (h, _rx) = handle(1);
        registry.register("alice".into(), h);

        assert!(registry.send("alice", ServerMessage::Pong));
        assert!(matches!(
            registry.deliver("alice", ServerMessage::Pong),
            Err(HubError::QueueFull(_))
        ));
    }

    #[tokio::test]
    async fn register_replaces_previous_connection() {
        let mut registry = ConnectionRegistry::new();
        let (old, mut old_rx) = handle(4);
        let (new, mut new_rx) = handle(4);
        let old_id = old.connection_id;

        assert!(registry.register("alice".into(), old).is_none());
        let replaced = registry.register("alice".into(), new).unwrap();
        assert_eq!(replaced.connection_id, old_id);
        assert_eq!(registry.len(), 1);

        assert!(registry.send("alice", ServerMessage::Pong));
        assert_eq!(new_rx.recv().await, Some(ServerMessage::Pong));
        assert!(old_rx.try_recv().is_err());
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut registry = ConnectionRegistry::new();
        let (h, _rx) = handle(4);
        registry.register("alice".into(), h);

        assert!(registry.unregister("alice").is_some());
        assert!(registry.unregister("alice").is_none());
        assert!(registry.lookup("alice").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn stale_connection_cannot_unregister_replacement() {
        let mut registry = ConnectionRegistry::new();
        let (old, _old_rx) = handle(4);
        let (new, _new_rx) = handle(4);
        let old_id = old.connection_id;
        let new_id = new.connection_id;
        registry.register("alice".into(), old);
        registry.register("alice".into(), new);

        assert!(!registry.unregister_connection("alice", old_id));
        assert!(registry.is_current("alice", new_id));
        assert!(registry.unregister_connection("alice", new_id));
        assert!(registry.lookup("alice").is_none());
    }
}
