//! Room Directory.
//!
//! Room membership plus the reverse user -> room index. A room exists only
//! while it has members, and a user is in at most one room.

use std::collections::{HashMap, HashSet};

use callhub_core::{RoomId, UserId};

/// A user left `room_id`; `remaining` still need to hear about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    pub remaining: Vec<UserId>,
}

/// Result of [`RoomDirectory::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// The room the user was moved out of, if it was a different one.
    pub previous: Option<Departure>,
    /// Members of the joined room other than the joining user.
    pub others: Vec<UserId>,
}

#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomId, HashSet<UserId>>,
    membership: HashMap<UserId, RoomId>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `user_id` in `room_id`, moving it out of its current room first.
    pub fn join(&mut self, user_id: &str, room_id: &str) -> Joined {
        let moving = self
            .membership
            .get(user_id)
            .is_some_and(|current| current != room_id);
        let previous = if moving { self.leave(user_id) } else { None };

        let members = self.rooms.entry(room_id.to_string()).or_default();
        members.insert(user_id.to_string());
        let others = members
            .iter()
            .filter(|m| m.as_str() != user_id)
            .cloned()
            .collect();
        self.membership
            .insert(user_id.to_string(), room_id.to_string());

        Joined { previous, others }
    }

    /// Take `user_id` out of its room. `None` if it was in no room.
    pub fn leave(&mut self, user_id: &str) -> Option<Departure> {
        let room_id = self.membership.remove(user_id)?;
        let mut remaining = Vec::new();
        if let Some(members) = self.rooms.get_mut(&room_id) {
            members.remove(user_id);
            if members.is_empty() {
                self.rooms.remove(&room_id);
            } else {
                remaining = members.iter().cloned().collect();
            }
        }
        Some(Departure { room_id, remaining })
    }

    pub fn room_of(&self, user_id: &str) -> Option<&RoomId> {
        self.membership.get(user_id)
    }

    /// Members of `room_id`, empty if the room does not exist.
    pub fn members(&self, room_id: &str) -> Vec<UserId> {
        self.rooms
            .get(room_id)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Check the structural invariants, returning the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (room_id, members) in &self.rooms {
            if members.is_empty() {
                return Err(format!("room {room_id} is empty"));
            }
            for member in members {
                if self.membership.get(member) != Some(room_id) {
                    return Err(format!("{member} in room {room_id} has no matching index entry"));
                }
            }
        }
        for (user_id, room_id) in &self.membership {
            let listed = self
                .rooms
                .get(room_id)
                .is_some_and(|m| m.contains(user_id));
            if !listed {
                return Err(format!("index says {user_id} is in {room_id} but the room disagrees"));
            }
        }
        Ok(())
    }
}
