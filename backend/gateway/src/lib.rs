//! callhub gateway: the signaling relay and its websocket surface.
//!
//! Browsers connect to `/ws/signaling/{user_id}` and exchange WebRTC offers,
//! answers, ICE candidates and call-control events through the hub, grouped
//! into rooms. Payloads are relayed, never interpreted.

pub mod coordinator;
pub mod directory;
pub mod health_api;
pub mod registry;
pub mod server;
pub mod ws_server;

pub use coordinator::{ConnectionState, HubStats, RelaySettings, Session, SignalingHub};
pub use directory::{Departure, Joined, RoomDirectory};
pub use registry::{ClientHandle, ConnectionRegistry};
pub use server::{build_router, serve, GatewayState};
