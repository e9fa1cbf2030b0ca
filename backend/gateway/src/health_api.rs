//! Health API
//!
//! `GET /health`: process liveness plus live connection and room counts.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub connections: usize,
    pub rooms: usize,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let stats = state.hub.stats().await;
    Json(HealthReport {
        status: "ok",
        connections: stats.connections,
        rooms: stats.rooms,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}
