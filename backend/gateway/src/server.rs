//! HTTP/WebSocket server for the signaling hub.
//!
//! The same routes are mounted twice: bare, and under the gateway prefix
//! used when the hub sits behind the application's reverse proxy.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::coordinator::SignalingHub;
use crate::health_api;
use crate::ws_server;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub hub: Arc<SignalingHub>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(hub: Arc<SignalingHub>) -> Self {
        Self {
            hub,
            started_at: Instant::now(),
        }
    }
}

fn signaling_routes() -> Router<GatewayState> {
    Router::new()
        .route("/ws/signaling/:user_id", get(ws_server::ws_handler))
        .route("/health", get(health_api::get_health))
}

/// Build the router. `gateway_prefix` (e.g. `/api`) adds a second mount of
/// every route; an empty prefix disables it.
pub fn build_router(state: GatewayState, gateway_prefix: &str) -> Router {
    let mut app = signaling_routes();
    if !gateway_prefix.is_empty() && gateway_prefix != "/" {
        app = app.nest(gateway_prefix, signaling_routes());
    }
    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `listener` until `shutdown` resolves.
#[instrument(skip_all)]
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = %listener.local_addr()?, "Signaling hub listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Signaling hub stopped");
    Ok(())
}
