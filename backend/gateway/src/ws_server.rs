//! WebSocket entrypoint and connection handler.
//!
//! One task per socket reads frames in order and hands them to the hub; a
//! writer task drains the connection's outbound queue into the socket, with
//! every write bounded by the relay's write timeout.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use callhub_core::{HubError, ServerMessage};
use futures::{
    sink::{Sink, SinkExt},
    stream::StreamExt,
};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::server::GatewayState;

/// `GET /ws/signaling/:user_id`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
    State(state): State<GatewayState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, user_id, state))
}

async fn handle_connection(socket: WebSocket, user_id: String, state: GatewayState) {
    let hub = state.hub;
    let (sender, mut receiver) = socket.split();
    let (mut session, rx) = hub.connect(user_id).await;
    info!(
        user_id = %session.user_id(),
        connection_id = %session.connection_id(),
        "Signaling connection opened"
    );

    let write_timeout = hub.settings().write_timeout;
    let mut send_task = tokio::spawn(writer_loop(sender, rx, write_timeout));

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => hub.handle_frame(&session, &text).await,
                Some(Ok(Message::Close(frame))) => {
                    debug!(user_id = %session.user_id(), reason = ?frame, "Client initiated close");
                    break;
                }
                // No binary protocol; ping/pong is answered by the transport.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(user_id = %session.user_id(), error = %e, "WebSocket receive error");
                    break;
                }
                None => break,
            },
            result = &mut send_task => {
                match result {
                    Ok(Err(e)) => warn!(user_id = %session.user_id(), error = %e, "Writer stopped"),
                    Err(e) => warn!(user_id = %session.user_id(), error = %e, "Writer task failed"),
                    Ok(Ok(())) => {}
                }
                break;
            }
        }
    }

    send_task.abort();
    hub.disconnect(&mut session).await;

    info!(
        user_id = %session.user_id(),
        connection_id = %session.connection_id(),
        "Signaling connection closed"
    );
}

/// Forward queued frames to the socket until the queue closes or a write
/// fails or stalls.
async fn writer_loop<S>(
    mut sink: S,
    mut rx: mpsc::Receiver<ServerMessage>,
    write_timeout: Duration,
) -> Result<(), HubError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    while let Some(msg) = rx.recv().await {
        let json = serde_json::to_string(&msg)?;
        match timeout(write_timeout, sink.send(Message::Text(json))).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(HubError::Transport(e.to_string())),
            Err(_) => return Err(HubError::WriteTimeout(write_timeout)),
        }
    }
    Ok(())
}
