//! The per-connection WebSocket endpoint.
//!
//! Translates between socket frames and hub calls: one task pumps the
//! session's notification channel into the sink, the read loop parses
//! frames into `ClientEvent`s and dispatches them. When the hub drops a
//! session (ban), the channel closes, the pump drains what is queued and
//! closes the socket.

use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::hub::{Hub, HubError};
use crate::protocol::{ClientEvent, ServerEvent};
use crate::Config;

#[derive(Deserialize)]
pub struct WsQuery {
    admin_token: Option<String>,
}

#[debug_handler(state = crate::AppState)]
pub async fn chat_ws(
    State(hub): State<Arc<Hub>>,
    State(config): State<Config>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let is_admin = query.admin_token.as_deref() == Some(config.admin_token.as_str());
    let fingerprint = headers
        .get("x-fingerprint")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    ws.on_upgrade(move |socket| handle_socket(hub, socket, fingerprint, is_admin))
}

async fn handle_socket(
    hub: Arc<Hub>,
    socket: WebSocket,
    fingerprint: Option<String>,
    is_admin: bool,
) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let id = match hub.connect(fingerprint, is_admin, tx) {
        Ok(id) => id,
        Err(HubError::Banned { reason, duration }) => {
            let event = ServerEvent::Banned {
                reason,
                duration_minutes: duration.map(|d| d.whole_minutes() as u64),
            };
            if let Ok(text) = serde_json::to_string(&event) {
                let _ = sink.send(Message::Text(text.into())).await;
            }
            let _ = sink.close().await;
            return;
        }
        Err(err) => {
            debug!(%err, "connection refused");
            let _ = sink.close().await;
            return;
        }
    };

    let mut pump = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else { continue };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        // Channel closed: the hub dropped the session (ban) or we broke
        // out above. Either way the socket is done.
        let _ = sink.close().await;
    });

    loop {
        tokio::select! {
            _ = &mut pump => break,
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => hub.dispatch(id, event),
                        Err(err) => hub.reject(id, &format!("invalid request: {err}")),
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    }

    pump.abort();
    hub.disconnect(id);
}
