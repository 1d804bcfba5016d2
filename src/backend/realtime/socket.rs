/**
 * Chat WebSocket Transport
 *
 * `GET /ws/chat/{room_id}` upgrades to a websocket and drives a
 * `ChatSession` over it.
 *
 * The caller is identified by `Authorization: Bearer <jwt>` or, for
 * browsers that cannot set headers on a websocket, `?token=<jwt>`. A
 * missing or invalid token makes the connection anonymous; the session
 * then rejects it.
 *
 * Rejected connections receive a policy-violation close frame and
 * nothing else. If the store cannot be reached while resolving the token,
 * the connection is closed with an internal-error close frame instead.
 */

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderMap,
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde::Deserialize;
use tokio::time::interval;

use crate::backend::chat::service::ChatService;
use crate::backend::error::{BackendResult, ErrorKind};
use crate::backend::middleware::auth::{bearer_token, resolve_identity};
use crate::backend::middleware::extract::{ApiPath, ApiQuery};
use crate::backend::realtime::session::{ChatSession, Connect};
use crate::backend::server::state::AppState;
use crate::shared::chat::{Identity, RoomId};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
pub struct SocketQuery {
    pub token: Option<String>,
}

/// Upgrade handler for `GET /ws/chat/{room_id}`
pub async fn chat_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    ApiPath(room_id): ApiPath<RoomId>,
    ApiQuery(query): ApiQuery<SocketQuery>,
    headers: HeaderMap,
) -> Response {
    let token = bearer_token(&headers).map(str::to_string).or(query.token);

    match socket_identity(&state, token.as_deref()).await {
        Ok(identity) => {
            let chat = state.chat.clone();
            ws.on_upgrade(move |socket| handle_chat_socket(socket, chat, identity, room_id))
        }
        Err(err) => {
            tracing::error!(
                "[Realtime] Could not resolve identity for room {}: {:?}",
                room_id,
                err
            );
            ws.on_upgrade(|socket| async move {
                let (mut sender, _) = socket.split();
                close_with(&mut sender, close_code::ERROR).await;
            })
        }
    }
}

/// Identity behind an optional socket token
///
/// A missing, invalid or unknown-user token is anonymous (`Ok(None)`). Only
/// store failures are errors.
pub(crate) async fn socket_identity(
    state: &AppState,
    token: Option<&str>,
) -> BackendResult<Option<Identity>> {
    let Some(token) = token else {
        return Ok(None);
    };

    match resolve_identity(&state.pool, &state.jwt_secret, token).await {
        Ok(identity) => Ok(Some(identity)),
        Err(err) if err.kind() == ErrorKind::Internal => Err(err),
        Err(err) => {
            tracing::debug!("[Realtime] Treating connection as anonymous: {}", err);
            Ok(None)
        }
    }
}

async fn close_with(sender: &mut SplitSink<WebSocket, Message>, code: u16) {
    let _ = sender
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: "".into(),
        })))
        .await;
}

async fn handle_chat_socket(
    socket: WebSocket,
    chat: ChatService,
    identity: Option<Identity>,
    room_id: RoomId,
) {
    let (mut sender, mut incoming) = socket.split();

    let (session, mut events) = match ChatSession::connect(&chat, identity, room_id).await {
        Ok(Connect::Joined(session, events)) => (session, events),
        Ok(Connect::Rejected(_)) => {
            close_with(&mut sender, close_code::POLICY).await;
            return;
        }
        Err(err) => {
            tracing::error!("[Realtime] Failed to open session for room {}: {:?}", room_id, err);
            close_with(&mut sender, close_code::ERROR).await;
            return;
        }
    };

    let mut heartbeat = interval(HEARTBEAT_INTERVAL);
    loop {
        tokio::select! {
            event = events.recv() => {
                // The hub closes the queue when this connection falls behind.
                let Some(event) = event else {
                    break;
                };
                let payload = match event.to_json() {
                    Ok(payload) => payload,
                    Err(err) => {
                        tracing::error!("[Realtime] Failed to encode {}: {}", event.event_name(), err);
                        continue;
                    }
                };
                if sender.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            frame = incoming.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => session.handle_text(text.as_str()).await,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::debug!("[Realtime] Transport error on {}: {}", session.connection_id(), err);
                        break;
                    }
                }
            }
            _ = heartbeat.tick() => {
                if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    session.close();
}
