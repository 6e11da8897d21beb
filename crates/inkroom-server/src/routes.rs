//! HTTP and WebSocket handlers.

use crate::state::{AppState, RoomEvent, Session};
use axum::{
    Json,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use inkroom_core::document::Document;
use inkroom_core::shapes::Shape;
use inkroom_core::storage::{DrawingRecord, StorageError};
use inkroom_core::sync::{ClientMessage, ServerMessage};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Index page
pub async fn index() -> &'static str {
    "Inkroom relay server - connect via WebSocket at /ws"
}

/// Health check
pub async fn health() -> &'static str {
    "ok"
}

fn storage_error(room: &str, e: StorageError) -> Response {
    match e {
        StorageError::NotFound(_) => (StatusCode::NOT_FOUND, format!("No drawing for room {room}")).into_response(),
        other => {
            error!("Storage failure for room {}: {}", room, other);
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
        }
    }
}

/// `GET /rooms/{room}/drawing`: the stored shape list.
pub async fn get_drawing(State(state): State<Arc<AppState>>, Path(room): Path<String>) -> Response {
    match state.storage.load(&room).await {
        Ok(record) => Json(record.shapes).into_response(),
        Err(e) => storage_error(&room, e),
    }
}

/// `PUT /rooms/{room}/drawing`: upsert the whole shape list.
pub async fn put_drawing(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
    Json(shapes): Json<Vec<Shape>>,
) -> Response {
    let document = match Document::from_shapes(shapes) {
        Ok(document) => document,
        Err(e) => return (StatusCode::BAD_REQUEST, format!("Invalid shape: {e}")).into_response(),
    };
    match state.storage.save(&DrawingRecord::new(room.as_str(), &document)).await {
        Ok(()) => {
            info!("Saved {} shapes for room {}", document.len(), room);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => storage_error(&room, e),
    }
}

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn to_message(msg: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(msg) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            error!("Failed to encode {:?}: {}", msg, e);
            None
        }
    }
}

/// Next event from the joined room, or never when there is none.
async fn next_room_event(rx: &mut Option<tokio::sync::broadcast::Receiver<RoomEvent>>) -> Option<RoomEvent> {
    match rx {
        Some(rx) => loop {
            match rx.recv().await {
                Ok(event) => return Some(event),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Receiver lagged, skipped {} events", n);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => return None,
            }
        },
        None => std::future::pending().await,
    }
}

enum Incoming {
    Client(Option<Result<Message, axum::Error>>),
    Room(Option<RoomEvent>),
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let mut session = Session::new(Uuid::new_v4().to_string());
    info!("New connection: {}", session.peer_id);

    let (mut sender, mut receiver) = socket.split();

    loop {
        let incoming = tokio::select! {
            msg = receiver.next() => Incoming::Client(msg),
            event = next_room_event(&mut session.rx) => Incoming::Room(event),
        };

        let out = match incoming {
            Incoming::Client(msg) => match msg {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => session.handle(&state, client_msg),
                    Err(e) => {
                        warn!("Invalid message from {}: {}", session.peer_id, e);
                        Some(ServerMessage::Error {
                            message: format!("Invalid message: {e}"),
                        })
                    }
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => None, // Ignore binary and ping/pong
                Some(Err(e)) => {
                    warn!("WebSocket error for {}: {}", session.peer_id, e);
                    break;
                }
            },
            // Don't echo back to sender
            Incoming::Room(Some((from, _))) if from == session.peer_id => None,
            Incoming::Room(Some((_, server_msg))) => Some(server_msg),
            Incoming::Room(None) => {
                session.rx = None;
                None
            }
        };

        if let Some(message) = out.as_ref().and_then(to_message) {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    }

    session.leave(&state);
    info!("Connection closed: {}", session.peer_id);
}
