//! Slateboard Relay Server
//!
//! Relays room traffic between whiteboard clients and serves the room
//! history for late joiners.
//!
//! ## Protocol
//!
//! Frames are JSON with the following format:
//! ```json
//! { "type": "join_room", "roomId": "42" }
//! { "type": "chat", "roomId": "42", "message": "{\"shape\":{...}}" }
//! { "type": "erase", "roomId": "42", "message": "{\"shapesToErase\":[...]}" }
//! ```
//!
//! The `message` field carries its payload as an independently JSON-encoded
//! string; the server relays it opaquely except for history bookkeeping.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{
    collections::{HashSet, VecDeque},
    net::SocketAddr,
    sync::Arc,
};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use uuid::Uuid;

/// Server configuration
const MAX_ROOM_HISTORY: usize = 1000;
const CHANNEL_CAPACITY: usize = 256;

/// A frame exchanged with clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// Subscribe to a room
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    /// A shape create; `message` is the JSON-encoded chat payload
    Chat {
        #[serde(rename = "roomId")]
        room_id: String,
        message: String,
    },
    /// A shape erase; `message` is the JSON-encoded erase payload
    Erase {
        #[serde(rename = "roomId")]
        room_id: String,
        message: String,
    },
}

/// Room state
struct Room {
    /// Broadcast channel for this room; (sender peer id, raw frame)
    tx: broadcast::Sender<(String, String)>,
    /// Connected peer IDs
    peers: HashSet<String>,
    /// Stored chat payloads in paint order, bounded
    history: VecDeque<String>,
}

impl Room {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            peers: HashSet::new(),
            history: VecDeque::new(),
        }
    }
}

/// Shared application state
struct AppState {
    /// Active rooms
    rooms: DashMap<String, Room>,
}

impl AppState {
    fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Add peer to room, returning a receiver for its traffic
    fn join_room(&self, room_id: &str, peer_id: &str) -> broadcast::Receiver<(String, String)> {
        let mut room = self
            .rooms
            .entry(room_id.to_string())
            .or_insert_with(Room::new);
        room.peers.insert(peer_id.to_string());
        room.tx.subscribe()
    }

    /// Remove peer from room
    ///
    /// Rooms keep their history while empty so reconnecting clients can
    /// backfill; only the broadcast plumbing goes away with the last peer.
    fn leave_room(&self, room_id: &str, peer_id: &str) {
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            room.peers.remove(peer_id);
        }
    }

    /// Record a chat payload in the room history
    fn record_chat(&self, room_id: &str, message: &str) {
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            if room.history.len() >= MAX_ROOM_HISTORY {
                room.history.pop_front();
            }
            room.history.push_back(message.to_string());
        }
    }

    /// Drop erased shapes from the room history
    ///
    /// The erase payload carries full shape objects; only their ids matter
    /// here.
    fn prune_history(&self, room_id: &str, erase_message: &str) {
        let ids: HashSet<String> = match serde_json::from_str::<serde_json::Value>(erase_message) {
            Ok(payload) => payload["shapesToErase"]
                .as_array()
                .map(|a| {
                    a.iter()
                        .filter_map(|v| v["id"].as_str().map(String::from))
                        .collect()
                })
                .unwrap_or_default(),
            Err(e) => {
                warn!("Unparseable erase payload for room {}: {}", room_id, e);
                return;
            }
        };
        if ids.is_empty() {
            return;
        }
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            room.history.retain(|message| {
                serde_json::from_str::<serde_json::Value>(message)
                    .ok()
                    .and_then(|v| v["shape"]["id"].as_str().map(String::from))
                    .is_none_or(|id| !ids.contains(&id))
            });
        }
    }

    /// Broadcast a raw frame to a room
    fn broadcast(&self, room_id: &str, from: &str, raw: &str) {
        if let Some(room) = self.rooms.get(room_id) {
            let _ = room.tx.send((from.to_string(), raw.to_string()));
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slateboard_server=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new());

    let app = Router::new()
        .route("/", get(index))
        .route("/ws", get(ws_handler))
        .route("/room/chat/{room_id}", get(room_history))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3030));
    info!("Slateboard relay server listening on {}", addr);
    info!("WebSocket endpoint: ws://localhost:3030/ws");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Index page
async fn index() -> &'static str {
    "Slateboard Relay Server - Connect via WebSocket at /ws"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Room history for late joiners, oldest first
async fn room_history(
    Path(room_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let messages: Vec<serde_json::Value> = state
        .rooms
        .get(&room_id)
        .map(|room| {
            room.history
                .iter()
                .map(|message| json!({ "message": message }))
                .collect()
        })
        .unwrap_or_default();
    Json(json!({ "messages": messages }))
}

/// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let peer_id = Uuid::new_v4().to_string();
    info!("New connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let mut current_room: Option<String> = None;
    let mut room_rx: Option<broadcast::Receiver<(String, String)>> = None;

    loop {
        tokio::select! {
            // Handle incoming frames from the client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let wire_msg = match serde_json::from_str::<WireMessage>(&text) {
                            Ok(m) => m,
                            Err(e) => {
                                warn!("Invalid frame from {}: {}", peer_id, e);
                                continue;
                            }
                        };
                        match wire_msg {
                            WireMessage::JoinRoom { room_id } => {
                                if let Some(ref old_room) = current_room {
                                    state.leave_room(old_room, &peer_id);
                                }
                                room_rx = Some(state.join_room(&room_id, &peer_id));
                                info!("Peer {} joined room {}", peer_id, room_id);
                                current_room = Some(room_id);
                            }
                            WireMessage::Chat { room_id, message } => {
                                if current_room.as_deref() != Some(room_id.as_str()) {
                                    warn!("Peer {} sent chat for room {} without joining", peer_id, room_id);
                                    continue;
                                }
                                state.record_chat(&room_id, &message);
                                state.broadcast(&room_id, &peer_id, &text);
                            }
                            WireMessage::Erase { room_id, message } => {
                                if current_room.as_deref() != Some(room_id.as_str()) {
                                    warn!("Peer {} sent erase for room {} without joining", peer_id, room_id);
                                    continue;
                                }
                                state.prune_history(&room_id, &message);
                                state.broadcast(&room_id, &peer_id, &text);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Ok(_)) => {} // Ignore binary, ping, pong
                    Some(Err(e)) => {
                        warn!("WebSocket error for {}: {}", peer_id, e);
                        break;
                    }
                }
            }

            // Relay traffic from the room
            msg = async {
                match &mut room_rx {
                    Some(rx) => rx.recv().await.ok(),
                    None => {
                        // No room joined, just wait forever
                        std::future::pending::<Option<(String, String)>>().await
                    }
                }
            } => {
                if let Some((from, raw)) = msg {
                    // Don't echo back to sender
                    if from != peer_id {
                        if sender.send(Message::Text(raw.into())).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    // Cleanup on disconnect
    if let Some(ref room) = current_room {
        state.leave_room(room, &peer_id);
    }
    info!("Connection closed: {}", peer_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_frame_parsing() {
        let join: WireMessage =
            serde_json::from_str(r#"{"type":"join_room","roomId":"42"}"#).unwrap();
        assert!(matches!(join, WireMessage::JoinRoom { room_id } if room_id == "42"));

        let chat: WireMessage = serde_json::from_str(
            r#"{"type":"chat","roomId":"42","message":"{\"shape\":{}}"}"#,
        )
        .unwrap();
        assert!(matches!(chat, WireMessage::Chat { .. }));
    }

    #[test]
    fn test_history_is_bounded() {
        let state = AppState::new();
        state.join_room("r", "p");
        for i in 0..(MAX_ROOM_HISTORY + 10) {
            state.record_chat("r", &format!(r#"{{"shape":{{"id":"{i}"}}}}"#));
        }
        let room = state.rooms.get("r").unwrap();
        assert_eq!(room.history.len(), MAX_ROOM_HISTORY);
        // Oldest rows were dropped
        assert!(room.history.front().unwrap().contains(r#""id":"10""#));
    }

    #[test]
    fn test_erase_prunes_history() {
        let state = AppState::new();
        state.join_room("r", "p");
        state.record_chat("r", r#"{"shape":{"id":"a","type":"line"}}"#);
        state.record_chat("r", r#"{"shape":{"id":"b","type":"line"}}"#);
        state.prune_history("r", r#"{"shapesToErase":[{"id":"a","type":"line"}]}"#);

        let room = state.rooms.get("r").unwrap();
        assert_eq!(room.history.len(), 1);
        assert!(room.history[0].contains(r#""id":"b""#));
    }

    #[test]
    fn test_history_survives_empty_room() {
        let state = AppState::new();
        state.join_room("r", "p");
        state.record_chat("r", r#"{"shape":{"id":"a"}}"#);
        state.leave_room("r", "p");
        assert!(state.rooms.get("r").is_some());
        assert_eq!(state.rooms.get("r").unwrap().history.len(), 1);
    }
}
