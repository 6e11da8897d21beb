//! Room bookkeeping and per-connection session logic.

use dashmap::DashMap;
use inkroom_core::storage::Storage;
use inkroom_core::sync::{ClientMessage, ServerMessage};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

const CHANNEL_CAPACITY: usize = 256;

/// A relayed message tagged with the peer that sent it.
pub type RoomEvent = (String, ServerMessage);

/// Room state
struct Room {
    /// Broadcast channel for this room
    tx: broadcast::Sender<RoomEvent>,
    /// Connected peer IDs
    peers: HashSet<String>,
}

impl Room {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            peers: HashSet::new(),
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Active rooms
    rooms: DashMap<String, Room>,
    /// Whole-document persistence, keyed by room
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            rooms: DashMap::new(),
            storage,
        }
    }

    /// Add peer to room, returning its receiver and the new peer count.
    pub fn join_room(&self, room_id: &str, peer_id: &str) -> (broadcast::Receiver<RoomEvent>, usize) {
        let mut room = self.rooms.entry(room_id.to_string()).or_insert_with(Room::new);
        room.peers.insert(peer_id.to_string());
        (room.tx.subscribe(), room.peers.len())
    }

    /// Remove peer from room. Empty rooms are dropped.
    pub fn leave_room(&self, room_id: &str, peer_id: &str) {
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            room.peers.remove(peer_id);
        }
        // Checked under the shard lock, so a peer joining meanwhile keeps the room.
        self.rooms.remove_if(room_id, |_, room| room.peers.is_empty());
    }

    /// Broadcast message to room
    pub fn broadcast(&self, room_id: &str, from: &str, msg: ServerMessage) {
        if let Some(room) = self.rooms.get(room_id) {
            // No receivers is fine.
            let _ = room.tx.send((from.to_string(), msg));
        }
    }

    pub fn peer_count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map_or(0, |room| room.peers.len())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

/// One connected client.
pub struct Session {
    pub peer_id: String,
    pub room: Option<String>,
    pub rx: Option<broadcast::Receiver<RoomEvent>>,
}

impl Session {
    pub fn new(peer_id: String) -> Self {
        Self {
            peer_id,
            room: None,
            rx: None,
        }
    }

    /// Apply a client message. Returns the direct reply to the sender, if any.
    pub fn handle(&mut self, state: &AppState, msg: ClientMessage) -> Option<ServerMessage> {
        match msg {
            ClientMessage::Join { room } => {
                self.leave(state);
                let (rx, peer_count) = state.join_room(&room, &self.peer_id);
                self.rx = Some(rx);
                self.room = Some(room.clone());
                state.broadcast(&room, &self.peer_id, ServerMessage::PeerJoined {
                    peer_id: self.peer_id.clone(),
                });
                info!("Peer {} joined room {}", self.peer_id, room);
                Some(ServerMessage::Joined { room, peer_count })
            }
            ClientMessage::Leave => {
                self.leave(state);
                None
            }
            ClientMessage::AddShape { shape } => {
                let Some(room) = &self.room else {
                    return Some(ServerMessage::Error {
                        message: "Join a room before adding shapes".to_string(),
                    });
                };
                if let Err(e) = shape.validate() {
                    warn!("Rejected shape from {}: {}", self.peer_id, e);
                    return Some(ServerMessage::Error {
                        message: format!("Invalid shape: {e}"),
                    });
                }
                state.broadcast(room, &self.peer_id, ServerMessage::ShapeAdded {
                    from: self.peer_id.clone(),
                    shape,
                });
                None
            }
        }
    }

    /// Leave the current room, telling the remaining peers.
    pub fn leave(&mut self, state: &AppState) {
        if let Some(room) = self.room.take() {
            state.leave_room(&room, &self.peer_id);
            state.broadcast(&room, &self.peer_id, ServerMessage::PeerLeft {
                peer_id: self.peer_id.clone(),
            });
            info!("Peer {} left room {}", self.peer_id, room);
        }
        self.rx = None;
    }
}
