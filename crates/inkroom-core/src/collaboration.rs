//! Realtime broadcast codec for sharing committed shapes across a room.
//!
//! Every local commit is relayed as one event carrying exactly one shape:
//!
//! ```json
//! {"event": "ADD_SHAPE", "payload": {"id": "…", "type": "line", "x1": 0, …}}
//! ```
//!
//! There are no sequence numbers; receivers append in arrival order.

use crate::shapes::{Shape, ShapeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors decoding an incoming broadcast.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed broadcast: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid shape in broadcast: {0}")]
    InvalidShape(#[from] ShapeError),
}

/// Events exchanged on a room channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum BroadcastEvent {
    #[serde(rename = "ADD_SHAPE")]
    AddShape(Shape),
}

impl BroadcastEvent {
    pub fn shape(&self) -> &Shape {
        match self {
            BroadcastEvent::AddShape(shape) => shape,
        }
    }

    pub fn into_shape(self) -> Shape {
        match self {
            BroadcastEvent::AddShape(shape) => shape,
        }
    }
}

/// Name of the broadcast channel for a room.
pub fn channel_name(room_id: &str) -> String {
    format!("room:{room_id}")
}

/// Encode a locally committed shape for the wire.
pub fn encode_event(shape: &Shape) -> Result<String, serde_json::Error> {
    serde_json::to_string(&BroadcastEvent::AddShape(shape.clone()))
}

/// Decode and validate an incoming broadcast.
pub fn decode_event(json: &str) -> Result<BroadcastEvent, WireError> {
    let event: BroadcastEvent = serde_json::from_str(json)?;
    event.shape().validate()?;
    Ok(event)
}
