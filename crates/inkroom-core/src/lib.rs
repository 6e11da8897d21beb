//! Inkroom Core Library
//!
//! Platform-agnostic document model, gesture handling, undo/redo and export
//! for the Inkroom shared whiteboard.

pub mod collaboration;
pub mod config;
pub mod document;
pub mod effect;
pub mod export;
pub mod frame;
pub mod geometry;
pub mod history;
pub mod shapes;
pub mod shortcuts;
pub mod storage;
pub mod sync;
pub mod tools;
pub mod whiteboard;

pub use collaboration::{BroadcastEvent, WireError, channel_name, decode_event, encode_event};
pub use config::{ConfigError, EngineConfig};
pub use document::Document;
pub use effect::{Effect, Effects};
pub use export::{SvgExporter, export_svg};
pub use history::History;
pub use hit_test::{HIT_TOLERANCE, find_topmost_hit};
pub use shapes::{Geometry, Shape, ShapeError, ShapeId, ShapeKind};
pub use tools::{InteractionSession, ToolKind, ToolManager};
pub use whiteboard::Whiteboard;
