//! JSON file storage, one file per room.

use super::{BoxFuture, DrawingRecord, Storage, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each room as `<encoded room id>.json` in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory
    /// if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Storage under the platform data directory, e.g. `~/.local/share/inkroom/rooms/`.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("inkroom").join("rooms"))
    }

    /// File path for a room.
    fn room_path(&self, room_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", encode_room_id(room_id)))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Percent-encode every byte outside `[A-Za-z0-9_-]`, so distinct room ids
/// always map to distinct file names.
fn encode_room_id(room_id: &str) -> String {
    let mut out = String::with_capacity(room_id.len());
    for byte in room_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Inverse of [`encode_room_id`]. `None` for stems it could not have produced.
fn decode_room_id(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = stem.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

impl Storage for FileStorage {
    fn save(&self, record: &DrawingRecord) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.room_path(&record.room_id);
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StorageError::Serialization(e.to_string()));

        Box::pin(async move {
            fs::write(&path, json?).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {e}", path.display()))
            })
        })
    }

    fn load(&self, room_id: &str) -> BoxFuture<'_, StorageResult<DrawingRecord>> {
        let path = self.room_path(room_id);
        let room_id = room_id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(room_id));
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {e}", path.display()))
            })?;
            let record: DrawingRecord = serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {e}", path.display()))
            })?;
            // A file written for another room id is not this room's drawing.
            if record.room_id != room_id {
                log::warn!(
                    "{} holds room {:?}, not {:?}",
                    path.display(),
                    record.room_id,
                    room_id
                );
                return Err(StorageError::NotFound(room_id));
            }
            Ok(record)
        })
    }

    fn delete(&self, room_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.room_path(room_id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {e}", path.display()))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;

            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).and_then(decode_room_id))
                .collect();
            Ok(ids)
        })
    }

    fn exists(&self, room_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.room_path(room_id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
