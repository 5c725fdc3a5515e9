//! Snapshot persistence for the collection window.
//!
//! The window is saved as a single JSON document so an in-flight
//! collection survives a restart with its original deadline intact.
//! Durability is best-effort: callers treat a failed save as a logged
//! degradation, never as a reason to roll back the in-memory transition.
//!
//! The snapshot lives at `~/.config/grubcall/order_state.json`.

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::window::CollectionWindow;

/// Save/load contract for the collection window.
///
/// `load` distinguishes "no snapshot yet" (`Ok(None)`) from "snapshot
/// exists but is unreadable" (`Err`), so the caller can warn on the
/// latter and still start fresh.
pub trait OrderStore: Send + Sync {
    fn save(&self, window: &CollectionWindow) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<CollectionWindow>, StoreError>;
}

/// JSON-file-backed store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `order_state.json` inside the data directory.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        Ok(data_dir()?.join("order_state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OrderStore for JsonFileStore {
    fn save(&self, window: &CollectionWindow) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(window).map_err(StoreError::Encode)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }

    fn load(&self) -> Result<Option<CollectionWindow>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let window = serde_json::from_str(&content).map_err(|err| StoreError::Malformed {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        Ok(Some(window))
    }
}

/// Returns `~/.config/grubcall[-dev]/` based on GRUBCALL_ENV.
///
/// Set GRUBCALL_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("GRUBCALL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("grubcall-dev")
    } else {
        base_dir.join("grubcall")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StoreError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("order_state.json"))
    }

    #[test]
    fn round_trips_a_collecting_window_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut window = CollectionWindow::new();
        let now = "2026-08-27T09:50:00.123456Z".parse().unwrap();
        window.open(now, Duration::minutes(30)).unwrap();
        window.submit("u1", "Alice", "2x burger and fries").unwrap();
        window.submit("u2", "عمر", "شاورما").unwrap();

        store.save(&window).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, window);
    }

    #[test]
    fn round_trips_an_idle_window_with_retained_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut window = CollectionWindow::new();
        let now = "2026-08-27T09:50:00Z".parse().unwrap();
        window.open(now, Duration::minutes(30)).unwrap();
        window.submit("u1", "Alice", "soda").unwrap();
        window.close().unwrap();

        store.save(&window).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, window);
        assert_eq!(loaded.end_time(), None);
        assert_eq!(loaded.entries().len(), 1);
    }

    #[test]
    fn missing_snapshot_is_absent_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn malformed_snapshot_is_reported_as_such() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(
            store.load(),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn snapshot_uses_iso8601_deadline_with_offset() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut window = CollectionWindow::new();
        let now = "2026-08-27T09:50:00Z".parse().unwrap();
        window.open(now, Duration::minutes(30)).unwrap();
        store.save(&window).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["status"], "collecting");
        assert_eq!(value["end_time"], "2026-08-27T10:20:00Z");

        let mut idle = window.clone();
        idle.close().unwrap();
        store.save(&idle).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["end_time"], serde_json::Value::Null);
    }
}
