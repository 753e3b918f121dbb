//! Session-scoped persistence of the selection state
//!
//! Snapshots are written after every mutation and read once at startup. A
//! file store keeps one JSON file per session id; snapshots older than the
//! configured TTL belong to a previous session and are discarded.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::quote::SelectionState;

pub trait SessionStore: Send {
    fn save(&self, state: &SelectionState) -> Result<()>;

    /// `Ok(None)` when there is nothing to restore
    fn load(&self) -> Result<Option<SelectionState>>;

    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    saved_at: DateTime<Utc>,
    state: SelectionState,
}

/// Stores `<state dir>/sessions/<id>.json`
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    ttl: Duration,
}

impl FileSessionStore {
    pub fn new(state_dir: &Path, session_id: &str, ttl_minutes: u64) -> Self {
        let path = state_dir
            .join("sessions")
            .join(format!("{}.json", sanitize_session_id(session_id)));
        let ttl = i64::try_from(ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or(Duration::MAX);
        Self { path, ttl }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn is_stale(&self, saved_at: DateTime<Utc>) -> bool {
        Utc::now() - saved_at > self.ttl
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, state: &SelectionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create sessions directory")?;
        }
        let envelope = Envelope {
            saved_at: Utc::now(),
            state: state.clone(),
        };
        let contents = serde_json::to_string_pretty(&envelope)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = %self.path.display(), step = state.step().number(), "Saved session");
        Ok(())
    }

    fn load(&self) -> Result<Option<SelectionState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let envelope: Envelope =
            serde_json::from_str(&contents).context("Failed to parse session snapshot")?;

        if self.is_stale(envelope.saved_at) {
            info!(
                path = %self.path.display(),
                saved_at = %envelope.saved_at,
                "Session snapshot expired, starting fresh"
            );
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(envelope.state))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

/// Keeps the snapshot as a JSON string in memory. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw JSON, e.g. a hand-edited snapshot
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(json.into()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|s| s.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.raw().is_none()
    }

    fn with_slot<R>(&self, f: impl FnOnce(&mut Option<String>) -> R) -> Result<R> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, state: &SelectionState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.with_slot(|slot| *slot = Some(json))
    }

    fn load(&self) -> Result<Option<SelectionState>> {
        match self.with_slot(|slot| slot.clone())? {
            Some(json) => {
                let state = serde_json::from_str(&json).context("Failed to parse session snapshot")?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<()> {
        self.with_slot(|slot| *slot = None)
    }
}

/// Keep ids usable as file names
pub fn sanitize_session_id(id: &str) -> String {
    let cleaned: String = id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "default".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::{AddOn, Surface};
    use tempfile::TempDir;

    fn sample_state() -> SelectionState {
        let mut state = SelectionState::default();
        state.select_enclosure("Warm glazing", 4500.0, false);
        state.set_dimensions(3.0, 1.2, 2.5);
        state.select_finish(Surface::Walls, "PVC panels", 900.0);
        state.select_finish(Surface::Ceiling, "Stretch ceiling", 1200.0);
        state.toggle_add_on(AddOn::new("Insulation", 15000.0));
        state.set_step(crate::wizard::Step::AddOns);
        state
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path(), "abc", 60);
        assert_eq!(store.load().unwrap(), None);

        let state = sample_state();
        store.save(&state).unwrap();
        assert!(store.path().ends_with("sessions/abc.json"));
        assert_eq!(store.load().unwrap(), Some(state));
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let dir = TempDir::new().unwrap();
        for ttl_minutes in [1_000_000_000_000_000, u64::MAX] {
            let store = FileSessionStore::new(dir.path(), "long", ttl_minutes);
            assert_eq!(store.ttl, Duration::MAX);
            store.save(&sample_state()).unwrap();
            assert_eq!(store.load().unwrap(), Some(sample_state()));
        }
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path(), "abc", 60);
        store.save(&sample_state()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.exists());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_expired_snapshot_is_discarded() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path(), "old", 30);
        let envelope = Envelope {
            saved_at: Utc::now() - Duration::minutes(31),
            state: sample_state(),
        };
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), serde_json::to_string(&envelope).unwrap()).unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert!(!store.exists());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path(), "bad", 30);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemorySessionStore::new();
        let view = store.clone();
        store.save(&sample_state()).unwrap();
        assert!(!view.is_empty());
        assert_eq!(view.load().unwrap(), Some(sample_state()));
        view.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_sanitize_session_id() {
        assert_eq!(sanitize_session_id("../../etc/passwd"), "______etc_passwd");
        assert_eq!(sanitize_session_id("  "), "default");
        assert_eq!(
            sanitize_session_id("0b7c2f9e-1d2a-4e55-9a6b-2c1f3e4d5a6b"),
            "0b7c2f9e-1d2a-4e55-9a6b-2c1f3e4d5a6b"
        );
    }
}
