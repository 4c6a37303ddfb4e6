//! Persistence of the editable cover state under a versioned key

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use super::CoverDocument;
use crate::Result;

/// Schema-versioned storage key. Bump the suffix on incompatible changes.
pub const STATE_KEY: &str = "xhs_cover_state_v1";

/// Key/value storage for serialized state.
pub trait StateStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store for tests and short-lived sessions
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let g = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        Ok(g.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut g = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        g.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl StateStore for DirStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }
}

pub fn save_document(store: &dyn StateStore, doc: &CoverDocument) -> Result<()> {
    let json = serde_json::to_string(doc)?;
    store.save(STATE_KEY, &json)
}

/// Restore the saved document, or defaults when nothing usable is stored.
///
/// Missing fields take their defaults; unreadable state is logged and
/// discarded rather than failing the editor.
pub fn restore_document(store: &dyn StateStore) -> CoverDocument {
    let raw = match store.load(STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return CoverDocument::default(),
        Err(e) => {
            log::warn!("failed to read saved cover state: {}", e);
            return CoverDocument::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("discarding unreadable cover state: {}", e);
            CoverDocument::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let store = MemoryStore::new();
        let mut doc = CoverDocument::default();
        doc.text_content.highlight = "best".into();
        doc.add_emoji("🔥", (360.0, 480.0));
        save_document(&store, &doc).unwrap();
        assert_eq!(restore_document(&store), doc);
    }

    #[test]
    fn missing_or_corrupt_state_gives_defaults() {
        let store = MemoryStore::new();
        assert_eq!(restore_document(&store), CoverDocument::default());
        store.save(STATE_KEY, "{not json").unwrap();
        assert_eq!(restore_document(&store), CoverDocument::default());
    }
}
