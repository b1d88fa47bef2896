use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{info, warn};

use super::{clean_selection, validate_session, SelectionStore};
use crate::error::Result;
use crate::models::UserClassSelection;
use crate::persist::write_atomic;

/// All sessions in one pretty-printed JSON object keyed by session id.
pub struct JsonSelectionStore {
    path: PathBuf,
    // held for every read and every read-modify-write cycle on the file
    file_lock: Mutex<()>,
}

impl JsonSelectionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf(), file_lock: Mutex::new(()) }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.file_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// An unreadable or corrupt file reads as empty and is rewritten on the next save.
    fn read_all(&self) -> BTreeMap<String, UserClassSelection> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) if !c.trim().is_empty() => c,
            _ => return BTreeMap::new(),
        };
        match serde_json::from_str(&contents) {
            Ok(all) => all,
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring unreadable selections file: {}", e);
                BTreeMap::new()
            }
        }
    }
}

impl SelectionStore for JsonSelectionStore {
    fn load(&self, session: &str) -> Result<UserClassSelection> {
        let session = validate_session(session)?;
        let _guard = self.lock();
        Ok(self.read_all().remove(session).unwrap_or_default())
    }

    fn save(&self, session: &str, selection: &UserClassSelection) -> Result<UserClassSelection> {
        let session = validate_session(session)?;
        let _guard = self.lock();

        let mut all = self.read_all();
        let mut stored = clean_selection(selection);
        stored.saved_at = Some(Utc::now());
        all.insert(session.to_string(), stored.clone());

        let text = serde_json::to_string_pretty(&all)?;
        write_atomic(&self.path, text.as_bytes())?;
        info!(session, classes = stored.classes.len(), "selection saved");
        Ok(stored)
    }
}
