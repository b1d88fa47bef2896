use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

use super::{clean_selection, validate_session, SelectionStore};
use crate::error::Result;
use crate::models::UserClassSelection;

/// One row per session; the class list is stored as a JSON array.
///
/// Connections are opened per call and dropped right after, so the store
/// can be shared across actix workers without a pool.
pub struct SqliteSelectionStore {
    path: PathBuf,
}

impl SqliteSelectionStore {
    /// Creates the file and table when missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let store = Self { path };
        let conn = store.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS selections (
                session TEXT PRIMARY KEY,
                classes_json TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }
}

impl SelectionStore for SqliteSelectionStore {
    fn load(&self, session: &str) -> Result<UserClassSelection> {
        let session = validate_session(session)?;
        let conn = self.connect()?;
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT classes_json, saved_at FROM selections WHERE session = ?1",
                params![session],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;

        let Some((classes_json, saved_at)) = row else {
            return Ok(UserClassSelection::default());
        };
        let classes: Vec<String> = serde_json::from_str(&classes_json)?;
        let mut selection = UserClassSelection::new(classes);
        selection.saved_at = match DateTime::parse_from_rfc3339(&saved_at) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                warn!(session, "bad saved_at '{}': {}", saved_at, e);
                None
            }
        };
        Ok(selection)
    }

    fn save(&self, session: &str, selection: &UserClassSelection) -> Result<UserClassSelection> {
        let session = validate_session(session)?;
        let mut stored = clean_selection(selection);
        let now = Utc::now();
        stored.saved_at = Some(now);

        let classes: Vec<&String> = stored.classes.iter().collect();
        let classes_json = serde_json::to_string(&classes)?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO selections (session, classes_json, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(session) DO UPDATE SET classes_json = excluded.classes_json, saved_at = excluded.saved_at",
            params![session, classes_json, now.to_rfc3339()],
        )?;
        info!(session, classes = stored.classes.len(), "selection saved");
        Ok(stored)
    }
}
