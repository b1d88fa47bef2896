//! Persistence of the classes each session chose to track.
//!
//! A selection only changes through an explicit save; loading never writes.

use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, SelectionBackend};
use crate::error::{Result, TimetableError};
use crate::models::UserClassSelection;

pub mod json;
pub mod sqlite;

pub use json::JsonSelectionStore;
pub use sqlite::SqliteSelectionStore;

pub const MAX_SESSION_LEN: usize = 128;

pub trait SelectionStore: Send + Sync {
    /// The saved selection, or an empty one when the session never saved.
    fn load(&self, session: &str) -> Result<UserClassSelection>;

    /// Replaces the session's selection and returns it stamped with the save time.
    fn save(&self, session: &str, selection: &UserClassSelection) -> Result<UserClassSelection>;
}

/// Session ids become file keys and SQL parameters; keep them short and plain.
pub fn validate_session(session: &str) -> Result<&str> {
    let s = session.trim();
    if s.is_empty() {
        return Err(TimetableError::InvalidRequest("session is required".into()));
    }
    if s.len() > MAX_SESSION_LEN || !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(TimetableError::InvalidRequest(format!("invalid session id '{}'", s)));
    }
    Ok(s)
}

/// Trims entries and drops blank ones.
pub fn clean_selection(selection: &UserClassSelection) -> UserClassSelection {
    UserClassSelection::new(
        selection
            .classes
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty()),
    )
}

pub fn store_from_config(cfg: &AppConfig) -> Result<Arc<dyn SelectionStore>> {
    info!(backend = ?cfg.selection_backend, path = %cfg.selection_path.display(), "selection store");
    let store: Arc<dyn SelectionStore> = match cfg.selection_backend {
        SelectionBackend::Json => Arc::new(JsonSelectionStore::new(&cfg.selection_path)),
        SelectionBackend::Sqlite => Arc::new(SqliteSelectionStore::open(&cfg.selection_path)?),
    };
    Ok(store)
}
