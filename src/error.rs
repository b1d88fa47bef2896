//! Error types for the timetable lookup.

use thiserror::Error;

use crate::models::SectionKind;

/// Errors surfaced by the sheet I/O layer, the selection stores and request parsing.
///
/// The core (classifier, normalizer, finders and query engine) never produces
/// these: malformed cells or sheets degrade to empty results instead.
#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("workbook '{0}' has no readable worksheet")]
    EmptyWorkbook(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("unknown day '{0}'")]
    UnknownDay(String),

    #[error("unknown {kind} time slot '{label}'")]
    UnknownTimeSlot { kind: SectionKind, label: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("sheet layout rejected: {0}")]
    Layout(String),
}

impl TimetableError {
    /// True for errors caused by the caller's input rather than by the data source.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TimetableError::UnknownDay(_)
                | TimetableError::UnknownTimeSlot { .. }
                | TimetableError::InvalidRequest(_)
                | TimetableError::Layout(_)
        )
    }

    /// True when the day's workbook simply is not there.
    pub fn is_not_found(&self) -> bool {
        match self {
            TimetableError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            TimetableError::Spreadsheet(calamine::Error::Io(e)) => {
                e.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TimetableError>;
