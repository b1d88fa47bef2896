//! Runtime configuration read from the environment (and `.env` when present).

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::models::Day;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DATAFILES_CANDIDATES: [&str; 2] = ["./datafiles", "./data/sheets"];
const DATAFILES_FALLBACK: &str = "datafiles";

/// Where saved class selections live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionBackend {
    Json,
    Sqlite,
}

impl SelectionBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "json" => Some(SelectionBackend::Json),
            "sqlite" | "db" => Some(SelectionBackend::Sqlite),
            _ => None,
        }
    }

    pub fn default_path(&self) -> PathBuf {
        match self {
            SelectionBackend::Json => PathBuf::from("data/selections.json"),
            SelectionBackend::Sqlite => PathBuf::from("data/selections.db"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    pub datafiles_dir: PathBuf,
    /// Workbook file name per day, relative to `datafiles_dir`.
    pub sheet_files: HashMap<Day, String>,
    /// Worksheet inside each workbook; the first one when unset.
    pub sheet_name: Option<String>,
    pub cache_ttl: Duration,
    pub selection_backend: SelectionBackend,
    pub selection_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            datafiles_dir: PathBuf::from(DATAFILES_FALLBACK),
            sheet_files: default_sheet_files(),
            sheet_name: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            selection_backend: SelectionBackend::Json,
            selection_path: SelectionBackend::Json.default_path(),
        }
    }
}

fn default_sheet_files() -> HashMap<Day, String> {
    Day::ALL.iter().map(|d| (*d, format!("{}.xlsx", d.name()))).collect()
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// First existing candidate directory, or the fallback name.
fn resolve_datafiles_dir() -> PathBuf {
    if let Some(dir) = non_empty_var("TIMETABLE_DATAFILES_DIR") {
        return PathBuf::from(dir);
    }
    DATAFILES_CANDIDATES
        .iter()
        .map(Path::new)
        .find(|p| p.is_dir())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DATAFILES_FALLBACK))
}

impl AppConfig {
    /// Loads `.env` if there is one, then reads the `TIMETABLE_*` variables.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            info!(path = %path.display(), "loaded .env");
        }

        let mut sheet_files = default_sheet_files();
        for day in Day::ALL {
            let key = format!("TIMETABLE_SHEET_{}", day.name().to_uppercase());
            if let Some(file) = non_empty_var(&key) {
                sheet_files.insert(day, file);
            }
        }

        let cache_ttl = match non_empty_var("TIMETABLE_CACHE_TTL_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    warn!(value = %raw, "TIMETABLE_CACHE_TTL_SECS is not a number, using {}", DEFAULT_CACHE_TTL_SECS);
                    Duration::from_secs(DEFAULT_CACHE_TTL_SECS)
                }
            },
            None => Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        };

        let selection_backend = match non_empty_var("TIMETABLE_SELECTION_BACKEND") {
            Some(raw) => SelectionBackend::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown selection backend, using json");
                SelectionBackend::Json
            }),
            None => SelectionBackend::Json,
        };
        let selection_path = non_empty_var("TIMETABLE_SELECTION_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| selection_backend.default_path());

        Self {
            bind: non_empty_var("TIMETABLE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            datafiles_dir: resolve_datafiles_dir(),
            sheet_files,
            sheet_name: non_empty_var("TIMETABLE_SHEET_NAME"),
            cache_ttl,
            selection_backend,
            selection_path,
        }
    }

    pub fn sheet_path(&self, day: Day) -> PathBuf {
        let file = self
            .sheet_files
            .get(&day)
            .cloned()
            .unwrap_or_else(|| format!("{}.xlsx", day.name()));
        self.datafiles_dir.join(file)
    }
}
