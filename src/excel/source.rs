//! Where day sheets come from.
//!
//! The lookups only need "the raw grid for this day"; `SheetSource` is that
//! seam, so the HTTP layer and the tests can swap the workbook directory for
//! anything else that yields a `RawGrid`.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::error::{Result, TimetableError};
use crate::excel::io::read_grid;
use crate::models::{Day, RawGrid};

pub trait SheetSource: Send + Sync {
    /// Raw grid of the day's sheet, anchored at A1.
    fn load(&self, day: Day) -> Result<RawGrid>;

    /// Stable key identifying the day's sheet (used as cache key).
    fn identity(&self, day: Day) -> String;
}

impl<T: SheetSource + ?Sized> SheetSource for Arc<T> {
    fn load(&self, day: Day) -> Result<RawGrid> {
        (**self).load(day)
    }

    fn identity(&self, day: Day) -> String {
        (**self).identity(day)
    }
}

/// One workbook per day inside a directory.
#[derive(Debug, Clone)]
pub struct FileSheetSource {
    dir: PathBuf,
    files: HashMap<Day, String>,
    sheet_name: Option<String>,
}

impl FileSheetSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let files = Day::ALL.iter().map(|d| (*d, format!("{}.xlsx", d.name()))).collect();
        Self { dir: dir.as_ref().to_path_buf(), files, sheet_name: None }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            dir: cfg.datafiles_dir.clone(),
            files: cfg.sheet_files.clone(),
            sheet_name: cfg.sheet_name.clone(),
        }
    }

    pub fn path_for(&self, day: Day) -> PathBuf {
        match self.files.get(&day) {
            Some(file) => self.dir.join(file),
            None => self.dir.join(format!("{}.xlsx", day.name())),
        }
    }
}

impl SheetSource for FileSheetSource {
    fn load(&self, day: Day) -> Result<RawGrid> {
        let path = self.path_for(day);
        // calamine wraps a missing file in its format-specific error
        if !path.is_file() {
            return Err(TimetableError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no sheet for {} at {}", day, path.display()),
            )));
        }
        let grid = read_grid(&path, self.sheet_name.as_deref())?;
        info!(day = %day, path = %path.display(), rows = grid.len(), "sheet loaded");
        Ok(grid)
    }

    fn identity(&self, day: Day) -> String {
        self.path_for(day).display().to_string()
    }
}

/// Fixed grids held in memory; handy for tests and for sheets fetched elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemorySheetSource {
    grids: HashMap<Day, RawGrid>,
}

impl MemorySheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, day: Day, grid: RawGrid) -> Self {
        self.grids.insert(day, grid);
        self
    }
}

impl SheetSource for MemorySheetSource {
    fn load(&self, day: Day) -> Result<RawGrid> {
        self.grids.get(&day).cloned().ok_or_else(|| {
            TimetableError::Io(io::Error::new(io::ErrorKind::NotFound, format!("no sheet for {}", day)))
        })
    }

    fn identity(&self, day: Day) -> String {
        format!("memory:{}", day)
    }
}
