//! Turns a raw day sheet into its regular and lab sections.
//!
//! The exports follow a fixed institutional layout: a day title in A1, a few
//! batch rows, a header row marked "Room", a 38-row regular grid and, after
//! it, the lab grid with its own timing header. None of the offsets below can
//! be derived from content; `validate_layout` checks the anchors before the
//! offsets are trusted.

use std::fmt;
use tracing::{debug, warn};

use crate::models::{NormalizedSheet, RawGrid, TimetableSection};

/// Metadata rows at the top of every sheet (batch names, notes).
pub const BATCH_ROW_COUNT: usize = 4;
/// Height of the regular grid starting at the "Room" header row.
pub const REGULAR_SECTION_HEIGHT: usize = 43 - 5;
/// Distance from the header row to the lab timing row on most days.
pub const LAB_OFFSET_DEFAULT: usize = 43 - 5;
/// Tuesday and Thursday sheets are one row shorter before the lab grid.
pub const LAB_OFFSET_NARROW: usize = 42 - 5;
/// Column 0 plus the 18 regular-slot columns.
pub const MIN_GRID_WIDTH: usize = 19;

pub const ROOM_MARKER: &str = "Room";
const NARROW_LAYOUT_DAYS: [&str; 2] = ["Tuesday", "Thursday"];

/// Whether the day title in A1 names a narrow-layout day.
pub fn is_narrow_layout(grid: &RawGrid) -> bool {
    let title = grid.cell(0, 0).to_text();
    NARROW_LAYOUT_DAYS.iter().any(|d| title.contains(d))
}

pub fn lab_offset(narrow: bool) -> usize {
    if narrow { LAB_OFFSET_NARROW } else { LAB_OFFSET_DEFAULT }
}

/// Index of the first row with a cell reading exactly "Room".
pub fn find_header_row(grid: &RawGrid) -> Option<usize> {
    grid.rows()
        .iter()
        .position(|row| row.iter().any(|c| c.as_str().map(str::trim) == Some(ROOM_MARKER)))
}

/// Splits a sheet into batch rows, the regular section and the lab section.
///
/// Never fails: without a "Room" row both sections are empty, and slices past
/// the end of the sheet are truncated. The lab timing row is prepended to the
/// lab rows so row 0 is the header of both sections, which means it appears
/// twice in `lab`.
pub fn normalize_sheet(grid: &RawGrid) -> NormalizedSheet {
    let batch_rows = grid.slice(0, BATCH_ROW_COUNT);

    let Some(header_idx) = find_header_row(grid) else {
        debug!("no '{}' marker row, sections left empty", ROOM_MARKER);
        return NormalizedSheet { batch_rows, ..Default::default() };
    };

    let regular = grid.slice(header_idx, header_idx + REGULAR_SECTION_HEIGHT);

    let lab_start = header_idx + lab_offset(is_narrow_layout(grid));
    let lab = match grid.row(lab_start) {
        Some(timings) => {
            let mut rows = Vec::with_capacity(grid.len() - lab_start + 1);
            rows.push(timings.clone());
            rows.extend(grid.slice(lab_start, grid.len()));
            rows
        }
        None => Vec::new(),
    };

    debug!(header_idx, lab_start, regular = regular.len(), lab = lab.len(), "sheet normalized");
    NormalizedSheet {
        batch_rows,
        regular: TimetableSection::new(regular),
        lab: TimetableSection::new(lab),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutIssue {
    MissingRoomMarker,
    TooNarrow { width: usize },
    TooShort { rows: usize, required: usize },
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutIssue::MissingRoomMarker => write!(f, "no row contains the '{}' marker", ROOM_MARKER),
            LayoutIssue::TooNarrow { width } => {
                write!(f, "sheet is {} columns wide, at least {} expected", width, MIN_GRID_WIDTH)
            }
            LayoutIssue::TooShort { rows, required } => {
                write!(f, "sheet has {} rows, the lab timing row needs at least {}", rows, required)
            }
        }
    }
}

/// Checks the anchors the fixed offsets rely on.
pub fn validate_layout(grid: &RawGrid) -> Vec<LayoutIssue> {
    let mut issues = Vec::new();
    let width = grid.width();
    if width < MIN_GRID_WIDTH {
        issues.push(LayoutIssue::TooNarrow { width });
    }
    match find_header_row(grid) {
        None => issues.push(LayoutIssue::MissingRoomMarker),
        Some(h) => {
            let required = h + lab_offset(is_narrow_layout(grid)) + 1;
            if grid.len() < required {
                issues.push(LayoutIssue::TooShort { rows: grid.len(), required });
            }
        }
    }
    issues
}

/// Validates, logs whatever looks off, and normalizes anyway.
pub fn normalize_checked(grid: &RawGrid, label: &str) -> NormalizedSheet {
    for issue in validate_layout(grid) {
        warn!(sheet = label, "{}", issue);
    }
    normalize_sheet(grid)
}
