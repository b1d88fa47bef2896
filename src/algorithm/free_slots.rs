// Free classroom lookups: per-slot column scans and the label-based complement.
use std::collections::BTreeSet;
use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use crate::algorithm::cell::is_occupied;
use crate::algorithm::classroom::group_by_block;
use crate::algorithm::slots::{find_slot, is_break_period};
use crate::error::Result;
use crate::models::{row_cell, BlockGroup, Day, FreeRoom, NormalizedSheet, RawGrid, SectionKind, TimetableSection};

/// Body rows of the regular grid in the flat sheet (38-row body plus headers).
pub const COURSE_ROW_RANGE: Range<usize> = 1..42;
/// Lab rooms start after the regular grid and its spacer rows.
pub const LAB_ROW_START: usize = 43;
/// The export's title row is consumed as a header when the flat sheet is read.
pub const FLAT_SHEET_TITLE_ROWS: usize = 1;

pub const BREAK_MESSAGE: &str = "Namaz break: no classes are held in this slot, so there are no free rooms to report.";

fn row_range(kind: SectionKind, total_rows: usize) -> Range<usize> {
    match kind {
        SectionKind::Course => COURSE_ROW_RANGE.start..COURSE_ROW_RANGE.end.min(total_rows),
        SectionKind::Lab => LAB_ROW_START..total_rows,
    }
}

/// The flat grid the free-slot scan runs on: the raw sheet minus its title row.
pub fn flat_grid(raw: &RawGrid) -> RawGrid {
    raw.skip_rows(FLAT_SHEET_TITLE_ROWS)
}

/// Rooms whose cells are unoccupied in every one of `columns`.
///
/// The classroom label is reported as-is, blank labels included; the block
/// grouping decides what to show.
pub fn find_free_rooms(grid: &RawGrid, columns: &[usize], kind: SectionKind) -> Vec<FreeRoom> {
    let mut free = Vec::new();
    for idx in row_range(kind, grid.len()) {
        let Some(row) = grid.row(idx) else { break };
        let is_free = columns.iter().all(|&col| !is_occupied(row_cell(row, col)));
        if is_free {
            free.push(FreeRoom { row: idx, classroom: row_cell(row, 0).to_text() });
        }
    }
    debug!(kind = %kind, columns = ?columns, free = free.len(), "free room scan");
    free
}

/// Every room label seen under the `label` column minus those holding an entry
/// there, sorted. A section whose header lacks the label contributes nothing.
pub fn find_empty_rooms_by_label(sheet: &NormalizedSheet, label: &str) -> Vec<String> {
    let mut all_rooms: BTreeSet<String> = BTreeSet::new();
    let mut occupied: BTreeSet<String> = BTreeSet::new();

    let sections: [(&TimetableSection, Range<usize>); 2] = [
        (&sheet.regular, COURSE_ROW_RANGE),
        (&sheet.lab, LAB_ROW_START..sheet.lab.len()),
    ];

    for (section, range) in sections {
        let Some(col) = section.find_column(label) else { continue };
        for idx in range {
            let Some(row) = section.rows().get(idx) else { continue };
            if row.len() <= col {
                continue;
            }
            let room = row_cell(row, 0);
            if room.is_blank() {
                continue;
            }
            let room = room.to_text();
            if is_occupied(&row[col]) {
                occupied.insert(room.clone());
            }
            all_rooms.insert(room);
        }
    }

    all_rooms.difference(&occupied).cloned().collect()
}

/// Answer of a free-room lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FreeRoomOutcome {
    /// Fixed answer for the break slot, independent of sheet content.
    Break { message: String },
    Rooms {
        total: usize,
        blocks: Vec<BlockGroup>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

pub fn nothing_free_message(day: Day, kind: SectionKind, slot_label: &str) -> String {
    format!("No free {} classrooms found on {} during {}", kind, day, slot_label)
}

/// Free-room lookup for one day and named slot.
///
/// `load_sheet` is only invoked when the slot needs a grid; the break slot and
/// unknown labels never touch it.
pub fn lookup_free_rooms<F>(day: Day, kind: SectionKind, slot_label: &str, load_sheet: F) -> Result<FreeRoomOutcome>
where
    F: FnOnce() -> Result<RawGrid>,
{
    if is_break_period(day, kind, slot_label) {
        return Ok(FreeRoomOutcome::Break { message: BREAK_MESSAGE.to_string() });
    }
    let slot = find_slot(kind, slot_label)?;
    let raw = load_sheet()?;
    let free = find_free_rooms(&flat_grid(&raw), slot.columns, kind);
    let blocks = group_by_block(&free);
    let total: usize = blocks.iter().map(|b| b.rooms.len()).sum();
    let message = if total == 0 { Some(nothing_free_message(day, kind, slot_label)) } else { None };
    Ok(FreeRoomOutcome::Rooms { total, blocks, message })
}
