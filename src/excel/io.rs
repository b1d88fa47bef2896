use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, TimetableError};
use crate::models::{CellValue, RawGrid, Row};

/// Converts a calamine cell into the closed cell type used downstream.
pub fn data_to_cell(d: &Data) -> CellValue {
    match d {
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "True".to_string() } else { "False".to_string() }),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::from(s.as_str()),
        Data::DurationIso(s) => CellValue::from(s.as_str()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// Builds a grid anchored at A1: calamine ranges start at the first used cell,
/// so leading rows and columns are padded back with empty cells.
pub fn range_to_grid(range: &Range<Data>) -> RawGrid {
    let (start_row, start_col) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return RawGrid::default(),
    };

    let mut rows: Vec<Row> = vec![Vec::new(); start_row];
    for r in range.rows() {
        let mut row: Row = vec![CellValue::Empty; start_col];
        row.extend(r.iter().map(data_to_cell));
        rows.push(row);
    }
    RawGrid::new(rows)
}

fn pick_sheet(names: &[String], wanted: Option<&str>) -> Option<String> {
    match wanted {
        Some(w) if !w.is_empty() => match names.iter().find(|n| n.as_str() == w) {
            Some(found) => Some(found.clone()),
            None => {
                warn!(sheet = w, "worksheet not found, falling back to the first one");
                names.first().cloned()
            }
        },
        _ => names.first().cloned(),
    }
}

fn read_from_reader<RS, R>(workbook: &mut R, label: &str, sheet_name: Option<&str>) -> Result<RawGrid>
where
    RS: Read + Seek,
    R: Reader<RS, Error = calamine::Error>,
{
    let names = workbook.sheet_names();
    let sheet = pick_sheet(&names, sheet_name).ok_or_else(|| TimetableError::EmptyWorkbook(label.to_string()))?;
    let range = workbook.worksheet_range(&sheet)?;
    let grid = range_to_grid(&range);
    debug!(workbook = label, sheet = %sheet, rows = grid.len(), width = grid.width(), "sheet decoded");
    Ok(grid)
}

/// Reads one worksheet of a workbook on disk without header interpretation.
pub fn read_grid<P: AsRef<Path>>(path: P, sheet_name: Option<&str>) -> Result<RawGrid> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;
    read_from_reader(&mut workbook, &path.display().to_string(), sheet_name)
}

/// Same as `read_grid` for workbook bytes already in memory (uploads, fetched exports).
pub fn read_grid_from_bytes(bytes: Vec<u8>, sheet_name: Option<&str>) -> Result<RawGrid> {
    let mut workbook = open_workbook_auto_from_rs(std::io::Cursor::new(bytes))?;
    read_from_reader(&mut workbook, "<memory>", sheet_name)
}
