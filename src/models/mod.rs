// Core data structures shared by the normalizer, the finders and the query engine.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::TimetableError;

/// A single spreadsheet cell, closed over the three shapes the exports contain.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Empty cells, whitespace-only text and the "nan" sentinel all count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => {
                let t = s.trim();
                t.is_empty() || t.eq_ignore_ascii_case("nan")
            }
            CellValue::Number(f) => f.is_nan(),
        }
    }

    /// Trimmed textual form. Integral numbers render without a fractional part.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(f) => {
                if f.is_finite() && (f.floor() - f).abs() < f64::EPSILON {
                    format!("{}", *f as i64)
                } else {
                    format!("{}", f)
                }
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() { CellValue::Empty } else { CellValue::Text(s.to_string()) }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() { CellValue::Empty } else { CellValue::Text(s) }
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Number(f)
    }
}

pub type Row = Vec<CellValue>;

/// Cell at `col` of `row`, or an empty cell when the row is shorter.
pub fn row_cell(row: &[CellValue], col: usize) -> &CellValue {
    row.get(col).unwrap_or(&EMPTY_CELL)
}

/// A sheet read without header interpretation: row 0 is real data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Row>,
}

impl RawGrid {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Builds a grid from plain strings; `""` becomes an empty cell.
    pub fn from_strings<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(|c| CellValue::from(c.as_ref())).collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row in the grid.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn row(&self, idx: usize) -> Option<&Row> {
        self.rows.get(idx)
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        match self.rows.get(row) {
            Some(r) => row_cell(r, col),
            None => &EMPTY_CELL,
        }
    }

    /// Rows `[start, end)` clamped to the grid length.
    pub fn slice(&self, start: usize, end: usize) -> Vec<Row> {
        let end = end.min(self.rows.len());
        if start >= end {
            return Vec::new();
        }
        self.rows[start..end].to_vec()
    }

    /// The grid without its first `n` rows.
    pub fn skip_rows(&self, n: usize) -> RawGrid {
        RawGrid::new(self.slice(n, self.rows.len()))
    }
}

/// Weekdays that have a published timetable sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [Day::Monday, Day::Tuesday, Day::Wednesday, Day::Thursday, Day::Friday];

    pub fn name(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }

    /// The lookup opens on today's sheet, or Monday's on weekends.
    pub fn default_for(weekday: Weekday) -> Day {
        match weekday {
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Mon | Weekday::Sat | Weekday::Sun => Day::Monday,
        }
    }

    pub fn today() -> Day {
        use chrono::Datelike;
        Day::default_for(chrono::Local::now().weekday())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Day::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TimetableError::UnknownDay(wanted.to_string()))
    }
}

/// Which grid of a day a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Course,
    Lab,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Course => f.write_str("course"),
            SectionKind::Lab => f.write_str("lab"),
        }
    }
}

impl FromStr for SectionKind {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "course" => Ok(SectionKind::Course),
            "lab" => Ok(SectionKind::Lab),
            other => Err(TimetableError::InvalidRequest(format!(
                "search type must be 'course' or 'lab', got '{}'",
                other
            ))),
        }
    }
}

/// Which sections a schedule query walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentKind {
    #[default]
    All,
    #[serde(alias = "Regular Classes")]
    Regular,
    #[serde(alias = "Labs Only")]
    LabsOnly,
}

impl ContentKind {
    pub fn includes_regular(&self) -> bool {
        matches!(self, ContentKind::All | ContentKind::Regular)
    }

    pub fn includes_labs(&self) -> bool {
        matches!(self, ContentKind::All | ContentKind::LabsOnly)
    }
}

/// One section of a normalized day: row 0 is the header, rows 1.. the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimetableSection {
    rows: Vec<Row>,
}

impl TimetableSection {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Header text for a column, `None` when the header is missing or blank there.
    pub fn header_label(&self, col: usize) -> Option<String> {
        let cell = row_cell(self.header()?, col);
        if cell.is_blank() { None } else { Some(cell.to_text()) }
    }

    /// Column whose header text equals `label` exactly.
    pub fn find_column(&self, label: &str) -> Option<usize> {
        self.header()?
            .iter()
            .position(|c| matches!(c, CellValue::Text(s) if s == label))
    }
}

/// Output of the sheet normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSheet {
    pub batch_rows: Vec<Row>,
    pub regular: TimetableSection,
    pub lab: TimetableSection,
}

/// A cell that parsed as a course or lab entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseEntry {
    pub raw_text: String,
    pub department_code: Option<String>,
    pub custom_time_range: Option<String>,
    pub is_lab: bool,
    pub row_index: usize,
    pub column_index: usize,
    pub room: String,
}

/// What the schedule view shows for one matching entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayEntry {
    pub course_text: String,
    pub room: String,
    pub display_time: String,
    pub is_lab: bool,
    pub is_my_class: bool,
    pub professor: Option<String>,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassroomRecord {
    pub name: String,
    /// `None` means the label is left out of block-grouped output.
    pub block: Option<String>,
}

/// A room with no occupant across every column of a slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeRoom {
    pub row: usize,
    pub classroom: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockGroup {
    pub block: String,
    pub rooms: Vec<FreeRoom>,
}

/// Courses a user chose to track. Owned by one session and only changed by an
/// explicit save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserClassSelection {
    pub classes: BTreeSet<String>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl UserClassSelection {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { classes: classes.into_iter().map(Into::into).collect(), saved_at: None }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Exact membership against the trimmed cell text; drives the "only my classes" filter.
    pub fn contains_exact(&self, cell_text: &str) -> bool {
        let wanted = cell_text.trim();
        self.classes.iter().any(|c| c == wanted)
    }

    /// Substring containment; drives the "my class" badge. Looser than
    /// `contains_exact`.
    pub fn highlights(&self, cell_text: &str) -> bool {
        self.classes.iter().any(|c| cell_text.contains(c.as_str()))
    }
}

/// User-facing filters of a schedule query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleFilters {
    /// Department code, or "All".
    #[serde(default = "all_departments")]
    pub department: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub content: ContentKind,
    #[serde(default)]
    pub only_mine: bool,
}

fn all_departments() -> String {
    "All".to_string()
}

impl Default for ScheduleFilters {
    fn default() -> Self {
        Self { department: all_departments(), query: None, content: ContentKind::All, only_mine: false }
    }
}
