use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::algorithm::filters::department_code_from_option;
use crate::error::{Result, TimetableError};
use crate::models::{ContentKind, Day, ScheduleFilters, SectionKind, UserClassSelection};

pub mod handlers;

/// Body of `POST /schedule`.
///
/// ```json
/// {
///   "day": "Monday",
///   "department": "CS - Computer Science",
///   "query": "data",
///   "content": "All",
///   "only_mine": false,
///   "session": "a1b2c3"
/// }
/// ```
///
/// Every field is optional: the day defaults to today (Monday on weekends),
/// the department to "All", the content to both sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub content: Option<ContentKind>,
    #[serde(default)]
    pub only_mine: bool,
    #[serde(default)]
    pub session: Option<String>,
}

/// Body of `POST /free-rooms`: `{"day": "Friday", "search_type": "course", "time_slot": "8:30-10:00"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeRoomRequest {
    #[serde(default)]
    pub day: Option<String>,
    pub search_type: String,
    pub time_slot: String,
}

/// Body of `PUT /selection/{session}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveSelectionRequest {
    #[serde(default)]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleParams {
    pub day: Day,
    pub filters: ScheduleFilters,
    pub session: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreeRoomParams {
    pub day: Day,
    pub kind: SectionKind,
    pub time_slot: String,
}

/// Missing or blank day means today's sheet.
pub fn parse_day(raw: Option<&str>) -> Result<Day> {
    match raw.map(str::trim) {
        Some(d) if !d.is_empty() => d.parse(),
        _ => Ok(Day::today()),
    }
}

fn from_value<T: for<'de> Deserialize<'de>>(body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| TimetableError::InvalidRequest(format!("failed to parse input: {}", e)))
}

pub fn parse_schedule_request(body: Value) -> Result<ScheduleParams> {
    let req: ScheduleRequest = from_value(body)?;
    let department = match req.department.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => department_code_from_option(d),
        _ => ScheduleFilters::default().department,
    };
    let query = req.query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty());
    let session = req.session.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    Ok(ScheduleParams {
        day: parse_day(req.day.as_deref())?,
        filters: ScheduleFilters { department, query, content: req.content.unwrap_or_default(), only_mine: req.only_mine },
        session,
    })
}

pub fn parse_free_room_request(body: Value) -> Result<FreeRoomParams> {
    let req: FreeRoomRequest = from_value(body)?;
    let time_slot = req.time_slot.trim().to_string();
    if time_slot.is_empty() {
        return Err(TimetableError::InvalidRequest("time_slot is required".into()));
    }
    Ok(FreeRoomParams { day: parse_day(req.day.as_deref())?, kind: req.search_type.parse()?, time_slot })
}

pub fn parse_save_selection(body: Value) -> Result<UserClassSelection> {
    let req: SaveSelectionRequest = from_value(body)?;
    Ok(UserClassSelection::new(req.classes))
}
