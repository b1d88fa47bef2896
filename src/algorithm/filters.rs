//! Entry filters for the schedule query.
//!
//! Each filter is a predicate over the trimmed cell text of an already valid
//! entry; `passes_filters` combines them the way the schedule view does.

use crate::algorithm::cell::{extract_department, is_valid_course};
use crate::models::{ScheduleFilters, UserClassSelection};

/// Value meaning "no department restriction".
pub const ALL_DEPARTMENTS: &str = "All";
const MASTERS_PREFIX: &str = "MS-";

/// Department choices offered to users: (code, display name).
pub const DEPARTMENT_OPTIONS: [(&str, &str); 11] = [
    ("All", "All"),
    ("CS", "Computer Science"),
    ("DS", "Data Science"),
    ("AI", "Artificial Intelligence"),
    ("CY", "Cyber Security"),
    ("SE", "Software Engineering"),
    ("MS-CS", "Master of Computer Science"),
    ("MS-DS", "Master of Data Science"),
    ("MS-AI", "Master of Artificial Intelligence"),
    ("MS-CY", "Master of Cyber Security"),
    ("MS-SE", "Master of Software Engineering"),
];

/// Accepts either a bare code or the display form "CS - Computer Science".
pub fn department_code_from_option(option: &str) -> String {
    let option = option.trim();
    match option.split_once(" - ") {
        Some((code, _)) => code.trim().to_string(),
        None => option.to_string(),
    }
}

/// Department equivalence with the masters prefix honoured in both directions:
/// a requested "MS-CS" takes entries coded "CS", and a requested "CS" takes
/// entries coded "MS-CS".
pub fn department_matches(entry_code: &str, requested: &str) -> bool {
    if entry_code == requested {
        return true;
    }
    if let Some(base) = requested.strip_prefix(MASTERS_PREFIX) {
        if entry_code == base {
            return true;
        }
    }
    if let Some(base) = entry_code.strip_prefix(MASTERS_PREFIX) {
        if requested == base {
            return true;
        }
    }
    false
}

/// Case-insensitive substring search; an absent or empty query passes.
pub fn search_matches(cell_text: &str, query: Option<&str>) -> bool {
    match query {
        Some(q) if !q.is_empty() => cell_text.to_lowercase().contains(&q.to_lowercase()),
        _ => true,
    }
}

/// Department filter over the cell text. "All" passes everything.
pub fn department_filter(cell_text: &str, requested: &str) -> bool {
    if requested == ALL_DEPARTMENTS {
        return true;
    }
    department_matches(&extract_department(cell_text), requested)
}

/// Full filter chain for one cell: validity, department, saved selection, search.
pub fn passes_filters(cell_text: &str, filters: &ScheduleFilters, selection: &UserClassSelection) -> bool {
    if cell_text.is_empty() || !is_valid_course(cell_text) {
        return false;
    }
    if !department_filter(cell_text, &filters.department) {
        return false;
    }
    let query = filters.query.as_deref();
    if filters.only_mine && !selection.contains_exact(cell_text) {
        return false;
    }
    search_matches(cell_text, query)
}
