// Recognition of course/lab entries inside raw timetable cells.
use regex::Regex;
use std::sync::OnceLock;

use crate::models::CellValue;

/// `<name> (<code>)[ <anything>]`, the shape every scheduled entry takes.
const COURSE_PATTERN: &str = r"^[A-Za-z0-9\s]+ \([A-Za-z0-9-]+\)(?:\s+.*)?$";
/// Two letters right after an opening parenthesis and before a hyphen: `(CS-`.
const DEPARTMENT_PATTERN: &str = r"\(([A-Za-z]{2})-";
/// `1:00-3:00`, `1:00 - 3:00`, `11:25 -2:10`...
const TIME_RANGE_PATTERN: &str = r"(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})";

fn course_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COURSE_PATTERN).expect("course pattern is valid"))
}

fn department_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DEPARTMENT_PATTERN).expect("department pattern is valid"))
}

fn time_range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TIME_RANGE_PATTERN).expect("time range pattern is valid"))
}

/// True if `text` is a course or lab entry. Blank and "nan" never are.
pub fn is_valid_course(text: &str) -> bool {
    if text.is_empty() || text.trim().eq_ignore_ascii_case("nan") {
        return false;
    }
    course_re().is_match(text)
}

/// Trimmed cell text when the cell holds an entry.
pub fn course_text(cell: &CellValue) -> Option<String> {
    if cell.is_blank() {
        return None;
    }
    let text = cell.to_text();
    if is_valid_course(&text) { Some(text) } else { None }
}

/// True when a cell holds an entry (numbers and stray text do not count).
pub fn is_occupied(cell: &CellValue) -> bool {
    course_text(cell).is_some()
}

/// Department code from the first `(LL-` in the text, or `""`.
///
/// Single-segment codes such as `(CS)` have no hyphen and yield `""`; department
/// filters therefore never match them.
pub fn extract_department(text: &str) -> String {
    department_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First embedded time range, with the spaces around the hyphen removed.
pub fn extract_custom_time(text: &str) -> Option<String> {
    let caps = time_range_re().captures(text)?;
    Some(format!("{}-{}", &caps[1], &caps[2]))
}

/// Text after the last `)` once any embedded time range has been removed.
pub fn extract_professor(text: &str) -> Option<String> {
    let stripped = time_range_re().replace_all(text, "");
    let stripped = stripped.trim();
    let idx = stripped.rfind(')')?;
    let rest = stripped[idx + 1..].trim();
    if rest.is_empty() { None } else { Some(rest.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_course_grammar() {
        assert!(is_valid_course("Data Structures (CS-2)"));
        assert!(is_valid_course("Data Structures (CS-2) Dr. A"));
        assert!(is_valid_course("Name (CODE-1) Prof X"));
        assert!(is_valid_course("OOP Lab (BCS-2A)"));
        assert!(!is_valid_course("Data Structures"));
        assert!(!is_valid_course("Data Structures(CS-2)"));
        assert!(!is_valid_course("Data-Structures (CS-2)"));
        assert!(!is_valid_course(""));
        assert!(!is_valid_course("nan"));
        assert!(!is_valid_course("12"));
    }

    #[test]
    fn test_valid_course_trailing_text_needs_space() {
        assert!(!is_valid_course("Calculus (MT-1)x"));
        assert!(is_valid_course("Calculus (MT-1)  8:30-9:50"));
    }

    #[test]
    fn test_extract_department() {
        assert_eq!(extract_department("Data Structures (CS-2) Dr. A"), "CS");
        assert_eq!(extract_department("Seminar (AI)"), "");
        assert_eq!(extract_department("Thesis (MS-CS-1)"), "MS");
        assert_eq!(extract_department("Stats (ds-3)"), "ds");
        assert_eq!(extract_department(""), "");
    }

    #[test]
    fn test_extract_custom_time() {
        assert_eq!(extract_custom_time("Thesis (MS-CS-1) 1:00 - 3:00").as_deref(), Some("1:00-3:00"));
        assert_eq!(extract_custom_time("Lab (CS-1) 11:25-2:10 then 3:00-4:00").as_deref(), Some("11:25-2:10"));
        assert_eq!(extract_custom_time("Lab (CS-1) Dr. B"), None);
    }

    #[test]
    fn test_extract_professor() {
        assert_eq!(extract_professor("Data Structures (CS-2) Dr. A").as_deref(), Some("Dr. A"));
        assert_eq!(extract_professor("Thesis (MS-CS-1) Dr. Khan 1:00 - 3:00").as_deref(), Some("Dr. Khan"));
        assert_eq!(extract_professor("Thesis (MS-CS-1) 1:00 - 3:00"), None);
        assert_eq!(extract_professor("Data Structures (CS-2)"), None);
        assert_eq!(extract_professor("no parenthesis here"), None);
    }

    #[test]
    fn test_course_text_from_cells() {
        assert_eq!(course_text(&CellValue::text(" DB (CS-3) ")).as_deref(), Some("DB (CS-3)"));
        assert_eq!(course_text(&CellValue::Number(3.0)), None);
        assert_eq!(course_text(&CellValue::Empty), None);
        assert!(!is_occupied(&CellValue::text("Reserved")));
    }
}
