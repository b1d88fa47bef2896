// Named time slots and the grid columns each one spans.
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::error::{Result, TimetableError};
use crate::models::{Day, SectionKind, TimetableSection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub label: &'static str,
    pub columns: &'static [usize],
}

/// Regular classes: three 1-based columns per 80-minute slot.
pub static COURSE_TIME_SLOTS: [TimeSlot; 6] = [
    TimeSlot { label: "8:30-10:00", columns: &[1, 2, 3] },
    TimeSlot { label: "10:00-11:20", columns: &[4, 5, 6] },
    TimeSlot { label: "11:30-12:50", columns: &[7, 8, 9] },
    TimeSlot { label: "1:00-2:20", columns: &[10, 11, 12] },
    TimeSlot { label: "2:30-3:50", columns: &[13, 14, 15] },
    TimeSlot { label: "4:00-5:20", columns: &[16, 17, 18] },
];

/// Labs run in three long blocks spanning five or six columns.
pub static LAB_TIME_SLOTS: [TimeSlot; 3] = [
    TimeSlot { label: "8:30-11:15", columns: &[1, 2, 3, 4, 5, 6] },
    TimeSlot { label: "11:25-2:10", columns: &[7, 8, 9, 10, 11] },
    TimeSlot { label: "2:25-5:10", columns: &[12, 13, 14, 15, 16] },
];

/// Friday's prayer break; nothing is scheduled so there is nothing to look up.
pub const BREAK_DAY: Day = Day::Friday;
pub const BREAK_SLOT: &str = "1:00-2:20";

pub fn slots_for(kind: SectionKind) -> &'static [TimeSlot] {
    match kind {
        SectionKind::Course => &COURSE_TIME_SLOTS,
        SectionKind::Lab => &LAB_TIME_SLOTS,
    }
}

pub fn find_slot(kind: SectionKind, label: &str) -> Result<&'static TimeSlot> {
    let wanted = label.trim();
    slots_for(kind)
        .iter()
        .find(|s| s.label == wanted)
        .ok_or_else(|| TimetableError::UnknownTimeSlot { kind, label: wanted.to_string() })
}

/// True for the one slot that is always reported as a break.
pub fn is_break_period(day: Day, kind: SectionKind, label: &str) -> bool {
    day == BREAK_DAY && kind == SectionKind::Course && label.trim() == BREAK_SLOT
}

fn standard_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}:\d{2}-\d{2}:\d{2}$").expect("slot label pattern is valid"))
}

/// Header labels in the strict `HH:MM-HH:MM` form found in the regular and lab
/// headers, de-duplicated and sorted. Anything else in a header row is noise.
pub fn extract_standard_time_slots(regular: &TimetableSection, lab: &TimetableSection) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for section in [regular, lab] {
        let Some(header) = section.header() else { continue };
        for cell in header.iter().skip(1) {
            let Some(text) = cell.as_str() else { continue };
            let label = text.trim();
            if standard_label_re().is_match(label) && !out.iter().any(|l| l == label) {
                out.push(label.to_string());
            }
        }
    }
    out.sort();
    out
}
