// Schedule lookups over a normalized day: entry iteration, filtering and display time.
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::algorithm::cell::{course_text, extract_custom_time, extract_department, extract_professor};
use crate::algorithm::filters::{passes_filters, ALL_DEPARTMENTS};
use crate::models::{
    row_cell, CourseEntry, Day, DisplayEntry, NormalizedSheet, ScheduleFilters, SectionKind, TimetableSection,
    UserClassSelection,
};

/// Leading rows of the regular section that hold headers and batch metadata.
pub const REGULAR_BODY_SKIP: usize = 6;
/// The lab section only carries its (prepended) timing header.
pub const LAB_BODY_SKIP: usize = 1;

const NOT_AVAILABLE: &str = "N/A";

/// Per-request state the engine needs from the user's session.
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    pub selection: &'a UserClassSelection,
}

impl<'a> QueryContext<'a> {
    pub fn new(selection: &'a UserClassSelection) -> Self {
        Self { selection }
    }
}

pub struct ScheduleQueryEngine<'a> {
    sheet: &'a NormalizedSheet,
}

impl<'a> ScheduleQueryEngine<'a> {
    pub fn new(sheet: &'a NormalizedSheet) -> Self {
        Self { sheet }
    }

    fn section(&self, kind: SectionKind) -> (&'a TimetableSection, usize) {
        match kind {
            SectionKind::Course => (&self.sheet.regular, REGULAR_BODY_SKIP),
            SectionKind::Lab => (&self.sheet.lab, LAB_BODY_SKIP),
        }
    }

    /// Every valid entry of a section, row-major, column 0 excluded.
    pub fn entries(&self, kind: SectionKind) -> Vec<CourseEntry> {
        let (section, skip) = self.section(kind);
        let mut out = Vec::new();
        for (row_index, row) in section.rows().iter().enumerate().skip(skip) {
            for column_index in 1..row.len() {
                let Some(text) = course_text(&row[column_index]) else { continue };
                let department = extract_department(&text);
                out.push(CourseEntry {
                    department_code: if department.is_empty() { None } else { Some(department) },
                    custom_time_range: extract_custom_time(&text),
                    is_lab: kind == SectionKind::Lab,
                    row_index,
                    column_index,
                    room: room_label(row_cell(row, 0).to_text()),
                    raw_text: text,
                });
            }
        }
        out
    }

    /// Matching entries, regular section before lab section, each row-major.
    pub fn query(&self, filters: &ScheduleFilters, ctx: QueryContext<'_>) -> Vec<DisplayEntry> {
        let mut kinds = Vec::with_capacity(2);
        if filters.content.includes_regular() {
            kinds.push(SectionKind::Course);
        }
        if filters.content.includes_labs() && !self.sheet.lab.is_empty() {
            kinds.push(SectionKind::Lab);
        }

        let mut found = Vec::new();
        for kind in kinds {
            let (section, _) = self.section(kind);
            for entry in self.entries(kind) {
                if !passes_filters(&entry.raw_text, filters, ctx.selection) {
                    continue;
                }
                found.push(display_entry(entry, section, ctx.selection));
            }
        }
        debug!(matches = found.len(), department = %filters.department, "schedule query");
        found
    }
}

fn room_label(text: String) -> String {
    if text.is_empty() || text.eq_ignore_ascii_case("nan") { NOT_AVAILABLE.to_string() } else { text }
}

/// A custom time written in the cell wins over the column's header label.
fn display_entry(entry: CourseEntry, section: &TimetableSection, selection: &UserClassSelection) -> DisplayEntry {
    let display_time = match &entry.custom_time_range {
        Some(t) => t.clone(),
        None => section.header_label(entry.column_index).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    };
    DisplayEntry {
        is_my_class: selection.highlights(&entry.raw_text),
        professor: extract_professor(&entry.raw_text),
        department: entry.department_code.unwrap_or_default(),
        course_text: entry.raw_text,
        room: entry.room,
        display_time,
        is_lab: entry.is_lab,
    }
}

/// Result of a schedule lookup with the hint shown when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleAnswer {
    pub day: Day,
    pub entries: Vec<DisplayEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

pub fn run_schedule_query(
    sheet: &NormalizedSheet,
    day: Day,
    filters: &ScheduleFilters,
    ctx: QueryContext<'_>,
) -> ScheduleAnswer {
    let entries = ScheduleQueryEngine::new(sheet).query(filters, ctx);
    let hint = if entries.is_empty() { Some(empty_result_message(day, filters)) } else { None };
    ScheduleAnswer { day, entries, hint }
}

/// Message for an empty schedule result, worded after the filters in play.
pub fn empty_result_message(day: Day, filters: &ScheduleFilters) -> String {
    let department = if filters.department != ALL_DEPARTMENTS {
        format!(" for {} department", filters.department)
    } else {
        String::new()
    };
    let query = filters.query.as_deref().filter(|q| !q.is_empty());
    match query {
        None if filters.only_mine => format!("No classes found{} on {} in your saved list", department, day),
        Some(q) => format!("No results found for '{}'{}", q, department),
        None => format!("No classes found{}. Try different filters or enable 'My Classes'", department),
    }
}

/// All distinct entries across the given days, sorted; the choices offered
/// when a user picks classes to track. Both sections are read from row 6 on,
/// column 0 included.
pub fn gather_all_classes<'a, I>(sheets: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a NormalizedSheet>,
{
    let mut all: BTreeSet<String> = BTreeSet::new();
    for sheet in sheets {
        for section in [&sheet.regular, &sheet.lab] {
            for row in section.rows().iter().skip(REGULAR_BODY_SKIP) {
                all.extend(row.iter().filter_map(course_text));
            }
        }
    }
    all.into_iter().collect()
}

/// Saved classes that still exist in the catalog.
pub fn valid_defaults(selection: &UserClassSelection, catalog: &[String]) -> Vec<String> {
    selection.classes.iter().filter(|c| catalog.contains(c)).cloned().collect()
}
