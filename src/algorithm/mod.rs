// Lookups over normalized day sheets.
pub mod cell;
pub mod classroom;
pub mod filters;
pub mod free_slots;
pub mod query;
pub mod slots;

pub use cell::{course_text, extract_custom_time, extract_department, extract_professor, is_occupied, is_valid_course};
pub use classroom::{categorize_classroom, group_by_block};
pub use filters::{department_code_from_option, passes_filters, ALL_DEPARTMENTS, DEPARTMENT_OPTIONS};
pub use free_slots::{find_empty_rooms_by_label, find_free_rooms, lookup_free_rooms, FreeRoomOutcome};
pub use query::{gather_all_classes, run_schedule_query, valid_defaults, QueryContext, ScheduleAnswer, ScheduleQueryEngine};
pub use slots::{extract_standard_time_slots, find_slot, is_break_period, TimeSlot, COURSE_TIME_SLOTS, LAB_TIME_SLOTS};
