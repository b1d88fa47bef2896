use timetable_lookup::algorithm::cell::{extract_custom_time, extract_department, extract_professor, is_valid_course};
use timetable_lookup::algorithm::classroom::{categorize_classroom, group_by_block};
use timetable_lookup::algorithm::filters::{department_filter, department_matches, passes_filters};
use timetable_lookup::models::{FreeRoom, ScheduleFilters, UserClassSelection};

#[test]
fn test_course_grammar() {
    assert!(is_valid_course("Data Structures (CS-2) Dr. A"));
    assert!(is_valid_course("Name (CODE-1) Prof X"));
    assert!(is_valid_course("OOP Lab (CS-1)"));
    assert!(!is_valid_course("Data Structures Dr. A"));
    assert!(!is_valid_course("(CS-2)"));
    assert!(!is_valid_course("nan"));
    assert!(!is_valid_course(""));
}

#[test]
fn test_department_extraction() {
    assert_eq!(extract_department("Data Structures (CS-2) Dr. A"), "CS");
    assert_eq!(extract_department("Seminar (AI)"), "");
    // only the two letters before the first hyphen are captured
    assert_eq!(extract_department("Thesis (MS-CS-1)"), "MS");
}

#[test]
fn test_custom_time_normalized() {
    assert_eq!(extract_custom_time("Thesis (MS-CS-1) 1:00 - 3:00").as_deref(), Some("1:00-3:00"));
    assert_eq!(extract_custom_time("Thesis (MS-CS-1) 11:25-2:10").as_deref(), Some("11:25-2:10"));
    assert_eq!(extract_custom_time("Data Structures (CS-2) Dr. A"), None);
}

#[test]
fn test_professor_after_time_removed() {
    assert_eq!(extract_professor("Thesis (MS-CS-1) 1:00 - 3:00 Dr. Z").as_deref(), Some("Dr. Z"));
    assert_eq!(extract_professor("Seminar (AI)"), None);
}

#[test]
fn test_department_equivalence() {
    assert!(department_matches("CS", "MS-CS"));
    assert!(department_matches("MS-CS", "CS"));
    assert!(!department_matches("CS", "SE"));
    assert!(department_filter("Seminar (AI)", "All"));
    assert!(!department_filter("Seminar (AI)", "AI"));
}

#[test]
fn test_selection_matching_is_asymmetric() {
    let sel = UserClassSelection::new(["Data Structures (CS-2)"]);
    let cell = "Data Structures (CS-2) Dr. A";
    assert!(sel.highlights(cell));
    assert!(!sel.contains_exact(cell));
    let only_mine = ScheduleFilters { only_mine: true, ..Default::default() };
    assert!(!passes_filters(cell, &only_mine, &sel));
}

#[test]
fn test_classroom_blocks() {
    assert_eq!(categorize_classroom("Rawal Lab 3").as_deref(), Some("B"));
    assert_eq!(categorize_classroom("lab"), None);
    assert_eq!(categorize_classroom("nan"), None);
    assert_eq!(categorize_classroom("C204").as_deref(), Some("C"));
    assert_eq!(categorize_classroom("204").as_deref(), Some("Other"));

    let rooms = vec![
        FreeRoom { row: 3, classroom: "C-12".into() },
        FreeRoom { row: 4, classroom: "Rawal Lab 3".into() },
        FreeRoom { row: 5, classroom: "C-2".into() },
        FreeRoom { row: 6, classroom: "lab".into() },
        FreeRoom { row: 7, classroom: "B10".into() },
    ];
    let groups = group_by_block(&rooms);
    let keys: Vec<&str> = groups.iter().map(|g| g.block.as_str()).collect();
    assert_eq!(keys, vec!["B", "C"]);
    let b: Vec<&str> = groups[0].rooms.iter().map(|r| r.classroom.as_str()).collect();
    assert_eq!(b, vec!["Rawal Lab 3", "B10"]);
    let c: Vec<&str> = groups[1].rooms.iter().map(|r| r.classroom.as_str()).collect();
    assert_eq!(c, vec!["C-2", "C-12"]);
}
