// Building-block categorization of classroom labels and grouping of free rooms.
use std::collections::BTreeMap;

use crate::models::{BlockGroup, ClassroomRecord, FreeRoom};

/// Block key used for labels that do not start with a letter.
pub const OTHER_BLOCK: &str = "Other";

/// Rawal labs sit in B block even though their labels do not say so.
const RAWAL_ALIAS: (&str, &str) = ("rawal", "B");

/// Maps a classroom label to its building block.
///
/// `None` means the label is dropped from grouped output: blank, "nan", or the
/// bare "Lab" label which carries no location.
pub fn categorize_classroom(label: &str) -> Option<String> {
    let name = label.trim();
    let lower = name.to_lowercase();
    if name.is_empty() || lower == "nan" {
        return None;
    }
    if lower.contains(RAWAL_ALIAS.0) {
        return Some(RAWAL_ALIAS.1.to_string());
    }
    if lower == "lab" {
        return None;
    }
    match name.chars().next() {
        Some(c) if c.is_alphabetic() => Some(c.to_uppercase().collect()),
        _ => Some(OTHER_BLOCK.to_string()),
    }
}

/// The trimmed label with its block, as shown in grouped output.
pub fn classroom_record(label: &str) -> ClassroomRecord {
    ClassroomRecord { name: label.trim().to_string(), block: categorize_classroom(label) }
}

/// Digits embedded in a label read as one number; labels without digits sort as 0.
pub fn classroom_number(label: &str) -> u64 {
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

/// Groups free rooms by block. Blocks come out in plain string order ("Other"
/// included), rooms inside a block by their embedded number, ties keeping the
/// order they were found in.
pub fn group_by_block(rooms: &[FreeRoom]) -> Vec<BlockGroup> {
    let mut blocks: BTreeMap<String, Vec<FreeRoom>> = BTreeMap::new();
    for room in rooms {
        if let Some(block) = classroom_record(&room.classroom).block {
            blocks.entry(block).or_default().push(room.clone());
        }
    }

    blocks
        .into_iter()
        .map(|(block, mut rooms)| {
            // sort_by_key is stable
            rooms.sort_by_key(|r| classroom_number(&r.classroom));
            BlockGroup { block, rooms }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(row: usize, name: &str) -> FreeRoom {
        FreeRoom { row, classroom: name.to_string() }
    }

    #[test]
    fn test_categorize_classroom() {
        assert_eq!(categorize_classroom("Rawal Lab 3").as_deref(), Some("B"));
        assert_eq!(categorize_classroom("lab"), None);
        assert_eq!(categorize_classroom(" Lab "), None);
        assert_eq!(categorize_classroom("nan"), None);
        assert_eq!(categorize_classroom(""), None);
        assert_eq!(categorize_classroom("C204"), Some("C".to_string()));
        assert_eq!(categorize_classroom("c204"), Some("C".to_string()));
        assert_eq!(categorize_classroom("Lab 4"), Some("L".to_string()));
        assert_eq!(categorize_classroom("204"), Some(OTHER_BLOCK.to_string()));
    }

    #[test]
    fn test_classroom_number() {
        assert_eq!(classroom_number("C-204"), 204);
        assert_eq!(classroom_number("Auditorium"), 0);
        assert_eq!(classroom_number("Rawal Lab 3"), 3);
    }

    #[test]
    fn test_group_by_block_ordering() {
        let rooms = vec![
            room(3, "C12"),
            room(4, "A301"),
            room(5, "nan"),
            room(6, "C2"),
            room(7, "101"),
            room(8, "Rawal Lab 1"),
            room(9, "Lab"),
            room(10, "CX"),
            room(11, "C"),
        ];
        let groups = group_by_block(&rooms);
        let keys: Vec<&str> = groups.iter().map(|g| g.block.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C", "Other"]);

        let c: Vec<&str> = groups[2].rooms.iter().map(|r| r.classroom.as_str()).collect();
        // CX and C both key 0 and keep their found order
        assert_eq!(c, vec!["CX", "C", "C2", "C12"]);
    }

    #[test]
    fn test_classroom_record() {
        let rec = classroom_record(" E-5 ");
        assert_eq!(rec.name, "E-5");
        assert_eq!(rec.block.as_deref(), Some("E"));
    }
}
