//! Reading day sheets from workbooks.
//!
//! Submodules:
//! - `io`: calamine decoding into `RawGrid`
//! - `normalizer`: splitting a grid into regular and lab sections
//! - `source`: where a day's sheet comes from
//! - `cache`: TTL cache of decoded sheets

pub mod cache;
pub mod io;
pub mod normalizer;
pub mod source;

pub use cache::{CacheStats, CachedSheet, CachedSheetSource};
pub use io::{read_grid, read_grid_from_bytes};
pub use normalizer::{normalize_checked, normalize_sheet, validate_layout, LayoutIssue};
pub use source::{FileSheetSource, MemorySheetSource, SheetSource};
