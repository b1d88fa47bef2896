// Timetable lookup over per-day spreadsheet exports: schedule search,
// free classrooms per time slot and saved class selections, served over HTTP.
pub mod algorithm;
pub mod api_json;
pub mod config;
pub mod error;
pub mod excel;
pub mod models;
pub mod persist;
pub mod selection;
pub mod server;

pub use config::AppConfig;
pub use error::{Result, TimetableError};
/// Runs the HTTP server (re-exported for `main`)
pub use server::run_server;
