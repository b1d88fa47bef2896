use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, warn};

use crate::error::{Result, TimetableError};
use crate::excel::CachedSheet;
use crate::models::Day;
use crate::server::AppState;

pub mod docs;
pub mod rooms;
pub mod schedule;
pub mod selection;
pub mod sheets;

pub use docs::*;
pub use rooms::*;
pub use schedule::*;
pub use selection::*;
pub use sheets::*;

/// Maps a failure to its JSON error body: bad input 400, missing sheet 404, the rest 500.
pub fn error_response(e: &TimetableError) -> HttpResponse {
    if e.is_client_error() {
        HttpResponse::BadRequest().json(json!({"error": e.to_string()}))
    } else if e.is_not_found() {
        HttpResponse::NotFound().json(json!({"error": e.to_string()}))
    } else {
        error!("request failed: {}", e);
        HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
    }
}

/// Runs sheet decoding and store access off the async workers.
pub async fn run_blocking<T, F>(f: F) -> std::result::Result<T, HttpResponse>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(error_response(&e)),
        Err(e) => {
            error!("blocking task failed: {}", e);
            Err(HttpResponse::InternalServerError().json(json!({"error": format!("internal task error: {}", e)})))
        }
    }
}

/// Every day's sheet that loads; days that fail are logged and skipped.
pub(crate) fn load_all_days(state: &AppState) -> Vec<Arc<CachedSheet>> {
    let mut sheets = Vec::with_capacity(Day::ALL.len());
    for day in Day::ALL {
        match state.sheets.get(day) {
            Ok(sheet) => sheets.push(sheet),
            Err(e) => warn!(day = %day, "skipping sheet: {}", e),
        }
    }
    sheets
}

pub(crate) type State = web::Data<AppState>;
