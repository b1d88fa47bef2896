use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::stream::StreamExt;
use serde_json::json;
use tracing::{info, warn};

use super::{error_response, run_blocking, State};
use crate::api_json::parse_day;
use crate::error::TimetableError;
use crate::excel::io::read_grid_from_bytes;
use crate::excel::normalizer::{validate_layout, LayoutIssue};
use crate::persist::write_atomic;

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const UPLOAD_FIELD: &str = "file";

/// Reads the workbook part of the form: the field named `file`, or else the
/// first part carrying a filename.
async fn read_workbook_field(payload: &mut Multipart) -> Result<Vec<u8>, TimetableError> {
    while let Some(field_res) = payload.next().await {
        let mut field = field_res.map_err(|e| TimetableError::InvalidRequest(format!("multipart field error: {}", e)))?;
        let cd = field.content_disposition();
        let wanted = cd.get_name() == Some(UPLOAD_FIELD) || cd.get_filename().is_some();
        if !wanted {
            continue;
        }

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| TimetableError::InvalidRequest(format!("upload stream error: {}", e)))?;
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(TimetableError::InvalidRequest(format!(
                    "workbook larger than {} bytes",
                    MAX_UPLOAD_BYTES
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(bytes);
    }
    Err(TimetableError::InvalidRequest(format!("no '{}' part in upload", UPLOAD_FIELD)))
}

/// POST /sheets/{day}
///
/// The workbook is decoded and its layout checked before it replaces the
/// day's sheet. A workbook without the "Room" header row is rejected; other
/// layout issues are returned as warnings.
pub async fn upload_sheet_handler(state: State, path: web::Path<String>, mut payload: Multipart) -> impl Responder {
    let day = match parse_day(Some(path.as_str())) {
        Ok(d) => d,
        Err(e) => return error_response(&e),
    };
    let bytes = match read_workbook_field(&mut payload).await {
        Ok(b) if !b.is_empty() => b,
        Ok(_) => return error_response(&TimetableError::InvalidRequest("empty upload".into())),
        Err(e) => return error_response(&e),
    };

    let sheet_name = state.config.sheet_name.clone();
    let to_check = bytes.clone();
    let checked = run_blocking(move || {
        let grid = read_grid_from_bytes(to_check, sheet_name.as_deref())
            .map_err(|e| TimetableError::Layout(format!("not a readable workbook: {}", e)))?;
        let issues = validate_layout(&grid);
        if issues.contains(&LayoutIssue::MissingRoomMarker) {
            return Err(TimetableError::Layout(LayoutIssue::MissingRoomMarker.to_string()));
        }
        Ok((grid.len(), issues))
    })
    .await;
    let (rows, issues) = match checked {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // lookups may be decoding the current file; swap it in whole
    let target = state.config.sheet_path(day);
    let size = bytes.len();
    let dest = target.clone();
    if let Err(resp) = run_blocking(move || Ok(write_atomic(&dest, &bytes)?)).await {
        return resp;
    }
    state.sheets.invalidate(day);

    let warnings: Vec<String> = issues.iter().map(ToString::to_string).collect();
    for w in &warnings {
        warn!(day = %day, "uploaded sheet: {}", w);
    }
    info!(day = %day, path = %target.display(), rows, bytes = size, "sheet replaced");
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "day": day,
        "path": target.display().to_string(),
        "rows": rows,
        "warnings": warnings,
    }))
}
