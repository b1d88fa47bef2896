use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use super::{error_response, load_all_days, run_blocking, State};
use crate::algorithm::query::{gather_all_classes, valid_defaults};
use crate::api_json::parse_save_selection;
use crate::selection::validate_session;

/// GET /selection/{session}
///
/// Returns the saved classes together with `valid`, the subset still present
/// in this week's sheets.
pub async fn get_selection_handler(state: State, path: web::Path<String>) -> impl Responder {
    let session = match validate_session(&path) {
        Ok(s) => s.to_string(),
        Err(e) => return error_response(&e),
    };

    let st = state.into_inner();
    let loaded = run_blocking(move || {
        let selection = st.selections.load(&session)?;
        let sheets = load_all_days(&st);
        let catalog = gather_all_classes(sheets.iter().map(|s| &s.normalized));
        let valid = valid_defaults(&selection, &catalog);
        Ok((session, selection, valid))
    })
    .await;

    match loaded {
        Ok((session, selection, valid)) => HttpResponse::Ok().json(json!({
            "session": session,
            "classes": selection.classes,
            "saved_at": selection.saved_at,
            "valid": valid,
        })),
        Err(resp) => resp,
    }
}

/// PUT /selection/{session}
pub async fn put_selection_handler(
    state: State,
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let session = match validate_session(&path) {
        Ok(s) => s.to_string(),
        Err(e) => return error_response(&e),
    };
    let selection = match parse_save_selection(body.into_inner()) {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };

    let st = state.into_inner();
    let saved = run_blocking(move || {
        let stored = st.selections.save(&session, &selection)?;
        Ok((session, stored))
    })
    .await;

    match saved {
        Ok((session, stored)) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "session": session,
            "count": stored.classes.len(),
            "classes": stored.classes,
            "saved_at": stored.saved_at,
        })),
        Err(resp) => resp,
    }
}
