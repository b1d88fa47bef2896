use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::debug;

use super::{error_response, load_all_days, run_blocking, State};
use crate::algorithm::query::{gather_all_classes, run_schedule_query, QueryContext};
use crate::api_json::parse_schedule_request;
use crate::models::UserClassSelection;

/// POST /schedule
pub async fn schedule_handler(state: State, body: web::Json<serde_json::Value>) -> impl Responder {
    let params = match parse_schedule_request(body.into_inner()) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };

    let st = state.into_inner();
    let answer = run_blocking(move || {
        let selection = match params.session.as_deref() {
            Some(session) => st.selections.load(session)?,
            None => UserClassSelection::default(),
        };
        let sheet = st.sheets.get(params.day)?;
        Ok(run_schedule_query(&sheet.normalized, params.day, &params.filters, QueryContext::new(&selection)))
    })
    .await;

    match answer {
        Ok(answer) => {
            debug!(day = %answer.day, entries = answer.entries.len(), "schedule answered");
            HttpResponse::Ok().json(json!({
                "day": answer.day,
                "count": answer.entries.len(),
                "entries": answer.entries,
                "hint": answer.hint,
            }))
        }
        Err(resp) => resp,
    }
}

/// GET /classes
pub async fn classes_handler(state: State) -> impl Responder {
    let st = state.into_inner();
    let catalog = run_blocking(move || {
        let sheets = load_all_days(&st);
        Ok((sheets.len(), gather_all_classes(sheets.iter().map(|s| &s.normalized))))
    })
    .await;

    match catalog {
        Ok((days_read, classes)) => {
            HttpResponse::Ok().json(json!({"days_read": days_read, "count": classes.len(), "classes": classes}))
        }
        Err(resp) => resp,
    }
}
