use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{error_response, run_blocking, State};
use crate::algorithm::free_slots::{find_empty_rooms_by_label, lookup_free_rooms, FreeRoomOutcome};
use crate::api_json::{parse_day, parse_free_room_request};
use crate::error::TimetableError;
use crate::models::{Day, SectionKind};

#[derive(Debug, Serialize)]
struct FreeRoomResponse {
    day: Day,
    search_type: SectionKind,
    time_slot: String,
    #[serde(flatten)]
    outcome: FreeRoomOutcome,
}

/// POST /free-rooms
pub async fn free_rooms_handler(state: State, body: web::Json<serde_json::Value>) -> impl Responder {
    let params = match parse_free_room_request(body.into_inner()) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };

    let st = state.into_inner();
    let (day, kind, slot) = (params.day, params.kind, params.time_slot.clone());
    let outcome = run_blocking(move || {
        lookup_free_rooms(day, kind, &slot, || st.sheets.get(day).map(|s| s.raw.clone()))
    })
    .await;

    match outcome {
        Ok(outcome) => HttpResponse::Ok().json(FreeRoomResponse {
            day: params.day,
            search_type: params.kind,
            time_slot: params.time_slot,
            outcome,
        }),
        Err(resp) => resp,
    }
}

#[derive(Debug, Deserialize)]
pub struct EmptyRoomQuery {
    pub day: Option<String>,
    pub time: Option<String>,
}

/// GET /empty-rooms?day=&time=
pub async fn empty_rooms_handler(state: State, query: web::Query<EmptyRoomQuery>) -> impl Responder {
    let query = query.into_inner();
    let day = match parse_day(query.day.as_deref()) {
        Ok(d) => d,
        Err(e) => return error_response(&e),
    };
    let label = match query.time.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        Some(t) => t,
        None => return error_response(&TimetableError::InvalidRequest("time parameter required".into())),
    };

    let st = state.into_inner();
    let lookup_label = label.clone();
    let rooms = run_blocking(move || {
        let sheet = st.sheets.get(day)?;
        Ok(find_empty_rooms_by_label(&sheet.normalized, &lookup_label))
    })
    .await;

    match rooms {
        Ok(rooms) => HttpResponse::Ok().json(json!({"day": day, "time": label, "count": rooms.len(), "rooms": rooms})),
        Err(resp) => resp,
    }
}
