use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use super::{error_response, run_blocking, State};
use crate::algorithm::filters::DEPARTMENT_OPTIONS;
use crate::algorithm::slots::{extract_standard_time_slots, BREAK_DAY, BREAK_SLOT, COURSE_TIME_SLOTS, LAB_TIME_SLOTS};
use crate::api_json::parse_day;
use crate::models::Day;

/// GET /help
pub async fn help_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "endpoints": {
            "GET /days": "weekdays with a sheet and today's default",
            "GET /departments": "department filter options",
            "GET /time-slots?day=Monday": "fixed slots, plus the header labels of the day's sheet",
            "POST /schedule": {"day": "Monday", "department": "CS", "query": "data", "content": "All", "only_mine": false, "session": "a1b2c3"},
            "POST /free-rooms": {"day": "Wednesday", "search_type": "course", "time_slot": "10:00-11:20"},
            "GET /empty-rooms?day=Monday&time=08:30-09:50": "rooms with nothing under that header label",
            "GET /classes": "every class across the week",
            "GET /selection/{session}": "saved classes and those still in the timetable",
            "PUT /selection/{session}": {"classes": ["Data Structures (CS-2) Dr. A"]},
            "POST /sheets/{day}": "multipart upload of the day's workbook (field 'file')",
            "GET /cache/stats": "sheet cache hits and misses"
        },
        "content": ["All", "Regular Classes", "Labs Only"],
    }))
}

/// GET /days
pub async fn days_handler() -> impl Responder {
    let days: Vec<&str> = Day::ALL.iter().map(|d| d.name()).collect();
    HttpResponse::Ok().json(json!({"days": days, "today": Day::today()}))
}

/// GET /departments
pub async fn departments_handler() -> impl Responder {
    let options: Vec<_> = DEPARTMENT_OPTIONS
        .iter()
        .map(|(code, name)| {
            let label = if code == name { code.to_string() } else { format!("{} - {}", code, name) };
            json!({"code": code, "name": name, "label": label})
        })
        .collect();
    HttpResponse::Ok().json(json!({"departments": options}))
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub day: Option<String>,
}

/// GET /time-slots?day=
pub async fn time_slots_handler(state: State, query: web::Query<DayQuery>) -> impl Responder {
    let mut body = json!({
        "course": COURSE_TIME_SLOTS,
        "lab": LAB_TIME_SLOTS,
        "break": {"day": BREAK_DAY, "slot": BREAK_SLOT},
    });

    let Some(raw_day) = query.day.as_deref().filter(|d| !d.trim().is_empty()) else {
        return HttpResponse::Ok().json(body);
    };
    let day = match parse_day(Some(raw_day)) {
        Ok(d) => d,
        Err(e) => return error_response(&e),
    };

    let st = state.into_inner();
    let standard = match run_blocking(move || {
        let sheet = st.sheets.get(day)?;
        Ok(extract_standard_time_slots(&sheet.normalized.regular, &sheet.normalized.lab))
    })
    .await
    {
        Ok(labels) => labels,
        Err(resp) => return resp,
    };
    body["day"] = json!(day);
    body["standard"] = json!(standard);
    HttpResponse::Ok().json(body)
}

/// GET /cache/stats
pub async fn cache_stats_handler(state: State) -> impl Responder {
    HttpResponse::Ok().json(state.sheets.stats())
}
