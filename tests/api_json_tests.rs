use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::{json, Value};

use timetable_lookup::config::AppConfig;
use timetable_lookup::excel::{MemorySheetSource, SheetSource};
use timetable_lookup::models::{CellValue, Day, RawGrid, Row};
use timetable_lookup::selection::{JsonSelectionStore, SelectionStore};
use timetable_lookup::server::{configure, AppState};

const WIDTH: usize = 19;

/// Monday: "Room" header at row 4, lab timings at row 42.
fn monday() -> RawGrid {
    let mut rows: Vec<Row> = (0..60).map(|_| vec![CellValue::Empty; WIDTH]).collect();
    rows[0][0] = CellValue::text("Monday");
    rows[4][0] = CellValue::text("Room");
    rows[4][1] = CellValue::text("08:30-09:50");
    rows[4][4] = CellValue::text("10:00-11:20");
    rows[10][0] = CellValue::text("A101");
    rows[10][1] = CellValue::text("Data Structures (CS-2) Dr. A");
    rows[11][0] = CellValue::text("B205");
    rows[11][4] = CellValue::text("Calculus (SE-1) Dr. C");
    rows[42][0] = CellValue::text("Lab");
    rows[42][1] = CellValue::text("08:30-11:15");
    rows[50][0] = CellValue::text("Rawal Lab 3");
    rows[50][2] = CellValue::text("OOP Lab (CS-1)");
    RawGrid::new(rows)
}

fn state(dir: &tempfile::TempDir) -> web::Data<AppState> {
    let config = AppConfig { datafiles_dir: dir.path().join("sheets"), ..Default::default() };
    let source: Arc<dyn SheetSource> = Arc::new(
        MemorySheetSource::new().with_day(Day::Monday, monday()).with_day(Day::Friday, RawGrid::default()),
    );
    let selections: Arc<dyn SelectionStore> = Arc::new(JsonSelectionStore::new(dir.path().join("selections.json")));
    web::Data::new(AppState::new(config, source, selections))
}

#[actix_web::test]
async fn test_days_and_departments() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/days").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["days"].as_array().unwrap().len(), 5);

    let req = test::TestRequest::get().uri("/departments").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["departments"][1]["label"], "CS - Computer Science");
}

#[actix_web::test]
async fn test_schedule_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/schedule")
        .set_json(json!({"day": "Monday", "department": "CS - Computer Science"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["entries"][0]["course_text"], "Data Structures (CS-2) Dr. A");
    assert_eq!(body["entries"][0]["display_time"], "08:30-09:50");
    assert_eq!(body["entries"][1]["is_lab"], true);
    assert!(body["hint"].is_null());

    let req = test::TestRequest::post()
        .uri("/schedule")
        .set_json(json!({"day": "Monday", "query": "physics"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["hint"], "No results found for 'physics'");
}

#[actix_web::test]
async fn test_schedule_errors() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

    let req = test::TestRequest::post().uri("/schedule").set_json(json!({"day": "Sunday"})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::post().uri("/schedule").set_json(json!({"day": "Tuesday"})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_friday_break_response() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/free-rooms")
        .set_json(json!({"day": "Friday", "search_type": "course", "time_slot": "1:00-2:20"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "break");
    assert_eq!(body["day"], "Friday");
}

#[actix_web::test]
async fn test_free_rooms_grouped() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/free-rooms")
        .set_json(json!({"day": "Monday", "search_type": "course", "time_slot": "8:30-10:00"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "rooms");
    let blocks = body["blocks"].as_array().unwrap();
    let b = blocks.iter().find(|g| g["block"] == "B").unwrap();
    assert!(b["rooms"].as_array().unwrap().iter().any(|r| r["classroom"] == "B205"));
    let a_rooms: Vec<&Value> = blocks.iter().filter(|g| g["block"] == "A").collect();
    assert!(a_rooms.is_empty());

    let req = test::TestRequest::post()
        .uri("/free-rooms")
        .set_json(json!({"day": "Monday", "search_type": "lab", "time_slot": "9:00-9:30"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_empty_rooms_by_label() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/empty-rooms?day=Monday&time=08:30-09:50").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["rooms"], json!(["B205"]));

    let req = test::TestRequest::get().uri("/empty-rooms?day=Monday").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_selection_round_trip_and_only_mine() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

    let req = test::TestRequest::put()
        .uri("/selection/abc")
        .set_json(json!({"classes": ["Calculus (SE-1) Dr. C", "Retired (CS-9)"]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);

    let req = test::TestRequest::get().uri("/selection/abc").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["valid"], json!(["Calculus (SE-1) Dr. C"]));
    assert!(body["saved_at"].is_string());

    let req = test::TestRequest::post()
        .uri("/schedule")
        .set_json(json!({"day": "Monday", "only_mine": true, "session": "abc"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["entries"][0]["is_my_class"], true);

    let req = test::TestRequest::get().uri("/selection/bad.id").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_only_mine_without_session_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/schedule")
        .set_json(json!({"day": "Monday", "only_mine": true}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["hint"], "No classes found on Monday in your saved list");
}

#[actix_web::test]
async fn test_upload_rejects_non_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

    let body = "--BOUNDARY\r\n\
        Content-Disposition: form-data; name=\"file\"; filename=\"Monday.xlsx\"\r\n\
        Content-Type: application/octet-stream\r\n\r\n\
        definitely not a workbook\r\n\
        --BOUNDARY--\r\n";
    let req = test::TestRequest::post()
        .uri("/sheets/Monday")
        .insert_header(("content-type", "multipart/form-data; boundary=BOUNDARY"))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    assert!(!dir.path().join("sheets/Monday.xlsx").exists());
}

#[actix_web::test]
async fn test_time_slots_with_day() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state(&dir)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/time-slots?day=Monday").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["course"].as_array().unwrap().len(), 6);
    assert_eq!(body["lab"][0]["columns"], json!([1, 2, 3, 4, 5, 6]));
    assert_eq!(body["standard"], json!(["08:30-09:50", "08:30-11:15", "10:00-11:20"]));
}
