use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::api_json::handlers::{
    cache_stats_handler, classes_handler, days_handler, departments_handler, empty_rooms_handler, free_rooms_handler,
    get_selection_handler, help_handler, put_selection_handler, schedule_handler, time_slots_handler,
    upload_sheet_handler,
};
use crate::config::AppConfig;
use crate::excel::{CachedSheetSource, FileSheetSource, SheetSource};
use crate::selection::{store_from_config, SelectionStore};

/// Shared state handed to every handler.
pub struct AppState {
    pub config: AppConfig,
    pub sheets: CachedSheetSource<Arc<dyn SheetSource>>,
    pub selections: Arc<dyn SelectionStore>,
}

impl AppState {
    pub fn new(config: AppConfig, source: Arc<dyn SheetSource>, selections: Arc<dyn SelectionStore>) -> Self {
        let sheets = CachedSheetSource::new(source, config.cache_ttl);
        Self { config, sheets, selections }
    }

    /// Workbooks from the configured directory, selections from the configured backend.
    pub fn from_config(config: AppConfig) -> crate::error::Result<Self> {
        let source: Arc<dyn SheetSource> = Arc::new(FileSheetSource::from_config(&config));
        let selections = store_from_config(&config)?;
        Ok(Self::new(config, source, selections))
    }
}

/// Route table, shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/help", web::get().to(help_handler))
        .route("/days", web::get().to(days_handler))
        .route("/departments", web::get().to(departments_handler))
        .route("/time-slots", web::get().to(time_slots_handler))
        .route("/schedule", web::post().to(schedule_handler))
        .route("/free-rooms", web::post().to(free_rooms_handler))
        .route("/empty-rooms", web::get().to(empty_rooms_handler))
        .route("/classes", web::get().to(classes_handler))
        .route("/selection/{session}", web::get().to(get_selection_handler))
        .route("/selection/{session}", web::put().to(put_selection_handler))
        .route("/sheets/{day}", web::post().to(upload_sheet_handler))
        .route("/cache/stats", web::get().to(cache_stats_handler));
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let bind = config.bind.clone();
    let state = AppState::from_config(config).map_err(std::io::Error::other)?;
    info!(
        bind = %bind,
        datafiles = %state.config.datafiles_dir.display(),
        ttl_secs = state.config.cache_ttl.as_secs(),
        "starting timetable server"
    );
    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(&bind)?
    .run()
    .await
}
