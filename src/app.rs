use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/history", get(handlers::history))
        .route("/analysis", get(handlers::analysis))
        .route("/reports", get(handlers::reports))
        .route("/settings", get(handlers::settings))
        .route("/log", post(handlers::create_log))
        .route("/reports/download", post(handlers::download_report))
        .route("/settings/name", post(handlers::save_name))
        .route("/settings/logout", post(handlers::logout))
        .route("/api/log", post(handlers::create_log_json))
        .route("/api/views", get(handlers::views_json))
        .route("/api/health", get(handlers::backend_health))
        .with_state(state)
}
