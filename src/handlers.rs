use crate::errors::AppError;
use crate::models::HealthStatus;
use crate::report::{ReportFormat, ReportKind, ReportRequest};
use crate::state::{AppState, DashboardSnapshot, Notice};
use crate::ui::{self, Shell};
use crate::voice::{SubmitOutcome, TypedTranscript};
use axum::{
    Form, Json,
    extract::{Query, State},
    response::{Html, Redirect},
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct LogForm {
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogResult {
    pub outcome: String,
    pub log_id: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportForm {
    pub kind: String,
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameForm {
    pub name: String,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let shell = shell(&state, "/").await;
    Html(ui::render_dashboard(&shell, &state.snapshot()))
}

pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Html<String> {
    let shell = shell(&state, "/history").await;
    let search = query.q.unwrap_or_default();
    Html(ui::render_history(
        &shell,
        &state.dashboard.history.state(),
        &search,
    ))
}

pub async fn analysis(State(state): State<AppState>) -> Html<String> {
    let shell = shell(&state, "/analysis").await;
    Html(ui::render_analysis(&shell, &state.dashboard.analysis.state()))
}

pub async fn reports(State(state): State<AppState>) -> Html<String> {
    let shell = shell(&state, "/reports").await;
    Html(ui::render_reports(&shell))
}

pub async fn settings(State(state): State<AppState>) -> Html<String> {
    let shell = shell(&state, "/settings").await;
    Html(ui::render_settings(&shell, &state.session.user_id()))
}

pub async fn create_log(State(state): State<AppState>, Form(form): Form<LogForm>) -> Redirect {
    let notice = match state.voice.record(&TypedTranscript::new(form.prompt)).await {
        Ok(SubmitOutcome::Logged(last)) => {
            Some(Notice::success("Health log created successfully!", last.summary))
        }
        Ok(SubmitOutcome::Empty) => None,
        Ok(SubmitOutcome::NotRecording) => Some(Notice::error(
            "Still processing",
            "Your previous entry is still being analyzed.",
        )),
        Err(err) => Some(Notice::error("Failed to create health log", err.message())),
    };
    if let Some(notice) = notice {
        state.flash(notice).await;
    }
    Redirect::to("/")
}

pub async fn create_log_json(
    State(state): State<AppState>,
    Json(payload): Json<LogForm>,
) -> Result<Json<LogResult>, AppError> {
    let outcome = state
        .voice
        .record(&TypedTranscript::new(payload.prompt))
        .await?;

    let result = match outcome {
        SubmitOutcome::Logged(last) => LogResult {
            outcome: "logged".to_string(),
            log_id: Some(last.log_id),
            summary: Some(last.summary),
        },
        SubmitOutcome::Empty => LogResult {
            outcome: "empty".to_string(),
            log_id: None,
            summary: None,
        },
        SubmitOutcome::NotRecording => LogResult {
            outcome: "busy".to_string(),
            log_id: None,
            summary: None,
        },
    };
    Ok(Json(result))
}

pub async fn download_report(
    State(state): State<AppState>,
    Form(form): Form<ReportForm>,
) -> Result<Redirect, AppError> {
    let kind: ReportKind = form.kind.parse().map_err(AppError::bad_request)?;
    let format = match form.format.as_deref() {
        Some(value) if !value.trim().is_empty() => {
            value.parse::<ReportFormat>().map_err(AppError::bad_request)?
        }
        _ => ReportFormat::default(),
    };
    let request = ReportRequest::for_kind(kind, format);
    let user_id = state.session.user_id();

    let saved = match state.client.download_report(&request, Some(&user_id)).await {
        Ok(report) => report.save_to(&state.config.download_dir).await,
        Err(err) => Err(err),
    };

    let notice = match saved {
        Ok(path) => Notice::success(
            "Report downloaded",
            format!(
                "Your {} was saved to {}.",
                kind.title().to_lowercase(),
                path.display()
            ),
        ),
        Err(err) => Notice::error("Download failed", err.message()),
    };
    state.flash(notice).await;
    Ok(Redirect::to("/reports"))
}

pub async fn save_name(State(state): State<AppState>, Form(form): Form<NameForm>) -> Redirect {
    state.session.set_display_name(&form.name);
    state
        .flash(Notice::success(
            "Profile updated",
            format!("Display name is now {}.", state.session.display_name_or_default()),
        ))
        .await;
    Redirect::to("/settings")
}

pub async fn logout(State(state): State<AppState>) -> Redirect {
    state.session.clear();
    info!("logged out; views will refetch under a new identifier");
    state.bus.emit();
    state
        .flash(Notice::success("Signed out", "A new anonymous profile was started."))
        .await;
    Redirect::to("/settings")
}

pub async fn views_json(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.snapshot())
}

pub async fn backend_health(State(state): State<AppState>) -> Result<Json<HealthStatus>, AppError> {
    Ok(Json(state.client.health().await?))
}

async fn shell(state: &AppState, active: &'static str) -> Shell {
    Shell {
        active,
        display_name: state.session.display_name_or_default(),
        initials: state.session.initials(),
        notice: state.take_notice().await,
    }
}
