#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Prompt that makes the fake backend reject the log.
pub const FAILING_PROMPT: &str = "fail";
/// User ids that make read endpoints misbehave.
pub const BROKEN_USER: &str = "user_broken";
pub const DETAILS_USER: &str = "user_details";
pub const GARBAGE_USER: &str = "user_garbage";

#[derive(Default)]
pub struct Recorded {
    pub logs: Vec<(String, Option<String>)>,
    pub queries: Vec<(String, HashMap<String, String>)>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    pub recorded: Arc<Mutex<Recorded>>,
}

impl FakeBackend {
    pub fn logs(&self) -> Vec<(String, Option<String>)> {
        self.recorded.lock().unwrap().logs.clone()
    }

    pub fn queries(&self, path: &str) -> Vec<HashMap<String, String>> {
        self.recorded
            .lock()
            .unwrap()
            .queries
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, q)| q.clone())
            .collect()
    }

    fn record(&self, path: &str, query: &HashMap<String, String>) {
        self.recorded
            .lock()
            .unwrap()
            .queries
            .push((path.to_string(), query.clone()));
    }

    fn logs_for(&self, user_id: Option<&String>) -> u32 {
        self.recorded
            .lock()
            .unwrap()
            .logs
            .iter()
            .filter(|(_, user)| user.as_ref() == user_id)
            .count() as u32
    }
}

/// Starts the fake backend on a random local port and returns its base URL.
pub async fn spawn_backend() -> (String, FakeBackend) {
    let backend = FakeBackend::default();
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/health-logs", post(create_log))
        .route("/api/dashboard/overview", get(overview))
        .route("/api/insights", get(insights))
        .route("/api/summary", get(summary))
        .route("/api/trends", get(trends))
        .route("/api/reports/download", get(download))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend");
    });

    (format!("http://{addr}"), backend)
}

#[derive(Deserialize)]
struct LogBody {
    prompt: Option<String>,
    user_id: Option<String>,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "timestamp": "2026-10-18T09:00:00" }))
}

async fn create_log(State(backend): State<FakeBackend>, Json(body): Json<LogBody>) -> Response {
    let Some(prompt) = body.prompt.filter(|p| !p.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing 'prompt' field in request body" })),
        )
            .into_response();
    };
    if prompt == FAILING_PROMPT {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "bad input" })),
        )
            .into_response();
    }

    let count = {
        let mut recorded = backend.recorded.lock().unwrap();
        recorded.logs.push((prompt.clone(), body.user_id));
        recorded.logs.len()
    };
    Json(json!({
        "message": "Health log created successfully",
        "log_id": format!("log-{count}"),
        "summary": format!("Noted: {prompt}")
    }))
    .into_response()
}

/// Response shapes below copy what the backend sends, including the trimmed
/// payloads it returns for a period without logs.
async fn overview(
    State(backend): State<FakeBackend>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/api/dashboard/overview", &query);
    if query.get("user_id").map(String::as_str) == Some(BROKEN_USER) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "<html>upstream exploded").into_response();
    }

    let logs = backend.logs_for(query.get("user_id"));
    let consistency = if logs == 0 {
        json!({ "streak_days": 0, "total_logs": 0, "last_log_date": null })
    } else {
        json!({
            "streak_days": 1,
            "total_logs": logs,
            "last_log_date": "2026-10-18",
            "unique_days_logged": 1
        })
    };
    let today_symptoms = if logs > 0 { json!(["headache"]) } else { json!([]) };
    Json(json!({
        "today_symptoms": today_symptoms,
        "mental_state": "Neutral",
        "medications_logged": [],
        "health_consistency": consistency,
        "logs_today": logs,
        "timestamp": "2026-10-18T09:00:00"
    }))
    .into_response()
}

async fn insights(
    State(backend): State<FakeBackend>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/api/insights", &query);
    if query.get("user_id").map(String::as_str) == Some(DETAILS_USER) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "details": "db down" })),
        )
            .into_response();
    }

    let logs = backend.logs_for(query.get("user_id"));
    let days: u32 = query
        .get("days")
        .and_then(|days| days.parse().ok())
        .unwrap_or(7);
    let symptoms = if logs > 0 {
        json!([{ "symptom": "headache", "frequency": logs, "percentage": 100.0 }])
    } else {
        json!([])
    };
    Json(json!({
        "symptoms_detected": symptoms,
        "mental_emotional_state": {
            "primary_mood": "Neutral",
            "mood_distribution": {},
            "total_mood_mentions": 0
        },
        "medications_timing": [],
        "lifestyle_context": {
            "sleep": { "average_hours": null, "mentions": 0 },
            "exercise": { "mentions": 0, "frequency": format!("0 times in {days} days") },
            "stress": { "mentions": 0, "frequency": format!("0 times in {days} days") }
        },
        "analysis_period": {
            "days": days,
            "start_date": "2026-10-11T09:00:00",
            "end_date": "2026-10-18T09:00:00",
            "total_logs": logs
        }
    }))
    .into_response()
}

async fn summary(
    State(backend): State<FakeBackend>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.record("/api/summary", &query);
    let logs = backend.logs_for(query.get("user_id"));
    if logs == 0 {
        return Json(json!({
            "summary": "No health logs available for the specified period.",
            "period_days": 30,
            "generated_at": "2026-10-18T09:00:00"
        }));
    }
    Json(json!({
        "summary": format!("Patient reported {logs} update(s)."),
        "period_days": 30,
        "total_logs": logs,
        "generated_at": "2026-10-18T09:00:00"
    }))
}

async fn trends(
    State(backend): State<FakeBackend>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/api/trends", &query);
    if query.get("user_id").map(String::as_str) == Some(GARBAGE_USER) {
        return (
            [(header::CONTENT_TYPE, "application/json")],
            "{\"symptom_frequency\": [",
        )
            .into_response();
    }

    let logs = backend.logs_for(query.get("user_id"));
    let adherence = json!({ "total_mentions": 0, "unique_medications": 0, "medications": [] });
    if logs == 0 {
        return Json(json!({
            "symptom_frequency": [],
            "mood_trends": [],
            "medication_adherence": adherence,
            "period_days": 7,
            "message": "No data available for trend analysis"
        }))
        .into_response();
    }
    Json(json!({
        "symptom_frequency": [],
        "mood_trends": [],
        "medication_adherence": adherence,
        "daily_breakdown": [{
            "date": "2026-10-18",
            "symptoms_count": logs,
            "unique_symptoms": 1,
            "mood": "Calm",
            "medications_count": 0
        }],
        "period_days": 7,
        "total_logs": logs,
        "analysis_date": "2026-10-18T09:00:00"
    }))
    .into_response()
}

async fn download(
    State(backend): State<FakeBackend>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/api/reports/download", &query);
    match query.get("format").map(String::as_str) {
        Some("txt") => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "HEALTHVOICE - HEALTH REPORT",
        )
            .into_response(),
        _ => (
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"foo.pdf\""),
            ],
            b"%PDF-1.4 fake".to_vec(),
        )
            .into_response(),
    }
}
