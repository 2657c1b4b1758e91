use crate::errors::ApiError;
use crate::models::{
    CreateLogRequest, CreateLogResponse, DashboardOverview, DoctorSummary, ErrorBody,
    HealthStatus, Insights, Trends,
};
use crate::report::{DownloadedReport, ReportRequest, resolve_filename};
use reqwest::{
    Response,
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const DEFAULT_INSIGHTS_DAYS: u32 = 7;
pub const DEFAULT_SUMMARY_DAYS: u32 = 30;
pub const DEFAULT_TRENDS_DAYS: u32 = 30;

/// Typed wrapper over the HealthVoice backend, one method per endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn create_health_log(
        &self,
        prompt: &str,
        user_id: Option<&str>,
    ) -> Result<CreateLogResponse, ApiError> {
        let body = CreateLogRequest {
            prompt: prompt.to_string(),
            user_id: user_id.map(str::to_string),
        };
        let request = self.http.post(self.url("/api/health-logs")).json(&body);
        read_json(send(request).await?).await
    }

    pub async fn dashboard_overview(
        &self,
        user_id: Option<&str>,
    ) -> Result<DashboardOverview, ApiError> {
        self.get_json("/api/dashboard/overview", None, user_id).await
    }

    pub async fn insights(&self, days: u32, user_id: Option<&str>) -> Result<Insights, ApiError> {
        self.get_json("/api/insights", Some(days), user_id).await
    }

    pub async fn doctor_summary(
        &self,
        days: u32,
        user_id: Option<&str>,
    ) -> Result<DoctorSummary, ApiError> {
        self.get_json("/api/summary", Some(days), user_id).await
    }

    pub async fn trends(&self, days: u32, user_id: Option<&str>) -> Result<Trends, ApiError> {
        self.get_json("/api/trends", Some(days), user_id).await
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/health", None, None).await
    }

    pub async fn download_report(
        &self,
        report: &ReportRequest,
        user_id: Option<&str>,
    ) -> Result<DownloadedReport, ApiError> {
        let mut query = vec![
            ("days", report.days.to_string()),
            ("type", report.kind.as_str().to_string()),
        ];
        if let Some(user_id) = user_id {
            query.push(("user_id", user_id.to_string()));
        }
        query.push(("format", report.format.as_str().to_string()));

        let request = self.http.get(self.url("/api/reports/download")).query(&query);
        let response = send(request).await?;

        let header = |name| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let disposition = header(CONTENT_DISPOSITION);
        let content_type = header(CONTENT_TYPE);
        let filename = resolve_filename(disposition.as_deref(), report.format);

        let bytes = response.bytes().await?.to_vec();
        debug!(%filename, bytes = bytes.len(), "downloaded report");

        Ok(DownloadedReport {
            filename,
            content_type,
            bytes,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        days: Option<u32>,
        user_id: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut query = Vec::with_capacity(2);
        if let Some(days) = days {
            query.push(("days", days.to_string()));
        }
        if let Some(user_id) = user_id {
            query.push(("user_id", user_id.to_string()));
        }

        let request = self.http.get(self.url(path)).query(&query);
        read_json(send(request).await?).await
    }
}

/// Sends the request and turns any non-2xx status into an [`ApiError`].
async fn send(request: reqwest::RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = status.as_u16();
    let body = response.bytes().await.unwrap_or_default();
    let parsed: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
    let err = ApiError::from_status(code, parsed.error, parsed.details);
    warn!(status = code, "backend request failed: {err}");
    Err(err)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
