use crate::client::ApiClient;
use crate::config::Config;
use crate::models::{DashboardOverview, DoctorSummary, Insights};
use crate::refresh::RefreshBus;
use crate::session::UserSession;
use crate::storage::KeyValueStore;
use crate::views::{
    self, AnalysisView, ChartPoint, DoctorSummaryView, HistoryEntry, HistoryView, InsightsView,
    OverviewView, TrendsView, ViewContext, ViewHandle, ViewState, VoiceAnalysis,
};
use crate::voice::{VoiceLogger, VoiceSnapshot};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

pub struct Dashboard {
    pub overview: ViewHandle<DashboardOverview>,
    pub insights: ViewHandle<Insights>,
    pub trends: ViewHandle<Vec<ChartPoint>>,
    pub history: ViewHandle<Vec<HistoryEntry>>,
    pub summary: ViewHandle<DoctorSummary>,
    pub analysis: ViewHandle<VoiceAnalysis>,
}

impl Dashboard {
    pub fn mount(ctx: &ViewContext, bus: &RefreshBus, config: &Config) -> Self {
        Self {
            overview: views::mount(OverviewView::new(config.refresh_delay), ctx.clone(), bus),
            insights: views::mount(InsightsView::default(), ctx.clone(), bus),
            trends: views::mount(TrendsView::default(), ctx.clone(), bus),
            history: views::mount(HistoryView::default(), ctx.clone(), bus),
            summary: views::mount(DoctorSummaryView::default(), ctx.clone(), bus),
            analysis: views::mount(AnalysisView::default(), ctx.clone(), bus),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub overview: ViewState<DashboardOverview>,
    pub insights: ViewState<Insights>,
    pub trends: ViewState<Vec<ChartPoint>>,
    pub history: ViewState<Vec<HistoryEntry>>,
    pub summary: ViewState<DoctorSummary>,
    pub analysis: ViewState<VoiceAnalysis>,
    pub voice: VoiceSnapshot,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: ApiClient,
    pub session: UserSession,
    pub bus: RefreshBus,
    pub voice: Arc<VoiceLogger>,
    pub dashboard: Arc<Dashboard>,
    notice: Arc<Mutex<Option<Notice>>>,
}

impl AppState {
    /// Mounts every view, so it must run inside the tokio runtime.
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let client = ApiClient::new(config.api_base_url.clone());
        let session = UserSession::new(store);
        let bus = RefreshBus::new();

        let ctx = ViewContext::new(client.clone(), session.clone());
        let dashboard = Dashboard::mount(&ctx, &bus, &config);
        let voice = VoiceLogger::new(
            Arc::new(client.clone()),
            session.clone(),
            bus.clone(),
            config.transcript_clear_delay,
        );

        Self {
            config: Arc::new(config),
            client,
            session,
            bus,
            voice: Arc::new(voice),
            dashboard: Arc::new(dashboard),
            notice: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn flash(&self, notice: Notice) {
        *self.notice.lock().await = Some(notice);
    }

    pub async fn take_notice(&self) -> Option<Notice> {
        self.notice.lock().await.take()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let dashboard = &self.dashboard;
        DashboardSnapshot {
            overview: dashboard.overview.state(),
            insights: dashboard.insights.state(),
            trends: dashboard.trends.state(),
            history: dashboard.history.state(),
            summary: dashboard.summary.state(),
            analysis: dashboard.analysis.state(),
            voice: self.voice.snapshot(),
        }
    }
}
