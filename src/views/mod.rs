//! Self-fetching dashboard views.
//!
//! A mounted view fetches once, then again after every refresh signal, and
//! publishes its latest state through a `watch` channel. Views never share
//! fetched data. A fetch is never cancelled; a result that settles after the
//! view was unmounted is dropped on the floor.

mod analysis;
mod history;
mod insights;
mod overview;
mod summary;
mod trends;

pub use analysis::{
    AnalysedMedication, AnalysedSymptom, AnalysisView, Severity, VoiceAnalysis, voice_analysis,
};
pub use history::{HistoryEntry, HistoryView, MoodTone, filter_entries, history_entries};
pub use insights::{InsightSection, InsightsView, insight_sections};
pub use overview::{OverviewView, Tile, TileTrend, overview_tiles};
pub use summary::{DoctorSummaryView, FAILED_SUMMARY_TEXT, NO_SUMMARY_TEXT};
pub use trends::{ChartPoint, TrendsView, chart_points};

use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::refresh::{RefreshBus, Subscription};
use crate::session::UserSession;
use async_trait::async_trait;
use serde::Serialize;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::{Notify, watch};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading,
    Loaded(T),
    Empty,
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// What every view needs to reach the backend on behalf of the current profile.
#[derive(Clone)]
pub struct ViewContext {
    pub client: ApiClient,
    pub session: UserSession,
}

impl ViewContext {
    pub fn new(client: ApiClient, session: UserSession) -> Self {
        Self { client, session }
    }

    pub fn user_id(&self) -> String {
        self.session.user_id()
    }
}

#[async_trait]
pub trait View: Send + Sync + 'static {
    type Data: Clone + Send + Sync + 'static;

    const NAME: &'static str;

    async fn fetch(&self, ctx: &ViewContext) -> Result<Self::Data, ApiError>;

    fn is_empty(&self, _data: &Self::Data) -> bool {
        false
    }

    /// Wait between a refresh signal and the re-fetch.
    fn refresh_delay(&self) -> Duration {
        Duration::ZERO
    }
}

/// Owner of a mounted view. Dropping it tears the view down.
pub struct ViewHandle<T> {
    name: &'static str,
    state: watch::Receiver<ViewState<T>>,
    mounted: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    _subscription: Subscription,
}

impl<T: Clone> ViewHandle<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<ViewState<T>> {
        self.state.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(self) {}
}

impl<T> Drop for ViewHandle<T> {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::Release);
        self.shutdown.notify_one();
        debug!(view = self.name, "view unmounted");
    }
}

pub fn mount<V: View>(view: V, ctx: ViewContext, bus: &RefreshBus) -> ViewHandle<V::Data> {
    let (tx, rx) = watch::channel(ViewState::Loading);
    let mounted = Arc::new(AtomicBool::new(true));
    let shutdown = Arc::new(Notify::new());
    let refresh = Arc::new(Notify::new());

    // `notify_one` stores at most one permit: signals that land while a fetch
    // or its delay is pending collapse into a single follow-up fetch.
    let subscription = bus.subscribe({
        let refresh = refresh.clone();
        move || refresh.notify_one()
    });

    tokio::spawn(run_view(
        view,
        ctx,
        tx,
        mounted.clone(),
        shutdown.clone(),
        refresh,
    ));

    ViewHandle {
        name: V::NAME,
        state: rx,
        mounted,
        shutdown,
        _subscription: subscription,
    }
}

async fn run_view<V: View>(
    view: V,
    ctx: ViewContext,
    tx: watch::Sender<ViewState<V::Data>>,
    mounted: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    refresh: Arc<Notify>,
) {
    load(&view, &ctx, &tx, &mounted).await;

    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            _ = refresh.notified() => {}
        }

        let delay = view.refresh_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if !mounted.load(Ordering::Acquire) {
            break;
        }
        debug!(view = V::NAME, "refreshing");
        load(&view, &ctx, &tx, &mounted).await;
    }
}

async fn load<V: View>(
    view: &V,
    ctx: &ViewContext,
    tx: &watch::Sender<ViewState<V::Data>>,
    mounted: &AtomicBool,
) {
    let result = view.fetch(ctx).await;
    if !mounted.load(Ordering::Acquire) {
        debug!(view = V::NAME, "discarding result that settled after unmount");
        return;
    }

    let next = match result {
        Ok(data) if view.is_empty(&data) => ViewState::Empty,
        Ok(data) => ViewState::Loaded(data),
        Err(err) => {
            warn!(view = V::NAME, "fetch failed: {err}");
            ViewState::Failed(err.message())
        }
    };
    tx.send_replace(next);
}
