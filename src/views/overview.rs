use super::{View, ViewContext};
use crate::errors::ApiError;
use crate::models::DashboardOverview;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Today's tiles. Waits a little after a refresh signal so the backend can
/// finish processing the log that triggered it.
pub struct OverviewView {
    refresh_delay: Duration,
}

impl OverviewView {
    pub fn new(refresh_delay: Duration) -> Self {
        Self { refresh_delay }
    }
}

#[async_trait]
impl View for OverviewView {
    type Data = DashboardOverview;

    const NAME: &'static str = "overview";

    async fn fetch(&self, ctx: &ViewContext) -> Result<DashboardOverview, ApiError> {
        let user_id = ctx.user_id();
        ctx.client.dashboard_overview(Some(&user_id)).await
    }

    fn refresh_delay(&self) -> Duration {
        self.refresh_delay
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileTrend {
    Up,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub label: &'static str,
    pub value: String,
    pub subtext: String,
    pub trend: Option<TileTrend>,
}

pub fn overview_tiles(overview: &DashboardOverview) -> Vec<Tile> {
    let streak = overview.health_consistency.streak_days;
    let symptoms = &overview.today_symptoms;
    let medications = &overview.medications_logged;

    vec![
        Tile {
            label: "Symptoms Today",
            value: symptoms.len().to_string(),
            subtext: if symptoms.is_empty() {
                "No symptoms reported".to_string()
            } else {
                symptoms.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
            },
            trend: (!symptoms.is_empty()).then_some(TileTrend::Neutral),
        },
        Tile {
            label: "Mental State",
            value: overview
                .mental_state
                .clone()
                .filter(|state| !state.trim().is_empty())
                .unwrap_or_else(|| "Neutral".to_string()),
            subtext: if streak > 0 {
                format!("{streak}-day streak")
            } else {
                "No recent logs".to_string()
            },
            trend: Some(TileTrend::Neutral),
        },
        Tile {
            label: "Medications Logged",
            value: medications.len().to_string(),
            subtext: if medications.is_empty() {
                "None today".to_string()
            } else {
                medications.iter().take(2).cloned().collect::<Vec<_>>().join(", ")
            },
            trend: Some(TileTrend::Neutral),
        },
        Tile {
            label: "Health Consistency",
            value: format!("{streak} days"),
            subtext: format!("{} total logs", overview.health_consistency.total_logs),
            trend: Some(if streak > 0 {
                TileTrend::Up
            } else {
                TileTrend::Neutral
            }),
        },
    ]
}
