use super::trends::parse_day;
use super::{View, ViewContext};
use crate::errors::ApiError;
use crate::models::Trends;
use async_trait::async_trait;
use serde::Serialize;

pub const HISTORY_DAYS: u32 = 90;

pub struct HistoryView {
    days: u32,
}

impl HistoryView {
    pub fn new(days: u32) -> Self {
        Self { days }
    }
}

impl Default for HistoryView {
    fn default() -> Self {
        Self::new(HISTORY_DAYS)
    }
}

#[async_trait]
impl View for HistoryView {
    type Data = Vec<HistoryEntry>;

    const NAME: &'static str = "history";

    async fn fetch(&self, ctx: &ViewContext) -> Result<Vec<HistoryEntry>, ApiError> {
        let user_id = ctx.user_id();
        let trends = ctx.client.trends(self.days, Some(&user_id)).await?;
        Ok(history_entries(&trends))
    }

    fn is_empty(&self, data: &Vec<HistoryEntry>) -> bool {
        data.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodTone {
    Success,
    Warning,
    Destructive,
    Muted,
}

impl MoodTone {
    pub fn classify(mood: Option<&str>) -> Self {
        let Some(mood) = mood else {
            return Self::Muted;
        };
        if mood.contains("Happy") || mood.contains("Calm") {
            Self::Success
        } else if mood.contains("Anxious") || mood.contains("Stressed") {
            Self::Warning
        } else if mood.contains("Depressed") {
            Self::Destructive
        } else {
            Self::Muted
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Destructive => "destructive",
            Self::Muted => "muted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub date: String,
    pub symptoms: Vec<String>,
    pub mood: String,
    pub tone: MoodTone,
    pub medications: u32,
    pub adherence: u8,
}

impl HistoryEntry {
    /// `Oct 18, 2026` style; falls back to the raw value.
    pub fn display_date(&self) -> String {
        parse_day(&self.date)
            .map(|date| date.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| self.date.clone())
    }

    fn matches(&self, needle: &str) -> bool {
        self.date.to_lowercase().contains(needle)
            || self
                .symptoms
                .iter()
                .any(|symptom| symptom.to_lowercase().contains(needle))
            || self.mood.to_lowercase().contains(needle)
    }
}

/// Keeps only days that recorded something.
pub fn history_entries(trends: &Trends) -> Vec<HistoryEntry> {
    trends
        .daily_breakdown
        .iter()
        .filter(|day| day.symptoms_count > 0 || day.medications_count > 0 || day.mood.is_some())
        .map(|day| HistoryEntry {
            date: day.date.clone(),
            symptoms: if day.unique_symptoms > 0 {
                vec![format!("{} symptom(s)", day.unique_symptoms)]
            } else {
                vec!["None".to_string()]
            },
            mood: day
                .mood
                .clone()
                .unwrap_or_else(|| "Not recorded".to_string()),
            tone: MoodTone::classify(day.mood.as_deref()),
            medications: day.medications_count,
            adherence: if day.medications_count > 0 { 100 } else { 0 },
        })
        .collect()
}

pub fn filter_entries<'a>(entries: &'a [HistoryEntry], search: &str) -> Vec<&'a HistoryEntry> {
    let needle = search.trim().to_lowercase();
    entries
        .iter()
        .filter(|entry| needle.is_empty() || entry.matches(&needle))
        .collect()
}
