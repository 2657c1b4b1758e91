use super::{View, ViewContext};
use crate::errors::ApiError;
use crate::models::Trends;
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

pub const CHART_DAYS: u32 = 7;
/// Medication counts are scaled up so they share an axis with symptom counts.
const MEDICATION_SCALE: u32 = 10;

pub struct TrendsView {
    days: u32,
}

impl TrendsView {
    pub fn new(days: u32) -> Self {
        Self { days }
    }
}

impl Default for TrendsView {
    fn default() -> Self {
        Self::new(CHART_DAYS)
    }
}

#[async_trait]
impl View for TrendsView {
    type Data = Vec<ChartPoint>;

    const NAME: &'static str = "trends";

    async fn fetch(&self, ctx: &ViewContext) -> Result<Vec<ChartPoint>, ApiError> {
        let user_id = ctx.user_id();
        let trends = ctx.client.trends(self.days, Some(&user_id)).await?;
        Ok(chart_points(&trends, Local::now().date_naive()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub day: String,
    pub date: String,
    pub symptoms: u32,
    pub medications: u32,
}

/// With no breakdown the chart still shows the last week, flat at zero.
pub fn chart_points(trends: &Trends, today: NaiveDate) -> Vec<ChartPoint> {
    if trends.daily_breakdown.is_empty() {
        return (0..CHART_DAYS as i64)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                ChartPoint {
                    day: date.format("%a").to_string(),
                    date: date.format("%Y-%m-%d").to_string(),
                    symptoms: 0,
                    medications: 0,
                }
            })
            .collect();
    }

    trends
        .daily_breakdown
        .iter()
        .map(|day| ChartPoint {
            day: parse_day(&day.date)
                .map(|date| date.format("%a").to_string())
                .unwrap_or_else(|| day.date.clone()),
            date: day.date.clone(),
            symptoms: day.symptoms_count,
            medications: day.medications_count.saturating_mul(MEDICATION_SCALE),
        })
        .collect()
}

pub(crate) fn parse_day(value: &str) -> Option<NaiveDate> {
    let prefix = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyBreakdown;

    #[test]
    fn empty_breakdown_fills_last_week() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let points = chart_points(&Trends::default(), today);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, "2026-10-12");
        assert_eq!(points[6].date, "2026-10-18");
        assert_eq!(points[6].day, "Sun");
        assert!(points.iter().all(|p| p.symptoms == 0 && p.medications == 0));
    }

    #[test]
    fn breakdown_maps_to_points() {
        let trends = Trends {
            daily_breakdown: vec![DailyBreakdown {
                date: "2026-10-16T00:00:00".into(),
                symptoms_count: 3,
                unique_symptoms: 2,
                mood: Some("Calm".into()),
                medications_count: 2,
            }],
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let points = chart_points(&trends, today);
        assert_eq!(
            points,
            vec![ChartPoint {
                day: "Fri".into(),
                date: "2026-10-16T00:00:00".into(),
                symptoms: 3,
                medications: 20,
            }]
        );
    }
}
