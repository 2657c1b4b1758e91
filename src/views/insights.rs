use super::{View, ViewContext};
use crate::client::DEFAULT_INSIGHTS_DAYS;
use crate::errors::ApiError;
use crate::models::Insights;
use async_trait::async_trait;
use serde::Serialize;

pub struct InsightsView {
    days: u32,
}

impl InsightsView {
    pub fn new(days: u32) -> Self {
        Self { days }
    }
}

impl Default for InsightsView {
    fn default() -> Self {
        Self::new(DEFAULT_INSIGHTS_DAYS)
    }
}

#[async_trait]
impl View for InsightsView {
    type Data = Insights;

    const NAME: &'static str = "insights";

    async fn fetch(&self, ctx: &ViewContext) -> Result<Insights, ApiError> {
        let user_id = ctx.user_id();
        ctx.client.insights(self.days, Some(&user_id)).await
    }

    fn is_empty(&self, data: &Insights) -> bool {
        data.analysis_period.total_logs == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSection {
    pub title: &'static str,
    pub items: Vec<String>,
}

pub fn insight_sections(insights: &Insights) -> Vec<InsightSection> {
    let symptoms = if insights.symptoms_detected.is_empty() {
        vec![format!(
            "No symptoms detected in the last {} days",
            insights.analysis_period.days.max(1)
        )]
    } else {
        insights
            .symptoms_detected
            .iter()
            .take(5)
            .map(|s| format!("{} ({})", s.symptom, plural(s.frequency, "time")))
            .collect()
    };

    let medications = if insights.medications_timing.is_empty() {
        vec!["No medications mentioned".to_string()]
    } else {
        insights
            .medications_timing
            .iter()
            .take(4)
            .map(|m| format!("{} ({})", m.medication, plural(m.mentions, "mention")))
            .collect()
    };

    let mood = &insights.mental_emotional_state;
    let mental = vec![
        format!("Primary mood: {}", mood.primary_mood),
        if mood.total_mood_mentions > 0 {
            format!("Mood tracked {}", plural(mood.total_mood_mentions, "time"))
        } else {
            "No mood data available".to_string()
        },
    ];

    let lifestyle = &insights.lifestyle_context;
    let sleep = match lifestyle.sleep.average_hours {
        Some(hours) if hours > 0.0 => format!("Average sleep: {hours} hours"),
        _ => "Sleep data not available".to_string(),
    };

    vec![
        InsightSection {
            title: "Symptoms Detected",
            items: symptoms,
        },
        InsightSection {
            title: "Medications & Timing",
            items: medications,
        },
        InsightSection {
            title: "Mental & Emotional State",
            items: mental,
        },
        InsightSection {
            title: "Lifestyle Context",
            items: vec![
                sleep,
                format!("Exercise: {}", plural(lifestyle.exercise.mentions, "mention")),
                format!("Stress: {}", plural(lifestyle.stress.mentions, "mention")),
            ],
        },
    ]
}

fn plural(count: u32, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisPeriod, MedicationTiming, SymptomInsight};

    #[test]
    fn sections_pluralise_counts() {
        let mut insights = Insights {
            analysis_period: AnalysisPeriod {
                days: 7,
                total_logs: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        insights.symptoms_detected = vec![
            SymptomInsight {
                symptom: "headache".into(),
                frequency: 1,
                percentage: 33.3,
            },
            SymptomInsight {
                symptom: "fatigue".into(),
                frequency: 2,
                percentage: 66.7,
            },
        ];
        insights.medications_timing = vec![MedicationTiming {
            medication: "ibuprofen".into(),
            mentions: 3,
        }];
        insights.mental_emotional_state.primary_mood = "Calm".into();
        insights.mental_emotional_state.total_mood_mentions = 1;
        insights.lifestyle_context.sleep.average_hours = Some(7.5);
        insights.lifestyle_context.exercise.mentions = 1;

        let sections = insight_sections(&insights);
        assert_eq!(sections[0].items, vec!["headache (1 time)", "fatigue (2 times)"]);
        assert_eq!(sections[1].items, vec!["ibuprofen (3 mentions)"]);
        assert_eq!(sections[2].items, vec!["Primary mood: Calm", "Mood tracked 1 time"]);
        assert_eq!(
            sections[3].items,
            vec!["Average sleep: 7.5 hours", "Exercise: 1 mention", "Stress: 0 mentions"]
        );
    }

    #[test]
    fn sections_fall_back_when_nothing_logged() {
        let mut insights = Insights::default();
        insights.analysis_period.days = 7;
        let sections = insight_sections(&insights);
        assert_eq!(sections[0].items, vec!["No symptoms detected in the last 7 days"]);
        assert_eq!(sections[1].items, vec!["No medications mentioned"]);
        assert_eq!(sections[2].items[1], "No mood data available");
        assert_eq!(sections[3].items[0], "Sleep data not available");
        assert!(InsightsView::default().is_empty(&insights));
    }
}
