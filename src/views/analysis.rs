use super::{View, ViewContext};
use crate::client::DEFAULT_INSIGHTS_DAYS;
use crate::errors::ApiError;
use crate::models::Insights;
use async_trait::async_trait;
use serde::Serialize;

/// Structured read-out of recent voice logs, built from the insights endpoint.
pub struct AnalysisView {
    days: u32,
}

impl AnalysisView {
    pub fn new(days: u32) -> Self {
        Self { days }
    }
}

impl Default for AnalysisView {
    fn default() -> Self {
        Self::new(DEFAULT_INSIGHTS_DAYS)
    }
}

#[async_trait]
impl View for AnalysisView {
    type Data = VoiceAnalysis;

    const NAME: &'static str = "analysis";

    async fn fetch(&self, ctx: &ViewContext) -> Result<VoiceAnalysis, ApiError> {
        let user_id = ctx.user_id();
        let insights = ctx.client.insights(self.days, Some(&user_id)).await?;
        Ok(voice_analysis(&insights))
    }

    fn is_empty(&self, data: &VoiceAnalysis) -> bool {
        data.symptoms.is_empty() && data.medications.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Frequent,
    Moderate,
    Occasional,
}

impl Severity {
    pub fn from_frequency(frequency: u32) -> Self {
        match frequency {
            f if f > 3 => Self::Frequent,
            f if f > 1 => Self::Moderate,
            _ => Self::Occasional,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Frequent => "Frequent",
            Self::Moderate => "Moderate",
            Self::Occasional => "Occasional",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysedSymptom {
    pub name: String,
    pub severity: Severity,
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysedMedication {
    pub name: String,
    pub mentions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceAnalysis {
    pub symptoms: Vec<AnalysedSymptom>,
    pub medications: Vec<AnalysedMedication>,
    pub mood: String,
    pub mood_mentions: u32,
    pub lifestyle: Vec<String>,
    pub summary: String,
}

pub fn voice_analysis(insights: &Insights) -> VoiceAnalysis {
    let symptoms = insights
        .symptoms_detected
        .iter()
        .take(5)
        .map(|s| AnalysedSymptom {
            name: s.symptom.clone(),
            severity: Severity::from_frequency(s.frequency),
            frequency: s.frequency,
        })
        .collect();

    let medications = insights
        .medications_timing
        .iter()
        .map(|m| AnalysedMedication {
            name: m.medication.clone(),
            mentions: m.mentions,
        })
        .collect();

    let lifestyle_context = &insights.lifestyle_context;
    let mut lifestyle = Vec::with_capacity(3);
    if let Some(hours) = lifestyle_context.sleep.average_hours.filter(|h| *h > 0.0) {
        lifestyle.push(format!("Average Sleep: {hours} hours"));
    }
    lifestyle.push(format!(
        "Exercise: {} mention(s)",
        lifestyle_context.exercise.mentions
    ));
    lifestyle.push(format!(
        "Stress: {} mention(s)",
        lifestyle_context.stress.mentions
    ));

    let period = &insights.analysis_period;
    VoiceAnalysis {
        symptoms,
        medications,
        mood: insights.mental_emotional_state.primary_mood.clone(),
        mood_mentions: insights.mental_emotional_state.total_mood_mentions,
        lifestyle,
        summary: format!(
            "Analysis based on {} health log(s) over the past {} days.",
            period.total_logs, period.days
        ),
    }
}
