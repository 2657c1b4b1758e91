use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogResponse {
    pub message: String,
    pub log_id: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HealthConsistency {
    pub streak_days: u32,
    pub total_logs: u64,
    pub last_log_date: Option<String>,
    pub unique_days_logged: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DashboardOverview {
    pub today_symptoms: Vec<String>,
    pub mental_state: Option<String>,
    pub medications_logged: Vec<String>,
    pub health_consistency: HealthConsistency,
    pub logs_today: u32,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SymptomInsight {
    pub symptom: String,
    pub frequency: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MentalEmotionalState {
    pub primary_mood: String,
    pub mood_distribution: BTreeMap<String, u32>,
    pub total_mood_mentions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MedicationTiming {
    pub medication: String,
    pub mentions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SleepContext {
    pub average_hours: Option<f64>,
    pub mentions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ActivityContext {
    pub mentions: u32,
    pub frequency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LifestyleContext {
    pub sleep: SleepContext,
    pub exercise: ActivityContext,
    pub stress: ActivityContext,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisPeriod {
    pub days: u32,
    pub start_date: String,
    pub end_date: String,
    pub total_logs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Insights {
    pub symptoms_detected: Vec<SymptomInsight>,
    pub mental_emotional_state: MentalEmotionalState,
    pub medications_timing: Vec<MedicationTiming>,
    pub lifestyle_context: LifestyleContext,
    pub analysis_period: AnalysisPeriod,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DoctorSummary {
    pub summary: String,
    pub period_days: u32,
    pub total_logs: u64,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SymptomFrequency {
    pub symptom: String,
    pub total_occurrences: u32,
    pub frequency_percentage: f64,
    pub trend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MoodTrend {
    pub mood: String,
    pub occurrences: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MedicationScore {
    pub name: String,
    pub mentions: u32,
    pub adherence_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MedicationAdherence {
    pub total_mentions: u32,
    pub unique_medications: u32,
    pub medications: Vec<MedicationScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DailyBreakdown {
    pub date: String,
    pub symptoms_count: u32,
    pub unique_symptoms: u32,
    pub mood: Option<String>,
    pub medications_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Trends {
    pub symptom_frequency: Vec<SymptomFrequency>,
    pub mood_trends: Vec<MoodTrend>,
    pub medication_adherence: MedicationAdherence,
    pub daily_breakdown: Vec<DailyBreakdown>,
    pub period_days: u32,
    pub total_logs: u64,
    pub analysis_date: String,
    /// Sent instead of a breakdown when the period has no logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

/// Error envelope the backend uses on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub details: Option<String>,
}
