use super::{View, ViewContext};
use crate::client::DEFAULT_SUMMARY_DAYS;
use crate::errors::ApiError;
use crate::models::DoctorSummary;
use async_trait::async_trait;

pub const NO_SUMMARY_TEXT: &str =
    "No health logs available for summary. Start logging your health to generate a summary.";
pub const FAILED_SUMMARY_TEXT: &str = "Unable to load summary. Please try again later.";

pub struct DoctorSummaryView {
    days: u32,
}

impl DoctorSummaryView {
    pub fn new(days: u32) -> Self {
        Self { days }
    }
}

impl Default for DoctorSummaryView {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_DAYS)
    }
}

#[async_trait]
impl View for DoctorSummaryView {
    type Data = DoctorSummary;

    const NAME: &'static str = "doctor_summary";

    async fn fetch(&self, ctx: &ViewContext) -> Result<DoctorSummary, ApiError> {
        let user_id = ctx.user_id();
        ctx.client.doctor_summary(self.days, Some(&user_id)).await
    }

    /// With no logs the backend still sends placeholder text but no count.
    fn is_empty(&self, data: &DoctorSummary) -> bool {
        data.summary.trim().is_empty() || data.total_logs == 0
    }
}
