//! Driving port for symptom insights.
use async_trait::async_trait;

use crate::domain::{Error, LogSummaryEntry, MedicalTradition};

/// Domain use-case port for summarising log entries into advice.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InsightsQuery: Send + Sync {
    /// Produce free-text advice for `logs` framed by `tradition`.
    async fn advise(
        &self,
        tradition: MedicalTradition,
        logs: Vec<LogSummaryEntry>,
    ) -> Result<String, Error>;
}
