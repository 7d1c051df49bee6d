//! Insights service: prompt construction plus one summariser call.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{InsightsQuery, SummariserError, SymptomSummariser};
use crate::domain::{Error, LogSummaryEntry, MedicalTradition, build_prompt};

fn map_summariser_error(error: SummariserError) -> Error {
    match error {
        SummariserError::NotConfigured => {
            Error::service_unavailable("symptom insights are not configured")
        }
        other => Error::internal(format!("symptom summariser failed: {other}")),
    }
}

/// Insights service implementing [`InsightsQuery`].
pub struct InsightsService<S: ?Sized> {
    summariser: Arc<S>,
}

impl<S: ?Sized> InsightsService<S> {
    /// Create a service over the given summariser.
    pub fn new(summariser: Arc<S>) -> Self {
        Self { summariser }
    }
}

#[async_trait]
impl<S> InsightsQuery for InsightsService<S>
where
    S: SymptomSummariser + ?Sized,
{
    async fn advise(
        &self,
        tradition: MedicalTradition,
        logs: Vec<LogSummaryEntry>,
    ) -> Result<String, Error> {
        if logs.is_empty() {
            return Err(Error::invalid_request("at least one log entry is required"));
        }
        let prompt = build_prompt(&tradition, &logs);
        self.summariser
            .summarise(&prompt)
            .await
            .map_err(map_summariser_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{DisabledSummariser, MockSymptomSummariser};
    use rstest::rstest;

    fn entry() -> LogSummaryEntry {
        LogSummaryEntry {
            log_time: "2024-10-03T07:15:00Z".into(),
            severity: "mild".into(),
            symptoms: "bloating".into(),
            notes: "dairy at lunch".into(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn forwards_built_prompt() {
        let mut summariser = MockSymptomSummariser::new();
        summariser
            .expect_summarise()
            .withf(|prompt| {
                prompt.contains("using knowledge from Ayurveda")
                    && prompt.contains("- Food: [lunch dairy]")
            })
            .times(1)
            .returning(|_| Ok("- Patterns observed:\n  - dairy".into()));
        let service = InsightsService::new(Arc::new(summariser));

        let advice = service
            .advise(MedicalTradition::Ayurveda, vec![entry()])
            .await
            .expect("advice");
        assert!(advice.starts_with("- Patterns observed"));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_api_key_is_service_unavailable() {
        let service = InsightsService::new(Arc::new(DisabledSummariser));
        let error = service
            .advise(MedicalTradition::Naturopathy, vec![entry()])
            .await
            .expect_err("disabled");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_log_list_is_rejected() {
        let service = InsightsService::new(Arc::new(MockSymptomSummariser::new()));
        let error = service
            .advise(MedicalTradition::Ayurveda, Vec::new())
            .await
            .expect_err("no logs");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn upstream_failures_are_internal() {
        let mut summariser = MockSymptomSummariser::new();
        summariser
            .expect_summarise()
            .returning(|_| Err(SummariserError::empty_response()));
        let service = InsightsService::new(Arc::new(summariser));
        let error = service
            .advise(MedicalTradition::Ayurveda, vec![entry()])
            .await
            .expect_err("empty");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
