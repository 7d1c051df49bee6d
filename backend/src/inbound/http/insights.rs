//! Symptom insights handler.
//!
//! ```text
//! POST /db/insights {"medicalType":"Ayurveda","logs":[{"logTime","severity","symptoms","notes"}]}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{LogSummaryEntry, MedicalTradition};
use crate::inbound::http::ApiResult;
use crate::inbound::http::claims::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body of `POST /db/insights`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    #[serde(default, alias = "medical_type")]
    pub medical_type: String,
    #[serde(default)]
    pub logs: Vec<LogSummaryEntry>,
}

/// Advice produced by the summariser.
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub advice: String,
}

/// Summarise the submitted log entries through the chat-completion model.
#[post("/insights")]
pub async fn insights(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    payload: web::Json<InsightsRequest>,
) -> ApiResult<web::Json<InsightsResponse>> {
    let InsightsRequest { medical_type, logs } = payload.into_inner();
    let advice = state
        .insights
        .advise(MedicalTradition::from_label(&medical_type), logs)
        .await?;
    Ok(web::Json(InsightsResponse { advice }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    use crate::domain::Error;
    use crate::inbound::http::test_utils::{TestPorts, authenticated_app, test_claims};

    #[actix_web::test]
    async fn returns_advice_for_snake_case_payload() {
        let mut ports = TestPorts::default();
        ports
            .insights
            .expect_advise()
            .withf(|tradition, logs| {
                *tradition == MedicalTradition::TraditionalChineseMedicine
                    && logs.len() == 1
                    && logs[0].log_time == "2024-09-01 08:30"
            })
            .times(1)
            .returning(|_, _| Ok("Patterns observed: ...".to_owned()));
        let app = test::init_service(authenticated_app!(
            ports.into_state(),
            test_claims(),
            web::scope("/db").service(insights),
        ))
        .await;

        let req = test::TestRequest::post()
            .uri("/db/insights")
            .set_json(json!({
                "medical_type": "traditional chinese medicine",
                "logs": [{
                    "log_time": "2024-09-01 08:30",
                    "severity": "mild",
                    "symptoms": "headache",
                    "notes": "after coffee"
                }]
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "advice": "Patterns observed: ..." }));
    }

    #[actix_web::test]
    async fn unconfigured_summariser_is_503() {
        let mut ports = TestPorts::default();
        ports
            .insights
            .expect_advise()
            .returning(|_, _| Err(Error::service_unavailable("symptom insights are not configured")));
        let app = test::init_service(authenticated_app!(
            ports.into_state(),
            test_claims(),
            web::scope("/db").service(insights),
        ))
        .await;

        let req = test::TestRequest::post()
            .uri("/db/insights")
            .set_json(json!({ "medicalType": "Ayurveda", "logs": [{}] }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
