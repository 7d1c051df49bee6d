//! Reqwest-backed chat-completion summariser.
//!
//! This adapter owns transport details only: request serialisation, bearer
//! authentication, timeout and HTTP error mapping, and picking the first
//! choice out of the response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::warn;
use zeroize::Zeroizing;

use super::dto::{ChatRequestDto, ChatResponseDto};
use crate::domain::ports::{SummariserError, SymptomSummariser};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Endpoint, credentials, and model for the chat-completion API.
pub struct ChatCompletionSettings {
    /// API base, e.g. `https://api.openai.com/v1`.
    pub base_url: Url,
    pub api_key: String,
    pub model: String,
}

/// Summariser that posts one user message per prompt.
pub struct ChatCompletionSummariser {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
    model: String,
}

impl ChatCompletionSummariser {
    /// Build a summariser with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: ChatCompletionSettings, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: completions_endpoint(settings.base_url),
            api_key: Zeroizing::new(settings.api_key),
            model: settings.model,
        })
    }
}

#[async_trait]
impl SymptomSummariser for ChatCompletionSummariser {
    async fn summarise(&self, prompt: &str) -> Result<String, SummariserError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&ChatRequestDto::user_prompt(&self.model, prompt))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "chat completion request failed");
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_first_choice(body.as_ref())
    }
}

fn completions_endpoint(mut base: Url) -> Url {
    let trimmed = base.path().trim_end_matches('/').to_owned();
    base.set_path(&format!("{trimmed}/chat/completions"));
    base
}

fn parse_first_choice(body: &[u8]) -> Result<String, SummariserError> {
    let decoded: ChatResponseDto = serde_json::from_slice(body).map_err(|error| {
        SummariserError::transport(format!("invalid chat completion payload: {error}"))
    })?;
    decoded
        .into_first_content()
        .ok_or_else(SummariserError::empty_response)
}

fn map_transport_error(error: reqwest::Error) -> SummariserError {
    if error.is_timeout() {
        SummariserError::transport(format!("timed out: {error}"))
    } else {
        SummariserError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> SummariserError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        preview
    };
    SummariserError::upstream(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
