//! Driven port for the chat-completion summariser.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by summariser adapters.
    pub enum SummariserError {
        /// No API key is configured.
        NotConfigured => "summariser is not configured",
        /// Request could not be sent or the response could not be read.
        Transport { message: String } => "summariser request failed: {message}",
        /// Upstream answered with a non-success status.
        Upstream { status: u16, message: String } => "summariser returned {status}: {message}",
        /// Upstream answered without any choices.
        EmptyResponse => "summariser returned no choices",
    }
}

/// Sends a prompt to a language model and returns its reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SymptomSummariser: Send + Sync {
    /// Complete `prompt` as a single user message.
    async fn summarise(&self, prompt: &str) -> Result<String, SummariserError>;
}

/// Summariser used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSummariser;

#[async_trait]
impl SymptomSummariser for DisabledSummariser {
    async fn summarise(&self, _prompt: &str) -> Result<String, SummariserError> {
        Err(SummariserError::not_configured())
    }
}
