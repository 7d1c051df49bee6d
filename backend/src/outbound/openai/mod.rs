//! Chat-completion outbound adapter.
//!
//! A plain JSON call to an OpenAI-compatible `/chat/completions` endpoint,
//! implementing the `SymptomSummariser` port.

mod dto;
mod http_summariser;

pub use http_summariser::{ChatCompletionSettings, ChatCompletionSummariser, DEFAULT_MODEL};
