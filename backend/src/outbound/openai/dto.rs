//! Wire shapes for the chat-completion request and response.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct ChatRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) messages: [ChatMessageDto<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessageDto<'a> {
    pub(super) role: &'static str,
    pub(super) content: &'a str,
}

impl<'a> ChatRequestDto<'a> {
    /// Single user-message request.
    pub(super) fn user_prompt(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: [ChatMessageDto {
                role: "user",
                content: prompt,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponseDto {
    #[serde(default)]
    pub(super) choices: Vec<ChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceDto {
    pub(super) message: ChoiceMessageDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceMessageDto {
    #[serde(default)]
    pub(super) content: Option<String>,
}

impl ChatResponseDto {
    /// Content of the first choice, if the model produced one.
    pub(super) fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
    }
}
