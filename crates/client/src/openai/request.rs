//! Chat-completions request types and validation.

use serde::{Deserialize, Serialize};

use crate::OpenAiError;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    /// Validate the request before it goes on the wire.
    pub fn validate(&self) -> Result<(), OpenAiError> {
        if self.model.is_empty() {
            return Err(OpenAiError::InvalidRequest("model cannot be empty".to_string()));
        }

        if self.messages.is_empty() {
            return Err(OpenAiError::InvalidRequest("at least one message is required".to_string()));
        }

        if self.max_tokens == 0 {
            return Err(OpenAiError::InvalidRequest("max_tokens must be greater than 0".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(OpenAiError::InvalidRequest(format!(
                "temperature {} out of range 0.0-2.0",
                self.temperature
            )));
        }

        Ok(())
    }
}
