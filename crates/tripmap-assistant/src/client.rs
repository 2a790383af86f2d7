//! Chat-completions client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tripmap_core::AppConfig;

use crate::error::AssistantError;
use crate::prompt::SYSTEM_PROMPT;

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Sends the fixed system prompt plus one user message and returns the raw
/// reply text. No conversation history is sent.
pub struct AssistantClient {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl AssistantClient {
    /// # Errors
    ///
    /// Returns [`AssistantError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_owned(),
            api_key,
        })
    }

    /// # Errors
    ///
    /// Returns [`AssistantError::Config`] if no API key is configured, or
    /// [`AssistantError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AssistantError> {
        let key = config.require_assistant_api_key()?;
        Self::new(&config.assistant_url, &config.assistant_model, Some(key.to_owned()))
    }

    /// Sends `message` and returns the assistant's reply text.
    ///
    /// # Errors
    ///
    /// - [`AssistantError::Http`] on network failure.
    /// - [`AssistantError::Status`] on a non-2xx response.
    /// - [`AssistantError::Deserialize`] if the body is not a chat response.
    /// - [`AssistantError::EmptyReply`] if the first choice has no content.
    pub async fn complete(&self, message: &str) -> Result<String, AssistantError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "assistant request rejected");
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|source| AssistantError::Deserialize { source })?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AssistantError::EmptyReply)
    }
}
