//! Generation backend trait and the OpenAI chat implementation.

use async_trait::async_trait;

use crate::error::Result;

/// A generative answerer invoked once per grounded query.
///
/// No retries, no streaming; an unreachable backend surfaces as
/// [`ChatError::Generation`](crate::error::ChatError::Generation) and the
/// query fails rather than guessing.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[cfg(feature = "openai")]
pub use openai::OpenAIChatGenerator;

#[cfg(feature = "openai")]
mod openai {
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use tracing::{debug, error};

    use crate::error::{ChatError, Result};

    use super::Generator;

    const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

    /// The default chat model.
    const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

    /// A [`Generator`] backed by the OpenAI chat completions API.
    ///
    /// Temperature is pinned to 0 so grounded answers stay as deterministic
    /// as the backend allows.
    pub struct OpenAIChatGenerator {
        client: reqwest::Client,
        api_key: String,
        model: String,
    }

    impl OpenAIChatGenerator {
        /// Create a new generator with the given API key and default model.
        pub fn new(api_key: impl Into<String>) -> Result<Self> {
            let api_key = api_key.into();
            if api_key.is_empty() {
                return Err(ChatError::Generation {
                    provider: "OpenAI".into(),
                    message: "API key must not be empty".into(),
                });
            }
            Ok(Self { client: reqwest::Client::new(), api_key, model: DEFAULT_MODEL.into() })
        }

        /// Create a new generator from the `OPENAI_API_KEY` environment
        /// variable.
        pub fn from_env() -> Result<Self> {
            let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ChatError::Generation {
                provider: "OpenAI".into(),
                message: "OPENAI_API_KEY environment variable not set".into(),
            })?;
            Self::new(api_key)
        }

        /// Override the chat model.
        pub fn with_model(mut self, model: impl Into<String>) -> Self {
            self.model = model.into();
            self
        }
    }

    #[derive(Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        temperature: f32,
        messages: Vec<ChatMessage<'a>>,
    }

    #[derive(Serialize)]
    struct ChatMessage<'a> {
        role: &'a str,
        content: &'a str,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        choices: Vec<ChatChoice>,
    }

    #[derive(Deserialize)]
    struct ChatChoice {
        message: ChatResponseMessage,
    }

    #[derive(Deserialize)]
    struct ChatResponseMessage {
        content: String,
    }

    #[derive(Deserialize)]
    struct ErrorResponse {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    #[async_trait]
    impl Generator for OpenAIChatGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            debug!(provider = "OpenAI", model = %self.model, prompt_len = prompt.len(), "generating answer");

            let request_body = ChatRequest {
                model: &self.model,
                temperature: 0.0,
                messages: vec![ChatMessage { role: "user", content: prompt }],
            };

            let response = self
                .client
                .post(OPENAI_CHAT_URL)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
                .map_err(|e| {
                    error!(provider = "OpenAI", error = %e, "generation request failed");
                    ChatError::Generation {
                        provider: "OpenAI".into(),
                        message: format!("request failed: {e}"),
                    }
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                let detail = serde_json::from_str::<ErrorResponse>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);

                error!(provider = "OpenAI", %status, "generation API error");
                return Err(ChatError::Generation {
                    provider: "OpenAI".into(),
                    message: format!("API returned {status}: {detail}"),
                });
            }

            let chat_response: ChatResponse = response.json().await.map_err(|e| {
                error!(provider = "OpenAI", error = %e, "failed to parse generation response");
                ChatError::Generation {
                    provider: "OpenAI".into(),
                    message: format!("failed to parse response: {e}"),
                }
            })?;

            chat_response
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or_else(|| ChatError::Generation {
                    provider: "OpenAI".into(),
                    message: "API returned no choices".into(),
                })
        }
    }
}
