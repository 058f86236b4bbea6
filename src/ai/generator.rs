use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::GeneratedPost;

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const FALLBACK_MODEL: &str = "openai/gpt-4o-mini";
pub const MAX_RETRIES: u32 = 5;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const APP_TITLE: &str = "Social Media AI Generator";

const MISSING_KEY_TEXT: &str = "Error: API Key missing.";
const EXHAUSTED_TEXT: &str = "Failed to generate content.";

const SYSTEM_INSTRUCTION: &str = "You are a professional social media content specialist. \
Generate posts that are engaging, clear, and ready for posting. \
Use emojis naturally based on post type and density. \
Highlight important points with <b style='color:#FF5733'>bold colored text</b>. \
Do not include unnecessary headers or intros.";

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// One failed completion attempt. `Api` is a provider-reported error (the
/// retryable kind); `Unexpected` is everything else and aborts immediately.
#[derive(Debug)]
pub enum CallError {
    Api(String),
    Unexpected(String),
}

/// A single completion attempt against a single model. The retry and
/// fallback policy lives above this seam in [`Generator`].
#[async_trait]
pub trait CompletionApi: Send + Sync {
    fn has_credentials(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
    ) -> std::result::Result<String, CallError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenRouterApi {
    client: Client,
    api_key: Option<String>,
}

impl OpenRouterApi {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, api_key }
    }
}

#[async_trait]
impl CompletionApi for OpenRouterApi {
    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
    ) -> std::result::Result<String, CallError> {
        let request = ChatRequest {
            model,
            messages,
            temperature: 0.7,
            max_tokens: 2000,
        };

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .bearer_auth(self.api_key.as_deref().unwrap_or_default())
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(|e| CallError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CallError::Api(format!("{}: {}", status, error_text)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CallError::Unexpected(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CallError::Unexpected("no content in response".to_string()))
    }
}

fn backoff_delay(unit: Duration, attempt: u32) -> Duration {
    unit * 2u32.pow(attempt)
}

fn build_messages(prompt: &str) -> Vec<Message> {
    vec![
        Message {
            role: "system".to_string(),
            content: SYSTEM_INSTRUCTION.to_string(),
        },
        Message {
            role: "user".to_string(),
            content: prompt.to_string(),
        },
    ]
}

/// Generation client with bounded retries, exponential backoff and a single
/// fallback-model substitution. Every path returns a displayable
/// [`GeneratedPost`]; failures become sentinel text rather than errors, so
/// the caller can always show `content` verbatim.
pub struct Generator<A: CompletionApi = OpenRouterApi> {
    api: A,
    backoff_unit: Duration,
}

impl Generator<OpenRouterApi> {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_api(OpenRouterApi::new(api_key))
    }
}

impl<A: CompletionApi> Generator<A> {
    pub fn with_api(api: A) -> Self {
        Self {
            api,
            backoff_unit: Duration::from_secs(1),
        }
    }

    #[cfg(test)]
    fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    pub async fn generate(&self, prompt: &str) -> GeneratedPost {
        self.generate_with(prompt, DEFAULT_MODEL, MAX_RETRIES).await
    }

    pub async fn generate_with(
        &self,
        prompt: &str,
        model: &str,
        max_retries: u32,
    ) -> GeneratedPost {
        if !self.api.has_credentials() {
            return GeneratedPost {
                content: MISSING_KEY_TEXT.to_string(),
                model_used: model.to_string(),
            };
        }

        let messages = build_messages(prompt);

        if let Some(post) = self.run_attempts(&messages, model, max_retries).await {
            return post;
        }

        // Primary attempts exhausted. One attempt against the fallback model,
        // and only when the requested model is not already the fallback, so
        // the substitution can never chain.
        if model != FALLBACK_MODEL {
            tracing::warn!("Model {} exhausted, falling back to {}", model, FALLBACK_MODEL);
            if let Some(post) = self.run_attempts(&messages, FALLBACK_MODEL, 1).await {
                return post;
            }
            return exhausted(FALLBACK_MODEL);
        }

        exhausted(model)
    }

    /// Up to `max_retries` attempts against one model. Returns `None` only
    /// when every attempt failed with a provider-reported API error.
    async fn run_attempts(
        &self,
        messages: &[Message],
        model: &str,
        max_retries: u32,
    ) -> Option<GeneratedPost> {
        for attempt in 0..max_retries {
            match self.api.complete(model, messages).await {
                Ok(content) => {
                    return Some(GeneratedPost {
                        content,
                        model_used: model.to_string(),
                    })
                }
                Err(CallError::Api(msg)) => {
                    tracing::warn!(
                        "API error from {} (attempt {}/{}): {}",
                        model,
                        attempt + 1,
                        max_retries,
                        msg
                    );
                    if attempt + 1 < max_retries {
                        tokio::time::sleep(backoff_delay(self.backoff_unit, attempt)).await;
                    }
                }
                Err(CallError::Unexpected(msg)) => {
                    tracing::error!("Unexpected error from {}: {}", model, msg);
                    return Some(GeneratedPost {
                        content: format!("Unexpected Error: {}", msg),
                        model_used: model.to_string(),
                    });
                }
            }
        }
        None
    }
}

fn exhausted(model: &str) -> GeneratedPost {
    GeneratedPost {
        content: EXHAUSTED_TEXT.to_string(),
        model_used: model.to_string(),
    }
}
