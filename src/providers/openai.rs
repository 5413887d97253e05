/*!
 * OpenAI chat completions client.
 */

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Translator, http_client, non_empty, render_prompt, send_json};
use crate::errors::ProviderError;
use crate::transaction::TamilField;

const MAX_TOKENS: u32 = 500;

/// Client for the chat completions API
#[derive(Debug)]
pub struct OpenAI {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    system_prompt: String,
    temperature: f32,
    timeout: Duration,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// One chat message
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl OpenAIRequest {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature,
            max_tokens: MAX_TOKENS,
        }
    }

    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }
}

impl OpenAI {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: "gpt-4".to_string(),
            system_prompt: String::new(),
            temperature: 0.3,
            timeout,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_prompt(mut self, system_prompt: impl Into<String>, temperature: f32) -> Self {
        self.system_prompt = system_prompt.into();
        self.temperature = temperature;
        self
    }

    fn api_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api.openai.com/v1"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/chat/completions", base)
    }

    /// Build the request for one field value
    pub fn build_request(&self, text: &str, field: TamilField) -> OpenAIRequest {
        OpenAIRequest::new(&self.model, self.temperature)
            .add_message("system", render_prompt(&self.system_prompt, field))
            .add_message("user", text)
    }

    /// Send a chat completion request
    pub async fn complete(&self, request: &OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let builder = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .json(request);
        send_json("OpenAI", builder, self.timeout).await
    }

    /// Content of the first choice
    pub fn extract_text_from_response(response: &OpenAIResponse) -> Option<&str> {
        response.choices.first()?.message.content.as_deref()
    }
}

#[async_trait]
impl Translator for OpenAI {
    fn name(&self) -> &str {
        "openai"
    }

    async fn translate(&self, text: &str, field: TamilField) -> Result<String, ProviderError> {
        let response = self.complete(&self.build_request(text, field)).await?;
        let content = Self::extract_text_from_response(&response).ok_or(ProviderError::EmptyResponse)?;
        non_empty(content)
    }
}
