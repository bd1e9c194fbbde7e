use std::future::Future;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// A text-generation backend that answers with a JSON document
///
/// Agents only see this trait, so tests and alternative providers can stand
/// in for the HTTP client.
pub trait CompletionClient {
    /// Send a system and user prompt, asking for a JSON object reply
    fn complete_json(&self, system: &str, user: &str) -> impl Future<Output = Result<String>>;

    /// Model name reported in analysis metadata
    fn model(&self) -> &str;
}

/// Configuration for the OpenAI-compatible chat completions client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key (from OPENAI_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "gpt-4")
    pub model: String,
    /// Base URL of the API, without the trailing endpoint path
    pub api_base: String,
    /// Temperature (0-2, lower = more deterministic)
    pub temperature: f64,
}

impl OpenAiConfig {
    pub const DEFAULT_MODEL: &'static str = "gpt-4";
    pub const DEFAULT_API_BASE: &'static str = "https://api.openai.com/v1";

    /// Create config from environment variables
    ///
    /// `PITCHCREW_MODEL` and `PITCHCREW_API_BASE` override the defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("PITCHCREW_MODEL") {
            config.model = model;
        }
        if let Ok(api_base) = std::env::var("PITCHCREW_API_BASE") {
            config.api_base = api_base;
        }
        Ok(config)
    }

    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: Self::DEFAULT_MODEL.to_string(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            temperature: 0.2,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// OpenAI chat completions client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn build_request(&self, system: &str, user: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            temperature: Some(self.config.temperature),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        }
    }
}

impl CompletionClient for OpenAiClient {
    async fn complete_json(&self, system: &str, user: &str) -> Result<String> {
        let request = self.build_request(system, user);

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to completions API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Completions API error: {} - {}", status, body);
        }

        let response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse completions API response")?;

        first_message_content(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Extract the text of the first choice
fn first_message_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .context("No message content in response")
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    messages: Vec<Message>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
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
    #[serde(default)]
    content: Option<String>,
}
