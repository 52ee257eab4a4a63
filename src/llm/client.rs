// file: src/llm/client.rs
// description: Azure/DIAL style chat completion client over reqwest
// reference: https://learn.microsoft.com/azure/ai-services/openai/reference

use super::{ChatCompletion, ChatModel};
use crate::config::ModelConfig;
use crate::error::{Result, SearchError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    config: ModelConfig,
}

impl ChatClient {
    pub fn new(config: ModelConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                SearchError::Config(
                    "model.api_key is not set (USER_SEARCH__MODEL__API_KEY)".to_string(),
                )
            })?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    pub fn deployment(&self) -> &str {
        &self.config.deployment
    }

    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment
        )
    }

    async fn send(&self, system_prompt: &str, user_message: &str) -> Result<ChatCompletion> {
        let request = ChatRequest {
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            temperature: self.config.temperature,
        };

        debug!(
            "Requesting completion from {} ({} chars of user message)",
            self.config.deployment,
            user_message.len()
        );

        let mut builder = self
            .client
            .post(self.completions_url())
            .header("Api-Key", &self.api_key)
            .json(&request);

        if !self.config.api_version.is_empty() {
            builder = builder.query(&[("api-version", self.config.api_version.as_str())]);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SearchError::Model(format!("Failed to send completion request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Model(format!(
                "Completion request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            SearchError::Model(format!("Failed to parse completion response: {}", e))
        })?;

        parse_response(body)
    }
}

impl ChatModel for ChatClient {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<ChatCompletion> {
        self.send(system_prompt, user_message).await
    }
}

fn parse_response(body: ChatResponse) -> Result<ChatCompletion> {
    let total_tokens = body.usage.map(|u| u.total_tokens).unwrap_or(0);

    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| SearchError::Model("No choices returned by the model".to_string()))?;

    Ok(ChatCompletion {
        content: choice.message.content.unwrap_or_default(),
        total_tokens,
    })
}
