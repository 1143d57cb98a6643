use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::services::prompt_service::PromptPair;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    pub json_mode: bool,
}

impl GenerationOptions {
    /// Low temperature, room for 25 detailed items, JSON response format.
    pub fn questions() -> Self {
        Self {
            temperature: 0.4,
            max_output_tokens: Some(2500),
            json_mode: true,
        }
    }

    pub fn report() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: Some(1500),
            json_mode: false,
        }
    }
}

/// A generative-text provider. Implementations return only the innermost
/// text of the reply and never retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &PromptPair, options: GenerationOptions) -> Result<String>;
}

/// Chat-completions client for OpenAI and API-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: ModelConfig,
}

impl OpenAiClient {
    pub fn new(config: ModelConfig, client: Client) -> Self {
        Self { client, config }
    }

    fn build_payload(&self, prompt: &PromptPair, options: GenerationOptions) -> JsonValue {
        let mut payload = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": options.temperature,
        });
        if let Some(max) = options.max_output_tokens {
            payload["max_tokens"] = serde_json::json!(max);
        }
        if options.json_mode {
            payload["response_format"] = serde_json::json!({ "type": "json_object" });
        }
        payload
    }

    async fn send(&self, api_key: &str, payload: &JsonValue) -> Result<JsonValue> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let res = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<JsonValue>(&text)
                .ok()
                .and_then(|body| upstream_error(&body))
                .unwrap_or(text);
            return Err(Error::Provider(format!("OpenAI API Error {}: {}", status, detail)));
        }

        Ok(res.json().await?)
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    #[tracing::instrument(skip_all, fields(model = %self.config.model, json_mode = options.json_mode))]
    async fn generate(&self, prompt: &PromptPair, options: GenerationOptions) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OpenAI API Key not configured".to_string()))?;

        let payload = self.build_payload(prompt, options);
        let started = Instant::now();
        let limit = self.config.timeout_secs;

        let body = tokio::time::timeout(Duration::from_secs(limit), self.send(api_key, &payload))
            .await
            .map_err(|_| {
                tracing::error!(timeout_secs = limit, "Model call timed out");
                Error::Timeout(limit)
            })??;

        let content = message_content(&body)?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_bytes = content.len(),
            "Model call finished"
        );
        Ok(content)
    }
}

/// Unwraps `choices[0].message.content` from a chat-completions body.
pub fn message_content(body: &JsonValue) -> Result<String> {
    if let Some(msg) = upstream_error(body) {
        return Err(Error::Provider(msg));
    }
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::Provider("Invalid OpenAI response format".to_string()))
}

fn upstream_error(body: &JsonValue) -> Option<String> {
    let err = body.get("error")?;
    Some(
        err.get("message")
            .and_then(|m| m.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| err.to_string()),
    )
}
