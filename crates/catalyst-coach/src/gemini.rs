//! Google Gemini `generateContent` backend.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::CoachError;
use crate::http;
use crate::provider::CoachingProvider;
use crate::Result;

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    temperature: f32,
    timeout_secs: u64,
}

impl GeminiProvider {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        api_key_env: &str,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self> {
        Ok(Self {
            client: http::client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            api_key_env: api_key_env.to_string(),
            temperature,
            timeout_secs,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, prompt: &str, json_mode: bool) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CoachError::MissingApiKey(self.api_key_env.clone()))?;

        let mut generation_config = json!({ "temperature": self.temperature });
        if json_mode {
            generation_config["responseMimeType"] = json!("application/json");
        }
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        });
        tracing::debug!(model = %self.model, json_mode, "calling Gemini");

        // Key goes in a header, never in the URL.
        let request = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&body);
        let data = http::send_json(request, self.timeout_secs).await?;
        candidate_text(&data)
    }
}

/// Concatenated text parts of the first candidate.
fn candidate_text(data: &Value) -> Result<String> {
    let parts = data
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            let reason = data
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .unwrap_or("no candidates returned");
            CoachError::UnexpectedResponse(reason.to_string())
        })?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    Ok(text)
}

#[async_trait]
impl CoachingProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, false).await
    }

    async fn complete_json(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, true).await
    }
}
