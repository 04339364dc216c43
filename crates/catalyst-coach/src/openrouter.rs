//! OpenRouter (OpenAI-compatible chat completions) backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::CoachError;
use crate::http;
use crate::provider::CoachingProvider;
use crate::Result;

pub struct OpenRouterProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    temperature: f32,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl OpenRouterProvider {
    /// `api_key` may be `None`; requests then fail with
    /// [`CoachError::MissingApiKey`] naming `api_key_env`.
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

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// `choices[0].message.content`, or `choices[0].text` for models that
/// answer in the legacy completion shape.
fn completion_text(data: &Value) -> Result<String> {
    let choice = data
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| CoachError::UnexpectedResponse("no choices in response".to_string()))?;
    choice
        .pointer("/message/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| choice.get("text").and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| CoachError::UnexpectedResponse("choice has no text".to_string()))
}

#[async_trait]
impl CoachingProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "open_router"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CoachError::MissingApiKey(self.api_key_env.clone()))?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };
        tracing::debug!(model = %self.model, url = %self.chat_completions_url(), "calling OpenRouter");

        let request = self
            .client
            .post(self.chat_completions_url())
            .bearer_auth(api_key)
            .json(&body);
        let data = http::send_json(request, self.timeout_secs).await?;
        completion_text(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn provider(url: &str, key: Option<&str>) -> OpenRouterProvider {
        OpenRouterProvider::new(url, "test-model", key.map(String::from), "OPENROUTER_API_KEY", 0.7, 5)
            .unwrap()
    }

    #[tokio::test]
    async fn sends_chat_request_and_reads_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "test-model",
                "messages": [{"role": "user", "content": "hello"}],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"Stay focused."}}]}"#)
            .create_async()
            .await;

        let text = provider(&server.url(), Some("sk-test"))
            .complete("hello")
            .await
            .unwrap();
        assert_eq!(text, "Stay focused.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn falls_back_to_choice_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":null},"text":"legacy"}]}"#)
            .create_async()
            .await;
        let text = provider(&server.url(), Some("k")).complete("x").await.unwrap();
        assert_eq!(text, "legacy");
    }

    #[tokio::test]
    async fn missing_key_fails_before_request() {
        let err = provider("http://127.0.0.1:9", None)
            .complete("x")
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::MissingApiKey(ref env) if env == "OPENROUTER_API_KEY"));
    }

    #[tokio::test]
    async fn upstream_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;
        let err = provider(&server.url(), Some("k")).complete("x").await.unwrap_err();
        match err {
            CoachError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_unexpected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;
        let err = provider(&server.url(), Some("k")).complete("x").await.unwrap_err();
        assert!(matches!(err, CoachError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn silent_upstream_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        // Accept connections and never answer.
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let slow = OpenRouterProvider::new(&url, "test-model", Some("k".into()), "OPENROUTER_API_KEY", 0.7, 1)
            .unwrap();
        let err = slow.complete("x").await.unwrap_err();
        assert!(matches!(err, CoachError::Timeout(1)), "unexpected error: {err}");
    }
}
