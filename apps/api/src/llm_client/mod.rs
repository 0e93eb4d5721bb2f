/// LLM Client — the single point of entry for completion-service calls in MindX.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// All LLM interactions MUST go through this module.
///
/// One request per analysis: no retries, no streaming, no client-side timeout.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
/// The model used for all completion calls.
pub const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f64 = 0.9;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response envelope is not valid JSON: {0}")]
    Envelope(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// The completion backend seen by the responder.
///
/// Carried in `AppState` as `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends one system + user exchange and returns the model's message text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    /// Whether a credential is available for `complete`.
    fn is_configured(&self) -> bool;
}

/// OpenAI chat-completions client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        // The body is read exactly once, as text, so it can be logged whatever it holds.
        let raw = response.text().await?;
        debug!(status = status.as_u16(), body = %raw, "completion service responded");

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAiError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Value = serde_json::from_str(&raw)?;
        if let Some(tokens) = envelope.pointer("/usage/total_tokens").and_then(Value::as_u64) {
            debug!("LLM call succeeded: total_tokens={tokens}");
        }

        Ok(message_content(&envelope).to_string())
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Text of the first choice: chat `message.content`, else legacy `text`, else "".
fn message_content(envelope: &Value) -> &str {
    envelope
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .or_else(|| envelope.pointer("/choices/0/text").and_then(Value::as_str))
        .unwrap_or("")
}

/// Removes every ```json / ``` fence marker from LLM output and trims it.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}


#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    /// Nothing listens on port 1, so connecting fails at the transport level.
    const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:1";

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_removes_inner_markers() {
        let input = "Here you go:\n```json{\"a\": 1}```";
        assert_eq!(strip_code_fences(input), "Here you go:\n{\"a\": 1}");
    }

    #[test]
    fn test_message_content_prefers_chat_message() {
        let envelope = json!({"choices": [{"message": {"content": "chat"}, "text": "legacy"}]});
        assert_eq!(message_content(&envelope), "chat");
    }

    #[test]
    fn test_message_content_falls_back_to_legacy_text_then_empty() {
        let legacy = json!({"choices": [{"text": "legacy"}]});
        assert_eq!(message_content(&legacy), "legacy");

        let empty = json!({"choices": []});
        assert_eq!(message_content(&empty), "");

        let null_content = json!({"choices": [{"message": {"content": null}}]});
        assert_eq!(message_content(&null_content), "");
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = LlmClient::new(None, "http://localhost:9999/".to_string());
        assert_eq!(client.endpoint(), "http://localhost:9999/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_complete_sends_single_request_and_returns_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": MODEL,
                "temperature": 0.9,
                "messages": [
                    {"role": "system", "content": "system text"},
                    {"role": "user", "content": "user text"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "{\"empathy\":\"hi\"}"}}],
                    "usage": {"total_tokens": 42}
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let client = LlmClient::new(Some("test-key".to_string()), server.url());
        let content = client.complete("system text", "user text").await.unwrap();

        assert_eq!(content, "{\"empathy\":\"hi\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body(json!({"error": {"message": "upstream exploded"}}).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = LlmClient::new(Some("k".to_string()), server.url());
        let err = client.complete("s", "u").await.unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unparseable_error_body_is_kept_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let client = LlmClient::new(Some("k".to_string()), server.url());
        let err = client.complete("s", "u").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 429, ref message } if message == "slow down"));
    }

    #[tokio::test]
    async fn test_non_json_envelope_is_envelope_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let client = LlmClient::new(Some("k".to_string()), server.url());
        let err = client.complete("s", "u").await.unwrap_err();
        assert!(matches!(err, LlmError::Envelope(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_never_reaches_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let client = LlmClient::new(None, server.url());
        assert!(!client.is_configured());
        let err = client.complete("s", "u").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_failure_is_http_error() {
        let client = LlmClient::new(Some("k".to_string()), UNREACHABLE_BASE_URL.to_string());
        let err = client.complete("s", "u").await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
