//! The language-model boundary.
//!
//! The orchestrator only depends on [`LlmClient`]; any backend that supports
//! structured function-call proposals against a supplied catalog satisfies
//! the contract. [`HttpLlmClient`] speaks the OpenAI-compatible
//! chat-completions wire shape, which covers both hosted endpoints and local
//! runtimes behind a `base_url`.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use switchboard_core::config::{LlmConfig, LlmProvider};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// A structured proposal to invoke a named operation. `arguments_json` is
/// the raw string exactly as the model produced it; parsing (and lenient
/// recovery from malformed JSON) happens in the orchestrator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionCallIntent {
    pub name: String,
    pub arguments_json: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub content: Option<String>,
    pub function_call: Option<FunctionCallIntent>,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model transport failure: {0}")]
    Transport(String),
    #[error("model endpoint returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed model response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One model call. `functions`, when present, is the registry's
    /// model-facing catalog snapshot.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        functions: Option<&[Value]>,
    ) -> Result<ModelResponse, LlmError>;
}

pub struct HttpLlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    max_retries: u32,
}

impl HttpLlmClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let base_url = match config.provider {
            LlmProvider::OpenAi => config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            LlmProvider::Ollama => config
                .base_url
                .clone()
                .ok_or_else(|| LlmError::Transport("llm.base_url is not set".to_string()))?,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| LlmError::Transport(error.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }
}

/// Wire-shape of one chat-completions request.
fn request_body(model: &str, messages: &[ChatMessage], functions: Option<&[Value]>) -> Value {
    let mut body = json!({ "model": model, "messages": messages });
    if let Some(functions) = functions {
        body["functions"] = Value::Array(functions.to_vec());
        body["function_call"] = Value::String("auto".to_string());
    }
    body
}

/// Extract content and any function-call directive from a chat-completions
/// response body.
fn parse_chat_completion(body: &Value) -> Result<ModelResponse, LlmError> {
    let message = body
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| LlmError::Malformed("response carries no choices[0].message".to_string()))?;

    let content = message.get("content").and_then(Value::as_str).map(str::to_string);

    let function_call = message.get("function_call").and_then(|call| {
        let name = call.get("name")?.as_str()?.to_string();
        let arguments_json = call
            .get("arguments")
            .and_then(Value::as_str)
            .unwrap_or("{}")
            .to_string();
        Some(FunctionCallIntent { name, arguments_json })
    });

    Ok(ModelResponse { content, function_call })
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        functions: Option<&[Value]>,
    ) -> Result<ModelResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = request_body(&self.model, messages, functions);

        let mut last_transport_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
            }

            let mut request = self.http.post(&url).json(&body);
            if let Some(api_key) = &self.api_key {
                request = request.bearer_auth(api_key.expose_secret());
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let text = response
                        .text()
                        .await
                        .map_err(|error| LlmError::Transport(error.to_string()))?;
                    if !status.is_success() {
                        return Err(LlmError::Api { status: status.as_u16(), body: text });
                    }
                    let parsed: Value = serde_json::from_str(&text)
                        .map_err(|error| LlmError::Malformed(error.to_string()))?;
                    return parse_chat_completion(&parsed);
                }
                Err(error) => {
                    debug!(
                        event_name = "llm.request.retry",
                        attempt,
                        error = %error,
                        "model request failed, retrying"
                    );
                    last_transport_error = Some(error);
                }
            }
        }

        Err(LlmError::Transport(
            last_transport_error
                .map(|error| error.to_string())
                .unwrap_or_else(|| "request never attempted".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_chat_completion, request_body, ChatMessage, LlmError};

    #[test]
    fn request_body_omits_functions_when_absent() {
        let body = request_body("llama3.1", &[ChatMessage::user("hello")], None);
        assert_eq!(body["model"], "llama3.1");
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("functions").is_none());
        assert!(body.get("function_call").is_none());
    }

    #[test]
    fn request_body_carries_catalog_and_auto_mode() {
        let catalog = vec![json!({"name": "get_device", "parameters": {}})];
        let body = request_body("gpt-4o", &[ChatMessage::user("q")], Some(&catalog));
        assert_eq!(body["functions"][0]["name"], "get_device");
        assert_eq!(body["function_call"], "auto");
    }

    #[test]
    fn parses_direct_content_response() {
        let body = json!({
            "choices": [{ "message": { "content": "All switches are up." } }]
        });
        let response = parse_chat_completion(&body).expect("valid body");
        assert_eq!(response.content.as_deref(), Some("All switches are up."));
        assert!(response.function_call.is_none());
    }

    #[test]
    fn parses_function_call_directive() {
        let body = json!({
            "choices": [{ "message": {
                "content": null,
                "function_call": {
                    "name": "list_all_switches_in_org",
                    "arguments": "{\"organization_id\": \"123\"}"
                }
            }}]
        });
        let response = parse_chat_completion(&body).expect("valid body");
        let call = response.function_call.expect("directive present");
        assert_eq!(call.name, "list_all_switches_in_org");
        assert_eq!(call.arguments_json, "{\"organization_id\": \"123\"}");
    }

    #[test]
    fn missing_choices_is_malformed() {
        let error = parse_chat_completion(&json!({"id": "x"})).expect_err("must fail");
        assert!(matches!(error, LlmError::Malformed(_)));
    }
}
