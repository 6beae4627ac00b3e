//! Reasoning service client
//!
//! Sends an instruction plus function declarations to an OpenAI-compatible
//! chat completions endpoint and hands back the tool calls it proposes.
//! A scripted client stands in for the real one in tests.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

/// Reasoning service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Never read from or written to the config file
    #[serde(skip)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_system_prompt() -> String {
    "사용자의 요청을 분석하여 적절한 함수를 호출하세요.".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Reasoning service errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("reasoning service is disabled in configuration")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status} from reasoning service: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    #[error("reasoning service returned no choices")]
    EmptyResponse,
}

/// One request to the reasoning service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    pub system_prompt: String,
    pub instruction: String,
    /// Function declarations, in the order they should be presented
    pub declarations: Vec<serde_json::Value>,
}

/// A proposed function call, arguments still serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: String,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// What the service answered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceReply {
    /// Model that produced the reply, as reported by the service
    pub model: String,
    pub tool_calls: Vec<ToolCall>,
    /// Plain text the model produced instead of (or alongside) tool calls
    pub content: Option<String>,
}

impl ServiceReply {
    pub fn calls(calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            ..Self::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

pub trait ReasoningClient: Send + Sync {
    fn complete(&self, request: &ServiceRequest) -> Result<ServiceReply, LlmError>;

    /// Model name reported in decision provenance
    fn model(&self) -> &str;
}

/// Real client over HTTP (blocking)
pub struct HttpReasoningClient {
    config: LlmConfig,
    client: reqwest::blocking::Client,
}

impl HttpReasoningClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn request_body(&self, request: &ServiceRequest) -> serde_json::Value {
        build_request_body(&self.config.model, request)
    }
}

impl ReasoningClient for HttpReasoningClient {
    fn complete(&self, request: &ServiceRequest) -> Result<ServiceReply, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        let body = self.request_body(request);
        tracing::debug!("POST {} with {} declarations", self.url(), request.declarations.len());

        let mut http = self.client.post(self.url()).json(&body);
        if let Some(api_key) = &self.config.api_key {
            http = http.bearer_auth(api_key);
        }

        let response = http.send().map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.config.timeout_secs)
            } else {
                LlmError::Http(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        let response_json: serde_json::Value = response
            .json()
            .map_err(|e| LlmError::InvalidJson(format!("Failed to parse response: {}", e)))?;

        parse_chat_completion(&response_json, &self.config.model)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Chat completions request with `tools` and automatic tool choice
pub fn build_request_body(model: &str, request: &ServiceRequest) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": model,
        "messages": [
            {"role": "system", "content": request.system_prompt},
            {"role": "user", "content": request.instruction},
        ],
    });
    if !request.declarations.is_empty() {
        body["tools"] = serde_json::Value::Array(request.declarations.clone());
        body["tool_choice"] = serde_json::json!("auto");
    }
    body
}

/// Extract tool calls from an OpenAI-format chat completion
pub fn parse_chat_completion(
    response: &serde_json::Value,
    fallback_model: &str,
) -> Result<ServiceReply, LlmError> {
    let message = response
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("message"))
        .ok_or(LlmError::EmptyResponse)?;

    let model = response
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or(fallback_model)
        .to_string();

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let mut tool_calls = Vec::new();
    if let Some(calls) = message.get("tool_calls").and_then(|v| v.as_array()) {
        for call in calls {
            let function = call
                .get("function")
                .ok_or_else(|| LlmError::InvalidJson("tool call without function".to_string()))?;
            let name = function
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| LlmError::InvalidJson("tool call without name".to_string()))?;
            // Arguments normally arrive as a JSON string; accept an inline object too
            let arguments = match function.get("arguments") {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            tool_calls.push(ToolCall::new(name, arguments));
        }
    }

    Ok(ServiceReply {
        model,
        tool_calls,
        content,
    })
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

/// Scripted client for tests
pub struct ScriptedClient {
    model: String,
    replies: Mutex<Vec<Result<ServiceReply, LlmError>>>,
    requests: Mutex<Vec<ServiceRequest>>,
}

impl ScriptedClient {
    /// Replies are handed out in order; the last one repeats
    pub fn new(replies: Vec<Result<ServiceReply, LlmError>>) -> Self {
        Self {
            model: "scripted".to_string(),
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: ServiceReply) -> Self {
        Self::new(vec![Ok(reply)])
    }

    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Single proposed call
    pub fn calling(name: &str, arguments: serde_json::Value) -> Self {
        Self::always(ServiceReply::calls(vec![ToolCall::new(
            name,
            arguments.to_string(),
        )]))
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ReasoningClient for ScriptedClient {
    fn complete(&self, request: &ServiceRequest) -> Result<ServiceReply, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let mut replies = self
            .replies
            .lock()
            .map_err(|_| LlmError::Http("scripted client poisoned".to_string()))?;
        match replies.len() {
            0 => Err(LlmError::EmptyResponse),
            1 => replies[0].clone(),
            _ => replies.remove(0),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
