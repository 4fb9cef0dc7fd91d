//! `Ollama` chat adapter with tool schema support.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use hyper::body::to_bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Request, Uri};
use probe_primitives::ToolSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::timeout;
use tracing::debug;

use crate::http_client::{EndpointClient, build_endpoint_client};
use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AssistantTurn, InferenceRequest, Message,
    ModelAdapter, NativeToolCall,
};

/// Default address of a local Ollama daemon.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/";

/// Default per-request timeout. Local inference can be very slow, so this is
/// deliberately long.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

const MAX_ERROR_BODY: usize = 4096;

/// Configuration for the `Ollama` adapter.
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaConfig {
    /// Creates a configuration for the supplied model using default settings.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the base URL of the Ollama daemon.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the timeout applied to each round-trip.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the normalised base URL (always ends with `/`).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// `Ollama` adapter that posts to `/api/chat` with streaming disabled.
pub struct OllamaAdapter {
    client: EndpointClient,
    endpoint: Uri,
    metadata: AdapterMetadata,
    timeout: Duration,
}

impl fmt::Debug for OllamaAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaAdapter")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OllamaAdapter {
    /// Constructs a new adapter from the supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the model name is empty or the
    /// endpoint URI is invalid.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(config: OllamaConfig) -> AdapterResult<Self> {
        if config.model.trim().is_empty() {
            return Err(AdapterError::configuration("model name cannot be empty"));
        }

        let endpoint = format!("{}api/chat", config.base_url)
            .parse::<Uri>()
            .map_err(|err| {
                AdapterError::configuration(format!("invalid Ollama endpoint: {err}"))
            })?;

        Ok(Self {
            client: build_endpoint_client(),
            endpoint,
            metadata: AdapterMetadata::new("ollama", config.model.clone()),
            timeout: config.timeout,
        })
    }

    /// Returns the full chat endpoint URI.
    #[must_use]
    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    fn build_request(&self, request: &InferenceRequest) -> ChatRequest {
        ChatRequest {
            model: self.metadata.model().to_owned(),
            messages: request.messages().to_vec(),
            tools: request.tools().iter().map(ChatTool::from).collect(),
            stream: false,
        }
    }
}

#[async_trait]
impl ModelAdapter for OllamaAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AssistantTurn> {
        let payload = self.build_request(&request);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode Ollama request: {err}"))
        })?;

        debug!(
            model = %payload.model,
            messages = payload.messages.len(),
            tools = payload.tools.len(),
            "sending chat request"
        );

        let req = Request::post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .map_err(|err| {
                AdapterError::transport(format!("failed to build Ollama request: {err}"))
            })?;

        let response = timeout(self.timeout, self.client.request(req))
            .await
            .map_err(|_| {
                AdapterError::transport(format!(
                    "Ollama request timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|err| AdapterError::transport(format!("Ollama request failed: {err}")))?;

        let status = response.status();
        let bytes = timeout(self.timeout, to_bytes(response.into_body()))
            .await
            .map_err(|_| AdapterError::transport("timed out reading Ollama response"))?
            .map_err(|err| {
                AdapterError::transport(format!("failed to read Ollama response: {err}"))
            })?;

        if !status.is_success() {
            let reason = truncate(&String::from_utf8_lossy(&bytes), MAX_ERROR_BODY);
            return Err(AdapterError::response(format!(
                "Ollama returned {status}: {reason}"
            )));
        }

        parse_chat_response(&bytes)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    tools: Vec<ChatTool>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ChatFunction,
}

#[derive(Debug, Serialize)]
struct ChatFunction {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&ToolSchema> for ChatTool {
    fn from(schema: &ToolSchema) -> Self {
        Self {
            kind: "function",
            function: ChatFunction {
                name: schema.name().to_owned(),
                description: schema.description().to_owned(),
                parameters: schema.to_json_schema(),
            },
        }
    }
}

// Every field is optional: endpoints send explicit `null`s as well as omit keys.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default, rename = "done")]
    _done: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    #[serde(default)]
    function: Option<ResponseFunction>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseFunction {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Value,
}

fn parse_chat_response(bytes: &[u8]) -> AdapterResult<AssistantTurn> {
    let response: ChatResponse = serde_json::from_slice(bytes).map_err(|err| {
        AdapterError::response(format!("failed to decode Ollama response: {err}"))
    })?;

    if let Some(error) = response.error {
        return Err(AdapterError::response(error));
    }

    let Some(message) = response.message else {
        return Ok(AssistantTurn::default());
    };

    Ok(AssistantTurn {
        content: message.content.unwrap_or_default(),
        tool_calls: message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                let function = call.function.unwrap_or_default();
                NativeToolCall::new(function.name.unwrap_or_default(), function.arguments)
            })
            .collect(),
    })
}

fn sanitize_base_url(input: &str) -> AdapterResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(AdapterError::configuration(
            "Ollama base URL must start with http:// or https://",
        ));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>()
        .map_err(|err| AdapterError::configuration(format!("invalid Ollama base URL: {err}")))?;
    Ok(base)
}

fn truncate(input: &str, max: usize) -> String {
    if input.len() <= max {
        return input.to_owned();
    }
    let mut end = max;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &input[..end])
}
