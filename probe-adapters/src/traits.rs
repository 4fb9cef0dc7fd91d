//! Shared model adapter traits and data structures.

use std::fmt;

use async_trait::async_trait;
use probe_primitives::ToolSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result alias used by model adapters.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error type shared by adapter implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Adapter is misconfigured (bad URL, empty model name, ...).
    #[error("adapter not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The supplied request was invalid for the target endpoint.
    #[error("invalid inference request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be processed.
        reason: String,
    },

    /// Transport-level failures (connect, timeout, protocol).
    #[error("adapter transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The endpoint answered with an error status or a malformed body.
    #[error("adapter response error: {reason}")]
    Response {
        /// Additional context about the response failure.
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for response failures.
    #[must_use]
    pub fn response(reason: impl Into<String>) -> Self {
        Self::Response {
            reason: reason.into(),
        }
    }
}

/// Minimal metadata describing a model adapter instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterMetadata {
    provider: &'static str,
    model: String,
}

impl AdapterMetadata {
    /// Creates metadata for the supplied provider and model identifier.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Returns the provider identifier (e.g., "ollama").
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Roles of transcript turns.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions that open the transcript.
    System,
    /// User-authored content.
    User,
    /// Model responses.
    Assistant,
    /// Synthetic tool results fed back to the model.
    Tool,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        })
    }
}

/// One turn of the conversation transcript.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Message {
    role: MessageRole,
    content: String,
}

impl Message {
    /// Creates a new transcript turn.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Returns the turn role.
    #[must_use]
    pub const fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the turn content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Request submitted to a model adapter: the transcript so far plus the
/// tools the model may call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InferenceRequest {
    messages: Vec<Message>,
    tools: Vec<ToolSchema>,
}

impl InferenceRequest {
    /// Creates a request with the supplied transcript.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidRequest`] if the transcript is empty.
    pub fn new(messages: Vec<Message>) -> AdapterResult<Self> {
        if messages.is_empty() {
            return Err(AdapterError::invalid_request(
                "inference request requires at least one message",
            ));
        }

        Ok(Self {
            messages,
            tools: Vec::new(),
        })
    }

    /// Declares the tool schemas advertised to the model.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolSchema>) -> Self {
        self.tools = tools;
        self
    }

    /// Returns the transcript.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the advertised tool schemas.
    #[must_use]
    pub fn tools(&self) -> &[ToolSchema] {
        &self.tools
    }
}

/// Tool call delivered through the endpoint's structured `tool_calls` field.
///
/// `arguments` is kept exactly as received: usually a JSON object, but some
/// endpoints send an encoded JSON string instead.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NativeToolCall {
    /// Tool name chosen by the model.
    pub name: String,
    /// Raw argument payload.
    pub arguments: Value,
}

impl NativeToolCall {
    /// Creates a native call record.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Assistant turn returned by the endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssistantTurn {
    /// Free-text content, possibly empty.
    pub content: String,
    /// Structured calls, in the order the endpoint listed them.
    pub tool_calls: Vec<NativeToolCall>,
}

impl AssistantTurn {
    /// Creates a text-only turn.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Appends a structured call.
    #[must_use]
    pub fn with_tool_call(mut self, call: NativeToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }
}

/// Trait implemented by all model adapters.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Returns basic metadata describing the adapter instance.
    fn metadata(&self) -> &AdapterMetadata;

    /// Performs one non-streaming round-trip and returns the assistant turn.
    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AssistantTurn>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validates_request_messages() {
        let err = InferenceRequest::new(Vec::new()).expect_err("messages required");
        assert!(matches!(err, AdapterError::InvalidRequest { .. }));
    }

    #[test]
    fn builds_request_with_tools() {
        let schema = ToolSchema::new("calculate", "Perform a calculation").unwrap();
        let request = InferenceRequest::new(vec![Message::new(MessageRole::User, "ping")])
            .unwrap()
            .with_tools(vec![schema]);

        assert_eq!(request.messages().len(), 1);
        assert_eq!(request.tools()[0].name(), "calculate");
    }

    #[test]
    fn assistant_turn_builder_keeps_call_order() {
        let turn = AssistantTurn::text("")
            .with_tool_call(NativeToolCall::new("write_file", json!({})))
            .with_tool_call(NativeToolCall::new("read_file", json!("{}")));

        let names: Vec<_> = turn.tool_calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["write_file", "read_file"]);
    }

    #[test]
    fn role_display_is_lowercase() {
        assert_eq!(MessageRole::Tool.to_string(), "tool");
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }
}
