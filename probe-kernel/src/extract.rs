//! Tool call extraction from free-text assistant content.
//!
//! Models that do not populate the endpoint's structured `tool_calls` field
//! often describe the call in text instead. The [`CallExtractor`] tries a
//! list of strategies in priority order and returns the calls found by the
//! first strategy that finds any. Malformed input never raises: at worst the
//! result is empty.

use std::fmt;

use serde_json::{Map, Value};

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// A tool call recovered from model output.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedCall {
    /// Tool name as written by the model.
    pub name: String,
    /// Decoded arguments (empty when they could not be decoded).
    pub arguments: Map<String, Value>,
}

/// One way of recognising tool calls in text.
pub trait ExtractionStrategy: Send + Sync {
    /// Short label used in logs.
    fn label(&self) -> &'static str;

    /// Returns every call this strategy recognises, in order of appearance.
    fn extract(&self, content: &str) -> Vec<ExtractedCall>;
}

/// Recognises ```` ```json ```` fenced blocks holding `{"name", "arguments"}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FencedBlocks;

impl ExtractionStrategy for FencedBlocks {
    fn label(&self) -> &'static str {
        "fenced-block"
    }

    fn extract(&self, content: &str) -> Vec<ExtractedCall> {
        let mut calls = Vec::new();
        let mut block: Option<Vec<&str>> = None;

        for line in content.lines().map(str::trim) {
            if line == FENCE_OPEN {
                // A second opener restarts capture.
                block = Some(Vec::new());
                continue;
            }

            if line == FENCE_CLOSE {
                if let Some(lines) = block.take() {
                    calls.extend(parse_call(&lines.join("\n")));
                }
                continue;
            }

            if let Some(lines) = block.as_mut() {
                lines.push(line);
            }
        }

        calls
    }
}

/// Treats the whole content as a single JSON call object.
#[derive(Debug, Default, Clone, Copy)]
pub struct BareObject;

impl ExtractionStrategy for BareObject {
    fn label(&self) -> &'static str {
        "bare-object"
    }

    fn extract(&self, content: &str) -> Vec<ExtractedCall> {
        parse_call(content.trim()).into_iter().collect()
    }
}

/// Ordered chain of extraction strategies.
pub struct CallExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl fmt::Debug for CallExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<_> = self.strategies.iter().map(|s| s.label()).collect();
        f.debug_struct("CallExtractor")
            .field("strategies", &labels)
            .finish()
    }
}

impl Default for CallExtractor {
    fn default() -> Self {
        Self::new(vec![Box::new(FencedBlocks), Box::new(BareObject)])
    }
}

impl CallExtractor {
    /// Creates an extractor trying `strategies` in order.
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Returns the calls found by the first strategy that finds any.
    #[must_use]
    pub fn extract(&self, content: &str) -> Vec<ExtractedCall> {
        for strategy in &self.strategies {
            let calls = strategy.extract(content);
            if !calls.is_empty() {
                tracing::debug!(
                    strategy = strategy.label(),
                    count = calls.len(),
                    "extracted tool calls from content"
                );
                return calls;
            }
        }
        Vec::new()
    }
}

/// Normalises a raw argument payload into an argument map.
///
/// Objects are used as is. Strings are decoded as JSON; a string that fails to
/// decode, or decodes to something other than an object, yields an empty map.
/// Every other JSON value also yields an empty map.
#[must_use]
pub fn decode_arguments(raw: Value) -> Map<String, Value> {
    match raw {
        Value::Object(map) => map,
        Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

fn parse_call(text: &str) -> Option<ExtractedCall> {
    let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(text) else {
        return None;
    };

    let name = object.get("name")?.as_str()?.to_owned();
    if name.trim().is_empty() {
        return None;
    }
    let arguments = object.remove("arguments")?;

    Some(ExtractedCall {
        name,
        arguments: decode_arguments(arguments),
    })
}
