//! Bounded conversation loop for a single test case.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use probe_adapters::traits::{
    AdapterError, AdapterMetadata, AssistantTurn, InferenceRequest, Message, MessageRole,
    ModelAdapter,
};
use probe_primitives::{TestCase, TestResult, ToolCallResult, Verdict};
use probe_tools::registry::ToolRegistry;
use tracing::{debug, info, warn};

use crate::evaluate::evaluate_case;
use crate::extract::{CallExtractor, ExtractedCall, decode_arguments};

/// What the driver does after an assistant turn.
#[derive(Debug)]
enum TurnDisposition {
    /// The turn carried calls; execute them and ask again.
    Continue(Vec<ExtractedCall>),
    /// The model is done.
    Complete,
}

/// Drives one test case against a model endpoint.
///
/// Each round-trip sends the transcript plus every registered schema. Calls
/// from the assistant turn, whether structured or written in text, are run
/// through the registry and their outcomes appended as tool turns.
pub struct ConversationDriver {
    adapter: Arc<dyn ModelAdapter>,
    tools: Arc<ToolRegistry>,
    extractor: CallExtractor,
}

impl fmt::Debug for ConversationDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metadata = self.adapter.metadata();
        f.debug_struct("ConversationDriver")
            .field("provider", &metadata.provider())
            .field("model", &metadata.model())
            .field("tools", &self.tools.len())
            .field("extractor", &self.extractor)
            .finish()
    }
}

impl ConversationDriver {
    /// Creates a driver using the default extraction strategies.
    #[must_use]
    pub fn new(adapter: Arc<dyn ModelAdapter>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            adapter,
            tools,
            extractor: CallExtractor::default(),
        }
    }

    /// Replaces the extractor used for text-encoded calls.
    #[must_use]
    pub fn with_extractor(mut self, extractor: CallExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Returns the adapter metadata.
    #[must_use]
    pub fn metadata(&self) -> &AdapterMetadata {
        self.adapter.metadata()
    }

    /// Runs `case` to completion and classifies the outcome.
    ///
    /// Endpoint failures end the case with [`Verdict::Fail`] and a note; they
    /// are never retried. Reaching the round-trip cap ends the loop without a
    /// penalty beyond whatever the evaluator decides.
    pub async fn run(&self, case: &TestCase) -> TestResult {
        let started = Instant::now();
        let cap = case.max_round_trips().get();
        info!(case = case.name(), cap, "test case started");

        let mut transcript = initial_transcript(case);
        let mut calls: Vec<ToolCallResult> = Vec::new();
        let mut final_text = String::new();
        let mut round_trips = 0;
        let mut completed = false;

        while round_trips < cap {
            round_trips += 1;
            debug!(
                case = case.name(),
                round_trip = round_trips,
                turns = transcript.len(),
                "sending transcript"
            );

            let turn = match self.round_trip(&transcript).await {
                Ok(turn) => turn,
                Err(err) => {
                    warn!(case = case.name(), error = %err, "endpoint request failed");
                    let result = TestResult::new(case.name(), Verdict::Fail)
                        .with_tool_calls(calls)
                        .with_response_content(final_text)
                        .with_round_trips(round_trips)
                        .with_duration(started.elapsed())
                        .with_notes(format!("failed to get response from endpoint: {err}"));
                    info!(case = case.name(), verdict = %Verdict::Fail, "test case finished");
                    return result;
                }
            };

            transcript.push(Message::new(MessageRole::Assistant, turn.content.clone()));
            final_text.clone_from(&turn.content);

            match self.dispose(turn) {
                TurnDisposition::Continue(pending) => {
                    for call in pending {
                        let outcome = self.tools.execute(&call.name, call.arguments);
                        transcript
                            .push(Message::new(MessageRole::Tool, tool_turn_text(&outcome)));
                        calls.push(outcome);
                    }
                }
                TurnDisposition::Complete => {
                    completed = true;
                    break;
                }
            }
        }

        if !completed {
            debug!(case = case.name(), cap, "round-trip cap reached");
        }

        let verdict = evaluate_case(case, &calls);
        info!(
            case = case.name(),
            verdict = %verdict,
            calls = calls.len(),
            round_trips,
            "test case finished"
        );

        TestResult::new(case.name(), verdict)
            .with_tool_calls(calls)
            .with_response_content(final_text)
            .with_round_trips(round_trips)
            .with_duration(started.elapsed())
    }

    async fn round_trip(&self, transcript: &[Message]) -> Result<AssistantTurn, AdapterError> {
        let request = InferenceRequest::new(transcript.to_vec())?.with_tools(self.tools.schemas());
        self.adapter.infer(request).await
    }

    fn dispose(&self, turn: AssistantTurn) -> TurnDisposition {
        if !turn.tool_calls.is_empty() {
            let calls = turn
                .tool_calls
                .into_iter()
                .map(|call| ExtractedCall {
                    name: call.name,
                    arguments: decode_arguments(call.arguments),
                })
                .collect();
            return TurnDisposition::Continue(calls);
        }

        if turn.content.trim().is_empty() {
            return TurnDisposition::Complete;
        }

        let calls = self.extractor.extract(&turn.content);
        if calls.is_empty() {
            TurnDisposition::Complete
        } else {
            for call in &calls {
                debug!(
                    tool = %call.name,
                    args = %serde_json::Value::Object(call.arguments.clone()),
                    "text-encoded call"
                );
            }
            TurnDisposition::Continue(calls)
        }
    }
}

fn initial_transcript(case: &TestCase) -> Vec<Message> {
    // The system turn is always sent, even when blank.
    vec![
        Message::new(MessageRole::System, case.system_prompt()),
        Message::new(MessageRole::User, case.user_message()),
    ]
}

fn tool_turn_text(outcome: &ToolCallResult) -> String {
    match outcome.error() {
        None if outcome.is_success() => {
            format!("Tool {} executed successfully", outcome.tool_name())
        }
        error => format!(
            "Tool {} failed: {}",
            outcome.tool_name(),
            error.unwrap_or("unknown error")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    #[test]
    fn transcript_opens_with_system_turn_even_when_blank() {
        let case = TestCase::new("t", "hello").unwrap();
        let transcript = initial_transcript(&case);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role(), MessageRole::System);
        assert_eq!(transcript[0].content(), "");
        assert_eq!(transcript[1].role(), MessageRole::User);

        let case = case.with_system_prompt("be brief");
        let transcript = initial_transcript(&case);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role(), MessageRole::System);
        assert_eq!(transcript[1].content(), "hello");
    }

    #[test]
    fn formats_tool_turns() {
        let ok = ToolCallResult::succeeded("calculate", Map::new());
        assert_eq!(tool_turn_text(&ok), "Tool calculate executed successfully");

        let failed = ToolCallResult::failed(
            "read_file",
            json!({}).as_object().cloned().unwrap(),
            "missing required argument `path`",
        );
        assert_eq!(
            tool_turn_text(&failed),
            "Tool read_file failed: missing required argument `path`"
        );
    }
}
