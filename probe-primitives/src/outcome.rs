//! Outcomes produced while running test cases.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Verdict;

/// Result of executing one tool call issued by the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    tool_name: String,
    arguments: Map<String, Value>,
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ToolCallResult {
    /// Records a call whose arguments passed validation.
    #[must_use]
    pub fn succeeded(tool_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            success: true,
            error: None,
        }
    }

    /// Records a call that failed validation or named an unknown tool.
    #[must_use]
    pub fn failed(
        tool_name: impl Into<String>,
        arguments: Map<String, Value>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            success: false,
            error: Some(error.into()),
        }
    }

    /// Returns the tool name as issued by the model.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the decoded arguments.
    #[must_use]
    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// Returns `true` if the call passed validation.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the failure description, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Outcome of one test case.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    test_name: String,
    verdict: Verdict,
    tool_calls: Vec<ToolCallResult>,
    response_content: String,
    #[serde(with = "duration_secs")]
    duration: Duration,
    round_trips: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl TestResult {
    /// Creates a result with no calls, no content, and zero duration.
    #[must_use]
    pub fn new(test_name: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            test_name: test_name.into(),
            verdict,
            tool_calls: Vec::new(),
            response_content: String::new(),
            duration: Duration::ZERO,
            round_trips: 0,
            notes: None,
        }
    }

    /// Creates a `Skip` result carrying the supplied note.
    #[must_use]
    pub fn skipped(test_name: impl Into<String>, note: impl Into<String>) -> Self {
        Self::new(test_name, Verdict::Skip).with_notes(note)
    }

    /// Sets the ordered tool call outcomes.
    #[must_use]
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCallResult>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    /// Sets the final assistant text.
    #[must_use]
    pub fn with_response_content(mut self, content: impl Into<String>) -> Self {
        self.response_content = content.into();
        self
    }

    /// Sets the elapsed wall-clock duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the number of round-trips performed.
    #[must_use]
    pub fn with_round_trips(mut self, round_trips: usize) -> Self {
        self.round_trips = round_trips;
        self
    }

    /// Attaches a diagnostic note.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Returns the case name.
    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Returns the verdict.
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Returns tool call outcomes in issue order.
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCallResult] {
        &self.tool_calls
    }

    /// Returns the final assistant text.
    #[must_use]
    pub fn response_content(&self) -> &str {
        &self.response_content
    }

    /// Returns the elapsed duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the number of round-trips performed.
    #[must_use]
    pub const fn round_trips(&self) -> usize {
        self.round_trips
    }

    /// Returns the diagnostic note, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
