//! Test case configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Round-trip bound applied when a case does not configure its own.
pub const DEFAULT_MAX_ROUND_TRIPS: NonZeroUsize = NonZeroUsize::new(10).unwrap();

fn default_max_round_trips() -> NonZeroUsize {
    DEFAULT_MAX_ROUND_TRIPS
}

/// A single scenario driven against the model endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    system_prompt: String,
    user_message: String,
    #[serde(default)]
    expected_tools: Vec<String>,
    #[serde(default)]
    success_criteria: String,
    #[serde(default = "default_max_round_trips")]
    max_round_trips: NonZeroUsize,
    /// Marks cases whose purpose is to check that the model answers without
    /// calling tools. Only meaningful when `expected_tools` is empty.
    #[serde(default)]
    direct_answer: bool,
}

impl TestCase {
    /// Creates a case with the supplied name and user message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTestCase`] if either value is blank.
    pub fn new(name: impl Into<String>, user_message: impl Into<String>) -> Result<Self> {
        let case = Self {
            name: name.into(),
            description: String::new(),
            system_prompt: String::new(),
            user_message: user_message.into(),
            expected_tools: Vec::new(),
            success_criteria: String::new(),
            max_round_trips: DEFAULT_MAX_ROUND_TRIPS,
            direct_answer: false,
        };
        case.validate()?;
        Ok(case)
    }

    /// Sets the description shown in reports.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the system prompt that opens the transcript.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets the tool names the model is expected to call.
    #[must_use]
    pub fn with_expected_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the human-readable success criterion.
    #[must_use]
    pub fn with_success_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.success_criteria = criteria.into();
        self
    }

    /// Overrides the round-trip bound.
    #[must_use]
    pub fn with_max_round_trips(mut self, max: NonZeroUsize) -> Self {
        self.max_round_trips = max;
        self
    }

    /// Marks the case as expecting a direct answer without tool calls.
    #[must_use]
    pub fn expecting_direct_answer(mut self) -> Self {
        self.direct_answer = true;
        self
    }

    /// Checks the invariants that deserialisation alone cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTestCase`] when the name or user message is
    /// blank, an expected tool name is blank, or a direct-answer case also
    /// lists expected tools.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidTestCase {
            name: self.name.clone(),
            reason: reason.to_owned(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if self.user_message.trim().is_empty() {
            return Err(invalid("user message cannot be empty"));
        }
        if self.expected_tools.iter().any(|tool| tool.trim().is_empty()) {
            return Err(invalid("expected tool names cannot be empty"));
        }
        if self.direct_answer && !self.expected_tools.is_empty() {
            return Err(invalid("direct-answer cases cannot list expected tools"));
        }
        Ok(())
    }

    /// Returns the unique case name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the system prompt, which may be empty.
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Returns the user message that starts the conversation.
    #[must_use]
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// Returns the expected tool names.
    #[must_use]
    pub fn expected_tools(&self) -> &[String] {
        &self.expected_tools
    }

    /// Returns the success criterion.
    #[must_use]
    pub fn success_criteria(&self) -> &str {
        &self.success_criteria
    }

    /// Returns the round-trip bound.
    #[must_use]
    pub const fn max_round_trips(&self) -> NonZeroUsize {
        self.max_round_trips
    }

    /// Returns `true` for cases expecting a direct answer.
    #[must_use]
    pub const fn is_direct_answer(&self) -> bool {
        self.direct_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_case_with_defaults() {
        let case = TestCase::new("basic_tool_call", "Calculate 2 + 2")
            .unwrap()
            .with_expected_tools(["calculate"]);

        assert_eq!(case.max_round_trips(), DEFAULT_MAX_ROUND_TRIPS);
        assert_eq!(case.expected_tools(), ["calculate"]);
        assert!(!case.is_direct_answer());
    }

    #[test]
    fn rejects_blank_fields() {
        assert!(TestCase::new("", "hello").is_err());
        assert!(TestCase::new("name", "   ").is_err());
    }

    #[test]
    fn direct_answer_conflicts_with_expected_tools() {
        let case = TestCase::new("mixed", "hi")
            .unwrap()
            .with_expected_tools(["calculate"])
            .expecting_direct_answer();
        let err = case.validate().expect_err("conflicting expectations");
        assert!(matches!(err, Error::InvalidTestCase { .. }));
    }

    #[test]
    fn deserializes_with_defaults() {
        let case: TestCase = serde_json::from_str(
            r#"{"name": "capital", "user_message": "What is the capital of France?"}"#,
        )
        .unwrap();
        assert_eq!(case.max_round_trips().get(), 10);
        assert!(case.expected_tools().is_empty());
        assert!(case.validate().is_ok());
    }

    #[test]
    fn zero_round_trips_fail_to_deserialize() {
        let result = serde_json::from_str::<TestCase>(
            r#"{"name": "x", "user_message": "y", "max_round_trips": 0}"#,
        );
        assert!(result.is_err());
    }
}
