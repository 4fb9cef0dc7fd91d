//! Built-in test cases.

use probe_primitives::{Result, TestCase};

/// System prompt shared by the built-in cases.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that can use tools to complete tasks.";

/// Returns the six built-in cases in execution order.
///
/// # Errors
///
/// Only fails if a built-in case is itself invalid.
pub fn default_catalog() -> Result<Vec<TestCase>> {
    let cases = vec![
        TestCase::new("basic_tool_call", "Calculate 2 + 2")?
            .with_description("Simple calculation tool call")
            .with_expected_tools(["calculate"])
            .with_success_criteria("Model calls calculate tool with correct expression"),
        TestCase::new(
            "sequential_tool_calls",
            "Write 'Hello World' to a file called hello.txt, then read it back",
        )?
        .with_description("Write a file then read it back")
        .with_expected_tools(["write_file", "read_file"])
        .with_success_criteria("Model writes file then reads it back"),
        TestCase::new(
            "complex_workflow",
            "Create a Python script that prints 'Hello World', save it as hello.py, then run it",
        )?
        .with_description("Multi-step task requiring several tools")
        .with_expected_tools(["write_file", "run_command"])
        .with_success_criteria("Model creates script and executes it"),
        TestCase::new(
            "error_handling",
            "Read a file that doesn't exist: /nonexistent/file.txt",
        )?
        .with_description("Model handles a failing tool call gracefully")
        .with_expected_tools(["read_file"])
        .with_success_criteria("Model attempts to read file and handles the error"),
        TestCase::new(
            "parameter_validation",
            "Calculate the result of an invalid expression: 'not_a_number + 5'",
        )?
        .with_description("Invalid parameters are handled")
        .with_expected_tools(["calculate"])
        .with_success_criteria("Model attempts calculation and handles the error"),
        TestCase::new("no_tools_needed", "What is the capital of France?")?
            .with_description("Model answers directly without tools")
            .expecting_direct_answer()
            .with_success_criteria("Model answers directly without calling tools"),
    ];

    Ok(cases
        .into_iter()
        .map(|case| case.with_system_prompt(DEFAULT_SYSTEM_PROMPT))
        .collect())
}
