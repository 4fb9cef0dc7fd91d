//! Core shared types for the toolprobe conformance harness.

#![warn(missing_docs, clippy::pedantic)]

mod case;
mod error;
mod outcome;
mod schema;
mod verdict;

/// Test case configuration and its default round-trip bound.
pub use case::{DEFAULT_MAX_ROUND_TRIPS, TestCase};
/// Error type and result alias shared across the harness crates.
pub use error::{Error, Result};
/// Per-call and per-case outcomes.
pub use outcome::{TestResult, ToolCallResult};
/// Tool schemas advertised to the model.
pub use schema::{ParamType, ParameterSpec, ToolSchema};
/// Verdicts assigned by the evaluator.
pub use verdict::Verdict;
