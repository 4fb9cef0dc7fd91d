//! Conformance harness core: drives bounded conversations against a model
//! endpoint, extracts tool calls in whatever format the model chose, and
//! classifies each test case.

#![warn(missing_docs, clippy::pedantic)]

pub mod driver;
pub mod evaluate;
pub mod extract;
pub mod suite;

pub use driver::ConversationDriver;
pub use evaluate::{evaluate, evaluate_case, evaluate_direct_answer};
pub use extract::{CallExtractor, ExtractedCall, decode_arguments};
pub use suite::{ExitStatus, SuiteError, SuiteReport, SuiteResults, SuiteRunner, VerdictCounts};
