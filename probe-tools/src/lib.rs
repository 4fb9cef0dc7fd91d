//! Tool registry and simulated execution.
//!
//! Tools never touch the filesystem or spawn processes. Executing a call only
//! validates its arguments against the advertised schema, which is enough to
//! judge the *shape* of a model's tool call.

#![warn(missing_docs, clippy::pedantic)]

pub mod calc;
pub mod registry;
