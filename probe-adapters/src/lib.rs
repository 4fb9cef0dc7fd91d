//! Model endpoint adapters used by the harness.
//!
//! Each module exposes an implementation for a specific endpoint protocol
//! while sharing the trait-based interface defined in [`traits`].

#![warn(missing_docs, clippy::pedantic)]

pub mod ollama;
pub mod traits;

mod http_client;
