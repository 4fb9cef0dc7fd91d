//! Shared error definitions for harness primitives.

use thiserror::Error;

/// Result alias used throughout the harness data model.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing primitive values.
#[derive(Debug, Error)]
pub enum Error {
    /// Tool schema failed validation.
    #[error("invalid tool schema `{name}`: {reason}")]
    InvalidToolSchema {
        /// Name of the offending schema (may be empty).
        name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Test case failed validation.
    #[error("invalid test case `{name}`: {reason}")]
    InvalidTestCase {
        /// Name of the offending case (may be empty).
        name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },
}
