//! Test catalog loading.
//!
//! A catalog file is a JSON array of test cases:
//!
//! ```json
//! [
//!   {
//!     "name": "basic_tool_call",
//!     "user_message": "Calculate 2 + 2",
//!     "expected_tools": ["calculate"],
//!     "max_round_trips": 4
//!   }
//! ]
//! ```
//!
//! Omitted fields take their defaults: empty description, system prompt, and
//! success criterion, no expected tools, a cap of 10, and no direct-answer
//! flag.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use probe_primitives::TestCase;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Reads and validates the catalog stored at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, and any error from
/// [`parse_catalog`].
pub fn load_catalog(path: impl AsRef<Path>) -> ConfigResult<Vec<TestCase>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cases = parse_catalog(&raw)?;
    debug!(path = %path.display(), cases = cases.len(), "catalog loaded");
    Ok(cases)
}

/// Decodes and validates a catalog document.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed JSON (including a zero
/// `max_round_trips`) and [`ConfigError::InvalidCatalog`] for an empty
/// catalog, duplicate names, or a case failing its own validation.
pub fn parse_catalog(raw: &str) -> ConfigResult<Vec<TestCase>> {
    let cases: Vec<TestCase> = serde_json::from_str(raw).map_err(|err| ConfigError::Parse {
        reason: err.to_string(),
    })?;

    if cases.is_empty() {
        return Err(ConfigError::catalog("catalog contains no test cases"));
    }

    let mut seen = HashSet::with_capacity(cases.len());
    for case in &cases {
        case.validate()
            .map_err(|err| ConfigError::catalog(err.to_string()))?;
        if !seen.insert(case.name()) {
            return Err(ConfigError::catalog(format!(
                "duplicate test case `{}`",
                case.name()
            )));
        }
    }

    Ok(cases)
}
