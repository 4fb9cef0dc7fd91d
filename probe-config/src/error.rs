use std::path::PathBuf;

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while assembling harness configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A harness setting is out of range or malformed.
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting {
        /// Setting name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The catalog file could not be read.
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        /// Catalog location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON or does not match the case layout.
    #[error("failed to parse catalog: {reason}")]
    Parse {
        /// Decoder message.
        reason: String,
    },

    /// The catalog decoded but violates a catalog rule.
    #[error("invalid catalog: {reason}")]
    InvalidCatalog {
        /// Description of the violation.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn setting(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn catalog(reason: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            reason: reason.into(),
        }
    }
}
