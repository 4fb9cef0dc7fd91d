//! Strongly typed harness settings.

use std::num::NonZeroUsize;
use std::time::Duration;

use probe_adapters::ollama::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, OllamaConfig};
use probe_primitives::TestCase;

use crate::error::{ConfigError, ConfigResult};

/// Settings for one harness run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    endpoint: String,
    model: String,
    timeout: Duration,
    max_round_trips: Option<NonZeroUsize>,
}

impl HarnessConfig {
    /// Creates settings for `model` against the default local endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] if the model name is blank.
    pub fn new(model: impl Into<String>) -> ConfigResult<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ConfigError::setting("model", "model name cannot be empty"));
        }

        Ok(Self {
            endpoint: DEFAULT_BASE_URL.to_owned(),
            model,
            timeout: DEFAULT_TIMEOUT,
            max_round_trips: None,
        })
    }

    /// Points the harness at another endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] unless the URL is an
    /// `http://` or `https://` address.
    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> ConfigResult<Self> {
        let normalised = OllamaConfig::new(&self.model)
            .with_base_url(endpoint)
            .map_err(|err| ConfigError::setting("endpoint", err.to_string()))?;
        self.endpoint = normalised.base_url().to_owned();
        Ok(self)
    }

    /// Sets the per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for a zero timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> ConfigResult<Self> {
        if timeout.is_zero() {
            return Err(ConfigError::setting("timeout", "timeout must be positive"));
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Forces every case to use `max` as its round-trip cap.
    #[must_use]
    pub fn with_max_round_trips(mut self, max: NonZeroUsize) -> Self {
        self.max_round_trips = Some(max);
        self
    }

    /// Endpoint base URL, always ending in `/`.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Cap override, if any.
    #[must_use]
    pub const fn max_round_trips(&self) -> Option<NonZeroUsize> {
        self.max_round_trips
    }

    /// Builds the adapter configuration for these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] if the endpoint is rejected.
    pub fn ollama(&self) -> ConfigResult<OllamaConfig> {
        OllamaConfig::new(&self.model)
            .with_base_url(&self.endpoint)
            .map(|config| config.with_timeout(self.timeout))
            .map_err(|err| ConfigError::setting("endpoint", err.to_string()))
    }

    /// Applies the cap override, if set, to every case.
    #[must_use]
    pub fn apply(&self, cases: Vec<TestCase>) -> Vec<TestCase> {
        match self.max_round_trips {
            Some(max) => cases
                .into_iter()
                .map(|case| case.with_max_round_trips(max))
                .collect(),
            None => cases,
        }
    }
}
