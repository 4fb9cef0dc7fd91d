//! Observability utilities for the harness.

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support {
    //! Structured tracing helpers.

    use anyhow::anyhow;
    use tracing_subscriber::EnvFilter;

    /// Directive used when `RUST_LOG` is unset.
    #[must_use]
    pub const fn default_directive(verbose: bool) -> &'static str {
        if verbose { "debug" } else { "info" }
    }

    /// Builds the level filter: `RUST_LOG` when set, otherwise
    /// [`default_directive`].
    #[must_use]
    pub fn env_filter(verbose: bool) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
    }

    /// Installs the global fmt subscriber, writing to stderr so reports on
    /// stdout stay machine readable.
    ///
    /// # Errors
    ///
    /// Fails if a global subscriber is already installed.
    pub fn init_tracing(verbose: bool) -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter(verbose))
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;
        tracing::debug!(verbose, "tracing initialised");
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn verbose_raises_default_level() {
            assert_eq!(default_directive(false), "info");
            assert_eq!(default_directive(true), "debug");
        }

        #[test]
        fn second_install_is_an_error() {
            let _ = init_tracing(false);
            assert!(init_tracing(true).is_err());
        }
    }
}

pub use tracing_support::init_tracing;
