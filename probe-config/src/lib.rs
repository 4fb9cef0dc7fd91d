//! Configuration management for the harness.
//!
//! [`schema`] holds the typed harness settings, [`loader`] reads test
//! catalogs from disk, and [`catalog`] provides the built-in cases.

#![warn(missing_docs, clippy::pedantic)]

pub mod catalog;
pub mod loader;
pub mod schema;

mod error;

pub use catalog::default_catalog;
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_catalog, parse_catalog};
pub use schema::HarnessConfig;
