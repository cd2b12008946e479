//! Configuration
//!
//! A single flat [`FrontendConfig`] with builder-style overrides and a
//! versioned YAML schema.
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_go::config::FrontendConfig;
//!
//! let config = FrontendConfig::new().include_test_files(true).parallel(false);
//! config.validate()?;
//!
//! let config = FrontendConfig::from_yaml("codegraph-go.yaml")?;
//! ```

pub mod error;
pub mod frontend_config;
pub mod io;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use frontend_config::{FrontendConfig, DEFAULT_LANGUAGE, DEFAULT_MANIFEST_FILE};
pub use io::ConfigExportV1;
