//! Configuration I/O (YAML loading)
//!
//! Defines the YAML schema type. Conversion to and from
//! [`FrontendConfig`](super::FrontendConfig) lives in `frontend_config.rs`.

use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach_comments: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_test_files: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_dirs: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_problems_per_file: Option<usize>,
}
