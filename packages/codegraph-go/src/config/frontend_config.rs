//! Frontend configuration
//!
//! Defaults cover the common case; YAML files only need to name what they
//! change.

use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigExportV1;

pub const DEFAULT_LANGUAGE: &str = "Go";
pub const DEFAULT_MANIFEST_FILE: &str = "go.mod";
pub const DEFAULT_MAX_PROBLEMS: usize = 1_000;
const MAX_PROBLEMS_CEILING: usize = 100_000;
const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Settings for one frontend instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Language tag written onto every node
    pub language: String,

    /// Attach preceding/trailing comments to declarations
    pub attach_comments: bool,

    /// Lower `_test.go` files during project walks
    pub include_test_files: bool,

    /// Directory names skipped during project walks
    pub exclude_dirs: Vec<String>,

    /// Module manifest looked up at the project root
    pub manifest_file: String,

    /// Lower project files on the rayon pool
    pub parallel: bool,

    /// Problems kept per file; the rest are only counted
    pub max_problems_per_file: usize,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            attach_comments: true,
            include_test_files: false,
            exclude_dirs: vec![
                "vendor".to_string(),
                "testdata".to_string(),
                ".git".to_string(),
            ],
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            parallel: cfg!(feature = "parallel"),
            max_problems_per_file: DEFAULT_MAX_PROBLEMS,
        }
    }
}

impl FrontendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn attach_comments(mut self, enabled: bool) -> Self {
        self.attach_comments = enabled;
        self
    }

    pub fn include_test_files(mut self, enabled: bool) -> Self {
        self.include_test_files = enabled;
        self
    }

    pub fn exclude_dir(mut self, dir: impl Into<String>) -> Self {
        self.exclude_dirs.push(dir.into());
        self
    }

    pub fn manifest_file(mut self, name: impl Into<String>) -> Self {
        self.manifest_file = name.into();
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn max_problems_per_file(mut self, limit: usize) -> Self {
        self.max_problems_per_file = limit;
        self
    }

    /// Check ranges and required strings
    pub fn validate(&self) -> ConfigResult<()> {
        if self.language.trim().is_empty() {
            return Err(ConfigError::Empty("language".into()));
        }
        if self.manifest_file.trim().is_empty() {
            return Err(ConfigError::Empty("manifest_file".into()));
        }
        if self.max_problems_per_file == 0 || self.max_problems_per_file > MAX_PROBLEMS_CEILING {
            return Err(ConfigError::range_with_hint(
                "max_problems_per_file",
                self.max_problems_per_file,
                1,
                MAX_PROBLEMS_CEILING,
                "Problems past the limit are counted but not stored",
            ));
        }
        Ok(())
    }

    /// Whether a directory name is skipped during project walks
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }

    /// Load from a YAML v1 file and validate
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        // Version check
        if !SUPPORTED_VERSIONS.contains(&export.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: export.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::default();
        if let Some(language) = export.language {
            config.language = language;
        }
        if let Some(enabled) = export.attach_comments {
            config.attach_comments = enabled;
        }
        if let Some(enabled) = export.include_test_files {
            config.include_test_files = enabled;
        }
        if let Some(dirs) = export.exclude_dirs {
            config.exclude_dirs = dirs;
        }
        if let Some(name) = export.manifest_file {
            config.manifest_file = name;
        }
        if let Some(enabled) = export.parallel {
            config.parallel = enabled;
        }
        if let Some(limit) = export.max_problems_per_file {
            config.max_problems_per_file = limit;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: 1,
            language: Some(self.language.clone()),
            attach_comments: Some(self.attach_comments),
            include_test_files: Some(self.include_test_files),
            exclude_dirs: Some(self.exclude_dirs.clone()),
            manifest_file: Some(self.manifest_file.clone()),
            parallel: Some(self.parallel),
            max_problems_per_file: Some(self.max_problems_per_file),
        };
        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}
