//! `go.mod` reader
//!
//! Only the `module` directive is read; requirements, replacements and
//! toolchain lines are left to the host.

use std::path::Path;

use tracing::debug;

use crate::config::DEFAULT_MANIFEST_FILE;
use crate::features::manifest::ports::ModuleManifestReader;
use crate::shared::models::Result;

#[derive(Debug, Clone)]
pub struct GoModReader {
    file_name: String,
}

impl Default for GoModReader {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_FILE)
    }
}

impl GoModReader {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl ModuleManifestReader for GoModReader {
    fn read_module_path(&self, project_root: &Path) -> Result<Option<String>> {
        let path = project_root.join(&self.file_name);
        if !path.is_file() {
            debug!(path = %path.display(), "no module manifest");
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(parse_module_path(&content))
    }
}

/// Extract the `module` directive from manifest text
pub fn parse_module_path(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = match line.find("//") {
            Some(i) => &line[..i],
            None => line,
        };
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(|c: char| c.is_whitespace() || c == '"' || c == '`') {
            return None;
        }
        let path = rest.trim().trim_matches(|c| c == '"' || c == '`');
        (!path.is_empty()).then(|| path.to_string())
    })
}
