//! Module manifest port

use std::path::Path;

use crate::shared::models::Result;

/// Reads the module path declared at a project root
pub trait ModuleManifestReader: Send + Sync {
    /// `Ok(None)` when the project has no manifest
    fn read_module_path(&self, project_root: &Path) -> Result<Option<String>>;
}
