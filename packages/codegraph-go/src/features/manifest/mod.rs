//! Module manifest lookup (namespace path qualification)

pub mod infrastructure;
pub mod ports;

pub use infrastructure::{parse_module_path, GoModReader};
pub use ports::ModuleManifestReader;
