mod go_mod;

pub use go_mod::{parse_module_path, GoModReader};
