//! Parsing infrastructure - external dependencies

pub mod tree_sitter_go;

pub use tree_sitter_go::{node_span, GoTreeConverter, TreeSitterGoParser};
