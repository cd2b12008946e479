//! Parsing Feature
//!
//! Turns Go source text into the surface syntax union consumed by lowering.
//!
//! ## Structure
//! - `domain/` - Surface syntax (`SourceFile`, `Decl`, `Stmt`, `Expr`)
//! - `ports/` - `SyntaxSource` trait
//! - `infrastructure/` - tree-sitter-go adapter

pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports
pub use domain::SourceFile;
pub use infrastructure::TreeSitterGoParser;
pub use ports::SyntaxSource;
