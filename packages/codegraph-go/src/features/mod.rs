//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure business logic (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - External dependency implementations

/// Surface syntax and the tree-sitter adapter
pub mod parsing;

/// Graph model: node categories, type algebra, arena, node factory
pub mod cpg;

/// Lexical scopes and name resolution
pub mod scope;

/// Module manifest (`go.mod`) lookup
pub mod manifest;

/// Go → CPG lowering pass
pub mod lowering;
