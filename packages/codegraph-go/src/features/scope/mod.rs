//! Lexical scopes
//!
//! ## Structure
//! - `domain/` - `ScopeKind`, `SymbolKind`, `Symbol`
//! - `ports/` - `ScopeManager` contract consumed by lowering
//! - `infrastructure/` - `ScopeStack`, the default implementation

pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports
pub use domain::{ScopeKind, Symbol, SymbolKind};
pub use infrastructure::ScopeStack;
pub use ports::ScopeManager;
