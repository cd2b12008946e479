/*
 * Codegraph Go - Go frontend for the code property graph
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span, Location, errors)
 * - features/    : Vertical slices (parsing → scope → cpg → lowering)
 * - config/      : Frontend configuration (YAML v1)
 *
 * Performance:
 * - One independent pass per file (own scopes, own graph arena)
 * - Rayon work-stealing across project files
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Lowering handlers thread spans and sub-trees
#![allow(clippy::type_complexity)] // Complex types are necessary for analysis
#![allow(clippy::collapsible_if)] // Readability over brevity
#![allow(clippy::derivable_impls)] // Manual impl for documentation
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::single_match)] // Single match for readability
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (parsing, scopes, graph model, lowering)
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, FrontendConfig};
pub use errors::{FrontendError, Result};
pub use features::cpg::{
    Declaration, Expression, ExpressionKind, Graph, LiteralValue, Node, NodeId, NodeKind,
    RecordKind, Statement, SwitchKind, Type,
};
pub use features::lowering::{
    GoFrontend, LoweredFile, LoweringProblem, ProblemKind, ProjectLowering,
};
pub use features::manifest::{GoModReader, ModuleManifestReader};
pub use features::parsing::{SourceFile, SyntaxSource, TreeSitterGoParser};
pub use features::scope::{ScopeKind, ScopeManager, ScopeStack, Symbol, SymbolKind};
pub use shared::models::{Location, Span};

/// Parse and lower one in-memory Go file with the default configuration
pub fn lower_go_source(source: &str, path: &str) -> Result<LoweredFile> {
    GoFrontend::new(FrontendConfig::default())?.lower_source(source, path)
}
