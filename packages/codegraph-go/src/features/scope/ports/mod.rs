//! Scope manager port
//!
//! The lowering pass drives scopes through this trait and never owns the
//! implementation, so hosts can substitute their own (or wrap the default
//! one, as the scope-balance tests do).

use super::domain::{ScopeKind, Symbol, SymbolKind};
use crate::features::cpg::NodeId;
use crate::shared::models::Result;

/// Stack of lexical scopes for one file's pass
pub trait ScopeManager {
    /// Drop every scope and open a fresh global scope owned by `node`
    fn reset_to_global(&mut self, node: NodeId);

    /// Push a scope tied to `node`
    fn enter_scope(&mut self, node: NodeId, kind: ScopeKind);

    /// Pop the top scope, which must belong to `node`
    fn leave_scope(&mut self, node: NodeId) -> Result<()>;

    /// Register `name` in the innermost scope, shadowing outer declarations
    fn add_declaration(&mut self, name: &str, decl: NodeId, kind: SymbolKind);

    /// Register `name` in the (possibly already left) scope owned by `owner`.
    /// Returns `false` when `owner` never opened a scope.
    fn add_declaration_to(
        &mut self,
        owner: NodeId,
        name: &str,
        decl: NodeId,
        kind: SymbolKind,
    ) -> bool;

    /// Innermost visible declaration of `name`
    fn resolve(&self, name: &str) -> Option<Symbol>;

    /// Declaration of `name` in the innermost scope only
    fn resolve_local(&self, name: &str) -> Option<Symbol>;

    /// Look `name` up inside the scope owned by `owner` (a Record's members)
    fn resolve_in(&self, owner: NodeId, name: &str) -> Option<Symbol>;

    /// Resolve `name` starting at the scope owned by `scope` and walking
    /// outward through its lexical parents
    fn resolve_from(&self, scope: NodeId, name: &str) -> Option<Symbol>;

    /// Record named `name` reachable from `scope`; `None` when absent
    fn get_record_for_name(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        self.resolve_from(scope, name)
            .filter(|s| s.kind == SymbolKind::Record)
            .map(|s| s.node)
    }

    /// Owner of the innermost active scope
    fn current_scope(&self) -> Option<NodeId>;

    /// Nearest enclosing block-like scope owner
    fn current_block(&self) -> Option<NodeId>;

    /// Nearest enclosing function scope owner
    fn current_function(&self) -> Option<NodeId>;

    /// Nearest enclosing record scope owner
    fn current_record(&self) -> Option<NodeId>;

    /// Number of scopes above the global one
    fn depth(&self) -> usize;
}
