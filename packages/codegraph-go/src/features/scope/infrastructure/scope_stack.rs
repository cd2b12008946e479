//! Scope stack
//!
//! Tracks nested lexical scopes during lowering. Scopes live in an arena
//! and are never freed during a pass: leaving a scope only pops it from the
//! active stack, so a Record's member scope can still receive methods that
//! are declared after the record block closed.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::features::cpg::NodeId;
use crate::features::scope::domain::{ScopeKind, Symbol, SymbolKind};
use crate::features::scope::ports::ScopeManager;
use crate::shared::models::{FrontendError, Result};

#[derive(Debug, Clone)]
struct Scope {
    owner: NodeId,
    kind: ScopeKind,
    parent: Option<usize>,
    symbols: FxHashMap<String, Symbol>,
}

/// Default [`ScopeManager`]
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    active: Vec<usize>,
    by_owner: FxHashMap<NodeId, usize>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn top(&self) -> Option<&Scope> {
        self.active.last().map(|&i| &self.scopes[i])
    }

    fn nearest(&self, wanted: impl Fn(ScopeKind) -> bool) -> Option<NodeId> {
        self.active
            .iter()
            .rev()
            .map(|&i| &self.scopes[i])
            .find(|s| wanted(s.kind))
            .map(|s| s.owner)
    }

    fn lookup_from(&self, start: Option<usize>, name: &str) -> Option<Symbol> {
        let mut cursor = start;
        while let Some(i) = cursor {
            if let Some(symbol) = self.scopes[i].symbols.get(name) {
                return Some(*symbol);
            }
            cursor = self.scopes[i].parent;
        }
        None
    }

    /// Visible names, innermost first (debugging aid)
    pub fn visible_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = self.active.last().copied();
        while let Some(i) = cursor {
            names.extend(self.scopes[i].symbols.keys().cloned());
            cursor = self.scopes[i].parent;
        }
        names
    }
}

impl ScopeManager for ScopeStack {
    fn reset_to_global(&mut self, node: NodeId) {
        self.scopes.clear();
        self.active.clear();
        self.by_owner.clear();
        self.enter_scope(node, ScopeKind::Global);
    }

    fn enter_scope(&mut self, node: NodeId, kind: ScopeKind) {
        let index = self.scopes.len();
        self.scopes.push(Scope {
            owner: node,
            kind,
            parent: self.active.last().copied(),
            symbols: FxHashMap::default(),
        });
        self.active.push(index);
        self.by_owner.insert(node, index);
        trace!(owner = %node, ?kind, depth = self.active.len(), "enter scope");
    }

    fn leave_scope(&mut self, node: NodeId) -> Result<()> {
        match self.top().map(|s| (s.owner, s.kind)) {
            None | Some((_, ScopeKind::Global)) => Err(FrontendError::ScopeUnderflow(node)),
            Some((owner, _)) if owner != node => Err(FrontendError::ScopeMismatch {
                leaving: node,
                top: Some(owner),
            }),
            Some(_) => {
                self.active.pop();
                trace!(owner = %node, depth = self.active.len(), "leave scope");
                Ok(())
            }
        }
    }

    fn add_declaration(&mut self, name: &str, decl: NodeId, kind: SymbolKind) {
        if name.is_empty() || name == "_" {
            return;
        }
        if let Some(&i) = self.active.last() {
            self.scopes[i]
                .symbols
                .insert(name.to_string(), Symbol { node: decl, kind });
        }
    }

    fn add_declaration_to(
        &mut self,
        owner: NodeId,
        name: &str,
        decl: NodeId,
        kind: SymbolKind,
    ) -> bool {
        let Some(&i) = self.by_owner.get(&owner) else {
            return false;
        };
        if !name.is_empty() && name != "_" {
            self.scopes[i]
                .symbols
                .insert(name.to_string(), Symbol { node: decl, kind });
        }
        true
    }

    fn resolve(&self, name: &str) -> Option<Symbol> {
        self.lookup_from(self.active.last().copied(), name)
    }

    fn resolve_local(&self, name: &str) -> Option<Symbol> {
        self.top().and_then(|s| s.symbols.get(name)).copied()
    }

    fn resolve_in(&self, owner: NodeId, name: &str) -> Option<Symbol> {
        self.by_owner
            .get(&owner)
            .and_then(|&i| self.scopes[i].symbols.get(name))
            .copied()
    }

    fn resolve_from(&self, scope: NodeId, name: &str) -> Option<Symbol> {
        self.lookup_from(self.by_owner.get(&scope).copied(), name)
    }

    fn current_scope(&self) -> Option<NodeId> {
        self.top().map(|s| s.owner)
    }

    fn current_block(&self) -> Option<NodeId> {
        self.nearest(|k| k == ScopeKind::Block)
    }

    fn current_function(&self) -> Option<NodeId> {
        self.nearest(|k| k == ScopeKind::Function)
    }

    fn current_record(&self) -> Option<NodeId> {
        self.nearest(|k| k == ScopeKind::Record)
    }

    fn depth(&self) -> usize {
        self.active.len().saturating_sub(1)
    }
}
