//! Test data builders
//!
//! Builder for Go sources and a scope manager that records every
//! enter/leave so tests can check stack discipline.

use codegraph_go::{
    FrontendConfig, GoFrontend, LoweredFile, NodeId, Result, ScopeKind, ScopeManager,
    ScopeStack, Symbol, SymbolKind, SyntaxSource, TreeSitterGoParser,
};

/// Builder for a Go source file
#[derive(Debug, Default)]
pub struct GoSourceBuilder {
    package: String,
    imports: Vec<String>,
    decls: Vec<String>,
}

impl GoSourceBuilder {
    /// Create a new builder for `package`
    pub fn new(package: &str) -> Self {
        Self {
            package: package.to_string(),
            ..Self::default()
        }
    }

    pub fn with_import(mut self, path: &str) -> Self {
        self.imports.push(path.to_string());
        self
    }

    /// Add a top-level declaration verbatim
    pub fn with_decl(mut self, decl: &str) -> Self {
        self.decls.push(decl.to_string());
        self
    }

    /// Add `func name() { body }`
    pub fn with_func(self, name: &str, body: &str) -> Self {
        let decl = format!("func {name}() {{\n{body}\n}}");
        self.with_decl(&decl)
    }

    pub fn build(&self) -> String {
        let mut out = format!("package {}\n", self.package);
        if !self.imports.is_empty() {
            out.push_str("\nimport (\n");
            for import in &self.imports {
                out.push_str(&format!("\t\"{import}\"\n"));
            }
            out.push_str(")\n");
        }
        for decl in &self.decls {
            out.push('\n');
            out.push_str(decl);
            out.push('\n');
        }
        out
    }
}

/// One scope-stack transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeEvent {
    Reset(NodeId),
    Enter(NodeId, ScopeKind),
    Leave(NodeId),
}

/// [`ScopeStack`] wrapper logging every transition
#[derive(Default)]
pub struct RecordingScopeManager {
    inner: ScopeStack,
    pub events: Vec<ScopeEvent>,
}

impl RecordingScopeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every Leave matches the most recent unmatched Enter, and nothing is
    /// left open
    pub fn is_balanced(&self) -> bool {
        let mut open = Vec::new();
        for event in &self.events {
            match event {
                ScopeEvent::Reset(_) => open.clear(),
                ScopeEvent::Enter(node, _) => open.push(*node),
                ScopeEvent::Leave(node) => {
                    if open.pop() != Some(*node) {
                        return false;
                    }
                }
            }
        }
        open.is_empty()
    }

    pub fn count(&self, kind: ScopeKind) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ScopeEvent::Enter(_, k) if *k == kind))
            .count()
    }

    pub fn max_depth(&self) -> usize {
        let mut depth = 0usize;
        let mut max = 0;
        for event in &self.events {
            match event {
                ScopeEvent::Reset(_) => depth = 0,
                ScopeEvent::Enter(..) => {
                    depth += 1;
                    max = max.max(depth);
                }
                ScopeEvent::Leave(_) => depth = depth.saturating_sub(1),
            }
        }
        max
    }
}

impl ScopeManager for RecordingScopeManager {
    fn reset_to_global(&mut self, node: NodeId) {
        self.events.push(ScopeEvent::Reset(node));
        self.inner.reset_to_global(node);
    }

    fn enter_scope(&mut self, node: NodeId, kind: ScopeKind) {
        self.events.push(ScopeEvent::Enter(node, kind));
        self.inner.enter_scope(node, kind);
    }

    fn leave_scope(&mut self, node: NodeId) -> Result<()> {
        self.events.push(ScopeEvent::Leave(node));
        self.inner.leave_scope(node)
    }

    fn add_declaration(&mut self, name: &str, decl: NodeId, kind: SymbolKind) {
        self.inner.add_declaration(name, decl, kind);
    }

    fn add_declaration_to(
        &mut self,
        owner: NodeId,
        name: &str,
        decl: NodeId,
        kind: SymbolKind,
    ) -> bool {
        self.inner.add_declaration_to(owner, name, decl, kind)
    }

    fn resolve(&self, name: &str) -> Option<Symbol> {
        self.inner.resolve(name)
    }

    fn resolve_local(&self, name: &str) -> Option<Symbol> {
        self.inner.resolve_local(name)
    }

    fn resolve_in(&self, owner: NodeId, name: &str) -> Option<Symbol> {
        self.inner.resolve_in(owner, name)
    }

    fn resolve_from(&self, scope: NodeId, name: &str) -> Option<Symbol> {
        self.inner.resolve_from(scope, name)
    }

    fn current_scope(&self) -> Option<NodeId> {
        self.inner.current_scope()
    }

    fn current_block(&self) -> Option<NodeId> {
        self.inner.current_block()
    }

    fn current_function(&self) -> Option<NodeId> {
        self.inner.current_function()
    }

    fn current_record(&self) -> Option<NodeId> {
        self.inner.current_record()
    }

    fn depth(&self) -> usize {
        self.inner.depth()
    }
}

/// Default frontend, sequential so tests stay deterministic
pub fn frontend() -> GoFrontend {
    GoFrontend::new(FrontendConfig::default().parallel(false)).expect("default config is valid")
}

/// Lower `source`, panicking on contract violations
pub fn lower(source: &str) -> LoweredFile {
    frontend()
        .lower_source(source, "test.go")
        .unwrap_or_else(|e| panic!("lowering failed: {e}\n{source}"))
}

/// Lower `source` through a [`RecordingScopeManager`]
pub fn lower_recording(source: &str) -> (LoweredFile, RecordingScopeManager) {
    let parsed = TreeSitterGoParser::new()
        .parse(source, "test.go")
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    let mut scopes = RecordingScopeManager::new();
    let lowered = frontend()
        .lower_syntax(&parsed, source, "test.go", &mut scopes, None)
        .unwrap_or_else(|e| panic!("lowering failed: {e}\n{source}"));
    (lowered, scopes)
}
