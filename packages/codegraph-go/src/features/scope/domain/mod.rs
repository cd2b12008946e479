//! Scope domain models

use crate::features::cpg::NodeId;

/// What kind of construct opened a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// File-level scope, owned by the TranslationUnit
    Global,
    Namespace,
    /// Function, method or function literal
    Function,
    Record,
    /// Compound statements and scoped control flow (`if`, `for`, `switch`)
    Block,
}

/// What a registered name stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Imported package (Include)
    Package,
    Record,
    TypeAlias,
    TypeParameter,
    Function,
    Method,
    Field,
    Variable,
}

impl SymbolKind {
    /// Names a type rather than a value
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::Record | SymbolKind::TypeAlias | SymbolKind::TypeParameter
        )
    }
}

/// Resolution result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub node: NodeId,
    pub kind: SymbolKind,
}
