//! Scope infrastructure

mod scope_stack;

pub use scope_stack::ScopeStack;
