//! Code property graph model
//!
//! ## Structure
//! - `domain/` - `Node`, `NodeKind` categories, `Type` algebra, `Graph` arena
//! - `infrastructure/` - `NodeFactory` (provenance attachment)

pub mod domain;
pub mod infrastructure;

// Re-exports
pub use domain::{
    Declaration, Expression, ExpressionKind, FunctionData, Graph, LiteralValue, Node, NodeId,
    NodeKind, PointerOrigin, RecordKind, Statement, SwitchKind, Type,
};
pub use infrastructure::NodeFactory;
