//! CPG domain models

mod graph;
mod node;
mod types;

pub use graph::Graph;
pub use node::{
    Declaration, Expression, ExpressionKind, FunctionData, LiteralValue, Node, NodeId, NodeKind,
    RecordKind, Statement, SwitchKind,
};
pub use types::{PointerOrigin, Type};
