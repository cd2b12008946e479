//! Lowering infrastructure
//!
//! [`LoweringContext`] plus the handler families that extend it:
//! - `declarations` - file, imports, functions, methods, records, aliases
//! - `statements` - blocks, control flow, switch/select, assignment
//! - `expressions` - calls, members, operators, literals
//! - `types` - type syntax to the type algebra

pub mod builtins;
pub mod context;
pub mod declarations;
pub mod expressions;
pub mod literals;
pub mod statements;
pub mod types;

pub use context::LoweringContext;
pub use declarations::{Binding, DeclGroup};
pub use literals::decode_literal;
pub use types::function_type_name;
