//! Go → CPG lowering
//!
//! One recursive pass per file turns the surface syntax into graph nodes,
//! resolving names through the injected scope manager as it goes.
//!
//! ## Structure
//! - `domain/` - `FileContext`, `LoweredFile`, `ProjectLowering`, problems
//! - `infrastructure/` - `LoweringContext` and its handler families
//! - `application/` - `GoFrontend` (file and project entry points)

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export application layer
pub use application::GoFrontend;

pub use domain::{FileContext, LoweredFile, LoweringProblem, ProblemKind, ProjectLowering};
pub use infrastructure::LoweringContext;
