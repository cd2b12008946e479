//! Error types for codegraph-go
//!
//! Only contract violations surface as errors. Unsupported syntax and
//! malformed source are recovered inside the lowering pass and reported as
//! [`crate::features::lowering::LoweringProblem`]s instead.

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::cpg::NodeId;

/// Main error type for codegraph-go operations
#[derive(Debug, Error)]
pub enum FrontendError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The syntax source could not produce a tree for the file
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    /// `leave_scope` was called for a construct that is not on top of the stack
    #[error("Scope mismatch: leaving {leaving:?} but top of stack is {top:?}")]
    ScopeMismatch { leaving: NodeId, top: Option<NodeId> },

    /// `leave_scope` was called with only the global scope left
    #[error("Scope underflow while leaving {0:?}")]
    ScopeUnderflow(NodeId),

    /// The scope stack was not back at global depth after a file pass
    #[error("Unbalanced scopes after lowering {file}: depth {depth}")]
    UnbalancedScopes { file: String, depth: usize },

    /// A collaborator (node factory, manifest reader) failed a required call
    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl FrontendError {
    /// Create a parse error
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        FrontendError::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a collaborator error
    pub fn collaborator(message: impl Into<String>) -> Self {
        FrontendError::Collaborator(message.into())
    }

    /// Whether this error aborts a single file's pass (as opposed to a
    /// setup problem such as a bad configuration)
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            FrontendError::ScopeMismatch { .. }
                | FrontendError::ScopeUnderflow(_)
                | FrontendError::UnbalancedScopes { .. }
                | FrontendError::Collaborator(_)
        )
    }
}

/// Result type alias for frontend operations
pub type Result<T> = std::result::Result<T, FrontendError>;
