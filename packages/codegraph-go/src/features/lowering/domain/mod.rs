//! Lowering domain models

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::features::cpg::{Graph, Node, NodeId};
use crate::shared::models::{FrontendError, Location};

/// Recoverable problem class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// Syntax shape the frontend has no lowering for
    Unsupported,
    /// Source that breaks a language invariant (e.g. name/value count mismatch)
    Malformed,
}

/// A recovered problem: the graph still holds a placeholder or partial binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweringProblem {
    pub kind: ProblemKind,
    pub message: String,
    pub location: Option<Location>,
}

impl fmt::Display for LoweringProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ProblemKind::Unsupported => "unsupported",
            ProblemKind::Malformed => "malformed",
        };
        match &self.location {
            Some(loc) => write!(f, "{}: {}: {}", loc, kind, self.message),
            None => write!(f, "{}: {}", kind, self.message),
        }
    }
}

/// File-local facts gathered before and during lowering
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    pub path: Arc<str>,
    /// Package clause name
    pub package: String,
    /// Module path + relative directory, or the package name; qualifier of
    /// top-level FQNs
    pub namespace_path: String,
    /// Local import name -> Include node
    pub imports: FxHashMap<String, NodeId>,
}

impl FileContext {
    pub fn new(path: impl Into<Arc<str>>, package: impl Into<String>) -> Self {
        let package = package.into();
        Self {
            path: path.into(),
            namespace_path: package.clone(),
            package,
            imports: FxHashMap::default(),
        }
    }

    pub fn with_namespace_path(mut self, path: impl Into<String>) -> Self {
        self.namespace_path = path.into();
        self
    }

    /// `namespace.name`
    pub fn qualify(&self, name: &str) -> String {
        if self.namespace_path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.namespace_path, name)
        }
    }

    pub fn import(&self, local_name: &str) -> Option<NodeId> {
        self.imports.get(local_name).copied()
    }
}

/// Result of one file's pass
#[derive(Debug, Clone)]
pub struct LoweredFile {
    pub path: Arc<str>,
    pub package: String,
    pub namespace_path: String,
    pub graph: Graph,
    /// TranslationUnit
    pub root: NodeId,
    pub namespace: NodeId,
    pub problems: Vec<LoweringProblem>,
    /// Problems counted past the configured limit
    pub suppressed_problems: usize,
}

impl LoweredFile {
    pub fn root_node(&self) -> &Node {
        &self.graph[self.root]
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.graph.get(id)
    }

    pub fn total_problems(&self) -> usize {
        self.problems.len() + self.suppressed_problems
    }
}

/// Result of a project walk: one entry per `.go` file that was lowered,
/// plus the files whose pass failed
#[derive(Debug, Default)]
pub struct ProjectLowering {
    /// `module` directive of the project manifest, if any
    pub module_path: Option<String>,
    pub files: Vec<LoweredFile>,
    pub failures: Vec<(String, FrontendError)>,
}

impl ProjectLowering {
    pub fn node_count(&self) -> usize {
        self.files.iter().map(|f| f.graph.len()).sum()
    }

    pub fn problem_count(&self) -> usize {
        self.files.iter().map(LoweredFile::total_problems).sum()
    }

    pub fn file(&self, path: &str) -> Option<&LoweredFile> {
        self.files.iter().find(|f| &*f.path == path)
    }
}
