//! Lowering context
//!
//! Everything a lowering handler needs is reachable from one explicitly
//! passed [`LoweringContext`]: the node factory (graph arena), the injected
//! scope manager, the file's import table and the configuration. Handlers
//! live in sibling modules as `impl LoweringContext` blocks.

use tracing::warn;

use crate::config::FrontendConfig;
use crate::features::cpg::{ExpressionKind, NodeFactory, NodeId, Type};
use crate::features::lowering::domain::{FileContext, LoweringProblem, ProblemKind};
use crate::features::scope::{ScopeKind, ScopeManager};
use crate::shared::models::{Location, Result, Span};

pub struct LoweringContext<'a> {
    pub factory: NodeFactory<'a>,
    pub scopes: &'a mut dyn ScopeManager,
    pub file: FileContext,
    pub config: &'a FrontendConfig,
    problems: Vec<LoweringProblem>,
    suppressed_problems: usize,
}

impl<'a> LoweringContext<'a> {
    pub fn new(
        factory: NodeFactory<'a>,
        scopes: &'a mut dyn ScopeManager,
        file: FileContext,
        config: &'a FrontendConfig,
    ) -> Self {
        Self {
            factory,
            scopes,
            file,
            config,
            problems: Vec::new(),
            suppressed_problems: 0,
        }
    }

    /// Record a recoverable problem and log it
    pub fn report(&mut self, kind: ProblemKind, message: impl Into<String>, span: Option<Span>) {
        let message = message.into();
        let location = span.map(|s| Location::new(self.file.path.clone(), s));
        match &location {
            Some(loc) => warn!(location = %loc, ?kind, "{}", message),
            None => warn!(file = %self.file.path, ?kind, "{}", message),
        }
        if self.problems.len() < self.config.max_problems_per_file {
            self.problems.push(LoweringProblem {
                kind,
                message,
                location,
            });
        } else {
            self.suppressed_problems += 1;
        }
    }

    /// Placeholder expression for syntax that could not be lowered. A
    /// zero-width span (a token the parser inserted) yields an implicit node.
    pub fn problem_expression(
        &mut self,
        kind: ProblemKind,
        message: impl Into<String>,
        span: Span,
    ) -> Result<NodeId> {
        let message = message.into();
        self.report(kind, message.clone(), Some(span));
        let problem = ExpressionKind::Problem { message };
        if span.is_empty() {
            self.factory.implicit_expression(Type::Unknown, problem, "")
        } else {
            self.factory.expression(Type::Unknown, problem, "", span)
        }
    }

    /// Run `body` inside a scope owned by `owner`; the scope is left even
    /// when `body` fails, and a failing leave wins over a failing body
    pub fn scoped<T>(
        &mut self,
        owner: NodeId,
        kind: ScopeKind,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.scopes.enter_scope(owner, kind);
        let result = body(self);
        self.scopes.leave_scope(owner)?;
        result
    }

    /// FQN for a declaration: package-qualified at top level, bare inside
    /// functions
    pub fn declaration_fqn(&self, name: &str) -> String {
        if self.scopes.current_function().is_some() {
            name.to_string()
        } else {
            self.file.qualify(name)
        }
    }

    /// Record named `name` visible from the current scope
    pub fn record_named(&self, name: &str) -> Option<NodeId> {
        self.scopes
            .current_scope()
            .and_then(|scope| self.scopes.get_record_for_name(scope, name))
    }

    pub fn into_parts(self) -> (NodeFactory<'a>, Vec<LoweringProblem>, usize) {
        (self.factory, self.problems, self.suppressed_problems)
    }

    pub fn problems(&self) -> &[LoweringProblem] {
        &self.problems
    }
}
