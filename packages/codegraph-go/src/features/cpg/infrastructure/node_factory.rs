//! Node factory
//!
//! Every graph node is created here so that provenance is attached the
//! same way everywhere: code text is the source slice of the node's span,
//! the location is file + span, and the language tag is always set.
//! Synthetic nodes get no location and are flagged `implicit`.

use std::sync::Arc;

use crate::features::cpg::domain::{
    Declaration, Expression, ExpressionKind, Graph, Node, NodeId, NodeKind, Statement, Type,
};
use crate::features::parsing::domain::Comment;
use crate::shared::models::{FrontendError, Location, Result, Span};

pub struct NodeFactory<'src> {
    graph: Graph,
    source: &'src str,
    file: Arc<str>,
    language: Arc<str>,
    /// Sorted by start offset
    comments: Vec<Comment>,
    attach_comments: bool,
}

impl<'src> NodeFactory<'src> {
    pub fn new(
        source: &'src str,
        file: impl Into<Arc<str>>,
        language: impl Into<Arc<str>>,
        mut comments: Vec<Comment>,
        attach_comments: bool,
    ) -> Self {
        comments.sort_by_key(|c| c.span.start_byte);
        Self {
            graph: Graph::new(),
            source,
            file: file.into(),
            language: language.into(),
            comments,
            attach_comments,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn file(&self) -> &Arc<str> {
        &self.file
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Hand the arena over; nothing is created after this
    pub fn finish(self) -> Graph {
        self.graph
    }

    /// Create a node; `span: None` marks it synthetic
    pub fn create(
        &mut self,
        kind: NodeKind,
        name: impl Into<String>,
        fqn: impl Into<String>,
        span: Option<Span>,
    ) -> Result<NodeId> {
        let id = self
            .graph
            .next_id()
            .ok_or_else(|| FrontendError::collaborator("graph arena is full"))?;
        let (code, location) = match span {
            Some(span) => (
                span.text(self.source).to_string(),
                Some(Location::new(self.file.clone(), span)),
            ),
            None => (String::new(), None),
        };
        Ok(self.graph.push(Node {
            id,
            name: name.into(),
            fqn: fqn.into(),
            code,
            location,
            comment: None,
            language: self.language.clone(),
            implicit: span.is_none(),
            kind,
        }))
    }

    /// Positioned declaration, with its doc comment attached
    pub fn declaration(
        &mut self,
        decl: Declaration,
        name: impl Into<String>,
        fqn: impl Into<String>,
        span: Span,
    ) -> Result<NodeId> {
        let id = self.create(NodeKind::Declaration(decl), name, fqn, Some(span))?;
        if self.attach_comments {
            let comment = self.comment_for(span);
            self.node_mut(id)?.comment = comment;
        }
        Ok(id)
    }

    pub fn statement(&mut self, stmt: Statement, span: Span) -> Result<NodeId> {
        self.create(NodeKind::Statement(stmt), "", "", Some(span))
    }

    pub fn implicit_statement(&mut self, stmt: Statement) -> Result<NodeId> {
        self.create(NodeKind::Statement(stmt), "", "", None)
    }

    pub fn expression(
        &mut self,
        ty: Type,
        kind: ExpressionKind,
        name: impl Into<String>,
        span: Span,
    ) -> Result<NodeId> {
        let name = name.into();
        let fqn = name.clone();
        self.create(
            NodeKind::Expression(Expression { ty, kind }),
            name,
            fqn,
            Some(span),
        )
    }

    pub fn implicit_expression(
        &mut self,
        ty: Type,
        kind: ExpressionKind,
        name: impl Into<String>,
    ) -> Result<NodeId> {
        self.create(NodeKind::Expression(Expression { ty, kind }), name, "", None)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.graph
            .get(id)
            .ok_or_else(|| FrontendError::collaborator(format!("unknown node {}", id)))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.graph
            .get_mut(id)
            .ok_or_else(|| FrontendError::collaborator(format!("unknown node {}", id)))
    }

    /// Type of an expression or typed declaration, `Unknown` otherwise
    pub fn type_of(&self, id: NodeId) -> Type {
        self.graph
            .get(id)
            .and_then(|n| n.ty())
            .cloned()
            .unwrap_or(Type::Unknown)
    }

    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) -> Result<()> {
        self.node_mut(id)?.kind = kind;
        Ok(())
    }

    pub fn declaration_mut(&mut self, id: NodeId) -> Result<&mut Declaration> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Declaration(d) => Ok(d),
            _ => Err(FrontendError::collaborator(format!(
                "node {} is not a declaration",
                id
            ))),
        }
    }

    /// Comment block ending on the line above `span`, else a trailing
    /// comment on its last line
    pub fn comment_for(&self, span: Span) -> Option<String> {
        let mut block: Vec<&Comment> = Vec::new();
        let mut next_line = span.start_line;
        for comment in self
            .comments
            .iter()
            .rev()
            .filter(|c| c.span.end_byte <= span.start_byte)
        {
            if comment.span.end_line + 1 != next_line || !self.starts_line(comment) {
                break;
            }
            next_line = comment.span.start_line;
            block.push(comment);
        }
        if !block.is_empty() {
            block.reverse();
            return Some(join_comment_text(&block));
        }

        self.comments
            .iter()
            .find(|c| {
                c.span.start_line == span.end_line
                    && c.span.start_byte >= span.end_byte
                    && self
                        .source
                        .get(span.end_byte..c.span.start_byte)
                        .is_some_and(|gap| gap.trim().is_empty() || gap.trim() == ",")
            })
            .map(|c| join_comment_text(&[c]))
    }

    /// Nothing but whitespace precedes the comment on its line
    fn starts_line(&self, comment: &Comment) -> bool {
        let before = &self.source[..comment.span.start_byte.min(self.source.len())];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        before[line_start..].trim().is_empty()
    }
}

/// Strip comment markers and join lines
fn join_comment_text(comments: &[&Comment]) -> String {
    comments
        .iter()
        .flat_map(|c| strip_markers(&c.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_markers(text: &str) -> Vec<String> {
    if let Some(line) = text.strip_prefix("//") {
        return vec![line.trim().to_string()];
    }
    let inner = text
        .strip_prefix("/*")
        .and_then(|t| t.strip_suffix("*/"))
        .unwrap_or(text);
    inner
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}
