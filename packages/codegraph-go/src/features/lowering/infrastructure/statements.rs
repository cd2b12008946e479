//! Statement lowering

use tracing::debug;

use crate::features::cpg::{
    ExpressionKind, NodeId, NodeKind, Statement, SwitchKind, Type,
};
use crate::features::lowering::domain::ProblemKind;
use crate::features::parsing::domain::{
    Block, BranchKind, Expr, Ident, Stmt, StmtKind,
};
use crate::features::scope::ScopeKind;
use crate::shared::models::{Result, Span};

use super::context::LoweringContext;

/// Byte length of the `default` keyword
const DEFAULT_KEYWORD_LEN: usize = "default".len();

impl LoweringContext<'_> {
    /// Compound with its own Block scope
    pub fn lower_block(&mut self, block: &Block) -> Result<NodeId> {
        self.lower_statement_list(&block.stmts, block.span)
    }

    fn lower_statement_list(&mut self, stmts: &[Stmt], span: Span) -> Result<NodeId> {
        let id = self.factory.statement(
            Statement::Compound {
                statements: Vec::new(),
            },
            span,
        )?;
        let statements = self.scoped(id, ScopeKind::Block, |ctx| {
            let mut statements = Vec::with_capacity(stmts.len());
            for stmt in stmts {
                statements.push(ctx.lower_stmt(stmt)?);
            }
            Ok(statements)
        })?;
        self.set_statement(id, Statement::Compound { statements })?;
        Ok(id)
    }

    pub fn lower_stmt(&mut self, stmt: &Stmt) -> Result<NodeId> {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.lower_expr(expr),
            StmtKind::Decl(decl) => {
                let group = self.lower_gen_decl(decl)?;
                self.factory.statement(
                    Statement::Declaration {
                        declarations: group.declarations,
                        tuple_initializer: group.tuple_initializer,
                        assignments: Vec::new(),
                    },
                    stmt.span,
                )
            }
            StmtKind::Assign { lhs, op, rhs } if op == ":=" => {
                self.lower_define(stmt.span, lhs, rhs)
            }
            StmtKind::Assign { lhs, op, rhs } => self.lower_assign(stmt.span, lhs, op, rhs),
            StmtKind::Return(values) => {
                let values = self.lower_exprs(values)?;
                self.factory.statement(Statement::Return { values }, stmt.span)
            }
            StmtKind::Block(block) => self.lower_block(block),
            StmtKind::If {
                init,
                cond,
                then,
                els,
            } => self.lower_if(stmt.span, init.as_deref(), cond, then, els.as_deref()),
            StmtKind::Switch {
                init,
                tag,
                clauses,
                body_span,
            } => self.lower_switch(stmt.span, init.as_deref(), tag.as_ref(), clauses, *body_span),
            StmtKind::TypeSwitch {
                init,
                binding,
                subject,
                clauses,
                body_span,
            } => self.lower_type_switch(
                stmt.span,
                init.as_deref(),
                binding.as_ref(),
                subject,
                clauses,
                *body_span,
            ),
            StmtKind::Select { clauses, body_span } => {
                self.lower_select(stmt.span, clauses, *body_span)
            }
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => self.lower_for(stmt.span, init.as_deref(), cond.as_ref(), post.as_deref(), body),
            StmtKind::Range {
                key,
                value,
                define,
                x,
                body,
            } => self.lower_range(stmt.span, key.as_ref(), value.as_ref(), *define, x, body),
            StmtKind::Labeled { label, stmt: inner } => {
                let sub_statement = Some(self.lower_stmt(inner)?);
                let id = self.factory.statement(
                    Statement::Label {
                        label: label.name.clone(),
                        sub_statement,
                    },
                    stmt.span,
                )?;
                self.factory.node_mut(id)?.name = label.name.clone();
                Ok(id)
            }
            StmtKind::Branch { kind, label } => {
                let label = label.as_ref().map(|l| l.name.clone());
                let branch = match (kind, label) {
                    (BranchKind::Break, label) => Statement::Break { label },
                    (BranchKind::Continue, label) => Statement::Continue { label },
                    (BranchKind::Goto, Some(label)) => Statement::Goto { label },
                    (BranchKind::Goto, None) => {
                        return self.problem_expression(
                            ProblemKind::Malformed,
                            "goto without a label",
                            stmt.span,
                        )
                    }
                    (BranchKind::Fallthrough, _) => Statement::Fallthrough,
                };
                self.factory.statement(branch, stmt.span)
            }
            StmtKind::Go(call) => self.lower_wrapped_call("go", call, stmt.span),
            StmtKind::Defer(call) => self.lower_wrapped_call("defer", call, stmt.span),
            StmtKind::Send { chan, value } => {
                let lhs = self.lower_expr(chan)?;
                let rhs = self.lower_expr(value)?;
                let ty = self.factory.type_of(lhs);
                self.factory.expression(
                    ty,
                    ExpressionKind::Binary {
                        operator: "<-".to_string(),
                        lhs,
                        rhs,
                    },
                    "<-",
                    stmt.span,
                )
            }
            StmtKind::IncDec { x, inc } => {
                let operand = self.lower_expr(x)?;
                let ty = self.factory.type_of(operand);
                let operator = if *inc { "++" } else { "--" };
                self.factory.expression(
                    ty,
                    ExpressionKind::Unary {
                        operator: operator.to_string(),
                        operand,
                        postfix: true,
                    },
                    operator,
                    stmt.span,
                )
            }
            StmtKind::Empty => self.factory.statement(Statement::Empty, stmt.span),
            StmtKind::CaseClause { .. } | StmtKind::CommClause { .. } => self.problem_expression(
                ProblemKind::Malformed,
                "case clause outside of a switch body",
                stmt.span,
            ),
            StmtKind::Bad if stmt.span.is_empty() => self.problem_expression(
                ProblemKind::Malformed,
                "missing statement",
                stmt.span,
            ),
            StmtKind::Bad => self.problem_expression(
                ProblemKind::Unsupported,
                format!("unsupported statement `{}`", stmt.span.text(self.factory.source())),
                stmt.span,
            ),
        }
    }

    fn set_statement(&mut self, id: NodeId, stmt: Statement) -> Result<()> {
        self.factory.set_kind(id, NodeKind::Statement(stmt))
    }

    fn lower_optional_stmt(&mut self, stmt: Option<&Stmt>) -> Result<Option<NodeId>> {
        stmt.map(|s| self.lower_stmt(s)).transpose()
    }

    /// `go f()` / `defer f()`
    fn lower_wrapped_call(&mut self, operator: &str, call: &Expr, span: Span) -> Result<NodeId> {
        let operand = self.lower_expr(call)?;
        self.factory.expression(
            Type::Unknown,
            ExpressionKind::Unary {
                operator: operator.to_string(),
                operand,
                postfix: false,
            },
            operator,
            span,
        )
    }

    // ------------------------------------------------------------------
    // Assignment
    // ------------------------------------------------------------------

    fn lower_assign(&mut self, span: Span, lhs: &[Expr], op: &str, rhs: &[Expr]) -> Result<NodeId> {
        let lhs_ids = self.lower_exprs(lhs)?;
        let rhs_ids = self.lower_exprs(rhs)?;
        let ty = lhs_ids
            .first()
            .map(|id| self.factory.type_of(*id))
            .unwrap_or_default();
        self.factory.expression(
            ty,
            ExpressionKind::Assign {
                operator: op.to_string(),
                lhs: lhs_ids,
                rhs: rhs_ids,
            },
            op,
            span,
        )
    }

    /// `a, b := x, y`: a DeclarationStatement when at least one name is new
    /// in the innermost scope, otherwise a plain `:=` assignment. Reused
    /// names keep their write as an implicit `=` Assign on the statement.
    fn lower_define(&mut self, span: Span, lhs: &[Expr], rhs: &[Expr]) -> Result<NodeId> {
        let any_new = lhs
            .iter()
            .filter_map(|e| e.as_ident())
            .any(|name| self.is_new_name(name));
        if !any_new {
            return self.lower_assign(span, lhs, ":=", rhs);
        }

        let values = self.lower_exprs(rhs)?;
        let binding = self.bind_initializers(lhs.len(), values, span);
        let tuple_types = binding
            .tuple
            .map(|t| self.tuple_element_types(t))
            .unwrap_or_default();

        let mut declarations = Vec::new();
        let mut assignments = Vec::new();
        for (i, target) in lhs.iter().enumerate() {
            let initializer = binding.initializers.get(i).copied().flatten();
            let Some(name) = target.as_ident() else {
                self.report(
                    ProblemKind::Malformed,
                    "non-identifier on the left of `:=`",
                    Some(target.span),
                );
                continue;
            };
            if name != "_" && !self.is_new_name(name) {
                debug!(name, "reused name in short variable declaration");
                assignments.push(self.reassign(target, initializer)?);
                continue;
            }
            let ty = initializer
                .map(|init| self.factory.type_of(init))
                .or_else(|| tuple_types.get(i).cloned())
                .unwrap_or_default();
            let ident = Ident::new(name, target.span);
            declarations.push(self.declare_variable(&ident, ty, initializer, target.span)?);
        }

        self.factory.statement(
            Statement::Declaration {
                declarations,
                tuple_initializer: binding.tuple,
                assignments,
            },
            span,
        )
    }

    /// `name = value` for a name a mixed `:=` reuses; `value` is absent when
    /// the statement binds a tuple
    fn reassign(&mut self, target: &Expr, value: Option<NodeId>) -> Result<NodeId> {
        let reference = self.lower_expr(target)?;
        let ty = self.factory.type_of(reference);
        self.factory.implicit_expression(
            ty,
            ExpressionKind::Assign {
                operator: "=".to_string(),
                lhs: vec![reference],
                rhs: value.into_iter().collect(),
            },
            "=",
        )
    }

    /// Not blank and not yet declared in the innermost scope
    fn is_new_name(&self, name: &str) -> bool {
        name != "_" && self.scopes.resolve_local(name).is_none()
    }

    // ------------------------------------------------------------------
    // Control flow
    // ------------------------------------------------------------------

    fn lower_if(
        &mut self,
        span: Span,
        init: Option<&Stmt>,
        cond: &Expr,
        then: &Block,
        els: Option<&Stmt>,
    ) -> Result<NodeId> {
        let id = self.factory.statement(
            Statement::If {
                initializer: None,
                condition: None,
                then_branch: None,
                else_branch: None,
            },
            span,
        )?;
        let stmt = self.scoped(id, ScopeKind::Block, |ctx| {
            let initializer = ctx.lower_optional_stmt(init)?;
            let condition = Some(ctx.lower_expr(cond)?);
            let then_branch = Some(ctx.lower_block(then)?);
            let else_branch = ctx.lower_optional_stmt(els)?;
            Ok(Statement::If {
                initializer,
                condition,
                then_branch,
                else_branch,
            })
        })?;
        self.set_statement(id, stmt)?;
        Ok(id)
    }

    fn lower_for(
        &mut self,
        span: Span,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        post: Option<&Stmt>,
        body: &Block,
    ) -> Result<NodeId> {
        let id = self.factory.statement(
            Statement::For {
                initializer: None,
                condition: None,
                iteration: None,
                body: None,
            },
            span,
        )?;
        let stmt = self.scoped(id, ScopeKind::Block, |ctx| {
            let initializer = ctx.lower_optional_stmt(init)?;
            let condition = cond.map(|c| ctx.lower_expr(c)).transpose()?;
            let iteration = ctx.lower_optional_stmt(post)?;
            let body = Some(ctx.lower_block(body)?);
            Ok(Statement::For {
                initializer,
                condition,
                iteration,
                body,
            })
        })?;
        self.set_statement(id, stmt)?;
        Ok(id)
    }

    /// `for k, v := range x`; only the defining form declares variables
    fn lower_range(
        &mut self,
        span: Span,
        key: Option<&Expr>,
        value: Option<&Expr>,
        define: bool,
        x: &Expr,
        body: &Block,
    ) -> Result<NodeId> {
        let id = self.factory.statement(
            Statement::ForEach {
                variable: None,
                iterable: None,
                body: None,
            },
            span,
        )?;
        let stmt = self.scoped(id, ScopeKind::Block, |ctx| {
            let iterable = ctx.lower_expr(x)?;
            let (key_ty, value_ty) = range_types(&ctx.factory.type_of(iterable));

            let variable = if define {
                ctx.declare_range_variables(key, value, key_ty, value_ty)?
            } else {
                if key.is_some() || value.is_some() {
                    debug!(file = %ctx.file.path, "range over existing variables");
                }
                None
            };
            let body = Some(ctx.lower_block(body)?);
            Ok(Statement::ForEach {
                variable,
                iterable: Some(iterable),
                body,
            })
        })?;
        self.set_statement(id, stmt)?;
        Ok(id)
    }

    fn declare_range_variables(
        &mut self,
        key: Option<&Expr>,
        value: Option<&Expr>,
        key_ty: Type,
        value_ty: Type,
    ) -> Result<Option<NodeId>> {
        let targets: Vec<(&Expr, Type)> = [(key, key_ty), (value, value_ty)]
            .into_iter()
            .filter_map(|(expr, ty)| expr.map(|e| (e, ty)))
            .collect();
        let Some(span) = targets
            .iter()
            .map(|(e, _)| e.span)
            .reduce(|a, b| a.to(&b))
        else {
            return Ok(None);
        };

        let mut declarations = Vec::new();
        for (expr, ty) in targets {
            match expr.as_ident() {
                Some("_") => {}
                Some(name) => {
                    let ident = Ident::new(name, expr.span);
                    declarations.push(self.declare_variable(&ident, ty, None, expr.span)?);
                }
                None => self.report(
                    ProblemKind::Malformed,
                    "non-identifier range variable",
                    Some(expr.span),
                ),
            }
        }
        let stmt = self.factory.statement(
            Statement::Declaration {
                declarations,
                tuple_initializer: None,
                assignments: Vec::new(),
            },
            span,
        )?;
        Ok(Some(stmt))
    }

    // ------------------------------------------------------------------
    // Switch / type switch / select
    // ------------------------------------------------------------------

    fn lower_switch(
        &mut self,
        span: Span,
        init: Option<&Stmt>,
        tag: Option<&Expr>,
        clauses: &[Stmt],
        body_span: Span,
    ) -> Result<NodeId> {
        let id = self.new_switch(SwitchKind::Expression, span)?;
        let stmt = self.scoped(id, ScopeKind::Block, |ctx| {
            let initializer = ctx.lower_optional_stmt(init)?;
            let selector = tag.map(|t| ctx.lower_expr(t)).transpose()?;
            let body = Some(ctx.lower_switch_body(clauses, body_span, false)?);
            Ok(Statement::Switch {
                kind: SwitchKind::Expression,
                initializer,
                selector,
                binding: None,
                body,
            })
        })?;
        self.set_statement(id, stmt)?;
        Ok(id)
    }

    /// The binding `v` of `switch v := x.(type)` is declared once, typed
    /// as the subject, and visible in every clause
    fn lower_type_switch(
        &mut self,
        span: Span,
        init: Option<&Stmt>,
        binding: Option<&Ident>,
        subject: &Expr,
        clauses: &[Stmt],
        body_span: Span,
    ) -> Result<NodeId> {
        let id = self.new_switch(SwitchKind::Type, span)?;
        let stmt = self.scoped(id, ScopeKind::Block, |ctx| {
            let initializer = ctx.lower_optional_stmt(init)?;
            let selector = ctx.lower_expr(subject)?;
            let bound = match binding.filter(|b| !b.is_blank()) {
                Some(name) => {
                    let ty = ctx.factory.type_of(selector);
                    Some(ctx.declare_variable(name, ty, None, name.span)?)
                }
                None => None,
            };
            let body = Some(ctx.lower_switch_body(clauses, body_span, true)?);
            Ok(Statement::Switch {
                kind: SwitchKind::Type,
                initializer,
                selector: Some(selector),
                binding: bound,
                body,
            })
        })?;
        self.set_statement(id, stmt)?;
        Ok(id)
    }

    fn lower_select(&mut self, span: Span, clauses: &[Stmt], body_span: Span) -> Result<NodeId> {
        let id = self.new_switch(SwitchKind::Select, span)?;
        let stmt = self.scoped(id, ScopeKind::Block, |ctx| {
            let body = Some(ctx.lower_switch_body(clauses, body_span, false)?);
            Ok(Statement::Switch {
                kind: SwitchKind::Select,
                initializer: None,
                selector: None,
                binding: None,
                body,
            })
        })?;
        self.set_statement(id, stmt)?;
        Ok(id)
    }

    fn new_switch(&mut self, kind: SwitchKind, span: Span) -> Result<NodeId> {
        self.factory.statement(
            Statement::Switch {
                kind,
                initializer: None,
                selector: None,
                binding: None,
                body: None,
            },
            span,
        )
    }

    /// Flatten clauses into one Compound: a Case/Default marker followed
    /// by that clause's statements. `type_cases` lowers case lists as types.
    fn lower_switch_body(
        &mut self,
        clauses: &[Stmt],
        body_span: Span,
        type_cases: bool,
    ) -> Result<NodeId> {
        let id = self.factory.statement(
            Statement::Compound {
                statements: Vec::new(),
            },
            body_span,
        )?;
        let statements = self.scoped(id, ScopeKind::Block, |ctx| {
            let mut statements = Vec::new();
            for clause in clauses {
                match &clause.kind {
                    StmtKind::CaseClause {
                        list,
                        is_default,
                        body,
                    } => {
                        statements.push(ctx.lower_case_marker(
                            clause.span,
                            list,
                            *is_default,
                            type_cases,
                        )?);
                        for stmt in body {
                            statements.push(ctx.lower_stmt(stmt)?);
                        }
                    }
                    StmtKind::CommClause { comm, body } => {
                        let marker = match comm {
                            Some(comm) => {
                                let expression = ctx.lower_stmt(comm)?;
                                ctx.case_statement(clause.span, comm.span.end_byte, vec![expression])?
                            }
                            None => ctx.default_statement(clause.span)?,
                        };
                        statements.push(marker);
                        for stmt in body {
                            statements.push(ctx.lower_stmt(stmt)?);
                        }
                    }
                    _ => statements.push(ctx.problem_expression(
                        ProblemKind::Malformed,
                        "switch body entry is not a clause",
                        clause.span,
                    )?),
                }
            }
            Ok(statements)
        })?;
        self.set_statement(id, Statement::Compound { statements })?;
        Ok(id)
    }

    fn lower_case_marker(
        &mut self,
        clause_span: Span,
        list: &[Expr],
        is_default: bool,
        as_types: bool,
    ) -> Result<NodeId> {
        if is_default {
            return self.default_statement(clause_span);
        }
        let mut expressions = Vec::with_capacity(list.len());
        for expr in list {
            let id = if as_types {
                self.lower_type_expression(expr)?
            } else {
                self.lower_expr(expr)?
            };
            expressions.push(id);
        }
        let end = list
            .last()
            .map(|e| e.span.end_byte)
            .unwrap_or(clause_span.end_byte);
        self.case_statement(clause_span, end, expressions)
    }

    /// Case header: from the clause start to the end of its last expression
    fn case_statement(
        &mut self,
        clause_span: Span,
        end_byte: usize,
        expressions: Vec<NodeId>,
    ) -> Result<NodeId> {
        let header = self.header_span(clause_span, end_byte);
        self.factory.statement(Statement::Case { expressions }, header)
    }

    /// `default` keyword span
    fn default_statement(&mut self, clause_span: Span) -> Result<NodeId> {
        let end = (clause_span.start_byte + DEFAULT_KEYWORD_LEN).min(clause_span.end_byte);
        let header = self.header_span(clause_span, end);
        self.factory.statement(Statement::Default, header)
    }

    /// Clause span cut at `end_byte`; end position derived from the source
    fn header_span(&self, clause_span: Span, end_byte: usize) -> Span {
        let source = self.factory.source();
        let end_byte = end_byte.clamp(clause_span.start_byte, source.len());
        let prefix = source.get(..end_byte).unwrap_or_default();
        let end_line = prefix.matches('\n').count() as u32 + 1;
        let end_col = match prefix.rfind('\n') {
            Some(newline) => end_byte - newline - 1,
            None => end_byte,
        } as u32;
        Span::new(
            clause_span.start_line,
            clause_span.start_col,
            end_line,
            end_col,
            clause_span.start_byte,
            end_byte,
        )
    }
}

/// Key and element types of a range iterable
fn range_types(iterable: &Type) -> (Type, Type) {
    let int = Type::primitive("int");
    match iterable {
        Type::Pointer { element, .. } if iterable.is_array() => (int, (**element).clone()),
        // *[N]T ranges like the array
        Type::Pointer { element, .. } if element.is_array() => range_types(element),
        Type::Object { name, generics } if name == "map" && generics.len() == 2 => {
            (generics[0].clone(), generics[1].clone())
        }
        Type::Object { name, generics } if name == "chan" && generics.len() == 1 => {
            (generics[0].clone(), Type::Unknown)
        }
        Type::Primitive(name) if name == "string" => (int, Type::primitive("rune")),
        Type::Primitive(name) if is_integer(name) => (iterable.clone(), Type::Unknown),
        _ => (Type::Unknown, Type::Unknown),
    }
}

fn is_integer(name: &str) -> bool {
    matches!(
        name,
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
            | "uint64" | "uintptr" | "byte" | "rune"
    )
}
