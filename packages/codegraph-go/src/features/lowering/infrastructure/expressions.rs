//! Expression lowering
//!
//! Calls are the interesting part: the same `F(x)` shape may be a function
//! call, a method call, a conversion (`T(x)`, `[]byte(s)`), an allocation
//! (`new`, `make`) or a generic instantiation (`F[int](x)`), and the
//! choice is made from the callee's shape and what its name resolves to.

use tracing::debug;

use crate::features::cpg::{
    Declaration, Expression, ExpressionKind, FunctionData, LiteralValue, NodeId, NodeKind, Type,
};
use crate::features::lowering::domain::ProblemKind;
use crate::features::parsing::domain::{Block, Expr, ExprKind, FuncType};
use crate::features::scope::{ScopeKind, SymbolKind};
use crate::shared::models::{Result, Span};

use super::builtins::{
    builtin_result_type, is_builtin_function, is_predeclared, is_primitive,
    is_unqualified_object,
};
use super::context::LoweringContext;
use super::literals::decode_literal;

const COMPARISON_OPERATORS: &[&str] = &["==", "!=", "<", "<=", ">", ">=", "&&", "||"];

impl LoweringContext<'_> {
    pub fn lower_exprs(&mut self, exprs: &[Expr]) -> Result<Vec<NodeId>> {
        let mut ids = Vec::with_capacity(exprs.len());
        for expr in exprs {
            ids.push(self.lower_expr(expr)?);
        }
        Ok(ids)
    }

    pub fn lower_expr(&mut self, expr: &Expr) -> Result<NodeId> {
        match &expr.kind {
            ExprKind::Ident(name) => self.lower_ident(name, expr.span),
            ExprKind::BasicLit { kind, value } => {
                let (value, ty) = decode_literal(*kind, value);
                self.factory
                    .expression(ty, ExpressionKind::Literal { value }, "", expr.span)
            }
            ExprKind::CompositeLit { ty, elts } => {
                self.lower_composite(expr.span, ty.as_deref(), elts, None)
            }
            ExprKind::FuncLit { sig, body } => self.lower_func_lit(expr.span, sig, body),
            ExprKind::Paren(inner) => self.lower_expr(inner),
            ExprKind::Selector { x, sel } => self.lower_selector(expr.span, x, &sel.name),
            ExprKind::Index { x, indices } => self.lower_index(expr.span, x, indices),
            ExprKind::Slice { x, low, high, max } => {
                self.lower_slice(expr.span, x, low.as_deref(), high.as_deref(), max.as_deref())
            }
            ExprKind::TypeAssert { x, ty: Some(ty) } => {
                let cast_type = self.lower_type(ty);
                let expression = self.lower_expr(x)?;
                self.cast(expr.span, cast_type, expression)
            }
            ExprKind::TypeAssert { ty: None, .. } => self.problem_expression(
                ProblemKind::Malformed,
                "`.(type)` outside of a type switch",
                expr.span,
            ),
            ExprKind::Call {
                fun,
                type_args,
                args,
                has_ellipsis,
            } => self.lower_call(expr.span, fun, type_args, args, *has_ellipsis),
            ExprKind::Star(inner) => {
                let operand = self.lower_expr(inner)?;
                let ty = self.factory.type_of(operand).dereference();
                self.unary(expr.span, "*", operand, ty)
            }
            ExprKind::Unary { op, x } => {
                let operand = self.lower_expr(x)?;
                let operand_ty = self.factory.type_of(operand);
                let ty = match op.as_str() {
                    "&" => operand_ty.pointer_to(),
                    "<-" => operand_ty.generics().first().cloned().unwrap_or_default(),
                    "!" => Type::primitive("bool"),
                    _ => operand_ty,
                };
                self.unary(expr.span, op, operand, ty)
            }
            ExprKind::Binary { op, x, y } => {
                let lhs = self.lower_expr(x)?;
                let rhs = self.lower_expr(y)?;
                let ty = if COMPARISON_OPERATORS.contains(&op.as_str()) {
                    Type::primitive("bool")
                } else {
                    let lhs_ty = self.factory.type_of(lhs);
                    if lhs_ty.is_unknown() {
                        self.factory.type_of(rhs)
                    } else {
                        lhs_ty
                    }
                };
                self.factory.expression(
                    ty,
                    ExpressionKind::Binary {
                        operator: op.clone(),
                        lhs,
                        rhs,
                    },
                    op.as_str(),
                    expr.span,
                )
            }
            ExprKind::KeyValue { key, value } => {
                let key = self.lower_expr(key)?;
                let value = self.lower_expr(value)?;
                self.key_value(expr.span, key, value)
            }
            ExprKind::ArrayType { .. }
            | ExprKind::StructType(_)
            | ExprKind::FuncType(_)
            | ExprKind::InterfaceType(_)
            | ExprKind::MapType { .. }
            | ExprKind::ChanType { .. } => self.lower_type_expression(expr),
            ExprKind::Bad if expr.span.is_empty() => self.problem_expression(
                ProblemKind::Malformed,
                "missing expression",
                expr.span,
            ),
            ExprKind::Ellipsis(_) | ExprKind::Bad => self.problem_expression(
                ProblemKind::Unsupported,
                format!("unsupported expression `{}`", expr.span.text(self.factory.source())),
                expr.span,
            ),
        }
    }

    /// Type syntax in value position
    pub fn lower_type_expression(&mut self, expr: &Expr) -> Result<NodeId> {
        let ty = self.lower_type(expr);
        let name = ty.name();
        self.factory
            .expression(ty, ExpressionKind::TypeExpr, name, expr.span)
    }

    fn unary(&mut self, span: Span, operator: &str, operand: NodeId, ty: Type) -> Result<NodeId> {
        self.factory.expression(
            ty,
            ExpressionKind::Unary {
                operator: operator.to_string(),
                operand,
                postfix: false,
            },
            operator,
            span,
        )
    }

    fn cast(&mut self, span: Span, cast_type: Type, expression: NodeId) -> Result<NodeId> {
        let name = cast_type.name();
        self.factory.expression(
            cast_type.clone(),
            ExpressionKind::Cast {
                cast_type,
                expression,
            },
            name,
            span,
        )
    }

    fn key_value(&mut self, span: Span, key: NodeId, value: NodeId) -> Result<NodeId> {
        let ty = self.factory.type_of(value);
        self.factory
            .expression(ty, ExpressionKind::KeyValue { key, value }, "", span)
    }

    // ------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------

    /// Include node for `name` when it is a file import that no inner
    /// declaration shadows
    fn import_target(&self, name: &str) -> Option<NodeId> {
        let include = self.file.import(name)?;
        match self.scopes.resolve(name) {
            Some(symbol) if symbol.kind != SymbolKind::Package => None,
            _ => Some(include),
        }
    }

    fn lower_ident(&mut self, name: &str, span: Span) -> Result<NodeId> {
        if let Some(include) = self.import_target(name) {
            return self.reference(span, name, name.to_string(), Some(include), Type::Unknown);
        }
        if let Some(symbol) = self.scopes.resolve(name) {
            let ty = if symbol.kind.is_type() {
                self.named_type(name)
            } else {
                self.factory.type_of(symbol.node)
            };
            let fqn = match self.factory.node(symbol.node)?.fqn.as_str() {
                "" => name.to_string(),
                fqn => fqn.to_string(),
            };
            return self.reference(span, name, fqn, Some(symbol.node), ty);
        }

        match name {
            "nil" => {
                return self.factory.expression(
                    Type::object("nil"),
                    ExpressionKind::Literal {
                        value: LiteralValue::Null,
                    },
                    "",
                    span,
                )
            }
            "true" | "false" => {
                return self.factory.expression(
                    Type::primitive("bool"),
                    ExpressionKind::Literal {
                        value: LiteralValue::Bool(name == "true"),
                    },
                    "",
                    span,
                )
            }
            _ => {}
        }

        let ty = if name == "iota" {
            Type::primitive("int")
        } else if is_primitive(name) || is_unqualified_object(name) {
            self.named_type(name)
        } else {
            Type::Unknown
        };
        let fqn = if is_predeclared(name) || name == "_" {
            name.to_string()
        } else {
            self.file.qualify(name)
        };
        self.reference(span, name, fqn, None, ty)
    }

    /// Reference left unresolved on purpose (struct literal field keys)
    fn unresolved_reference(&mut self, name: &str, span: Span) -> Result<NodeId> {
        self.reference(span, name, name.to_string(), None, Type::Unknown)
    }

    fn reference(
        &mut self,
        span: Span,
        name: &str,
        fqn: String,
        refers_to: Option<NodeId>,
        ty: Type,
    ) -> Result<NodeId> {
        let id = self
            .factory
            .expression(ty, ExpressionKind::Reference { refers_to }, name, span)?;
        self.factory.node_mut(id)?.fqn = fqn;
        Ok(id)
    }

    /// `pkg.Name` becomes one qualified Reference; anything else is a
    /// Member access on the lowered base
    fn lower_selector(&mut self, span: Span, x: &Expr, sel: &str) -> Result<NodeId> {
        if let Some(alias) = x.as_ident() {
            if self.import_target(alias).is_some() {
                let qualified = format!("{}.{}", alias, sel);
                return self.reference(span, &qualified, qualified.clone(), None, Type::Unknown);
            }
        }
        let base = self.lower_expr(x)?;
        let ty = self.member_type(&self.factory.type_of(base), sel);
        self.factory.expression(
            ty,
            ExpressionKind::Member {
                base,
                member: sel.to_string(),
            },
            sel,
            span,
        )
    }

    /// Field or method type when the base is a record of this package that
    /// is already declared
    fn member_type(&self, base: &Type, member: &str) -> Type {
        let Type::Object { name, .. } = base.root() else {
            return Type::Unknown;
        };
        let prefix = format!("{}.", self.file.namespace_path);
        let Some(local) = name.strip_prefix(&prefix) else {
            return Type::Unknown;
        };
        self.record_named(local)
            .and_then(|record| self.scopes.resolve_in(record, member))
            .map(|symbol| self.factory.type_of(symbol.node))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Indexing
    // ------------------------------------------------------------------

    fn lower_index(&mut self, span: Span, x: &Expr, indices: &[Expr]) -> Result<NodeId> {
        let base = self.lower_expr(x)?;
        let index = match indices {
            [single] => self.lower_expr(single)?,
            _ => {
                // Instantiation used as a value: F[A, B]
                let types: Vec<String> = indices.iter().map(|i| self.lower_type(i).name()).collect();
                debug!(types = %types.join(", "), "multi-index expression kept as subscript");
                self.problem_expression(
                    ProblemKind::Unsupported,
                    "instantiation with several type arguments outside a call",
                    span,
                )?
            }
        };
        let ty = element_type(&self.factory.type_of(base));
        self.factory
            .expression(ty, ExpressionKind::Subscript { base, index }, "", span)
    }

    /// `x[lo:hi:max]` as a Subscript over an implicit Range
    fn lower_slice(
        &mut self,
        span: Span,
        x: &Expr,
        low: Option<&Expr>,
        high: Option<&Expr>,
        max: Option<&Expr>,
    ) -> Result<NodeId> {
        let base = self.lower_expr(x)?;
        let floor = low.map(|e| self.lower_expr(e)).transpose()?;
        let ceiling = high.map(|e| self.lower_expr(e)).transpose()?;
        let third = max.map(|e| self.lower_expr(e)).transpose()?;
        let int = Type::primitive("int");
        let range = self.factory.implicit_expression(
            int,
            ExpressionKind::Range {
                floor,
                ceiling,
                third,
            },
            "",
        )?;
        let base_ty = self.factory.type_of(base);
        // *[N]T slices to []T
        let ty = if !base_ty.is_array() && base_ty.dereference().is_array() {
            base_ty.dereference()
        } else {
            base_ty
        };
        self.factory.expression(
            ty,
            ExpressionKind::Subscript { base, index: range },
            "",
            span,
        )
    }

    // ------------------------------------------------------------------
    // Calls
    // ------------------------------------------------------------------

    fn lower_call(
        &mut self,
        span: Span,
        fun: &Expr,
        type_args: &[Expr],
        args: &[Expr],
        has_ellipsis: bool,
    ) -> Result<NodeId> {
        if has_ellipsis {
            debug!(call = %span.text(self.factory.source()), "spread argument");
        }
        let fun = strip_parens(fun);

        if type_args.is_empty() && self.names_type(fun) {
            return self.lower_conversion(span, fun, args);
        }
        if let Some(name) = fun.as_ident() {
            if self.scopes.resolve(name).is_none() {
                match name {
                    "new" => return self.lower_new(span, args),
                    "make" => return self.lower_make(span, args),
                    _ => {}
                }
            }
        }

        let (callee_expr, type_arg_exprs): (&Expr, &[Expr]) = match &fun.kind {
            _ if !type_args.is_empty() => (fun, type_args),
            ExprKind::Index { x, indices } if self.is_instantiation(x, indices) => {
                (x.as_ref(), indices.as_slice())
            }
            _ => (fun, &[]),
        };
        let type_arguments: Vec<Type> = type_arg_exprs.iter().map(|t| self.lower_type(t)).collect();

        let callee = self.lower_expr(callee_expr)?;
        let mut arguments = Vec::with_capacity(args.len());
        for arg in args {
            let id = if arg.is_type_syntax() {
                self.lower_type_expression(arg)?
            } else {
                self.lower_expr(arg)?
            };
            arguments.push(id);
        }

        let ty = self.call_result_type(callee_expr, callee, &arguments);
        let callee_node = self.factory.node(callee)?;
        let name = callee_node
            .name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_string();
        let fqn = callee_node.fqn.clone();

        let kind = match &callee_node.kind {
            NodeKind::Expression(e) => match &e.kind {
                ExpressionKind::Member { base, member } => ExpressionKind::MemberCall {
                    base: *base,
                    member: member.clone(),
                    callee,
                    arguments,
                    type_arguments,
                },
                _ => ExpressionKind::Call {
                    callee,
                    arguments,
                    type_arguments,
                },
            },
            _ => ExpressionKind::Call {
                callee,
                arguments,
                type_arguments,
            },
        };
        let id = self.factory.expression(ty, kind, name, span)?;
        self.factory.node_mut(id)?.fqn = fqn;
        Ok(id)
    }

    fn call_result_type(&self, callee_expr: &Expr, callee: NodeId, arguments: &[NodeId]) -> Type {
        if let Some(name) = callee_expr.as_ident() {
            if is_builtin_function(name) && self.scopes.resolve(name).is_none() {
                let arg_types: Vec<Type> =
                    arguments.iter().map(|a| self.factory.type_of(*a)).collect();
                return builtin_result_type(name, &arg_types);
            }
        }
        match self.factory.type_of(callee) {
            Type::Function { returns, .. } if returns.len() == 1 => {
                returns.into_iter().next().unwrap_or_default()
            }
            _ => Type::Unknown,
        }
    }

    /// Whether a call's callee expression denotes a type (making the call a
    /// conversion)
    fn names_type(&self, fun: &Expr) -> bool {
        match &fun.kind {
            ExprKind::Ident(name) => match self.scopes.resolve(name) {
                Some(symbol) => symbol.kind.is_type(),
                None => is_primitive(name) || is_unqualified_object(name),
            },
            ExprKind::Paren(inner) => self.names_type(inner),
            ExprKind::Star(inner) => self.names_type(inner),
            ExprKind::Index { x, .. } => {
                matches!(x.as_ident().and_then(|n| self.scopes.resolve(n)), Some(s) if s.kind.is_type())
            }
            _ => fun.is_type_syntax(),
        }
    }

    /// `F[A](x)` rather than `m[k](x)`
    fn is_instantiation(&self, base: &Expr, indices: &[Expr]) -> bool {
        if let Some(name) = base.as_ident() {
            if let Some(symbol) = self.scopes.resolve(name) {
                return symbol.kind == SymbolKind::Function;
            }
        }
        !indices.is_empty() && indices.iter().all(|i| self.looks_like_type(i))
    }

    fn looks_like_type(&self, expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::Ident(name) => match self.scopes.resolve(name) {
                Some(symbol) => symbol.kind.is_type(),
                None => is_primitive(name) || is_unqualified_object(name),
            },
            ExprKind::Selector { x, .. } => x
                .as_ident()
                .is_some_and(|pkg| self.import_target(pkg).is_some()),
            ExprKind::Star(inner) | ExprKind::Paren(inner) => self.looks_like_type(inner),
            ExprKind::Index { x, .. } => self.looks_like_type(x),
            _ => expr.is_type_syntax(),
        }
    }

    fn lower_conversion(&mut self, span: Span, fun: &Expr, args: &[Expr]) -> Result<NodeId> {
        let cast_type = self.lower_type(fun);
        let expression = match args {
            [single] => self.lower_expr(single)?,
            _ => self.problem_expression(
                ProblemKind::Malformed,
                format!("conversion to {} takes exactly one argument", cast_type),
                span,
            )?,
        };
        self.cast(span, cast_type, expression)
    }

    /// `new(T)`: a pointer-typed New around an implicit Construct of `T`
    fn lower_new(&mut self, span: Span, args: &[Expr]) -> Result<NodeId> {
        let Some(type_expr) = args.first() else {
            return self.problem_expression(ProblemKind::Malformed, "new without a type", span);
        };
        let ty = self.lower_type(type_expr);
        let construct = self.factory.implicit_expression(
            ty.clone(),
            ExpressionKind::Construct {
                arguments: Vec::new(),
            },
            ty.name(),
        )?;
        self.factory.expression(
            ty.pointer_to(),
            ExpressionKind::New {
                initializer: Some(construct),
            },
            "new",
            span,
        )
    }

    /// `make([]T, n, c)` creates an array; `make(map..)` and `make(chan..)`
    /// construct their object
    fn lower_make(&mut self, span: Span, args: &[Expr]) -> Result<NodeId> {
        let Some((type_expr, rest)) = args.split_first() else {
            return self.problem_expression(ProblemKind::Malformed, "make without a type", span);
        };
        let ty = self.lower_type(type_expr);
        let sizes = self.lower_exprs(rest)?;
        let kind = if ty.is_array() {
            ExpressionKind::ArrayCreation { dimensions: sizes }
        } else {
            ExpressionKind::Construct { arguments: sizes }
        };
        let name = ty.name();
        self.factory.expression(ty, kind, name, span)
    }

    // ------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------

    /// `T{...}`: a Construct whose single argument is an InitializerList
    /// spanning the literal. Nested literals with elided types take their
    /// type from `hint`.
    fn lower_composite(
        &mut self,
        span: Span,
        ty: Option<&Expr>,
        elts: &[Expr],
        hint: Option<Type>,
    ) -> Result<NodeId> {
        let literal_ty = match ty {
            Some(t) => self.lower_type(t),
            None => hint.unwrap_or_default(),
        };
        // Elided `&T{}` inside []*T
        let elided_pointer = matches!(literal_ty, Type::Pointer { .. }) && !literal_ty.is_array();
        let literal_ty = if ty.is_none() && elided_pointer {
            literal_ty.dereference()
        } else {
            literal_ty
        };
        let (key_hint, element_hint, keyed_by_value) = element_hints(&literal_ty);

        let construct = self.factory.expression(
            literal_ty.clone(),
            ExpressionKind::Construct {
                arguments: Vec::new(),
            },
            literal_ty.name(),
            span,
        )?;
        let list = self.factory.expression(
            literal_ty.clone(),
            ExpressionKind::InitializerList {
                initializers: Vec::new(),
            },
            "",
            span,
        )?;
        self.factory.node_mut(list)?.implicit = true;

        let mut initializers = Vec::with_capacity(elts.len());
        for elt in elts {
            let id = match &elt.kind {
                ExprKind::KeyValue { key, value } => {
                    let key_id = match key.as_ident() {
                        Some(name) if !keyed_by_value => self.unresolved_reference(name, key.span)?,
                        _ => self.lower_element(key, key_hint.clone())?,
                    };
                    let value_id = self.lower_element(value, element_hint.clone())?;
                    self.key_value(elt.span, key_id, value_id)?
                }
                _ => self.lower_element(elt, element_hint.clone())?,
            };
            initializers.push(id);
        }

        self.factory.set_kind(
            list,
            NodeKind::Expression(Expression {
                ty: literal_ty.clone(),
                kind: ExpressionKind::InitializerList { initializers },
            }),
        )?;
        self.factory.set_kind(
            construct,
            NodeKind::Expression(Expression {
                ty: literal_ty,
                kind: ExpressionKind::Construct {
                    arguments: vec![list],
                },
            }),
        )?;
        Ok(construct)
    }

    fn lower_element(&mut self, elt: &Expr, hint: Option<Type>) -> Result<NodeId> {
        match &elt.kind {
            ExprKind::CompositeLit { ty: None, elts } => self.lower_composite(elt.span, None, elts, hint),
            _ => self.lower_expr(elt),
        }
    }

    /// Function literal: a Lambda around an anonymous Function
    fn lower_func_lit(
        &mut self,
        span: Span,
        sig: &FuncType,
        body: &Block,
    ) -> Result<NodeId> {
        let function = self.factory.declaration(
            Declaration::Function(FunctionData::default()),
            "",
            "",
            span,
        )?;
        let data = self.scoped(function, ScopeKind::Function, |ctx| {
            let mut data = FunctionData::default();
            ctx.lower_signature_into(&mut data, None, sig)?;
            data.body = Some(ctx.lower_function_body(body)?);
            Ok(data)
        })?;
        let ty = data.ty.clone();
        self.factory
            .set_kind(function, NodeKind::Declaration(Declaration::Function(data)))?;
        self.factory
            .expression(ty, ExpressionKind::Lambda { function }, "", span)
    }
}

fn strip_parens(expr: &Expr) -> &Expr {
    match &expr.kind {
        ExprKind::Paren(inner) => strip_parens(inner),
        _ => expr,
    }
}

/// Element type of an indexed value
fn element_type(base: &Type) -> Type {
    match base {
        Type::Pointer { element, .. } if base.is_array() => (**element).clone(),
        Type::Pointer { element, .. } if element.is_array() => element.dereference(),
        Type::Object { name, generics } if name == "map" && generics.len() == 2 => {
            generics[1].clone()
        }
        Type::Primitive(name) if name == "string" => Type::primitive("byte"),
        _ => Type::Unknown,
    }
}

/// `(key hint, element hint, keys are values)` for a composite literal type
fn element_hints(literal: &Type) -> (Option<Type>, Option<Type>, bool) {
    match literal {
        Type::Pointer { element, .. } if literal.is_array() => {
            (Some(Type::primitive("int")), Some((**element).clone()), true)
        }
        Type::Object { name, generics } if name == "map" && generics.len() == 2 => {
            (Some(generics[0].clone()), Some(generics[1].clone()), true)
        }
        _ => (None, None, false),
    }
}
