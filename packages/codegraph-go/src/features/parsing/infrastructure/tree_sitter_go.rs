//! Tree-sitter Go adapter
//!
//! This is where the tree-sitter dependency lives. The concrete tree is
//! converted into the closed [`SourceFile`] union once; nothing downstream
//! touches tree-sitter nodes. Grammar revisions differ in a few wrapper
//! nodes (`statement_list`, `var_spec_list`, `method_spec_list`,
//! `literal_element`), which are flattened here.

use tree_sitter::{Node as TSNode, Parser as TSParser, Tree};

use crate::features::parsing::domain::{
    Block, BranchKind, ChanDir, Comment, Decl, Expr, ExprKind, Field, FieldList, FuncDecl,
    FuncType, GenDecl, GenDeclKind, Ident, ImportSpec, LitKind, SourceFile, Stmt, StmtKind,
    TypeSpec, ValueSpec,
};
use crate::features::parsing::ports::SyntaxSource;
use crate::shared::models::{FrontendError, Result, Span};

/// Tree-sitter based Go parser
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterGoParser;

impl TreeSitterGoParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse into the raw tree-sitter tree
    pub fn parse_tree(&self, source: &str, file_path: &str) -> Result<Tree> {
        let mut parser = TSParser::new();
        parser
            .set_language(&tree_sitter_go::language())
            .map_err(|e| FrontendError::parse(file_path, e.to_string()))?;
        parser
            .parse(source, None)
            .ok_or_else(|| FrontendError::parse(file_path, "tree-sitter produced no tree"))
    }
}

impl SyntaxSource for TreeSitterGoParser {
    fn parse(&self, source: &str, file_path: &str) -> Result<SourceFile> {
        let tree = self.parse_tree(source, file_path)?;
        Ok(GoTreeConverter::new(source).convert_file(tree.root_node()))
    }
}

/// Convert a tree-sitter node position into a [`Span`]
pub fn node_span(node: &TSNode) -> Span {
    Span::new(
        node.start_position().row as u32 + 1,
        node.start_position().column as u32,
        node.end_position().row as u32 + 1,
        node.end_position().column as u32,
        node.start_byte(),
        node.end_byte(),
    )
}

fn named_children<'t>(node: &TSNode<'t>) -> Vec<TSNode<'t>> {
    let mut cursor = node.walk();
    let children: Vec<TSNode<'t>> = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect();
    children
}

fn field_children<'t>(node: &TSNode<'t>, field: &str) -> Vec<TSNode<'t>> {
    let mut cursor = node.walk();
    let children: Vec<TSNode<'t>> = node
        .children_by_field_name(field, &mut cursor)
        .filter(|c| c.is_named() && c.kind() != "comment")
        .collect();
    children
}

fn has_token(node: &TSNode, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

/// Converts one tree into the surface syntax union
pub struct GoTreeConverter<'a> {
    source: &'a str,
}

impl<'a> GoTreeConverter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn text(&self, node: &TSNode) -> &'a str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    fn ident(&self, node: &TSNode) -> Ident {
        Ident::new(self.text(node), node_span(node))
    }

    pub fn convert_file(&self, root: TSNode) -> SourceFile {
        let mut package = Ident::new("", Span::zero());
        let mut imports = Vec::new();
        let mut decls = Vec::new();

        for child in named_children(&root) {
            match child.kind() {
                "package_clause" => {
                    if let Some(name) = named_children(&child).first() {
                        package = self.ident(name);
                    }
                }
                "import_declaration" => imports.extend(self.convert_import_decl(&child)),
                "function_declaration" | "method_declaration" => {
                    decls.push(Decl::Func(self.convert_func_decl(&child)))
                }
                "var_declaration" | "const_declaration" | "type_declaration" => {
                    decls.push(Decl::Gen(self.convert_gen_decl(&child)))
                }
                _ => decls.push(Decl::Bad(node_span(&child))),
            }
        }

        let mut comments = Vec::new();
        self.collect_comments(&root, &mut comments);

        SourceFile {
            package,
            imports,
            decls,
            comments,
            span: node_span(&root),
        }
    }

    fn collect_comments(&self, node: &TSNode, out: &mut Vec<Comment>) {
        if node.kind() == "comment" {
            out.push(Comment {
                text: self.text(node).to_string(),
                span: node_span(node),
            });
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_comments(&child, out);
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn convert_import_decl(&self, node: &TSNode) -> Vec<ImportSpec> {
        let mut specs = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "import_spec" => specs.push(self.convert_import_spec(&child)),
                "import_spec_list" => {
                    for spec in named_children(&child) {
                        if spec.kind() == "import_spec" {
                            specs.push(self.convert_import_spec(&spec));
                        }
                    }
                }
                _ => {}
            }
        }
        specs
    }

    fn convert_import_spec(&self, node: &TSNode) -> ImportSpec {
        ImportSpec {
            alias: node.child_by_field_name("name").map(|n| self.ident(&n)),
            path: node
                .child_by_field_name("path")
                .map(|n| self.text(&n).to_string())
                .unwrap_or_default(),
            span: node_span(node),
        }
    }

    fn convert_func_decl(&self, node: &TSNode) -> FuncDecl {
        FuncDecl {
            recv: node
                .child_by_field_name("receiver")
                .map(|r| self.convert_param_list(&r)),
            name: node
                .child_by_field_name("name")
                .map(|n| self.ident(&n))
                .unwrap_or_else(|| Ident::new("", node_span(node))),
            type_params: node
                .child_by_field_name("type_parameters")
                .map(|t| self.convert_type_params(&t)),
            sig: self.convert_signature(node),
            body: node
                .child_by_field_name("body")
                .map(|b| self.convert_block(&b)),
            span: node_span(node),
        }
    }

    /// `parameters` + `result` of a declaration, literal or function type
    fn convert_signature(&self, node: &TSNode) -> FuncType {
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.convert_param_list(&p))
            .unwrap_or_else(|| FieldList::empty(node_span(node)));
        let results = node.child_by_field_name("result").map(|r| {
            if r.kind() == "parameter_list" {
                self.convert_param_list(&r)
            } else {
                let ty = self.convert_expr(&r);
                FieldList {
                    span: ty.span,
                    list: vec![Field {
                        names: Vec::new(),
                        span: ty.span,
                        ty,
                        tag: None,
                    }],
                }
            }
        });
        let end = results.as_ref().map(|r| r.span).unwrap_or(params.span);
        FuncType {
            span: params.span.to(&end),
            params,
            results,
        }
    }

    fn convert_param_list(&self, node: &TSNode) -> FieldList {
        let mut list = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "parameter_declaration" => {
                    let names = field_children(&child, "name")
                        .iter()
                        .map(|n| self.ident(n))
                        .collect();
                    let ty = child
                        .child_by_field_name("type")
                        .map(|t| self.convert_expr(&t))
                        .unwrap_or_else(|| Expr::new(ExprKind::Bad, node_span(&child)));
                    list.push(Field {
                        names,
                        ty,
                        tag: None,
                        span: node_span(&child),
                    });
                }
                "variadic_parameter_declaration" => {
                    let names = child
                        .child_by_field_name("name")
                        .map(|n| vec![self.ident(&n)])
                        .unwrap_or_default();
                    let elt = child.child_by_field_name("type").map(|t| {
                        let converted = self.convert_expr(&t);
                        Box::new(converted)
                    });
                    list.push(Field {
                        names,
                        ty: Expr::new(ExprKind::Ellipsis(elt), node_span(&child)),
                        tag: None,
                        span: node_span(&child),
                    });
                }
                _ => {}
            }
        }
        FieldList {
            list,
            span: node_span(node),
        }
    }

    fn convert_type_params(&self, node: &TSNode) -> FieldList {
        let mut list = Vec::new();
        for child in named_children(node) {
            if child.kind() != "type_parameter_declaration" {
                continue;
            }
            let names = field_children(&child, "name")
                .iter()
                .map(|n| self.ident(n))
                .collect();
            let ty = child
                .child_by_field_name("type")
                .map(|t| self.convert_expr(&t))
                .unwrap_or_else(|| Expr::new(ExprKind::Ident("any".into()), node_span(&child)));
            list.push(Field {
                names,
                ty,
                tag: None,
                span: node_span(&child),
            });
        }
        FieldList {
            list,
            span: node_span(node),
        }
    }

    fn convert_gen_decl(&self, node: &TSNode) -> GenDecl {
        let kind = match node.kind() {
            "var_declaration" => GenDeclKind::Var(self.convert_value_specs(node, "var_spec")),
            "const_declaration" => GenDeclKind::Const(self.convert_value_specs(node, "const_spec")),
            _ => {
                let mut specs = Vec::new();
                for child in named_children(node) {
                    match child.kind() {
                        "type_spec" | "type_alias" => specs.push(self.convert_type_spec(&child)),
                        _ => {}
                    }
                }
                GenDeclKind::Type(specs)
            }
        };
        GenDecl {
            kind,
            span: node_span(node),
        }
    }

    fn convert_value_specs(&self, node: &TSNode, spec_kind: &str) -> Vec<ValueSpec> {
        let mut specs = Vec::new();
        for child in named_children(node) {
            if child.kind() == spec_kind {
                specs.push(self.convert_value_spec(&child));
            } else if child.kind().ends_with("_spec_list") {
                specs.extend(self.convert_value_specs(&child, spec_kind));
            }
        }
        specs
    }

    fn convert_value_spec(&self, node: &TSNode) -> ValueSpec {
        ValueSpec {
            names: field_children(node, "name")
                .iter()
                .map(|n| self.ident(n))
                .collect(),
            ty: node
                .child_by_field_name("type")
                .map(|t| self.convert_expr(&t)),
            values: node
                .child_by_field_name("value")
                .map(|v| self.convert_expr_list(&v))
                .unwrap_or_default(),
            span: node_span(node),
        }
    }

    fn convert_type_spec(&self, node: &TSNode) -> TypeSpec {
        TypeSpec {
            name: node
                .child_by_field_name("name")
                .map(|n| self.ident(&n))
                .unwrap_or_else(|| Ident::new("", node_span(node))),
            type_params: node
                .child_by_field_name("type_parameters")
                .map(|t| self.convert_type_params(&t)),
            is_alias: node.kind() == "type_alias",
            ty: node
                .child_by_field_name("type")
                .map(|t| self.convert_expr(&t))
                .unwrap_or_else(|| Expr::new(ExprKind::Bad, node_span(node))),
            span: node_span(node),
        }
    }

    fn convert_field_decl_list(&self, node: &TSNode) -> FieldList {
        let mut list = Vec::new();
        for child in named_children(node) {
            if child.kind() != "field_declaration" {
                continue;
            }
            let names: Vec<Ident> = field_children(&child, "name")
                .iter()
                .map(|n| self.ident(n))
                .collect();
            let mut ty = child
                .child_by_field_name("type")
                .map(|t| self.convert_expr(&t))
                .unwrap_or_else(|| Expr::new(ExprKind::Bad, node_span(&child)));
            if names.is_empty() && has_token(&child, "*") {
                let span = Span {
                    start_line: node_span(&child).start_line,
                    start_col: node_span(&child).start_col,
                    start_byte: child.start_byte(),
                    ..ty.span
                };
                ty = Expr::new(ExprKind::Star(Box::new(ty)), span);
            }
            list.push(Field {
                names,
                ty,
                tag: child
                    .child_by_field_name("tag")
                    .map(|t| self.text(&t).to_string()),
                span: node_span(&child),
            });
        }
        FieldList {
            list,
            span: node_span(node),
        }
    }

    fn convert_interface(&self, node: &TSNode) -> FieldList {
        let mut list = Vec::new();
        self.collect_interface_elems(node, &mut list);
        FieldList {
            list,
            span: node_span(node),
        }
    }

    fn collect_interface_elems(&self, node: &TSNode, list: &mut Vec<Field>) {
        for child in named_children(node) {
            match child.kind() {
                "method_spec_list" => self.collect_interface_elems(&child, list),
                "method_elem" | "method_spec" => {
                    let sig = self.convert_signature(&child);
                    list.push(Field {
                        names: child
                            .child_by_field_name("name")
                            .map(|n| vec![self.ident(&n)])
                            .unwrap_or_default(),
                        ty: Expr::new(ExprKind::FuncType(sig), node_span(&child)),
                        tag: None,
                        span: node_span(&child),
                    });
                }
                _ => list.push(Field {
                    names: Vec::new(),
                    ty: self.convert_expr(&child),
                    tag: None,
                    span: node_span(&child),
                }),
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions and type syntax
    // ------------------------------------------------------------------

    fn convert_expr_list(&self, node: &TSNode) -> Vec<Expr> {
        if node.kind() == "expression_list" {
            named_children(node)
                .iter()
                .map(|c| self.convert_expr(c))
                .collect()
        } else {
            vec![self.convert_expr(node)]
        }
    }

    fn field_expr(&self, node: &TSNode, field: &str) -> Box<Expr> {
        let expr = node
            .child_by_field_name(field)
            .map(|n| self.convert_expr(&n))
            .unwrap_or_else(|| Expr::new(ExprKind::Bad, node_span(node)));
        Box::new(expr)
    }

    fn opt_field_expr(&self, node: &TSNode, field: &str) -> Option<Box<Expr>> {
        node.child_by_field_name(field)
            .map(|n| Box::new(self.convert_expr(&n)))
    }

    fn first_named_expr(&self, node: &TSNode) -> Box<Expr> {
        let expr = named_children(node)
            .first()
            .map(|n| self.convert_expr(n))
            .unwrap_or_else(|| Expr::new(ExprKind::Bad, node_span(node)));
        Box::new(expr)
    }

    /// Union constraints (`int | string`) fold into a left-nested `|` chain
    fn convert_type_elem(&self, node: &TSNode) -> Expr {
        let parts: Vec<Expr> = named_children(node)
            .iter()
            .map(|c| self.convert_expr(c))
            .collect();
        let mut iter = parts.into_iter();
        let Some(first) = iter.next() else {
            return Expr::new(ExprKind::Bad, node_span(node));
        };
        iter.fold(first, |acc, next| {
            let span = acc.span.to(&next.span);
            Expr::new(
                ExprKind::Binary {
                    op: "|".into(),
                    x: Box::new(acc),
                    y: Box::new(next),
                },
                span,
            )
        })
    }

    fn convert_type_args(&self, node: &TSNode) -> Vec<Expr> {
        named_children(node)
            .iter()
            .map(|c| self.convert_expr(c))
            .collect()
    }

    pub fn convert_expr(&self, node: &TSNode) -> Expr {
        let span = node_span(node);
        if node.is_missing() || node.is_error() {
            return Expr::new(ExprKind::Bad, span);
        }
        let kind = match node.kind() {
            "identifier" | "type_identifier" | "field_identifier" | "package_identifier"
            | "label_name" | "blank_identifier" | "dot" | "true" | "false" | "nil" | "iota" => {
                ExprKind::Ident(self.text(node).to_string())
            }
            "int_literal" => self.lit(LitKind::Int, node),
            "float_literal" => self.lit(LitKind::Float, node),
            "imaginary_literal" => self.lit(LitKind::Imag, node),
            "rune_literal" => self.lit(LitKind::Rune, node),
            "interpreted_string_literal" | "raw_string_literal" => self.lit(LitKind::String, node),
            "parenthesized_expression" | "parenthesized_type" => {
                ExprKind::Paren(self.first_named_expr(node))
            }
            "call_expression" => {
                let mut args = Vec::new();
                let mut has_ellipsis = false;
                if let Some(list) = node.child_by_field_name("arguments") {
                    for arg in named_children(&list) {
                        if arg.kind() == "variadic_argument" {
                            has_ellipsis = true;
                            args.push(*self.first_named_expr(&arg));
                        } else {
                            args.push(self.convert_expr(&arg));
                        }
                    }
                }
                ExprKind::Call {
                    fun: self.field_expr(node, "function"),
                    type_args: node
                        .child_by_field_name("type_arguments")
                        .map(|t| self.convert_type_args(&t))
                        .unwrap_or_default(),
                    args,
                    has_ellipsis,
                }
            }
            "type_conversion_expression" => ExprKind::Call {
                fun: self.field_expr(node, "type"),
                type_args: Vec::new(),
                args: vec![*self.field_expr(node, "operand")],
                has_ellipsis: false,
            },
            "selector_expression" => ExprKind::Selector {
                x: self.field_expr(node, "operand"),
                sel: node
                    .child_by_field_name("field")
                    .map(|f| self.ident(&f))
                    .unwrap_or_else(|| Ident::new("", span)),
            },
            "index_expression" => ExprKind::Index {
                x: self.field_expr(node, "operand"),
                indices: vec![*self.field_expr(node, "index")],
            },
            "slice_expression" => ExprKind::Slice {
                x: self.field_expr(node, "operand"),
                low: self.opt_field_expr(node, "start"),
                high: self.opt_field_expr(node, "end"),
                max: self.opt_field_expr(node, "capacity"),
            },
            // `x.(type)` carries no asserted type
            "type_assertion_expression" => ExprKind::TypeAssert {
                x: self.field_expr(node, "operand"),
                ty: node
                    .child_by_field_name("type")
                    .filter(|t| self.text(t) != "type")
                    .map(|t| Box::new(self.convert_expr(&t))),
            },
            "unary_expression" => {
                let op = node
                    .child_by_field_name("operator")
                    .map(|o| self.text(&o).to_string())
                    .unwrap_or_default();
                let x = self.field_expr(node, "operand");
                if op == "*" {
                    ExprKind::Star(x)
                } else {
                    ExprKind::Unary { op, x }
                }
            }
            "binary_expression" => ExprKind::Binary {
                op: node
                    .child_by_field_name("operator")
                    .map(|o| self.text(&o).to_string())
                    .unwrap_or_default(),
                x: self.field_expr(node, "left"),
                y: self.field_expr(node, "right"),
            },
            "composite_literal" => ExprKind::CompositeLit {
                ty: self.opt_field_expr(node, "type"),
                elts: node
                    .child_by_field_name("body")
                    .map(|b| self.convert_literal_value(&b))
                    .unwrap_or_default(),
            },
            "literal_value" => ExprKind::CompositeLit {
                ty: None,
                elts: self.convert_literal_value(node),
            },
            "literal_element" => return *self.first_named_expr(node),
            "keyed_element" => {
                let children = named_children(node);
                let key = node
                    .child_by_field_name("key")
                    .or_else(|| children.first().copied());
                let value = node
                    .child_by_field_name("value")
                    .or_else(|| children.get(1).copied());
                match (key, value) {
                    (Some(k), Some(v)) => ExprKind::KeyValue {
                        key: Box::new(self.convert_expr(&k)),
                        value: Box::new(self.convert_expr(&v)),
                    },
                    _ => ExprKind::Bad,
                }
            }
            "func_literal" => ExprKind::FuncLit {
                sig: self.convert_signature(node),
                body: node
                    .child_by_field_name("body")
                    .map(|b| self.convert_block(&b))
                    .unwrap_or(Block {
                        stmts: Vec::new(),
                        span,
                    }),
            },
            "qualified_type" => ExprKind::Selector {
                x: self.field_expr(node, "package"),
                sel: node
                    .child_by_field_name("name")
                    .map(|n| self.ident(&n))
                    .unwrap_or_else(|| Ident::new("", span)),
            },
            "pointer_type" => ExprKind::Star(self.first_named_expr(node)),
            "array_type" => ExprKind::ArrayType {
                len: self.opt_field_expr(node, "length"),
                elt: self.field_expr(node, "element"),
            },
            "implicit_length_array_type" => ExprKind::ArrayType {
                len: Some(Expr::boxed(ExprKind::Ellipsis(None), span)),
                elt: self.field_expr(node, "element"),
            },
            "slice_type" => ExprKind::ArrayType {
                len: None,
                elt: self.field_expr(node, "element"),
            },
            "map_type" => ExprKind::MapType {
                key: self.field_expr(node, "key"),
                value: self.field_expr(node, "value"),
            },
            "channel_type" => {
                let dir = match node.child(0).map(|c| c.kind()) {
                    Some("<-") => ChanDir::Recv,
                    _ if has_token(node, "<-") => ChanDir::Send,
                    _ => ChanDir::Both,
                };
                ExprKind::ChanType {
                    dir,
                    value: self.field_expr(node, "value"),
                }
            }
            "function_type" => ExprKind::FuncType(self.convert_signature(node)),
            "struct_type" => {
                let fields = named_children(node)
                    .iter()
                    .find(|c| c.kind() == "field_declaration_list")
                    .map(|l| self.convert_field_decl_list(l))
                    .unwrap_or_else(|| FieldList::empty(span));
                ExprKind::StructType(fields)
            }
            "interface_type" => ExprKind::InterfaceType(self.convert_interface(node)),
            "generic_type" => ExprKind::Index {
                x: self.field_expr(node, "type"),
                indices: node
                    .child_by_field_name("type_arguments")
                    .map(|t| self.convert_type_args(&t))
                    .unwrap_or_default(),
            },
            "negated_type" => ExprKind::Unary {
                op: "~".into(),
                x: self.first_named_expr(node),
            },
            "type_elem" | "type_constraint" | "constraint_elem" | "union_type" => {
                return self.convert_type_elem(node)
            }
            _ => ExprKind::Bad,
        };
        Expr::new(kind, span)
    }

    fn lit(&self, kind: LitKind, node: &TSNode) -> ExprKind {
        ExprKind::BasicLit {
            kind,
            value: self.text(node).to_string(),
        }
    }

    fn convert_literal_value(&self, node: &TSNode) -> Vec<Expr> {
        named_children(node)
            .iter()
            .map(|c| self.convert_expr(c))
            .collect()
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn convert_block(&self, node: &TSNode) -> Block {
        Block {
            stmts: self.convert_stmt_children(node, &[]),
            span: node_span(node),
        }
    }

    /// Statement children of a block or clause, skipping `exclude`d nodes
    fn convert_stmt_children(&self, node: &TSNode, exclude: &[usize]) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        for child in named_children(node) {
            if exclude.contains(&child.id()) {
                continue;
            }
            if child.kind() == "statement_list" {
                stmts.extend(self.convert_stmt_children(&child, &[]));
            } else {
                stmts.push(self.convert_stmt(&child));
            }
        }
        stmts
    }

    fn opt_stmt(&self, node: &TSNode, field: &str) -> Option<Box<Stmt>> {
        node.child_by_field_name(field)
            .map(|n| Box::new(self.convert_stmt(&n)))
    }

    fn body_span(&self, node: &TSNode) -> Span {
        let mut cursor = node.walk();
        let open = node.children(&mut cursor).find(|c| c.kind() == "{");
        match open {
            Some(open) => node_span(&open).to(&node_span(node)),
            None => node_span(node),
        }
    }

    pub fn convert_stmt(&self, node: &TSNode) -> Stmt {
        let span = node_span(node);
        if node.is_missing() || node.is_error() {
            return Stmt::new(StmtKind::Bad, span);
        }
        let kind = match node.kind() {
            "expression_statement" => StmtKind::Expr(*self.first_named_expr(node)),
            "send_statement" => StmtKind::Send {
                chan: *self.field_expr(node, "channel"),
                value: *self.field_expr(node, "value"),
            },
            "inc_statement" => StmtKind::IncDec {
                x: *self.first_named_expr(node),
                inc: true,
            },
            "dec_statement" => StmtKind::IncDec {
                x: *self.first_named_expr(node),
                inc: false,
            },
            "assignment_statement" => StmtKind::Assign {
                lhs: self.expr_list_field(node, "left"),
                op: node
                    .child_by_field_name("operator")
                    .map(|o| self.text(&o).to_string())
                    .unwrap_or_else(|| "=".into()),
                rhs: self.expr_list_field(node, "right"),
            },
            "short_var_declaration" => StmtKind::Assign {
                lhs: self.expr_list_field(node, "left"),
                op: ":=".into(),
                rhs: self.expr_list_field(node, "right"),
            },
            "receive_statement" => {
                let rhs = vec![*self.field_expr(node, "right")];
                if node.child_by_field_name("left").is_some() {
                    StmtKind::Assign {
                        lhs: self.expr_list_field(node, "left"),
                        op: if has_token(node, ":=") { ":=" } else { "=" }.into(),
                        rhs,
                    }
                } else {
                    let expr = rhs.into_iter().next().unwrap_or_else(|| Expr::new(ExprKind::Bad, span));
                    StmtKind::Expr(expr)
                }
            }
            "var_declaration" | "const_declaration" | "type_declaration" => {
                StmtKind::Decl(self.convert_gen_decl(node))
            }
            "labeled_statement" | "empty_labeled_statement" => {
                let label_node = node.child_by_field_name("label");
                let label = label_node
                    .map(|l| self.ident(&l))
                    .unwrap_or_else(|| Ident::new("", span));
                let label_id = label_node.map(|l| l.id());
                let inner = named_children(node)
                    .into_iter()
                    .find(|c| Some(c.id()) != label_id)
                    .map(|c| self.convert_stmt(&c))
                    .unwrap_or_else(|| Stmt::new(StmtKind::Empty, span));
                StmtKind::Labeled {
                    label,
                    stmt: Box::new(inner),
                }
            }
            "return_statement" => StmtKind::Return(
                named_children(node)
                    .first()
                    .map(|c| self.convert_expr_list(c))
                    .unwrap_or_default(),
            ),
            "go_statement" => StmtKind::Go(*self.first_named_expr(node)),
            "defer_statement" => StmtKind::Defer(*self.first_named_expr(node)),
            "break_statement" => self.branch(node, BranchKind::Break),
            "continue_statement" => self.branch(node, BranchKind::Continue),
            "goto_statement" => self.branch(node, BranchKind::Goto),
            "fallthrough_statement" => StmtKind::Branch {
                kind: BranchKind::Fallthrough,
                label: None,
            },
            "block" => StmtKind::Block(self.convert_block(node)),
            "if_statement" => StmtKind::If {
                init: self.opt_stmt(node, "initializer"),
                cond: *self.field_expr(node, "condition"),
                then: node
                    .child_by_field_name("consequence")
                    .map(|b| self.convert_block(&b))
                    .unwrap_or(Block {
                        stmts: Vec::new(),
                        span,
                    }),
                els: self.opt_stmt(node, "alternative"),
            },
            "for_statement" => self.convert_for(node),
            "expression_switch_statement" => StmtKind::Switch {
                init: self.opt_stmt(node, "initializer"),
                tag: node
                    .child_by_field_name("value")
                    .map(|v| self.convert_expr(&v)),
                clauses: self.convert_clauses(node),
                body_span: self.body_span(node),
            },
            "type_switch_statement" => StmtKind::TypeSwitch {
                init: self.opt_stmt(node, "initializer"),
                binding: node.child_by_field_name("alias").and_then(|a| {
                    if a.kind() == "expression_list" {
                        named_children(&a).first().map(|n| self.ident(n))
                    } else {
                        Some(self.ident(&a))
                    }
                }),
                subject: *self.field_expr(node, "value"),
                clauses: self.convert_clauses(node),
                body_span: self.body_span(node),
            },
            "select_statement" => StmtKind::Select {
                clauses: self.convert_clauses(node),
                body_span: self.body_span(node),
            },
            "empty_statement" => StmtKind::Empty,
            _ => StmtKind::Bad,
        };
        Stmt::new(kind, span)
    }

    fn expr_list_field(&self, node: &TSNode, field: &str) -> Vec<Expr> {
        node.child_by_field_name(field)
            .map(|n| self.convert_expr_list(&n))
            .unwrap_or_default()
    }

    fn branch(&self, node: &TSNode, kind: BranchKind) -> StmtKind {
        StmtKind::Branch {
            kind,
            label: named_children(node).first().map(|l| self.ident(l)),
        }
    }

    fn convert_for(&self, node: &TSNode) -> StmtKind {
        let body_node = node.child_by_field_name("body");
        let body = body_node
            .map(|b| self.convert_block(&b))
            .unwrap_or(Block {
                stmts: Vec::new(),
                span: node_span(node),
            });
        let body_id = body_node.map(|b| b.id());
        let header = named_children(node)
            .into_iter()
            .find(|c| Some(c.id()) != body_id);

        match header {
            Some(clause) if clause.kind() == "for_clause" => StmtKind::For {
                init: self.opt_stmt(&clause, "initializer"),
                cond: clause
                    .child_by_field_name("condition")
                    .map(|c| self.convert_expr(&c)),
                post: self.opt_stmt(&clause, "update"),
                body,
            },
            Some(clause) if clause.kind() == "range_clause" => {
                let mut left = self.expr_list_field(&clause, "left").into_iter();
                StmtKind::Range {
                    key: left.next(),
                    value: left.next(),
                    define: has_token(&clause, ":="),
                    x: *self.field_expr(&clause, "right"),
                    body,
                }
            }
            Some(cond) => StmtKind::For {
                init: None,
                cond: Some(self.convert_expr(&cond)),
                post: None,
                body,
            },
            None => StmtKind::For {
                init: None,
                cond: None,
                post: None,
                body,
            },
        }
    }

    fn convert_clauses(&self, node: &TSNode) -> Vec<Stmt> {
        let mut clauses = Vec::new();
        for child in named_children(node) {
            let span = node_span(&child);
            match child.kind() {
                "expression_case" => {
                    let value = child.child_by_field_name("value");
                    let exclude: Vec<usize> = value.iter().map(|v| v.id()).collect();
                    clauses.push(Stmt::new(
                        StmtKind::CaseClause {
                            list: value
                                .map(|v| self.convert_expr_list(&v))
                                .unwrap_or_default(),
                            is_default: false,
                            body: self.convert_stmt_children(&child, &exclude),
                        },
                        span,
                    ));
                }
                "type_case" => {
                    let types = field_children(&child, "type");
                    let exclude: Vec<usize> = types.iter().map(|t| t.id()).collect();
                    clauses.push(Stmt::new(
                        StmtKind::CaseClause {
                            list: types.iter().map(|t| self.convert_expr(t)).collect(),
                            is_default: false,
                            body: self.convert_stmt_children(&child, &exclude),
                        },
                        span,
                    ));
                }
                "communication_case" => {
                    let comm = child.child_by_field_name("communication");
                    let exclude: Vec<usize> = comm.iter().map(|c| c.id()).collect();
                    clauses.push(Stmt::new(
                        StmtKind::CommClause {
                            comm: comm.map(|c| Box::new(self.convert_stmt(&c))),
                            body: self.convert_stmt_children(&child, &exclude),
                        },
                        span,
                    ));
                }
                "default_case" => {
                    let body = self.convert_stmt_children(&child, &[]);
                    let kind = if node.kind() == "select_statement" {
                        StmtKind::CommClause { comm: None, body }
                    } else {
                        StmtKind::CaseClause {
                            list: Vec::new(),
                            is_default: true,
                            body,
                        }
                    };
                    clauses.push(Stmt::new(kind, span));
                }
                _ => {}
            }
        }
        clauses
    }
}
