//! Go surface syntax
//!
//! A closed tagged union for the syntax the lowering pass consumes. Type
//! syntax shares the expression union (as in `go/ast`), because the
//! lowering has to decide whether `T(x)` is a call or a conversion by
//! looking at the shape of `T`.

use crate::shared::models::Span;

/// Identifier with its span
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// `_`
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// Source comment (line or block)
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// One parsed `.go` file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
    pub comments: Vec<Comment>,
    pub span: Span,
}

/// `import alias "path"`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    /// Explicit name: an identifier, `.` or `_`
    pub alias: Option<Ident>,
    /// Raw (still quoted) path literal
    pub path: String,
    pub span: Span,
}

impl ImportSpec {
    /// Import path without quotes
    pub fn unquoted_path(&self) -> &str {
        self.path.trim_matches(|c| c == '"' || c == '`')
    }

    /// Name the package is visible under in the importing file
    pub fn local_name(&self) -> &str {
        match &self.alias {
            Some(alias) => &alias.name,
            None => self
                .unquoted_path()
                .rsplit('/')
                .next()
                .unwrap_or_default(),
        }
    }
}

/// Top-level or block-level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
    Bad(Span),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Func(f) => f.span,
            Decl::Gen(g) => g.span,
            Decl::Bad(span) => *span,
        }
    }
}

/// `func (recv) Name[T any](params) results { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub type_params: Option<FieldList>,
    pub sig: FuncType,
    pub body: Option<Block>,
    pub span: Span,
}

/// `var`, `const`, `type` or `import` declaration group
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub kind: GenDeclKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenDeclKind {
    Var(Vec<ValueSpec>),
    Const(Vec<ValueSpec>),
    Type(Vec<TypeSpec>),
    Import(Vec<ImportSpec>),
}

/// `a, b T = x, y`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

/// `Name[T any] Type` or `Name = Type`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Option<FieldList>,
    pub is_alias: bool,
    pub ty: Expr,
    pub span: Span,
}

/// Parameter, result, struct field, interface element or type parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<Ident>,
    /// Interface method elements carry their signature as
    /// [`ExprKind::FuncType`]; embedded fields and elements have no names.
    pub ty: Expr,
    pub tag: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldList {
    pub list: Vec<Field>,
    pub span: Span,
}

impl FieldList {
    pub fn empty(span: Span) -> Self {
        Self {
            list: Vec::new(),
            span,
        }
    }
}

/// Function signature
#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub params: FieldList,
    pub results: Option<FieldList>,
    pub span: Span,
}

/// `{ ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn boxed(kind: ExprKind, span: Span) -> Box<Self> {
        Box::new(Self::new(kind, span))
    }

    /// Identifier name if this is a plain identifier
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this is unambiguously type syntax (never a value)
    pub fn is_type_syntax(&self) -> bool {
        match &self.kind {
            ExprKind::ArrayType { .. }
            | ExprKind::StructType(_)
            | ExprKind::FuncType(_)
            | ExprKind::InterfaceType(_)
            | ExprKind::MapType { .. }
            | ExprKind::ChanType { .. } => true,
            ExprKind::Paren(inner) => inner.is_type_syntax() || inner.is_pointer_type_syntax(),
            _ => false,
        }
    }

    fn is_pointer_type_syntax(&self) -> bool {
        match &self.kind {
            ExprKind::Star(inner) => matches!(
                inner.kind,
                ExprKind::Ident(_) | ExprKind::Selector { .. } | ExprKind::Index { .. }
            ) || inner.is_type_syntax(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Unparseable or unsupported source construct
    Bad,
    Ident(String),
    BasicLit {
        kind: LitKind,
        value: String,
    },
    /// `T{a, k: v}`; `ty` is `None` for elided nested literal types
    CompositeLit {
        ty: Option<Box<Expr>>,
        elts: Vec<Expr>,
    },
    FuncLit {
        sig: FuncType,
        body: Block,
    },
    Paren(Box<Expr>),
    Selector {
        x: Box<Expr>,
        sel: Ident,
    },
    /// `x[i]`, or a generic instantiation `F[T1, T2]`
    Index {
        x: Box<Expr>,
        indices: Vec<Expr>,
    },
    Slice {
        x: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    /// `x.(T)`; `ty` is `None` for the `x.(type)` switch guard
    TypeAssert {
        x: Box<Expr>,
        ty: Option<Box<Expr>>,
    },
    Call {
        fun: Box<Expr>,
        type_args: Vec<Expr>,
        args: Vec<Expr>,
        has_ellipsis: bool,
    },
    /// `*x`: dereference in value position, pointer type in type position
    Star(Box<Expr>),
    Unary {
        op: String,
        x: Box<Expr>,
    },
    Binary {
        op: String,
        x: Box<Expr>,
        y: Box<Expr>,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    /// `[N]T`, `[...]T` (len = Ellipsis) or `[]T` (len = None)
    ArrayType {
        len: Option<Box<Expr>>,
        elt: Box<Expr>,
    },
    StructType(FieldList),
    FuncType(FuncType),
    InterfaceType(FieldList),
    MapType {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    ChanType {
        dir: ChanDir,
        value: Box<Expr>,
    },
    /// `...T` in a variadic parameter, or `[...]` array length
    Ellipsis(Option<Box<Expr>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Bad,
    Decl(GenDecl),
    Empty,
    Labeled {
        label: Ident,
        stmt: Box<Stmt>,
    },
    Expr(Expr),
    Send {
        chan: Expr,
        value: Expr,
    },
    IncDec {
        x: Expr,
        inc: bool,
    },
    /// `=`, `op=` or `:=` (see `define`)
    Assign {
        lhs: Vec<Expr>,
        op: String,
        rhs: Vec<Expr>,
    },
    Go(Expr),
    Defer(Expr),
    Return(Vec<Expr>),
    Branch {
        kind: BranchKind,
        label: Option<Ident>,
    },
    Block(Block),
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        then: Block,
        els: Option<Box<Stmt>>,
    },
    /// `case a, b:` / `default:` (empty list) inside a switch body
    CaseClause {
        list: Vec<Expr>,
        is_default: bool,
        body: Vec<Stmt>,
    },
    Switch {
        init: Option<Box<Stmt>>,
        tag: Option<Expr>,
        clauses: Vec<Stmt>,
        body_span: Span,
    },
    /// `switch v := x.(type) { ... }`
    TypeSwitch {
        init: Option<Box<Stmt>>,
        binding: Option<Ident>,
        subject: Expr,
        clauses: Vec<Stmt>,
        body_span: Span,
    },
    /// `case <-ch:` / `default:` inside a select body
    CommClause {
        comm: Option<Box<Stmt>>,
        body: Vec<Stmt>,
    },
    Select {
        clauses: Vec<Stmt>,
        body_span: Span,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
    },
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        x: Expr,
        body: Block,
    },
}

impl StmtKind {
    pub fn is_define(&self) -> bool {
        matches!(self, StmtKind::Assign { op, .. } if op == ":=")
    }
}
