//! Graph node model
//!
//! One [`Node`] struct carries the provenance shared by every vertex; the
//! category-specific payload is a closed enum ([`NodeKind`]). Children are
//! referenced by [`NodeId`] into the per-file [`Graph`](super::Graph) arena.

use std::fmt;
use std::sync::Arc;

use super::types::Type;
use crate::shared::models::Location;

/// Index of a node in its file's graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Graph vertex
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Identity
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    pub id: NodeId,

    /// Local (display) name
    pub name: String,

    /// Fully qualified name (`main.Foo`, `main.T.M`); empty for anonymous nodes
    pub fqn: String,

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Provenance
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    /// Verbatim source text of the construct
    pub code: String,

    /// `None` only for synthetic nodes
    pub location: Option<Location>,

    pub comment: Option<String>,

    /// Producing-language tag
    pub language: Arc<str>,

    /// Synthesized by the frontend rather than written in source
    pub implicit: bool,

    pub kind: NodeKind,
}

impl Node {
    pub fn as_declaration(&self) -> Option<&Declaration> {
        match &self.kind {
            NodeKind::Declaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_statement(&self) -> Option<&Statement> {
        match &self.kind {
            NodeKind::Statement(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match &self.kind {
            NodeKind::Expression(e) => Some(e),
            _ => None,
        }
    }

    /// Type carried by expressions and typed declarations
    pub fn ty(&self) -> Option<&Type> {
        match &self.kind {
            NodeKind::Expression(e) => Some(&e.ty),
            NodeKind::Declaration(d) => d.ty(),
            NodeKind::Statement(_) => None,
        }
    }

    /// Short category label (`Variable`, `Call`, `Compound`, ...)
    pub fn label(&self) -> &'static str {
        match &self.kind {
            NodeKind::Declaration(d) => d.label(),
            NodeKind::Statement(s) => s.label(),
            NodeKind::Expression(e) => e.kind.label(),
        }
    }

    /// Direct children, in source order where the construct has one
    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Declaration(d) => d.children(),
            NodeKind::Statement(s) => s.children(),
            NodeKind::Expression(e) => e.kind.children(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Declaration(Declaration),
    Statement(Statement),
    Expression(Expression),
}

// ═══════════════════════════════════════════════════════════════════════════
// Declarations
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Struct,
    Interface,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Struct => "struct",
            RecordKind::Interface => "interface",
        }
    }
}

/// Shared payload of functions, methods and lambdas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionData {
    /// `Type::Function` signature
    pub ty: Type,
    pub type_parameters: Vec<NodeId>,
    pub parameters: Vec<NodeId>,
    /// Declared result types, one per result
    pub return_types: Vec<Type>,
    /// Variables declared for named results
    pub named_results: Vec<NodeId>,
    /// Compound body; `None` for bodiless declarations
    pub body: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    TranslationUnit {
        declarations: Vec<NodeId>,
    },
    Namespace {
        /// Module path + relative directory, or the package name
        path: String,
        declarations: Vec<NodeId>,
        /// Top-level statements: grouped tuple declarations and problems
        statements: Vec<NodeId>,
    },
    /// Imported package
    Include {
        filename: String,
    },
    Function(FunctionData),
    Method {
        function: FunctionData,
        receiver: Option<NodeId>,
        record: Option<NodeId>,
    },
    Record {
        kind: RecordKind,
        type_parameters: Vec<NodeId>,
        fields: Vec<NodeId>,
        methods: Vec<NodeId>,
        super_types: Vec<Type>,
    },
    Field {
        ty: Type,
        embedded: bool,
        tag: Option<String>,
    },
    Variable {
        ty: Type,
        initializer: Option<NodeId>,
    },
    Parameter {
        ty: Type,
        variadic: bool,
    },
    TypeParameter {
        ty: Type,
        constraint: Type,
    },
    /// Named type that is neither struct nor interface
    TypeAlias {
        target: Type,
        type_parameters: Vec<NodeId>,
        /// `type A = B` rather than `type A B`
        is_alias: bool,
    },
}

impl Declaration {
    pub fn ty(&self) -> Option<&Type> {
        match self {
            Declaration::Function(f) => Some(&f.ty),
            Declaration::Method { function, .. } => Some(&function.ty),
            Declaration::Field { ty, .. }
            | Declaration::Variable { ty, .. }
            | Declaration::Parameter { ty, .. }
            | Declaration::TypeParameter { ty, .. } => Some(ty),
            Declaration::TypeAlias { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn function(&self) -> Option<&FunctionData> {
        match self {
            Declaration::Function(f) => Some(f),
            Declaration::Method { function, .. } => Some(function),
            _ => None,
        }
    }

    pub fn function_mut(&mut self) -> Option<&mut FunctionData> {
        match self {
            Declaration::Function(f) => Some(f),
            Declaration::Method { function, .. } => Some(function),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Declaration::TranslationUnit { .. } => "TranslationUnit",
            Declaration::Namespace { .. } => "Namespace",
            Declaration::Include { .. } => "Include",
            Declaration::Function(_) => "Function",
            Declaration::Method { .. } => "Method",
            Declaration::Record { .. } => "Record",
            Declaration::Field { .. } => "Field",
            Declaration::Variable { .. } => "Variable",
            Declaration::Parameter { .. } => "Parameter",
            Declaration::TypeParameter { .. } => "TypeParameter",
            Declaration::TypeAlias { .. } => "TypeAlias",
        }
    }

    fn children(&self) -> Vec<NodeId> {
        fn function_children(f: &FunctionData, receiver: Option<NodeId>) -> Vec<NodeId> {
            let mut out = Vec::new();
            out.extend(f.type_parameters.iter().copied());
            out.extend(receiver);
            out.extend(f.parameters.iter().copied());
            out.extend(f.named_results.iter().copied());
            out.extend(f.body);
            out
        }

        match self {
            Declaration::TranslationUnit { declarations } => declarations.clone(),
            Declaration::Namespace {
                declarations,
                statements,
                ..
            } => declarations.iter().chain(statements).copied().collect(),
            Declaration::Function(f) => function_children(f, None),
            Declaration::Method {
                function, receiver, ..
            } => function_children(function, *receiver),
            Declaration::Record {
                type_parameters,
                fields,
                methods,
                ..
            } => type_parameters
                .iter()
                .chain(fields)
                .chain(methods)
                .copied()
                .collect(),
            Declaration::Variable { initializer, .. } => initializer.iter().copied().collect(),
            Declaration::TypeAlias {
                type_parameters, ..
            } => type_parameters.clone(),
            Declaration::Include { .. }
            | Declaration::Field { .. }
            | Declaration::Parameter { .. }
            | Declaration::TypeParameter { .. } => Vec::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Statements
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchKind {
    Expression,
    Type,
    Select,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Ordered child sequence with its own scope
    Compound {
        statements: Vec<NodeId>,
    },
    Return {
        values: Vec<NodeId>,
    },
    If {
        initializer: Option<NodeId>,
        condition: Option<NodeId>,
        then_branch: Option<NodeId>,
        else_branch: Option<NodeId>,
    },
    /// Clauses live flat in the `body` Compound as Case/Default markers
    Switch {
        kind: SwitchKind,
        initializer: Option<NodeId>,
        selector: Option<NodeId>,
        /// `v` in `switch v := x.(type)`
        binding: Option<NodeId>,
        body: Option<NodeId>,
    },
    Case {
        expressions: Vec<NodeId>,
    },
    Default,
    For {
        initializer: Option<NodeId>,
        condition: Option<NodeId>,
        iteration: Option<NodeId>,
        body: Option<NodeId>,
    },
    ForEach {
        /// DeclarationStatement of the key/value Variables (defining form only)
        variable: Option<NodeId>,
        iterable: Option<NodeId>,
        body: Option<NodeId>,
    },
    Label {
        label: String,
        sub_statement: Option<NodeId>,
    },
    Goto {
        label: String,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
    Fallthrough,
    Declaration {
        declarations: Vec<NodeId>,
        /// Single multi-value initializer (`a, b := f()`)
        tuple_initializer: Option<NodeId>,
        /// Implicit Assigns for names a mixed `:=` reuses from the same scope
        assignments: Vec<NodeId>,
    },
    Empty,
}

impl Statement {
    pub fn label(&self) -> &'static str {
        match self {
            Statement::Compound { .. } => "Compound",
            Statement::Return { .. } => "Return",
            Statement::If { .. } => "If",
            Statement::Switch { .. } => "Switch",
            Statement::Case { .. } => "Case",
            Statement::Default => "Default",
            Statement::For { .. } => "For",
            Statement::ForEach { .. } => "ForEach",
            Statement::Label { .. } => "Label",
            Statement::Goto { .. } => "Goto",
            Statement::Break { .. } => "Break",
            Statement::Continue { .. } => "Continue",
            Statement::Fallthrough => "Fallthrough",
            Statement::Declaration { .. } => "DeclarationStatement",
            Statement::Empty => "Empty",
        }
    }

    fn children(&self) -> Vec<NodeId> {
        let opts = |items: &[Option<NodeId>]| -> Vec<NodeId> { items.iter().flatten().copied().collect() };
        match self {
            Statement::Compound { statements } => statements.clone(),
            Statement::Return { values } => values.clone(),
            Statement::If {
                initializer,
                condition,
                then_branch,
                else_branch,
            } => opts(&[*initializer, *condition, *then_branch, *else_branch]),
            Statement::Switch {
                initializer,
                selector,
                binding,
                body,
                ..
            } => opts(&[*initializer, *selector, *binding, *body]),
            Statement::Case { expressions } => expressions.clone(),
            Statement::For {
                initializer,
                condition,
                iteration,
                body,
            } => opts(&[*initializer, *condition, *iteration, *body]),
            Statement::ForEach {
                variable,
                iterable,
                body,
            } => opts(&[*variable, *iterable, *body]),
            Statement::Label { sub_statement, .. } => opts(&[*sub_statement]),
            Statement::Declaration {
                declarations,
                tuple_initializer,
                assignments,
            } => declarations
                .iter()
                .copied()
                .chain(*tuple_initializer)
                .chain(assignments.iter().copied())
                .collect(),
            Statement::Default
            | Statement::Goto { .. }
            | Statement::Break { .. }
            | Statement::Continue { .. }
            | Statement::Fallthrough
            | Statement::Empty => Vec::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════════

/// Expression payload: every expression carries a type
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub ty: Type,
    pub kind: ExpressionKind,
}

/// Decoded literal value
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(u64),
    Float(f64),
    /// Imaginary literals keep their source text
    Imaginary(String),
    Rune(char),
    String(String),
    Bool(bool),
    /// `nil`
    Null,
    /// Source text that could not be decoded (overflow, bad escape)
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Call {
        callee: NodeId,
        arguments: Vec<NodeId>,
        type_arguments: Vec<Type>,
    },
    MemberCall {
        base: NodeId,
        member: String,
        /// The Member expression the call was built from
        callee: NodeId,
        arguments: Vec<NodeId>,
        type_arguments: Vec<Type>,
    },
    Member {
        base: NodeId,
        member: String,
    },
    /// `new(T)`: pointer-typed allocation around a Construct
    New {
        initializer: Option<NodeId>,
    },
    Construct {
        arguments: Vec<NodeId>,
    },
    /// `make([]T, n, c)`
    ArrayCreation {
        dimensions: Vec<NodeId>,
    },
    Subscript {
        base: NodeId,
        index: NodeId,
    },
    /// `lo:hi:max` inside a slice expression
    Range {
        floor: Option<NodeId>,
        ceiling: Option<NodeId>,
        third: Option<NodeId>,
    },
    Binary {
        operator: String,
        lhs: NodeId,
        rhs: NodeId,
    },
    /// Also `go`/`defer` wrappers and postfix `++`/`--`
    Unary {
        operator: String,
        operand: NodeId,
        postfix: bool,
    },
    Assign {
        operator: String,
        lhs: Vec<NodeId>,
        rhs: Vec<NodeId>,
    },
    Literal {
        value: LiteralValue,
    },
    /// DeclaredReference; `refers_to` is `None` until resolved
    Reference {
        refers_to: Option<NodeId>,
    },
    KeyValue {
        key: NodeId,
        value: NodeId,
    },
    InitializerList {
        initializers: Vec<NodeId>,
    },
    Cast {
        cast_type: Type,
        expression: NodeId,
    },
    Lambda {
        function: NodeId,
    },
    /// Type syntax in value position (`make` arguments, type switch cases)
    TypeExpr,
    /// Placeholder for syntax the frontend could not lower
    Problem {
        message: String,
    },
}

impl ExpressionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ExpressionKind::Call { .. } => "Call",
            ExpressionKind::MemberCall { .. } => "MemberCall",
            ExpressionKind::Member { .. } => "Member",
            ExpressionKind::New { .. } => "New",
            ExpressionKind::Construct { .. } => "Construct",
            ExpressionKind::ArrayCreation { .. } => "ArrayCreation",
            ExpressionKind::Subscript { .. } => "Subscript",
            ExpressionKind::Range { .. } => "Range",
            ExpressionKind::Binary { .. } => "BinaryOperator",
            ExpressionKind::Unary { .. } => "UnaryOperator",
            ExpressionKind::Assign { .. } => "Assign",
            ExpressionKind::Literal { .. } => "Literal",
            ExpressionKind::Reference { .. } => "DeclaredReference",
            ExpressionKind::KeyValue { .. } => "KeyValue",
            ExpressionKind::InitializerList { .. } => "InitializerList",
            ExpressionKind::Cast { .. } => "Cast",
            ExpressionKind::Lambda { .. } => "Lambda",
            ExpressionKind::TypeExpr => "TypeExpression",
            ExpressionKind::Problem { .. } => "Problem",
        }
    }

    fn children(&self) -> Vec<NodeId> {
        match self {
            ExpressionKind::Call {
                callee, arguments, ..
            } => std::iter::once(*callee).chain(arguments.iter().copied()).collect(),
            ExpressionKind::MemberCall {
                callee, arguments, ..
            } => std::iter::once(*callee).chain(arguments.iter().copied()).collect(),
            ExpressionKind::Member { base, .. } => vec![*base],
            ExpressionKind::New { initializer } => initializer.iter().copied().collect(),
            ExpressionKind::Construct { arguments } => arguments.clone(),
            ExpressionKind::ArrayCreation { dimensions } => dimensions.clone(),
            ExpressionKind::Subscript { base, index } => vec![*base, *index],
            ExpressionKind::Range {
                floor,
                ceiling,
                third,
            } => [*floor, *ceiling, *third].into_iter().flatten().collect(),
            ExpressionKind::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            ExpressionKind::Unary { operand, .. } => vec![*operand],
            ExpressionKind::Assign { lhs, rhs, .. } => lhs.iter().chain(rhs).copied().collect(),
            ExpressionKind::KeyValue { key, value } => vec![*key, *value],
            ExpressionKind::InitializerList { initializers } => initializers.clone(),
            ExpressionKind::Cast { expression, .. } => vec![*expression],
            ExpressionKind::Lambda { function } => vec![*function],
            ExpressionKind::Literal { .. }
            | ExpressionKind::Reference { .. }
            | ExpressionKind::TypeExpr
            | ExpressionKind::Problem { .. } => Vec::new(),
        }
    }
}
