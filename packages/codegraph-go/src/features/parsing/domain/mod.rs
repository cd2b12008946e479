//! Parsing domain models

pub mod ast;

pub use ast::{
    Block, BranchKind, ChanDir, Comment, Decl, Expr, ExprKind, Field, FieldList, FuncDecl,
    FuncType, GenDecl, GenDeclKind, Ident, ImportSpec, LitKind, SourceFile, Stmt, StmtKind,
    TypeSpec, ValueSpec,
};
