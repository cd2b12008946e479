//! Type lowering
//!
//! Maps surface type syntax onto the [`Type`] algebra. Never fails: shapes
//! without a mapping become [`Type::Unknown`] and are reported.

use crate::features::cpg::Type;
use crate::features::lowering::domain::ProblemKind;
use crate::features::parsing::domain::{Expr, ExprKind, FieldList, FuncType};
use crate::features::scope::SymbolKind;

use super::builtins::{is_primitive, is_unqualified_object};
use super::context::LoweringContext;

impl LoweringContext<'_> {
    pub fn lower_type(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::Ident(name) => self.named_type(name),
            ExprKind::Selector { x, sel } => match x.as_ident() {
                Some(pkg) => Type::object(format!("{}.{}", pkg, sel.name)),
                None => self.unknown_type(expr, "selector type with non-package base"),
            },
            ExprKind::Paren(inner) => self.lower_type(inner),
            ExprKind::Star(inner) => self.lower_type(inner).pointer_to(),
            ExprKind::ArrayType { elt, .. } => self.lower_type(elt).array_of(),
            ExprKind::Ellipsis(Some(elt)) => self.lower_type(elt).array_of(),
            ExprKind::MapType { key, value } => {
                let generics = vec![self.lower_type(key), self.lower_type(value)];
                Type::generic_object("map", generics)
            }
            ExprKind::ChanType { value, .. } => {
                let generics = vec![self.lower_type(value)];
                Type::generic_object("chan", generics)
            }
            ExprKind::FuncType(sig) => self.function_type(sig),
            ExprKind::InterfaceType(elements) => {
                let members = self.member_type_names(elements);
                Type::object(format!("interface{{{}}}", members.join("; ")))
            }
            ExprKind::StructType(fields) => {
                let members = self.member_type_names(fields);
                Type::object(format!("struct{{{}}}", members.join("; ")))
            }
            ExprKind::Index { x, indices } => {
                let generics: Vec<Type> = indices.iter().map(|i| self.lower_type(i)).collect();
                match self.lower_type(x) {
                    Type::Object { name, .. } => Type::generic_object(name, generics),
                    Type::Unknown => Type::Unknown,
                    _ => self.unknown_type(expr, "instantiation of a non-named type"),
                }
            }
            // Constraint unions and approximation elements
            ExprKind::Binary { op, x, y } if op == "|" => {
                let name = format!("{} | {}", self.lower_type(x), self.lower_type(y));
                Type::object(name)
            }
            ExprKind::Unary { op, x } if op == "~" => {
                Type::object(format!("~{}", self.lower_type(x)))
            }
            _ => self.unknown_type(expr, "unsupported type syntax"),
        }
    }

    pub(super) fn named_type(&mut self, name: &str) -> Type {
        if is_primitive(name) {
            return Type::primitive(name);
        }
        if is_unqualified_object(name) {
            return Type::object(name);
        }
        match self.scopes.resolve(name) {
            Some(symbol) if symbol.kind == SymbolKind::TypeParameter => {
                Type::Parameterized(name.to_string())
            }
            _ => Type::object(self.file.qualify(name)),
        }
    }

    fn unknown_type(&mut self, expr: &Expr, what: &str) -> Type {
        let code = expr.span.text(self.factory.source()).to_string();
        self.report(
            ProblemKind::Unsupported,
            format!("{}: `{}`", what, code),
            Some(expr.span),
        );
        Type::Unknown
    }

    /// Field/element types, repeated once per declared name
    pub fn field_types(&mut self, fields: &FieldList) -> Vec<Type> {
        let mut types = Vec::new();
        for field in &fields.list {
            let ty = self.lower_type(&field.ty);
            let count = field.names.len().max(1);
            types.extend(std::iter::repeat(ty).take(count));
        }
        types
    }

    fn member_type_names(&mut self, fields: &FieldList) -> Vec<String> {
        self.field_types(fields).iter().map(|t| t.to_string()).collect()
    }

    /// `Type::Function` with a display name in Go signature style
    pub fn function_type(&mut self, sig: &FuncType) -> Type {
        let parameters = self.field_types(&sig.params);
        let returns = match &sig.results {
            Some(results) => self.field_types(results),
            None => Vec::new(),
        };
        let name = function_type_name(&parameters, &returns);
        Type::Function {
            name,
            parameters,
            returns,
        }
    }
}

/// `func(p1, p2)`, `func(p) r`, `func(p) (r1, r2)`
pub fn function_type_name(parameters: &[Type], returns: &[Type]) -> String {
    let params: Vec<String> = parameters.iter().map(|t| t.to_string()).collect();
    let mut name = format!("func({})", params.join(", "));
    match returns {
        [] => {}
        [single] => {
            name.push(' ');
            name.push_str(&single.to_string());
        }
        many => {
            let results: Vec<String> = many.iter().map(|t| t.to_string()).collect();
            name.push_str(&format!(" ({})", results.join(", ")));
        }
    }
    name
}
