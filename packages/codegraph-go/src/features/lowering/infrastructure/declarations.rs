//! Declaration lowering
//!
//! Drives a file's pass: TranslationUnit and Namespace, imports, functions
//! and methods (with receiver binding and record attachment), records,
//! type aliases and value specs.

use tracing::debug;

use crate::features::cpg::{
    Declaration, ExpressionKind, FunctionData, NodeId, NodeKind, RecordKind, Statement, Type,
};
use crate::features::lowering::domain::ProblemKind;
use crate::features::parsing::domain::{
    Block, Decl, Expr, ExprKind, Field, FieldList, FuncDecl, FuncType, GenDecl, GenDeclKind,
    Ident, ImportSpec, SourceFile, StmtKind, TypeSpec, ValueSpec,
};
use crate::features::scope::{ScopeKind, SymbolKind};
use crate::shared::models::{FrontendError, Result, Span};

use super::context::LoweringContext;
use super::types::function_type_name;

/// Declarations produced by one `var`/`const`/`type` group
#[derive(Debug, Default)]
pub struct DeclGroup {
    pub declarations: Vec<NodeId>,
    /// Single multi-value initializer shared by the group's names
    pub tuple_initializer: Option<NodeId>,
}

impl LoweringContext<'_> {
    /// Lower a whole file. Returns `(translation_unit, namespace)`.
    pub fn lower_source_file(&mut self, file: &SourceFile) -> Result<(NodeId, NodeId)> {
        let path = self.file.path.clone();
        let tu = self.factory.create(
            NodeKind::Declaration(Declaration::TranslationUnit {
                declarations: Vec::new(),
            }),
            path.to_string(),
            path.to_string(),
            Some(file.span),
        )?;
        self.scopes.reset_to_global(tu);

        let mut tu_declarations = Vec::new();
        for import in &file.imports {
            tu_declarations.push(self.lower_import(import)?);
        }

        let namespace_path = self.file.namespace_path.clone();
        let namespace = self.factory.declaration(
            Declaration::Namespace {
                path: namespace_path.clone(),
                declarations: Vec::new(),
                statements: Vec::new(),
            },
            file.package.name.clone(),
            namespace_path.clone(),
            file.span,
        )?;
        tu_declarations.push(namespace);

        let (declarations, statements) =
            self.scoped(namespace, ScopeKind::Namespace, |ctx| {
                let mut declarations = Vec::new();
                let mut statements = Vec::new();
                for decl in &file.decls {
                    match decl {
                        Decl::Func(func) => declarations.push(ctx.lower_func_decl(func)?),
                        Decl::Gen(group_decl) => {
                            let group = ctx.lower_gen_decl(group_decl)?;
                            if let Some(tuple) = group.tuple_initializer {
                                let stmt = ctx.factory.statement(
                                    Statement::Declaration {
                                        declarations: group.declarations.clone(),
                                        tuple_initializer: Some(tuple),
                                        assignments: Vec::new(),
                                    },
                                    group_decl.span,
                                )?;
                                statements.push(stmt);
                            }
                            declarations.extend(group.declarations);
                        }
                        Decl::Bad(span) => statements.push(ctx.problem_expression(
                            ProblemKind::Malformed,
                            "unparseable top-level declaration",
                            *span,
                        )?),
                    }
                }
                Ok((declarations, statements))
            })?;

        self.factory.set_kind(
            namespace,
            NodeKind::Declaration(Declaration::Namespace {
                path: namespace_path,
                declarations,
                statements,
            }),
        )?;
        self.factory.set_kind(
            tu,
            NodeKind::Declaration(Declaration::TranslationUnit {
                declarations: tu_declarations,
            }),
        )?;

        let depth = self.scopes.depth();
        if depth != 0 {
            return Err(FrontendError::UnbalancedScopes {
                file: path.to_string(),
                depth,
            });
        }
        Ok((tu, namespace))
    }

    fn lower_import(&mut self, import: &ImportSpec) -> Result<NodeId> {
        let local = import.local_name().to_string();
        let path = import.unquoted_path().to_string();
        let include = self.factory.declaration(
            Declaration::Include {
                filename: path.clone(),
            },
            local.clone(),
            path,
            import.span,
        )?;
        if local != "_" && local != "." {
            self.scopes
                .add_declaration(&local, include, SymbolKind::Package);
            self.file.imports.insert(local, include);
        }
        Ok(include)
    }

    pub fn lower_gen_decl(&mut self, decl: &GenDecl) -> Result<DeclGroup> {
        let mut group = DeclGroup::default();
        match &decl.kind {
            GenDeclKind::Var(specs) | GenDeclKind::Const(specs) => {
                for spec in specs {
                    let (declarations, tuple) = self.lower_value_spec(spec)?;
                    group.declarations.extend(declarations);
                    if tuple.is_some() && group.tuple_initializer.is_some() {
                        debug!(file = %self.file.path, "several tuple initializers in one group");
                    }
                    group.tuple_initializer = group.tuple_initializer.or(tuple);
                }
            }
            GenDeclKind::Type(specs) => {
                for spec in specs {
                    group.declarations.push(self.lower_type_spec(spec)?);
                }
            }
            GenDeclKind::Import(specs) => {
                for spec in specs {
                    group.declarations.push(self.lower_import(spec)?);
                }
            }
        }
        Ok(group)
    }

    /// One Variable per name, bound positionally to the initializers
    pub fn lower_value_spec(&mut self, spec: &ValueSpec) -> Result<(Vec<NodeId>, Option<NodeId>)> {
        let declared = spec.ty.as_ref().map(|t| self.lower_type(t));
        let mut values = Vec::with_capacity(spec.values.len());
        for value in &spec.values {
            values.push(self.lower_expr(value)?);
        }

        let binding = self.bind_initializers(spec.names.len(), values, spec.span);
        let tuple_types = binding
            .tuple
            .map(|t| self.tuple_element_types(t))
            .unwrap_or_default();

        let single = spec.names.len() == 1;
        let mut declarations = Vec::with_capacity(spec.names.len());
        for (i, name) in spec.names.iter().enumerate() {
            let initializer = binding.initializers.get(i).copied().flatten();
            let ty = declared
                .clone()
                .or_else(|| initializer.map(|init| self.factory.type_of(init)))
                .or_else(|| tuple_types.get(i).cloned())
                .unwrap_or(Type::Unknown);
            let span = if single { spec.span } else { name.span };
            declarations.push(self.declare_variable(name, ty, initializer, span)?);
        }
        Ok((declarations, binding.tuple))
    }

    /// Variable declaration registered in the innermost scope
    pub fn declare_variable(
        &mut self,
        name: &Ident,
        ty: Type,
        initializer: Option<NodeId>,
        span: Span,
    ) -> Result<NodeId> {
        let fqn = self.declaration_fqn(&name.name);
        let id = self.factory.declaration(
            Declaration::Variable { ty, initializer },
            name.name.clone(),
            fqn,
            span,
        )?;
        self.scopes
            .add_declaration(&name.name, id, SymbolKind::Variable);
        Ok(id)
    }

    /// Match N names against M lowered values
    pub fn bind_initializers(&mut self, names: usize, values: Vec<NodeId>, span: Span) -> Binding {
        let count = values.len();
        if count == names {
            return Binding {
                initializers: values.into_iter().map(Some).collect(),
                tuple: None,
            };
        }
        if count == 0 {
            return Binding {
                initializers: vec![None; names],
                tuple: None,
            };
        }
        if count == 1 && names > 1 {
            debug!(file = %self.file.path, names, "tuple initializer");
            return Binding {
                initializers: vec![None; names],
                tuple: values.first().copied(),
            };
        }
        self.report(
            ProblemKind::Malformed,
            format!("{} names but {} initializers", names, count),
            Some(span),
        );
        Binding {
            initializers: (0..names).map(|i| values.get(i).copied()).collect(),
            tuple: None,
        }
    }

    /// Result types of a multi-value call, read from its callee's signature
    pub fn tuple_element_types(&self, call: NodeId) -> Vec<Type> {
        let callee = self
            .factory
            .graph()
            .get(call)
            .and_then(|n| n.as_expression())
            .and_then(|e| match &e.kind {
                ExpressionKind::Call { callee, .. } | ExpressionKind::MemberCall { callee, .. } => {
                    Some(*callee)
                }
                _ => None,
            });
        match callee.map(|c| self.factory.type_of(c)) {
            Some(Type::Function { returns, .. }) => returns,
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Named types
    // ------------------------------------------------------------------

    pub fn lower_type_spec(&mut self, spec: &TypeSpec) -> Result<NodeId> {
        let record_kind = match (&spec.ty.kind, spec.is_alias) {
            (ExprKind::StructType(_), false) => Some(RecordKind::Struct),
            (ExprKind::InterfaceType(_), false) => Some(RecordKind::Interface),
            _ => None,
        };
        match record_kind {
            Some(kind) => self.lower_record(spec, kind),
            None => self.lower_type_alias(spec),
        }
    }

    fn lower_record(&mut self, spec: &TypeSpec, kind: RecordKind) -> Result<NodeId> {
        let name = spec.name.name.clone();
        let fqn = self.declaration_fqn(&name);
        let id = self.factory.declaration(
            Declaration::Record {
                kind,
                type_parameters: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                super_types: Vec::new(),
            },
            name.clone(),
            fqn.clone(),
            spec.span,
        )?;
        self.scopes.add_declaration(&name, id, SymbolKind::Record);

        let record = self.scoped(id, ScopeKind::Record, |ctx| {
            let type_parameters = ctx.lower_type_params(spec.type_params.as_ref())?;
            let mut fields = Vec::new();
            let mut methods = Vec::new();
            let mut super_types = Vec::new();
            match &spec.ty.kind {
                ExprKind::StructType(list) => {
                    for field in &list.list {
                        fields.extend(ctx.lower_struct_field(field, &fqn)?);
                    }
                }
                ExprKind::InterfaceType(list) => {
                    for element in &list.list {
                        match (&element.ty.kind, element.names.first()) {
                            (ExprKind::FuncType(sig), Some(method_name)) => methods.push(
                                ctx.lower_interface_method(id, &fqn, method_name, sig, element.span)?,
                            ),
                            _ => super_types.push(ctx.lower_type(&element.ty)),
                        }
                    }
                }
                _ => {}
            }
            Ok(Declaration::Record {
                kind,
                type_parameters,
                fields,
                methods,
                super_types,
            })
        })?;
        self.factory.set_kind(id, NodeKind::Declaration(record))?;
        Ok(id)
    }

    /// One Field per name; an embedded field is named after its root type
    fn lower_struct_field(&mut self, field: &Field, record_fqn: &str) -> Result<Vec<NodeId>> {
        let ty = self.lower_type(&field.ty);
        let entries: Vec<(String, Span, bool)> = if field.names.is_empty() {
            vec![(ty.local_root_name(), field.span, true)]
        } else if field.names.len() == 1 {
            vec![(field.names[0].name.clone(), field.span, false)]
        } else {
            field
                .names
                .iter()
                .map(|n| (n.name.clone(), n.span, false))
                .collect()
        };

        let mut ids = Vec::with_capacity(entries.len());
        for (name, span, embedded) in entries {
            let id = self.factory.declaration(
                Declaration::Field {
                    ty: ty.clone(),
                    embedded,
                    tag: field.tag.clone(),
                },
                name.clone(),
                format!("{}.{}", record_fqn, name),
                span,
            )?;
            self.scopes.add_declaration(&name, id, SymbolKind::Field);
            ids.push(id);
        }
        Ok(ids)
    }

    fn lower_interface_method(
        &mut self,
        record: NodeId,
        record_fqn: &str,
        name: &Ident,
        sig: &FuncType,
        span: Span,
    ) -> Result<NodeId> {
        let id = self.factory.declaration(
            Declaration::Method {
                function: FunctionData::default(),
                receiver: None,
                record: Some(record),
            },
            name.name.clone(),
            format!("{}.{}", record_fqn, name.name),
            span,
        )?;
        let function = self.scoped(id, ScopeKind::Function, |ctx| {
            let mut data = FunctionData::default();
            ctx.lower_signature_into(&mut data, None, sig)?;
            Ok(data)
        })?;
        self.scopes
            .add_declaration(&name.name, id, SymbolKind::Method);
        self.factory.set_kind(
            id,
            NodeKind::Declaration(Declaration::Method {
                function,
                receiver: None,
                record: Some(record),
            }),
        )?;
        Ok(id)
    }

    fn lower_type_alias(&mut self, spec: &TypeSpec) -> Result<NodeId> {
        let name = spec.name.name.clone();
        let fqn = self.declaration_fqn(&name);
        let id = self.factory.declaration(
            Declaration::TypeAlias {
                target: Type::Unknown,
                type_parameters: Vec::new(),
                is_alias: spec.is_alias,
            },
            name.clone(),
            fqn,
            spec.span,
        )?;
        self.scopes.add_declaration(&name, id, SymbolKind::TypeAlias);

        let (target, type_parameters) = if spec.type_params.is_some() {
            self.scoped(id, ScopeKind::Block, |ctx| {
                let params = ctx.lower_type_params(spec.type_params.as_ref())?;
                Ok((ctx.lower_type(&spec.ty), params))
            })?
        } else {
            (self.lower_type(&spec.ty), Vec::new())
        };
        self.factory.set_kind(
            id,
            NodeKind::Declaration(Declaration::TypeAlias {
                target,
                type_parameters,
                is_alias: spec.is_alias,
            }),
        )?;
        Ok(id)
    }

    /// Declare every name first so constraints may refer to their siblings
    pub fn lower_type_params(&mut self, params: Option<&FieldList>) -> Result<Vec<NodeId>> {
        let Some(params) = params else {
            return Ok(Vec::new());
        };
        let mut declared = Vec::new();
        for field in &params.list {
            for name in &field.names {
                declared.push((self.declare_type_parameter(name)?, field));
            }
        }
        let mut ids = Vec::with_capacity(declared.len());
        for (id, field) in declared {
            let constraint = self.lower_type(&field.ty);
            if let Declaration::TypeParameter {
                constraint: slot, ..
            } = self.factory.declaration_mut(id)?
            {
                *slot = constraint;
            }
            ids.push(id);
        }
        Ok(ids)
    }

    fn declare_type_parameter(&mut self, name: &Ident) -> Result<NodeId> {
        let id = self.factory.declaration(
            Declaration::TypeParameter {
                ty: Type::Parameterized(name.name.clone()),
                constraint: Type::object("any"),
            },
            name.name.clone(),
            name.name.clone(),
            name.span,
        )?;
        self.scopes
            .add_declaration(&name.name, id, SymbolKind::TypeParameter);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Functions and methods
    // ------------------------------------------------------------------

    pub fn lower_func_decl(&mut self, func: &FuncDecl) -> Result<NodeId> {
        let name = func.name.name.clone();
        let receiver = func.recv.as_ref().and_then(|r| r.list.first());
        let is_method = func.recv.is_some();
        let receiver_type_name = receiver.and_then(|r| receiver_base_name(&r.ty));

        let fqn = match receiver_type_name {
            Some(record) => self.file.qualify(&format!("{}.{}", record, name)),
            None => self.file.qualify(&name),
        };
        let placeholder = if is_method {
            Declaration::Method {
                function: FunctionData::default(),
                receiver: None,
                record: None,
            }
        } else {
            Declaration::Function(FunctionData::default())
        };
        let id = self
            .factory
            .declaration(placeholder, name.clone(), fqn, func.span)?;
        if !is_method {
            self.scopes.add_declaration(&name, id, SymbolKind::Function);
        }

        let record = receiver_type_name.and_then(|r| self.record_named(r));

        let (function, receiver_var) = self.scoped(id, ScopeKind::Function, |ctx| {
            let mut data = FunctionData::default();
            let mut receiver_var = None;
            if let Some(field) = receiver {
                for param in receiver_type_params(&field.ty) {
                    data.type_parameters.push(ctx.declare_type_parameter(&param)?);
                }
                let ty = ctx.lower_type(&field.ty);
                if let Some(recv_name) = field.names.first().filter(|n| !n.is_blank()) {
                    receiver_var = Some(ctx.declare_variable(recv_name, ty, None, field.span)?);
                }
            }
            ctx.lower_signature_into(&mut data, func.type_params.as_ref(), &func.sig)?;
            if let Some(body) = &func.body {
                data.body = Some(ctx.lower_function_body(body)?);
            }
            Ok((data, receiver_var))
        })?;

        let kind = if is_method {
            match record {
                Some(record) => {
                    if !self
                        .scopes
                        .add_declaration_to(record, &name, id, SymbolKind::Method)
                    {
                        debug!(
                            method = %name,
                            record = %record,
                            "record has no member scope; method not registered"
                        );
                    }
                    if let Declaration::Record { methods, .. } =
                        self.factory.declaration_mut(record)?
                    {
                        methods.push(id);
                    }
                }
                None => debug!(
                    method = %name,
                    receiver = receiver_type_name.unwrap_or("?"),
                    "receiver record not declared earlier in this file"
                ),
            }
            Declaration::Method {
                function,
                receiver: receiver_var,
                record,
            }
        } else {
            Declaration::Function(function)
        };
        self.factory.set_kind(id, NodeKind::Declaration(kind))?;
        Ok(id)
    }

    /// Type parameters, parameters and results into the current (function)
    /// scope; fills in the signature type
    pub fn lower_signature_into(
        &mut self,
        data: &mut FunctionData,
        type_params: Option<&FieldList>,
        sig: &FuncType,
    ) -> Result<()> {
        let declared = self.lower_type_params(type_params)?;
        data.type_parameters.extend(declared);

        let mut parameter_types = Vec::new();
        for field in &sig.params.list {
            let variadic = matches!(field.ty.kind, ExprKind::Ellipsis(_));
            let ty = self.lower_type(&field.ty);
            for (name, span) in field_entries(field) {
                let id = self.factory.declaration(
                    Declaration::Parameter {
                        ty: ty.clone(),
                        variadic,
                    },
                    name.clone(),
                    name.clone(),
                    span,
                )?;
                self.scopes.add_declaration(&name, id, SymbolKind::Variable);
                data.parameters.push(id);
                parameter_types.push(ty.clone());
            }
        }

        if let Some(results) = &sig.results {
            for field in &results.list {
                let ty = self.lower_type(&field.ty);
                if field.names.is_empty() {
                    data.return_types.push(ty);
                    continue;
                }
                for name in &field.names {
                    data.return_types.push(ty.clone());
                    let span = if field.names.len() == 1 {
                        field.span
                    } else {
                        name.span
                    };
                    data.named_results
                        .push(self.declare_variable(name, ty.clone(), None, span)?);
                }
            }
        }

        data.ty = Type::Function {
            name: function_type_name(&parameter_types, &data.return_types),
            parameters: parameter_types,
            returns: data.return_types.clone(),
        };
        Ok(())
    }

    /// Body Compound with a synthetic trailing Return when needed
    pub fn lower_function_body(&mut self, body: &Block) -> Result<NodeId> {
        let compound = self.lower_block(body)?;
        let ends_in_return = matches!(
            body.stmts.last().map(|s| &s.kind),
            Some(StmtKind::Return(_))
        );
        if !ends_in_return {
            let ret = self
                .factory
                .implicit_statement(Statement::Return { values: Vec::new() })?;
            if let NodeKind::Statement(Statement::Compound { statements }) =
                &mut self.factory.node_mut(compound)?.kind
            {
                statements.push(ret);
            }
        }
        Ok(compound)
    }
}

/// Outcome of [`LoweringContext::bind_initializers`]
#[derive(Debug)]
pub struct Binding {
    pub initializers: Vec<Option<NodeId>>,
    pub tuple: Option<NodeId>,
}

/// `(name, span)` per declared name; unnamed fields yield one empty name
fn field_entries(field: &Field) -> Vec<(String, Span)> {
    match field.names.as_slice() {
        [] => vec![(String::new(), field.span)],
        [single] => vec![(single.name.clone(), field.span)],
        many => many.iter().map(|n| (n.name.clone(), n.span)).collect(),
    }
}

/// `T` in `*T`, `T`, `T[K, V]`, `(*T)`
fn receiver_base_name(expr: &Expr) -> Option<&str> {
    match &expr.kind {
        ExprKind::Ident(name) => Some(name),
        ExprKind::Star(inner) | ExprKind::Paren(inner) => receiver_base_name(inner),
        ExprKind::Index { x, .. } => receiver_base_name(x),
        _ => None,
    }
}

/// `K`, `V` in a generic receiver `*T[K, V]`
fn receiver_type_params(expr: &Expr) -> Vec<Ident> {
    match &expr.kind {
        ExprKind::Star(inner) | ExprKind::Paren(inner) => receiver_type_params(inner),
        ExprKind::Index { indices, .. } => indices
            .iter()
            .filter_map(|i| i.as_ident().map(|name| Ident::new(name, i.span)))
            .collect(),
        _ => Vec::new(),
    }
}
