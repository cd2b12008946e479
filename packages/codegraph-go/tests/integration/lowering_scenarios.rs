//! Lowering scenarios
//!
//! End-to-end checks through the tree-sitter parser: each test lowers a
//! small Go file and inspects the resulting graph.

#[path = "../common/mod.rs"]
mod common;

use codegraph_go::{
    Declaration, ExpressionKind, LiteralValue, ProblemKind, RecordKind, Statement, SwitchKind,
    Type,
};
use common::*;
use pretty_assertions::assert_eq;

fn expression_kind(node: &codegraph_go::Node) -> &ExpressionKind {
    &node
        .as_expression()
        .unwrap_or_else(|| panic!("{} '{}' is not an expression", node.label(), node.name))
        .kind
}

// ═══════════════════════════════════════════════════════════════════════════
// Declarations
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_var_pair_binds_values_positionally() {
    let file = lower(FIXTURE_VAR_PAIR);
    assert_no_problems(&file);

    let vars = namespace_members(&file, "Variable");
    assert_eq!(vars.len(), 2);
    for (var, expected) in vars.iter().zip([1u64, 2]) {
        assert_eq!(var.fqn, format!("main.{}", var.name));
        assert_eq!(var.code, var.name);
        let Some(Declaration::Variable { ty, initializer }) = var.as_declaration() else {
            panic!("not a variable");
        };
        assert_eq!(*ty, Type::primitive("int"));
        let init = node(&file, initializer.expect("initializer"));
        assert_eq!(
            expression_kind(init),
            &ExpressionKind::Literal {
                value: LiteralValue::Int(expected)
            }
        );
    }
    assert_eq!(vars[0].name, "a");
    assert_eq!(vars[1].name, "b");
    assert_tree_shaped(&file);
}

#[test]
fn test_short_var_decl_becomes_declaration_statement() {
    let file = lower(FIXTURE_SHORT_DECL);
    assert_no_problems(&file);

    let f = find_one(&file, "Function", "f");
    assert_eq!(f.fqn, "main.f");
    let stmts = body_statements(&file, f);
    assert_eq!(labels(&stmts), vec!["DeclarationStatement", "Return"]);
    assert_eq!(stmts[0].code, "x := 5");
    assert!(stmts[1].implicit);

    let x = find_one(&file, "Variable", "x");
    assert_eq!(x.fqn, "x");
    assert_eq!(x.ty(), Some(&Type::primitive("int")));
    let Some(Statement::Declaration {
        declarations,
        tuple_initializer,
        assignments,
    }) = stmts[0].as_statement()
    else {
        panic!("expected a declaration statement");
    };
    assert_eq!(declarations, &vec![x.id]);
    assert_eq!(*tuple_initializer, None);
    assert!(assignments.is_empty());
}

#[test]
fn test_new_allocates_pointer_to_record() {
    let file = lower(FIXTURE_NEW);
    assert_no_problems(&file);

    let new = find_one(&file, "New", "new");
    assert_eq!(new.code, "new(T)");
    assert_eq!(new.ty().map(|t| t.name()), Some("main.T*".to_string()));
    let ExpressionKind::New {
        initializer: Some(construct),
    } = expression_kind(new)
    else {
        panic!("new without initializer");
    };
    let construct = node(&file, *construct);
    assert_eq!(construct.label(), "Construct");
    assert!(construct.implicit);
    assert_eq!(construct.ty(), Some(&Type::object("main.T")));

    let g = find_one(&file, "Function", "g");
    let stmts = body_statements(&file, g);
    assert_eq!(labels(&stmts), vec!["Return"]);
    assert!(!stmts[0].implicit);
}

#[test]
fn test_method_attaches_to_record() {
    let file = lower(FIXTURE_METHOD);
    assert_no_problems(&file);

    let record = find_one(&file, "Record", "T");
    let method = find_one(&file, "Method", "M");
    assert_eq!(method.fqn, "main.T.M");

    let Some(Declaration::Record { kind, fields, methods, .. }) = record.as_declaration() else {
        panic!("not a record");
    };
    assert_eq!(*kind, RecordKind::Struct);
    assert_eq!(fields.len(), 1);
    assert_eq!(methods, &vec![method.id]);

    let Some(Declaration::Method {
        function,
        receiver: Some(receiver),
        record: Some(owner),
    }) = method.as_declaration()
    else {
        panic!("method without receiver or record");
    };
    assert_eq!(*owner, record.id);
    let receiver = node(&file, *receiver);
    assert_eq!(receiver.name, "r");
    assert_eq!(receiver.ty().map(|t| t.name()), Some("main.T*".to_string()));
    assert_eq!(function.return_types, vec![Type::primitive("int")]);

    // r.n resolves through the record's members
    let member = find_one(&file, "Member", "n");
    assert_eq!(member.ty(), Some(&Type::primitive("int")));
    assert_tree_shaped(&file);
}

#[test]
fn test_switch_clauses_are_flattened() {
    let file = lower(FIXTURE_SWITCH);
    assert_no_problems(&file);

    let switch = all_with_label(&file, "Switch");
    assert_eq!(switch.len(), 1);
    let Some(Statement::Switch {
        kind,
        selector: Some(selector),
        body: Some(body),
        ..
    }) = switch[0].as_statement()
    else {
        panic!("switch without selector or body");
    };
    assert_eq!(*kind, SwitchKind::Expression);
    assert_eq!(node(&file, *selector).name, "x");

    let stmts = compound_statements(&file, *body);
    assert_eq!(labels(&stmts), vec!["Case", "Call", "Default", "Call"]);
    assert_eq!(stmts[0].code, "case 1, 2");
    assert_eq!(stmts[2].code, "default");
    assert_eq!(stmts[1].name, "a");
    assert_eq!(stmts[1].fqn, "main.a");
    assert_eq!(stmts[3].name, "b");

    let Some(Statement::Case { expressions }) = stmts[0].as_statement() else {
        panic!("not a case");
    };
    assert_eq!(expressions.len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// Imports, members and literals
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_imports_become_includes_before_namespace() {
    let file = lower(FIXTURE_SERVICE);
    assert_no_problems(&file);

    let Some(Declaration::TranslationUnit { declarations }) = file.root_node().as_declaration()
    else {
        panic!("root is not a translation unit");
    };
    let tu: Vec<_> = declarations.iter().map(|id| node(&file, *id)).collect();
    assert_eq!(labels(&tu), vec!["Include", "Include", "Namespace"]);
    assert_eq!(tu[0].name, "fmt");
    assert_eq!(tu[1].name, "str");
    assert_eq!(
        tu[1].as_declaration(),
        Some(&Declaration::Include {
            filename: "strings".to_string()
        })
    );
    assert_eq!(file.namespace, tu[2].id);
    assert_eq!(file.namespace_path, "svc");
}

#[test]
fn test_qualified_calls_use_import_alias() {
    let file = lower(FIXTURE_SERVICE);

    let sprintf = find_one(&file, "Call", "Sprintf");
    assert_eq!(sprintf.fqn, "fmt.Sprintf");
    let upper = find_one(&file, "Call", "ToUpper");
    assert_eq!(upper.fqn, "str.ToUpper");

    let ExpressionKind::Call {
        callee, arguments, ..
    } = expression_kind(sprintf)
    else {
        panic!("expected a plain call");
    };
    assert_eq!(node(&file, *callee).name, "fmt.Sprintf");
    assert_eq!(arguments.len(), 3);

    // s.Name is typed from the record field
    let name = find_one(&file, "Member", "Name");
    assert_eq!(name.ty(), Some(&Type::primitive("string")));
}

#[test]
fn test_struct_fields_keep_tags_and_embedding() {
    let file = lower(FIXTURE_SERVICE);

    let name = find_one(&file, "Field", "Name");
    assert_eq!(name.fqn, "svc.Server.Name");
    assert_eq!(
        name.as_declaration(),
        Some(&Declaration::Field {
            ty: Type::primitive("string"),
            embedded: false,
            tag: Some("`json:\"name\"`".to_string()),
        })
    );

    let logger = find_one(&file, "Field", "Logger");
    let Some(Declaration::Field { ty, embedded, .. }) = logger.as_declaration() else {
        panic!("not a field");
    };
    assert!(*embedded);
    assert_eq!(ty.name(), "svc.Logger*");

    let ports = find_one(&file, "Field", "ports");
    assert_eq!(ports.ty(), Some(&Type::primitive("int").array_of()));
}

#[test]
fn test_composite_literal_wraps_initializer_list() {
    let file = lower(FIXTURE_SERVICE);

    let server = find_one(&file, "Construct", "svc.Server");
    assert_eq!(server.code, "Server{Name: name, ports: []int{80, 443}}");
    let ExpressionKind::Construct { arguments } = expression_kind(server) else {
        panic!("not a construct");
    };
    assert_eq!(arguments.len(), 1);
    let list = node(&file, arguments[0]);
    assert_eq!(list.label(), "InitializerList");
    assert!(list.implicit);
    assert_eq!(list.code, server.code);

    let ExpressionKind::InitializerList { initializers } = expression_kind(list) else {
        panic!("not an initializer list");
    };
    let entries: Vec<_> = initializers.iter().map(|id| node(&file, *id)).collect();
    assert_eq!(labels(&entries), vec!["KeyValue", "KeyValue"]);

    let ExpressionKind::KeyValue { key, .. } = expression_kind(entries[0]) else {
        panic!("not a key/value");
    };
    let key = node(&file, *key);
    assert_eq!(key.name, "Name");
    assert_eq!(
        expression_kind(key),
        &ExpressionKind::Reference { refers_to: None }
    );

    let ports = find_one(&file, "Construct", "int[]");
    assert_eq!(ports.code, "[]int{80, 443}");

    let address = find_one(&file, "UnaryOperator", "&");
    assert_eq!(address.ty().map(|t| t.name()), Some("svc.Server*".to_string()));
}

#[test]
fn test_doc_comments_attach_to_declarations() {
    let file = lower(FIXTURE_SERVICE);

    let server = find_one(&file, "Record", "Server");
    assert_eq!(server.comment.as_deref(), Some("Server answers requests."));
    let greet = find_one(&file, "Method", "Greet");
    assert_eq!(greet.comment.as_deref(), Some("Greet builds a greeting."));
    let new_server = find_one(&file, "Function", "NewServer");
    assert_eq!(new_server.comment, None);
}

#[test]
fn test_comments_not_attached_when_disabled() {
    let frontend = codegraph_go::GoFrontend::new(
        codegraph_go::FrontendConfig::default().attach_comments(false),
    )
    .unwrap();
    let file = frontend.lower_source(FIXTURE_SERVICE, "svc.go").unwrap();
    assert!(file.graph.iter().all(|n| n.comment.is_none()));
}

// ═══════════════════════════════════════════════════════════════════════════
// Multi-value binding
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_tuple_call_binds_every_name() {
    let file = lower(FIXTURE_TUPLE);
    assert_no_problems(&file);

    let call = find_one(&file, "Call", "pair");
    let n = find_one(&file, "Variable", "n");
    let err = find_one(&file, "Variable", "err");
    assert_eq!(n.ty(), Some(&Type::primitive("int")));
    assert_eq!(err.ty(), Some(&Type::object("error")));

    let decl = file
        .graph
        .iter()
        .find_map(|node| match node.as_statement() {
            Some(Statement::Declaration {
                declarations,
                tuple_initializer: Some(tuple),
                ..
            }) => Some((declarations.clone(), *tuple)),
            _ => None,
        })
        .expect("tuple declaration statement");
    assert_eq!(decl, (vec![n.id, err.id], call.id));
    assert_tree_shaped(&file);
}

#[test]
fn test_count_mismatch_is_reported_not_fatal() {
    let file = lower("package main\n\nvar x, y = 1, 2, 3\n");
    assert_has_problem(&file, ProblemKind::Malformed);

    let x = find_one(&file, "Variable", "x");
    let y = find_one(&file, "Variable", "y");
    assert!(matches!(
        x.as_declaration(),
        Some(Declaration::Variable { initializer: Some(_), .. })
    ));
    assert!(matches!(
        y.as_declaration(),
        Some(Declaration::Variable { initializer: Some(_), .. })
    ));
}

#[test]
fn test_reused_name_in_short_decl_is_not_redeclared() {
    let source = "package main\n\nfunc f() {\n\ta := 1\n\ta, b := 2, 3\n\t_, c := 4, 5\n}\n";
    let file = lower(source);
    assert_no_problems(&file);

    assert_eq!(all_with_label(&file, "Variable").iter().filter(|v| v.name == "a").count(), 1);
    find_one(&file, "Variable", "b");
    find_one(&file, "Variable", "c");
    // blank names still produce an unregistered declaration
    find_one(&file, "Variable", "_");
    assert_tree_shaped(&file);
}

#[test]
fn test_reused_name_keeps_its_write() {
    let source = "package main\n\nfunc f() {\n\ta := 0\n\ta, b := 1, 2\n\t_, _ = a, b\n}\n";
    let file = lower(source);
    assert_no_problems(&file);

    let a = find_one(&file, "Variable", "a");
    let b = find_one(&file, "Variable", "b");
    let f = find_one(&file, "Function", "f");
    let stmts = body_statements(&file, f);
    assert_eq!(
        labels(&stmts),
        vec!["DeclarationStatement", "DeclarationStatement", "Assign", "Return"]
    );
    assert_eq!(stmts[1].code, "a, b := 1, 2");

    let Some(Statement::Declaration {
        declarations,
        tuple_initializer: None,
        assignments,
    }) = stmts[1].as_statement()
    else {
        panic!("expected a declaration statement");
    };
    assert_eq!(declarations, &vec![b.id]);
    assert_eq!(assignments.len(), 1);

    let assign = node(&file, assignments[0]);
    assert!(assign.implicit);
    let ExpressionKind::Assign { operator, lhs, rhs } = expression_kind(assign) else {
        panic!("expected an assignment");
    };
    assert_eq!(operator, "=");
    assert_eq!(
        expression_kind(node(&file, lhs[0])),
        &ExpressionKind::Reference {
            refers_to: Some(a.id)
        }
    );
    assert_eq!(node(&file, rhs[0]).code, "1");

    assert_tree_shaped(&file);
    assert_code_round_trip(&file, source);
}

// ═══════════════════════════════════════════════════════════════════════════
// Control flow
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_type_switch_binding_and_type_cases() {
    let file = lower(FIXTURE_CONTROL);
    assert_no_problems(&file);

    let describe = find_one(&file, "Function", "describe");
    let stmts = body_statements(&file, describe);
    assert_eq!(labels(&stmts), vec!["Switch", "Return"]);

    let Some(Statement::Switch {
        kind: SwitchKind::Type,
        binding: Some(binding),
        body: Some(body),
        ..
    }) = stmts[0].as_statement()
    else {
        panic!("expected a type switch with a binding");
    };
    let binding = node(&file, *binding);
    assert_eq!(binding.name, "t");
    assert_eq!(binding.ty(), Some(&Type::object("any")));

    let clauses = compound_statements(&file, *body);
    assert_eq!(labels(&clauses), vec!["Case", "Return", "Case", "Return"]);
    assert_eq!(clauses[0].code, "case int, int64");
    let Some(Statement::Case { expressions }) = clauses[0].as_statement() else {
        panic!("not a case");
    };
    let types: Vec<_> = expressions.iter().map(|id| node(&file, *id)).collect();
    assert_eq!(labels(&types), vec!["TypeExpression", "TypeExpression"]);
    assert_eq!(types[1].ty(), Some(&Type::primitive("int64")));

    // `return t` refers to the single binding
    let Some(Statement::Return { values }) = clauses[3].as_statement() else {
        panic!("not a return");
    };
    assert_eq!(
        expression_kind(node(&file, values[0])),
        &ExpressionKind::Reference {
            refers_to: Some(binding.id)
        }
    );
}

#[test]
fn test_labeled_range_declares_key_and_value() {
    let file = lower(FIXTURE_CONTROL);

    let label = find_one(&file, "Label", "outer");
    let Some(Statement::Label {
        sub_statement: Some(sub),
        ..
    }) = label.as_statement()
    else {
        panic!("label without statement");
    };
    let Some(Statement::ForEach {
        variable: Some(variable),
        iterable: Some(iterable),
        ..
    }) = node(&file, *sub).as_statement()
    else {
        panic!("expected a ForEach");
    };
    assert_eq!(node(&file, *iterable).name, "xs");

    let i = find_one(&file, "Variable", "i");
    let x = find_one(&file, "Variable", "x");
    assert_eq!(i.ty(), Some(&Type::primitive("int")));
    assert_eq!(x.ty(), Some(&Type::primitive("string")));
    assert_eq!(
        node(&file, *variable).as_statement(),
        Some(&Statement::Declaration {
            declarations: vec![i.id, x.id],
            tuple_initializer: None,
            assignments: vec![],
        })
    );

    let cont = all_with_label(&file, "Continue");
    assert_eq!(
        cont[0].as_statement(),
        Some(&Statement::Continue {
            label: Some("outer".to_string())
        })
    );
}

#[test]
fn test_select_comm_clause_wraps_receive() {
    let file = lower(FIXTURE_CONTROL);

    let select = file
        .graph
        .iter()
        .find(|n| {
            matches!(
                n.as_statement(),
                Some(Statement::Switch {
                    kind: SwitchKind::Select,
                    ..
                })
            )
        })
        .expect("select statement");
    let Some(Statement::Switch { body: Some(body), .. }) = select.as_statement() else {
        panic!("select without body");
    };
    let clauses = compound_statements(&file, *body);
    assert_eq!(labels(&clauses), vec!["Case", "Assign", "Default"]);
    assert_eq!(clauses[0].code, "case v := <-ch");

    let v = find_one(&file, "Variable", "v");
    assert_eq!(v.ty(), Some(&Type::primitive("int")));
}

#[test]
fn test_implicit_return_only_when_missing() {
    let source = "package main\n\nfunc a() {\n\tprintln()\n}\n\nfunc b() int {\n\treturn 1\n}\n";
    let file = lower(source);

    let a = body_statements(&file, find_one(&file, "Function", "a"));
    assert_eq!(labels(&a), vec!["Call", "Return"]);
    assert!(a[1].implicit);
    assert!(a[1].location.is_none());

    let b = body_statements(&file, find_one(&file, "Function", "b"));
    assert_eq!(labels(&b), vec!["Return"]);
    assert!(!b[0].implicit);
}

// ═══════════════════════════════════════════════════════════════════════════
// Calls, casts and literals
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_conversions_and_assertions_become_casts() {
    let source = r#"package main

func f(x int, s string, v any) {
	a := int64(x)
	b := []byte(s)
	c := v.(string)
	_, _, _ = a, b, c
}
"#;
    let file = lower(source);
    assert_no_problems(&file);

    let casts = all_with_label(&file, "Cast");
    let types: Vec<String> = casts.iter().map(|c| c.name.clone()).collect();
    assert_eq!(types, vec!["int64", "byte[]", "string"]);
    assert_eq!(
        find_one(&file, "Variable", "b").ty(),
        Some(&Type::primitive("byte").array_of())
    );
    assert!(all_with_label(&file, "Call").is_empty());
}

#[test]
fn test_predeclared_literals() {
    let source = "package main\n\nvar p *int = nil\nvar ok = true\n";
    let file = lower(source);

    let literals = all_with_label(&file, "Literal");
    let values: Vec<_> = literals
        .iter()
        .map(|l| match expression_kind(l) {
            ExpressionKind::Literal { value } => value.clone(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(values, vec![LiteralValue::Null, LiteralValue::Bool(true)]);
    assert_eq!(literals[0].ty(), Some(&Type::object("nil")));
    assert_eq!(
        find_one(&file, "Variable", "p").ty(),
        Some(&Type::primitive("int").pointer_to())
    );
}

#[test]
fn test_method_call_on_value() {
    let source = r#"package main

type C struct{}

func (c C) Run() string {
	return ""
}

func main() {
	var c C
	c.Run()
}
"#;
    let file = lower(source);
    let call = find_one(&file, "MemberCall", "Run");
    let ExpressionKind::MemberCall { base, member, .. } = expression_kind(call) else {
        panic!("not a member call");
    };
    assert_eq!(member, "Run");
    assert_eq!(node(&file, *base).name, "c");
    assert_eq!(call.ty(), Some(&Type::primitive("string")));
}

#[test]
fn test_make_and_slicing() {
    let source = r#"package main

func f() {
	xs := make([]int, 0, 8)
	m := make(map[string]int)
	ys := xs[1:2]
	_, _ = m, ys
}
"#;
    let file = lower(source);
    assert_no_problems(&file);

    let array = all_with_label(&file, "ArrayCreation");
    assert_eq!(array.len(), 1);
    let ExpressionKind::ArrayCreation { dimensions } = expression_kind(array[0]) else {
        unreachable!();
    };
    assert_eq!(dimensions.len(), 2);

    let map = find_one(&file, "Construct", "map");
    assert_eq!(
        map.ty(),
        Some(&Type::generic_object(
            "map",
            vec![Type::primitive("string"), Type::primitive("int")]
        ))
    );

    let range = all_with_label(&file, "Range");
    assert_eq!(range.len(), 1);
    assert!(range[0].implicit);
    assert_eq!(
        find_one(&file, "Variable", "ys").ty(),
        Some(&Type::primitive("int").array_of())
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Generics and interfaces
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_generic_record_and_method() {
    let file = lower(FIXTURE_GENERICS);
    assert_no_problems(&file);

    let list = find_one(&file, "Record", "List");
    let Some(Declaration::Record {
        type_parameters,
        methods,
        ..
    }) = list.as_declaration()
    else {
        panic!("not a record");
    };
    assert_eq!(type_parameters.len(), 1);
    let push = find_one(&file, "Method", "Push");
    assert_eq!(methods, &vec![push.id]);
    assert_eq!(push.fqn, "main.List.Push");

    let items = find_one(&file, "Field", "items");
    assert_eq!(
        items.ty(),
        Some(&Type::Parameterized("T".to_string()).array_of())
    );
}

#[test]
fn test_generic_function_instantiation() {
    let file = lower(FIXTURE_GENERICS);

    let map = find_one(&file, "Function", "Map");
    let function = map.as_declaration().and_then(|d| d.function()).unwrap();
    let names: Vec<_> = function
        .type_parameters
        .iter()
        .map(|id| node(&file, *id).name.clone())
        .collect();
    assert_eq!(names, vec!["T", "U"]);

    let call = all_with_label(&file, "Call")
        .into_iter()
        .find(|c| c.name == "Map")
        .expect("Map call");
    assert_eq!(call.fqn, "main.Map");
    let ExpressionKind::Call { type_arguments, .. } = expression_kind(call) else {
        unreachable!();
    };
    assert_eq!(
        type_arguments,
        &vec![Type::primitive("int"), Type::primitive("string")]
    );

    let out = find_one(&file, "ArrayCreation", "U[]");
    assert_eq!(out.ty(), Some(&Type::Parameterized("U".to_string()).array_of()));
}

#[test]
fn test_interface_methods_and_embedding() {
    let file = lower(FIXTURE_INTERFACE);
    assert_no_problems(&file);

    let reader = find_one(&file, "Record", "Reader");
    let read = find_one(&file, "Method", "Read");
    assert_eq!(read.fqn, "main.Reader.Read");
    let Some(Declaration::Record { kind, methods, .. }) = reader.as_declaration() else {
        unreachable!();
    };
    assert_eq!(*kind, RecordKind::Interface);
    assert_eq!(methods, &vec![read.id]);

    let function = read.as_declaration().and_then(|d| d.function()).unwrap();
    assert_eq!(function.parameters.len(), 1);
    assert_eq!(function.named_results.len(), 2);
    assert_eq!(function.body, None);

    let closer = find_one(&file, "Record", "ReadCloser");
    let Some(Declaration::Record {
        super_types,
        methods,
        ..
    }) = closer.as_declaration()
    else {
        unreachable!();
    };
    assert_eq!(super_types, &vec![Type::object("main.Reader")]);
    assert_eq!(methods.len(), 1);
}

#[test]
fn test_method_before_record_stays_unattached() {
    let file = lower(FIXTURE_METHOD_BEFORE_RECORD);
    assert_no_problems(&file);

    let record = find_one(&file, "Record", "T");
    let method = find_one(&file, "Method", "M");
    assert_eq!(method.fqn, "main.T.M");

    let Some(Declaration::Record { methods, fields, .. }) = record.as_declaration() else {
        panic!("not a record");
    };
    assert!(methods.is_empty());
    assert_eq!(fields.len(), 1);

    let Some(Declaration::Method {
        receiver: Some(receiver),
        record: None,
        ..
    }) = method.as_declaration()
    else {
        panic!("method should keep its receiver and have no record");
    };
    let receiver = node(&file, *receiver);
    assert_eq!(receiver.name, "r");
    assert_eq!(receiver.ty().map(|t| t.name()), Some("main.T*".to_string()));
    // the record was unknown when r.n was lowered
    assert_eq!(find_one(&file, "Member", "n").ty(), Some(&Type::Unknown));
}

#[test]
fn test_variadic_parameter_is_array_reference() {
    let file = lower(FIXTURE_CONCURRENCY);
    assert_no_problems(&file);

    let sep = find_one(&file, "Parameter", "sep");
    let parts = find_one(&file, "Parameter", "parts");
    assert_eq!(
        sep.as_declaration(),
        Some(&Declaration::Parameter {
            ty: Type::primitive("string"),
            variadic: false,
        })
    );
    assert_eq!(
        parts.as_declaration(),
        Some(&Declaration::Parameter {
            ty: Type::primitive("string").array_of(),
            variadic: true,
        })
    );
    let join = find_one(&file, "Function", "join");
    assert_eq!(
        join.ty().map(|t| t.name()),
        Some("func(string, string[]) string".to_string())
    );
}

#[test]
fn test_channel_function_and_inline_interface_parameters() {
    let file = lower(FIXTURE_CONCURRENCY);

    let int = Type::primitive("int");
    assert_eq!(
        find_one(&file, "Parameter", "jobs").ty(),
        Some(&Type::generic_object("chan", vec![int.clone()]))
    );
    assert_eq!(
        find_one(&file, "Parameter", "done").ty(),
        Some(&Type::generic_object("chan", vec![Type::primitive("bool")]))
    );
    assert_eq!(
        find_one(&file, "Parameter", "handle").ty(),
        Some(&Type::Function {
            name: "func(int) error".to_string(),
            parameters: vec![int],
            returns: vec![Type::object("error")],
        })
    );
    assert_eq!(
        find_one(&file, "Parameter", "sink").ty(),
        Some(&Type::object("interface{func(byte[]) (int, error)}"))
    );
}

#[test]
fn test_go_and_defer_wrap_calls() {
    let file = lower(FIXTURE_CONCURRENCY);
    let run = find_one(&file, "Function", "run");
    let stmts = body_statements(&file, run);
    assert_eq!(
        labels(&stmts),
        vec!["UnaryOperator", "UnaryOperator", "Label", "Return"]
    );

    for (stmt, (operator, callee, code)) in stmts.iter().zip([
        ("defer", "close", "defer close(jobs)"),
        ("go", "handle", "go handle(1)"),
    ]) {
        assert_eq!(stmt.name, operator);
        assert_eq!(stmt.code, code);
        assert_eq!(stmt.ty(), Some(&Type::Unknown));
        let ExpressionKind::Unary {
            operator: tag,
            operand,
            postfix: false,
        } = expression_kind(stmt)
        else {
            panic!("expected a prefix unary wrapper");
        };
        assert_eq!(tag, operator);
        let call = node(&file, *operand);
        assert_eq!(call.label(), "Call");
        assert_eq!(call.name, callee);
    }
}

#[test]
fn test_labels_and_branch_targets() {
    let file = lower(FIXTURE_CONCURRENCY);
    assert_no_problems(&file);

    let label = find_one(&file, "Label", "loop");
    let Some(Statement::Label {
        sub_statement: Some(sub),
        ..
    }) = label.as_statement()
    else {
        panic!("label without statement");
    };
    assert_eq!(node(&file, *sub).label(), "For");

    assert_eq!(
        all_with_label(&file, "Break")[0].as_statement(),
        Some(&Statement::Break {
            label: Some("loop".to_string())
        })
    );
    assert_eq!(
        all_with_label(&file, "Goto")[0].as_statement(),
        Some(&Statement::Goto {
            label: "loop".to_string()
        })
    );
    assert_tree_shaped(&file);
}

#[test]
fn test_goto_target_is_not_checked() {
    let file = lower("package main\n\nfunc f() {\n\tgoto missing\n}\n");
    assert_no_problems(&file);
    let gotos = all_with_label(&file, "Goto");
    assert_eq!(gotos.len(), 1);
    assert_eq!(gotos[0].code, "goto missing");
    assert_eq!(
        gotos[0].as_statement(),
        Some(&Statement::Goto {
            label: "missing".to_string()
        })
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Recovery
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_tokens_become_problems() {
    for source in [
        "package main\nfunc f() { y := 1 +* ; z := 2 }",
        "package main\nfunc f() { a, b := }",
    ] {
        let file = lower(source);
        assert_has_problem(&file, ProblemKind::Malformed);
        assert_code_round_trip(&file, source);

        let empty: Vec<String> = file
            .graph
            .iter()
            .filter(|n| n.location.is_some() && n.code.is_empty())
            .map(|n| format!("{} {} '{}'", n.id, n.label(), n.name))
            .collect();
        assert!(empty.is_empty(), "positioned nodes without code: {empty:?}");
        assert!(
            all_with_label(&file, "DeclaredReference")
                .iter()
                .all(|r| !r.name.is_empty()),
            "reference lowered from a missing token in {source:?}"
        );
    }
}

#[test]
fn test_type_keyword_assertion_outside_switch() {
    let file = lower("package main\nfunc f() { for range ch {} ; x.(type) }");
    assert_has_problem(&file, ProblemKind::Malformed);
    assert!(all_with_label(&file, "Cast").is_empty());
    assert!(file.graph.iter().all(|n| n.name != "main.type"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Provenance
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_code_matches_span_for_every_fixture() {
    for source in [
        FIXTURE_VAR_PAIR,
        FIXTURE_SHORT_DECL,
        FIXTURE_NEW,
        FIXTURE_METHOD,
        FIXTURE_SWITCH,
        FIXTURE_SERVICE,
        FIXTURE_TUPLE,
        FIXTURE_CONTROL,
        FIXTURE_GENERICS,
        FIXTURE_INTERFACE,
        FIXTURE_METHOD_BEFORE_RECORD,
        FIXTURE_CONCURRENCY,
    ] {
        let file = lower(source);
        assert_code_round_trip(&file, source);
        assert!(file.graph.iter().all(|n| n.language.as_ref() == "Go"));
    }
}

#[test]
fn test_every_node_reachable_from_root() {
    for source in [
        FIXTURE_SERVICE,
        FIXTURE_CONTROL,
        FIXTURE_GENERICS,
        FIXTURE_INTERFACE,
        FIXTURE_CONCURRENCY,
    ] {
        assert_tree_shaped(&lower(source));
    }
}

#[test]
fn test_builder_generated_source() {
    let source = GoSourceBuilder::new("app")
        .with_import("os")
        .with_decl("type Config struct {\n\tPath string\n}")
        .with_func("run", "\tos.Exit(0)")
        .build();
    let file = lower(&source);
    assert_no_problems(&file);
    assert_eq!(find_one(&file, "Call", "Exit").fqn, "os.Exit");
    assert_eq!(find_one(&file, "Record", "Config").fqn, "app.Config");
}
