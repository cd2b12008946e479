//! Property-based tests for lowering
//!
//! Random nestings of Go statements must leave the scope stack balanced,
//! produce a tree-shaped graph whose code matches the source, and lower
//! identically every time. Random type syntax must lower to equal types
//! on every attempt.

#[path = "../common/mod.rs"]
mod common;

use codegraph_go::features::cpg::NodeFactory;
use codegraph_go::features::lowering::{FileContext, LoweringContext};
use codegraph_go::features::parsing::domain::{Decl, GenDeclKind};
use codegraph_go::{
    FrontendConfig, NodeId, ScopeKind, ScopeManager, ScopeStack, SyntaxSource,
    TreeSitterGoParser, Type,
};
use common::*;
use proptest::prelude::*;

/// One Go statement, possibly nesting others
fn statement() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("x++".to_string()),
        Just("println(x)".to_string()),
        Just("y := x + 1\n_ = y".to_string()),
        Just("var s []int\n_ = s[0:1]".to_string()),
        Just("m := map[string]int{\"a\": x}\n_ = m".to_string()),
        Just("p := new(int)\n_ = p".to_string()),
        Just("if x > 0 {\nreturn\n}".to_string()),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        let body = prop::collection::vec(inner, 0..4).prop_map(|s| s.join("\n"));
        prop_oneof![
            body.clone().prop_map(|b| format!("{{\n{b}\n}}")),
            body.clone().prop_map(|b| format!("if x > 1 {{\n{b}\n}} else {{\n{b}\n}}")),
            body.clone().prop_map(|b| format!("for i := 0; i < x; i++ {{\n{b}\n}}")),
            body.clone().prop_map(|b| format!("for k, v := range []int{{1}} {{\n_, _ = k, v\n{b}\n}}")),
            body.clone().prop_map(|b| format!("switch x {{\ncase 1:\n{b}\ndefault:\n}}")),
            body.prop_map(|b| format!("f := func(n int) int {{\n{b}\nreturn n\n}}\n_ = f")),
        ]
    })
}

fn program() -> impl Strategy<Value = (String, usize)> {
    prop::collection::vec(prop::collection::vec(statement(), 0..5), 1..4).prop_map(|funcs| {
        let count = funcs.len();
        let mut builder = GoSourceBuilder::new("gen");
        for (i, body) in funcs.iter().enumerate() {
            let body = format!("x := {i}\n{}", body.join("\n"));
            builder = builder.with_func(&format!("f{i}"), &body);
        }
        (builder.build(), count)
    })
}

/// Go type syntax: named, qualified, pointer, slice, array, map, channel,
/// function, inline interface and struct, and instantiated generics
fn type_syntax() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("int"),
        Just("string"),
        Just("byte"),
        Just("error"),
        Just("any"),
        Just("Local"),
        Just("io.Reader"),
    ]
    .prop_map(String::from);
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| format!("*{t}")),
            inner.clone().prop_map(|t| format!("[]{t}")),
            inner.clone().prop_map(|t| format!("[4]{t}")),
            inner.clone().prop_map(|t| format!("map[string]{t}")),
            inner.clone().prop_map(|t| format!("chan {t}")),
            inner.clone().prop_map(|t| format!("List[{t}]")),
            inner.clone().prop_map(|t| format!("interface{{ M() {t} }}")),
            inner.clone().prop_map(|t| format!("struct{{ X {t} }}")),
            inner.clone().prop_map(|t| format!("func({t})")),
            (inner.clone(), inner).prop_map(|(a, b)| format!("func({a}, {b}) ({a}, {b})")),
        ]
    })
}

/// Lower the type of `var v <syntax>` twice in one context
fn lower_type_twice(syntax: &str) -> (Type, Type, usize) {
    let source = format!("package gen\n\nvar v {syntax}\n");
    let file = TreeSitterGoParser::new()
        .parse(&source, "gen.go")
        .expect("parse");
    let Some(Decl::Gen(group)) = file.decls.first() else {
        panic!("no var declaration in {source:?}");
    };
    let GenDeclKind::Var(specs) = &group.kind else {
        panic!("not a var declaration: {source:?}");
    };
    let expr = specs[0].ty.as_ref().expect("var without a type");

    let config = FrontendConfig::default();
    let factory = NodeFactory::new(&source, "gen.go", "Go", Vec::new(), false);
    let mut scopes = ScopeStack::new();
    scopes.reset_to_global(NodeId::new(0));
    let mut ctx = LoweringContext::new(
        factory,
        &mut scopes,
        FileContext::new("gen.go", "gen"),
        &config,
    );
    let first = ctx.lower_type(expr);
    let second = ctx.lower_type(expr);
    (first, second, ctx.problems().len())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_type_lowering_is_idempotent(syntax in type_syntax()) {
        let (first, second, problems) = lower_type_twice(&syntax);
        prop_assert_eq!(&first, &second, "type syntax {}", syntax);
        prop_assert_eq!(first.to_string(), second.to_string());
        prop_assert!(!first.is_unknown(), "`{}` lowered to Unknown", syntax);
        prop_assert_eq!(problems, 0);
    }

    #[test]
    fn prop_scopes_balanced((source, functions) in program()) {
        let (file, scopes) = lower_recording(&source);
        prop_assert!(scopes.is_balanced(), "unbalanced scopes for:\n{}", source);
        prop_assert_eq!(scopes.depth(), 0);
        prop_assert_eq!(scopes.count(ScopeKind::Namespace), 1);
        prop_assert!(scopes.count(ScopeKind::Function) >= functions);
        prop_assert!(file.problems.is_empty(), "{:?}", file.problems);
    }

    #[test]
    fn prop_code_matches_source((source, _) in program()) {
        let file = lower(&source);
        assert_code_round_trip(&file, &source);
        assert_tree_shaped(&file);
    }

    #[test]
    fn prop_lowering_is_deterministic((source, _) in program()) {
        let first = lower(&source);
        let second = lower(&source);
        prop_assert_eq!(&first.graph, &second.graph);
        prop_assert_eq!(first.root, second.root);
    }
}

#[test]
fn test_recorder_tracks_nesting() {
    let (file, scopes) = lower_recording(FIXTURE_CONTROL);
    assert!(scopes.is_balanced());
    assert_eq!(scopes.count(ScopeKind::Function), 2);
    assert_eq!(scopes.count(ScopeKind::Namespace), 1);
    // namespace > function > body > range > body > if > then
    assert!(scopes.max_depth() >= 7, "depth {}", scopes.max_depth());
    assert_no_problems(&file);
}

#[test]
fn test_generated_functions_all_lowered() {
    let source = fixture_n_functions(50);
    let (file, scopes) = lower_recording(&source);
    assert!(scopes.is_balanced());
    assert_eq!(namespace_members(&file, "Function").len(), 50);
    assert_code_round_trip(&file, &source);
}

#[test]
fn test_accessors_attach_to_record() {
    let source = fixture_struct_with_accessors("Point", 8);
    let file = lower(&source);
    let record = find_one(&file, "Record", "Point");
    let Some(codegraph_go::Declaration::Record { fields, methods, .. }) = record.as_declaration()
    else {
        panic!("not a record");
    };
    assert_eq!(fields.len(), 8);
    assert_eq!(methods.len(), 8);
    for i in 0..8 {
        let member = find_one(&file, "Member", &format!("f{i}"));
        assert_eq!(member.ty(), Some(&codegraph_go::Type::primitive("int")));
    }
}

#[test]
fn test_type_lowering_samples() {
    let (ty, _, problems) = lower_type_twice("map[string][]*Local");
    assert_eq!(problems, 0);
    assert_eq!(
        ty,
        Type::generic_object(
            "map",
            vec![
                Type::primitive("string"),
                Type::object("gen.Local").pointer_to().array_of(),
            ],
        )
    );

    let (ty, _, _) = lower_type_twice("func(chan int) (io.Reader, error)");
    assert_eq!(ty.name(), "func(chan[int]) (io.Reader, error)");

    let (ty, _, _) = lower_type_twice("List[interface{ M() int }]");
    assert_eq!(
        ty,
        Type::generic_object("gen.List", vec![Type::object("interface{func() int}")])
    );
}
