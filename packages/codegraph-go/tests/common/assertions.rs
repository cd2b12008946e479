//! Custom assertions for test verification
//!
//! Domain-specific lookups and checks over a [`LoweredFile`].

use codegraph_go::{Declaration, LoweredFile, Node, NodeId, ProblemKind, Statement};

/// The single node with `label` and `name`
pub fn find_one<'a>(file: &'a LoweredFile, label: &str, name: &str) -> &'a Node {
    let matches: Vec<&Node> = file
        .graph
        .iter()
        .filter(|n| n.label() == label && n.name == name)
        .collect();
    assert_eq!(
        matches.len(),
        1,
        "Expected exactly one {label} named '{name}', found {}. Available: {:?}",
        matches.len(),
        file.graph
            .find_by_label(label)
            .map(|n| &n.name)
            .collect::<Vec<_>>()
    );
    matches[0]
}

/// Every node with `label`, in creation order
pub fn all_with_label<'a>(file: &'a LoweredFile, label: &'a str) -> Vec<&'a Node> {
    file.graph.find_by_label(label).collect()
}

pub fn node<'a>(file: &'a LoweredFile, id: NodeId) -> &'a Node {
    file.node(id)
        .unwrap_or_else(|| panic!("dangling node id {id} in {}", file.path))
}

/// Assert that lowering recorded no problems
pub fn assert_no_problems(file: &LoweredFile) {
    assert!(
        file.problems.is_empty(),
        "Expected no problems, got: {:?}",
        file.problems.iter().map(|p| p.to_string()).collect::<Vec<_>>()
    );
}

/// Assert that at least one problem of `kind` was recorded
pub fn assert_has_problem(file: &LoweredFile, kind: ProblemKind) {
    assert!(
        file.problems.iter().any(|p| p.kind == kind),
        "Expected a {kind:?} problem, got: {:?}",
        file.problems
    );
}

/// Every positioned node's code is exactly its span's slice of `source`
pub fn assert_code_round_trip(file: &LoweredFile, source: &str) {
    for node in file.graph.iter() {
        match &node.location {
            Some(location) => {
                let slice = &source[location.span.start_byte..location.span.end_byte];
                assert_eq!(
                    node.code, slice,
                    "code of {} '{}' does not match its span {}",
                    node.label(), node.name, location.span
                );
            }
            None => assert!(
                node.implicit && node.code.is_empty(),
                "unpositioned {} '{}' must be implicit with empty code",
                node.label(),
                node.name
            ),
        }
    }
}

/// Every node reachable from the root exactly once, and every node is
/// reachable
pub fn assert_tree_shaped(file: &LoweredFile) {
    let order = file.graph.walk(file.root);
    let mut seen = vec![0usize; file.graph.len()];
    for id in &order {
        seen[id.index()] += 1;
    }
    let unreachable: Vec<String> = file
        .graph
        .iter()
        .filter(|n| seen[n.id.index()] == 0)
        .map(|n| format!("{} {} '{}'", n.id, n.label(), n.name))
        .collect();
    assert!(unreachable.is_empty(), "unreachable nodes: {unreachable:?}");
}

/// Namespace-level declarations with `label`
pub fn namespace_members<'a>(file: &'a LoweredFile, label: &str) -> Vec<&'a Node> {
    let Some(Declaration::Namespace { declarations, .. }) = file
        .node(file.namespace)
        .and_then(|n| n.as_declaration())
    else {
        panic!("namespace node is not a Namespace");
    };
    declarations
        .iter()
        .map(|id| node(file, *id))
        .filter(|n| n.label() == label)
        .collect()
}

/// Statements of a function's body Compound
pub fn body_statements<'a>(file: &'a LoweredFile, function: &Node) -> Vec<&'a Node> {
    let body = function
        .as_declaration()
        .and_then(|d| d.function())
        .and_then(|f| f.body)
        .unwrap_or_else(|| panic!("'{}' has no body", function.name));
    compound_statements(file, body)
}

pub fn compound_statements<'a>(file: &'a LoweredFile, compound: NodeId) -> Vec<&'a Node> {
    match node(file, compound).as_statement() {
        Some(Statement::Compound { statements }) => {
            statements.iter().map(|id| node(file, *id)).collect()
        }
        other => panic!("expected Compound, got {other:?}"),
    }
}

pub fn labels(nodes: &[&Node]) -> Vec<&'static str> {
    nodes.iter().map(|n| n.label()).collect()
}
