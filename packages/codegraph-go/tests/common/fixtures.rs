//! Test fixtures
//!
//! Go sources exercising each lowering family. Kept small so that node
//! counts in assertions stay readable.

/// `var a, b = 1, 2` at package level
pub const FIXTURE_VAR_PAIR: &str = "package main\n\nvar a, b = 1, 2\n";

/// Short variable declaration inside a function
pub const FIXTURE_SHORT_DECL: &str = "package main\n\nfunc f() {\n\tx := 5\n}\n";

/// `new(T)` allocation
pub const FIXTURE_NEW: &str = r#"package main

type T struct{}

func g() *T {
	return new(T)
}
"#;

/// Pointer-receiver method on a record declared earlier in the file
pub const FIXTURE_METHOD: &str = r#"package main

type T struct {
	n int
}

func (r *T) M() int {
	return r.n
}
"#;

/// Expression switch with a multi-value case and a default
pub const FIXTURE_SWITCH: &str = r#"package main

func s(x int) {
	switch x {
	case 1, 2:
		a()
	default:
		b()
	}
}
"#;

/// Imports, qualified calls, method calls and composite literals
pub const FIXTURE_SERVICE: &str = r#"package svc

import (
	"fmt"
	str "strings"
)

// Server answers requests.
type Server struct {
	Name  string `json:"name"`
	ports []int
	*Logger
}

type Logger struct{}

// Greet builds a greeting.
func (s *Server) Greet(who string) string {
	return fmt.Sprintf("%s: hello %s", s.Name, str.ToUpper(who))
}

func NewServer(name string) *Server {
	return &Server{Name: name, ports: []int{80, 443}}
}
"#;

/// Multi-value call bound by `:=`
pub const FIXTURE_TUPLE: &str = r#"package main

func pair() (int, error) {
	return 1, nil
}

func use() {
	n, err := pair()
	_ = n
	_ = err
}
"#;

/// Type switch with a binding, select, range and labeled loops
pub const FIXTURE_CONTROL: &str = r#"package main

func describe(v any) string {
	switch t := v.(type) {
	case int, int64:
		return "int"
	case string:
		return t
	}
	return "other"
}

func sum(xs []string, ch chan int) int {
	total := 0
outer:
	for i, x := range xs {
		if x == "" {
			continue outer
		}
		total += i
	}
	select {
	case v := <-ch:
		total += v
	default:
	}
	return total
}
"#;

/// Generic function, generic record with a method, instantiation call
pub const FIXTURE_GENERICS: &str = r#"package main

type List[T any] struct {
	items []T
}

func (l *List[T]) Push(v T) {
	l.items = append(l.items, v)
}

func Map[T, U any](xs []T, f func(T) U) []U {
	out := make([]U, 0, len(xs))
	for _, x := range xs {
		out = append(out, f(x))
	}
	return out
}

func run() {
	_ = Map[int, string](nil, nil)
}
"#;

/// Interface with embedded interface and methods
pub const FIXTURE_INTERFACE: &str = r#"package main

type Reader interface {
	Read(p []byte) (n int, err error)
}

type ReadCloser interface {
	Reader
	Close() error
}
"#;

/// Method declared before its receiver record
pub const FIXTURE_METHOD_BEFORE_RECORD: &str = r#"package main

func (r *T) M() int {
	return r.n
}

type T struct {
	n int
}
"#;

/// Variadic parameters, channel and function-typed parameters, an inline
/// interface, go/defer and labeled branches
pub const FIXTURE_CONCURRENCY: &str = r#"package main

func join(sep string, parts ...string) string {
	return sep
}

func run(jobs chan int, done <-chan bool, handle func(int) error, sink interface{ Write(p []byte) (int, error) }) {
	defer close(jobs)
	go handle(1)
loop:
	for {
		select {
		case <-done:
			break loop
		default:
			goto loop
		}
	}
}
"#;

/// Generate a Go file with N functions
pub fn fixture_n_functions(n: usize) -> String {
    let funcs: String = (0..n)
        .map(|i| format!("func func_{i}(x int) int {{\n\treturn x + {i}\n}}\n\n"))
        .collect();
    format!("package gen\n\n{funcs}")
}

/// Generate a Go struct with N fields and one method per field
pub fn fixture_struct_with_accessors(name: &str, fields: usize) -> String {
    let body: String = (0..fields).map(|i| format!("\tf{i} int\n")).collect();
    let methods: String = (0..fields)
        .map(|i| format!("func (r *{name}) F{i}() int {{\n\treturn r.f{i}\n}}\n\n"))
        .collect();
    format!("package gen\n\ntype {name} struct {{\n{body}}}\n\n{methods}")
}
