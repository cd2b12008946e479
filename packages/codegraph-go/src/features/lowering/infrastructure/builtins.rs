//! Predeclared Go identifiers

use crate::features::cpg::Type;

/// Predeclared basic types; these stay unqualified `Primitive`s
pub const PRIMITIVE_TYPES: &[&str] = &[
    "bool",
    "byte",
    "complex64",
    "complex128",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Predeclared non-basic types; unqualified `Object`s
pub const UNQUALIFIED_OBJECT_TYPES: &[&str] = &["error", "any", "comparable"];

pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

pub fn is_unqualified_object(name: &str) -> bool {
    UNQUALIFIED_OBJECT_TYPES.contains(&name)
}

pub fn is_builtin_function(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name)
}

/// Any predeclared name that must not be package-qualified
pub fn is_predeclared(name: &str) -> bool {
    is_primitive(name)
        || is_unqualified_object(name)
        || is_builtin_function(name)
        || matches!(name, "true" | "false" | "nil" | "iota")
}

/// Result type of a builtin call, given its lowered argument types
pub fn builtin_result_type(name: &str, args: &[Type]) -> Type {
    match name {
        "len" | "cap" | "copy" => Type::primitive("int"),
        "append" | "max" | "min" => args.first().cloned().unwrap_or(Type::Unknown),
        "real" | "imag" => Type::primitive("float64"),
        "complex" => Type::primitive("complex128"),
        "recover" => Type::object("any"),
        _ => Type::Unknown,
    }
}
