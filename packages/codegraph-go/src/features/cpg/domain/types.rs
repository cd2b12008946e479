//! Graph type algebra
//!
//! Types are plain values: lowering the same syntax twice yields equal
//! `Type`s, so they are compared and hashed structurally.

use std::fmt;

/// What a [`Type::Pointer`] wrapper stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerOrigin {
    Pointer,
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Built-in scalar (`int`, `string`, `bool`, ...)
    Primitive(String),

    /// Named type, optionally instantiated (`main.List` + `[int]`).
    /// Maps and channels are `map`/`chan` objects with generic arguments.
    Object { name: String, generics: Vec<Type> },

    /// Pointer or array/slice wrapper around an element type
    Pointer {
        element: Box<Type>,
        origin: PointerOrigin,
    },

    Function {
        name: String,
        parameters: Vec<Type>,
        returns: Vec<Type>,
    },

    /// A generic type parameter in scope
    Parameterized(String),

    Unknown,
}

impl Type {
    pub fn primitive(name: impl Into<String>) -> Self {
        Type::Primitive(name.into())
    }

    pub fn object(name: impl Into<String>) -> Self {
        Type::Object {
            name: name.into(),
            generics: Vec::new(),
        }
    }

    pub fn generic_object(name: impl Into<String>, generics: Vec<Type>) -> Self {
        Type::Object {
            name: name.into(),
            generics,
        }
    }

    /// Wrap `self` in a pointer or array reference
    pub fn reference(self, origin: PointerOrigin) -> Self {
        Type::Pointer {
            element: Box::new(self),
            origin,
        }
    }

    pub fn pointer_to(self) -> Self {
        self.reference(PointerOrigin::Pointer)
    }

    pub fn array_of(self) -> Self {
        self.reference(PointerOrigin::Array)
    }

    /// Display name in CPG style: pointers as `T*`, arrays as `T[]`
    pub fn name(&self) -> String {
        match self {
            Type::Primitive(name) | Type::Parameterized(name) => name.clone(),
            Type::Object { name, .. } | Type::Function { name, .. } => name.clone(),
            Type::Pointer { element, origin } => match origin {
                PointerOrigin::Pointer => format!("{}*", element.name()),
                PointerOrigin::Array => format!("{}[]", element.name()),
            },
            Type::Unknown => "UNKNOWN".to_string(),
        }
    }

    /// Innermost non-pointer type
    pub fn root(&self) -> &Type {
        match self {
            Type::Pointer { element, .. } => element.root(),
            other => other,
        }
    }

    pub fn generics(&self) -> &[Type] {
        match self {
            Type::Object { generics, .. } => generics,
            _ => &[],
        }
    }

    /// Element type of a pointer/array wrapper
    pub fn dereference(&self) -> Type {
        match self {
            Type::Pointer { element, .. } => (**element).clone(),
            _ => Type::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Type::Pointer {
                origin: PointerOrigin::Array,
                ..
            }
        )
    }

    /// `map` / `chan` object check
    pub fn is_object_named(&self, wanted: &str) -> bool {
        matches!(self, Type::Object { name, .. } if name == wanted)
    }

    /// Last dot-separated segment of the root type name (`main.T*` -> `T`)
    pub fn local_root_name(&self) -> String {
        let name = self.root().name();
        match name.rsplit_once('.') {
            Some((_, local)) => local.to_string(),
            None => name,
        }
    }
}

impl Default for Type {
    fn default() -> Self {
        Type::Unknown
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Object { name, generics } if !generics.is_empty() => {
                let args: Vec<String> = generics.iter().map(|g| g.to_string()).collect();
                write!(f, "{}[{}]", name, args.join(", "))
            }
            Type::Pointer { element, origin } => match origin {
                PointerOrigin::Pointer => write!(f, "{}*", element),
                PointerOrigin::Array => write!(f, "{}[]", element),
            },
            other => f.write_str(&other.name()),
        }
    }
}
