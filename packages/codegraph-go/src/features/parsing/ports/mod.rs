//! Parsing ports (interfaces)

mod parser;

pub use parser::SyntaxSource;
