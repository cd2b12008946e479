//! Lowering application layer

pub mod go_frontend;

pub use go_frontend::GoFrontend;
