//! Shared module - Common types and utilities
//!
//! Types used by every feature. No tree-sitter types leak in here.

pub mod models;

pub use models::{Location, Span};
