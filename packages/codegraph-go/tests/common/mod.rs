//! Common test utilities for codegraph-go
//!
//! This module provides shared fixtures, assertions, and builders
//! for integration tests.

#![allow(dead_code)]

mod fixtures;
mod assertions;
mod builders;

// Re-export all utilities
pub use fixtures::*;
pub use assertions::*;
pub use builders::*;
