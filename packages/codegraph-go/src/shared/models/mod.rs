//! Shared models

mod span;

pub use span::{Location, Span};

pub use crate::errors::{FrontendError, Result};
