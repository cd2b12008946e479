//! Parser port (interface)
//!
//! The lowering pass consumes an already-parsed tree; this is the seam a
//! host uses to hand one over.

use crate::features::parsing::domain::SourceFile;
use crate::shared::models::Result;

/// Produces the surface syntax tree for one Go file
pub trait SyntaxSource: Send + Sync {
    /// Parse source code into a [`SourceFile`]
    fn parse(&self, source: &str, file_path: &str) -> Result<SourceFile>;

    /// Check if this source handles the given file extension
    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("go")
    }
}
