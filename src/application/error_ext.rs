//! Error conversion helpers for reading workspace documents
//!
//! Attach the offending path to I/O and JSON failures.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs::read_to_string(&path).with_path_context("read workspace", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Turn a `serde_json` failure into a document error, naming its origin.
pub trait JsonResultExt<T> {
    fn with_document_context(self, origin: &str) -> ApplicationResult<T>;
}

impl<T> JsonResultExt<T> for Result<T, serde_json::Error> {
    fn with_document_context(self, origin: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Document {
            message: format!("{} (line {}, column {}): {}", origin, e.line(), e.column(), e),
        })
    }
}
