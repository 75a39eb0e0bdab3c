//! Application layer: document import/export and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary helpers.

pub mod document;
pub mod error;
pub mod error_ext;

pub use document::{export, import, parse_document, read_document, to_json, ItemDocument};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::{IoResultExt, JsonResultExt};
