//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::ItemId;

/// Domain errors represent violations of the tree structure.
/// These are independent of serialization and CLI concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cycle detected: {child} is {parent} or one of its ancestors")]
    CycleDetected { parent: ItemId, child: ItemId },

    #[error("item {child} is already attached to {parent}")]
    AlreadyAttached { child: ItemId, parent: ItemId },

    #[error("item {child} is not a child of {parent}")]
    NotAChild { parent: ItemId, child: ItemId },
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
