//! Domain layer: the item tree and its value objects
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod events;
pub mod item;
pub mod model;
pub mod tree;

pub use error::{DomainError, DomainResult};
pub use events::{ChildrenChange, ItemEvent, ItemProperty, SubscriptionId};
pub use item::{ChildList, Item, ItemId, ItemKind};
pub use model::*;
pub use tree::{ItemTree, PostOrderIterator, SubtreeIterator, TreeOptions};
