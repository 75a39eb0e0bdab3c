//! Workspace item tree.
//!
//! Collections (folders) and requests share one recursive node type,
//! [`domain::Item`], stored in an [`domain::ItemTree`] arena. The tree keeps
//! parent links in step with child lists, raises change events, and deep
//! clones whole subtrees.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use domain::{Item, ItemEvent, ItemId, ItemKind, ItemTree};
