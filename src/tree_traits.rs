/*
Rendering lives in a trait so the domain tree stays free of display crates.
 */
use termtree::Tree;
use tracing::instrument;

use crate::cli::output::item_label;
use crate::domain::{ItemId, ItemKind, ItemTree};

pub trait ItemTreeConvert {
    /// Render `id` and its subtree. With `honor_collapsed`, children of
    /// collapsed collections are hidden and counted in the label.
    fn to_tree_string(&self, id: ItemId, honor_collapsed: bool) -> Tree<String>;
}

impl ItemTreeConvert for ItemTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, id: ItemId, honor_collapsed: bool) -> Tree<String> {
        let Some(item) = self.get(id) else {
            return Tree::new("Empty tree".to_string());
        };

        let hide = honor_collapsed && item.kind() == ItemKind::Collection && !item.is_expanded();
        if hide {
            return Tree::new(item_label(item, item.children().len()));
        }

        // Recursively construct the children
        let leaves: Vec<_> = item
            .children()
            .iter()
            .map(|child| self.to_tree_string(child, honor_collapsed))
            .collect();

        Tree::new(item_label(item, 0)).with_leaves(leaves)
    }
}
