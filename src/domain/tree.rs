use std::collections::HashSet;

use generational_arena::Arena;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::events::{ChildrenChange, ItemEvent, ItemProperty, Observers, SubscriptionId};
use crate::domain::item::{Item, ItemId, ItemKind};
use crate::domain::model::WorkspaceResponse;

/// Behavior of items the tree creates on its own (clones, imports).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Wiring of imported items' child lists. Clones are always wired.
    pub observe_children: bool,
    /// Carry the property bag over in [`ItemTree::deep_clone`].
    pub clone_properties: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            observe_children: true,
            clone_properties: false,
        }
    }
}

/// Arena owning every item of a workspace.
///
/// Children are owned through their parent's [`ChildList`](crate::domain::ChildList);
/// `parent` is a plain handle back. All structural edits go through the
/// child-list methods here, which keep both sides in sync and raise
/// [`ItemEvent::ChildrenChanged`].
#[derive(Debug, Default)]
pub struct ItemTree {
    arena: Arena<Item>,
    observers: Observers,
    options: TreeOptions,
}

impl ItemTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> TreeOptions {
        self.options
    }

    /// Place `item` in the arena as a detached node.
    #[instrument(level = "trace", skip(self, item), fields(name = %item))]
    pub fn insert(&mut self, item: Item) -> ItemId {
        ItemId(self.arena.insert(item))
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.arena.get(id.0)
    }

    /// Mutable access to the silent payload (url, auth, body, headers, ...).
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.arena.get_mut(id.0)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> + '_ {
        self.arena.iter().map(|(idx, item)| (ItemId(idx), item))
    }

    /// Items not contained in any child list.
    pub fn roots(&self) -> Vec<ItemId> {
        let owned: HashSet<ItemId> = self
            .arena
            .iter()
            .flat_map(|(_, item)| item.children().iter())
            .collect();
        self.iter()
            .map(|(id, _)| id)
            .filter(|id| !owned.contains(id))
            .collect()
    }

    fn node(&self, id: ItemId) -> DomainResult<&Item> {
        self.arena.get(id.0).ok_or(DomainError::ItemNotFound(id))
    }

    fn node_mut(&mut self, id: ItemId) -> DomainResult<&mut Item> {
        self.arena.get_mut(id.0).ok_or(DomainError::ItemNotFound(id))
    }

    // ------------------------------------------------------------------
    // Change notification
    // ------------------------------------------------------------------

    /// Register `handler` for events raised on `id`.
    pub fn subscribe<F>(&mut self, id: ItemId, handler: F) -> DomainResult<SubscriptionId>
    where
        F: FnMut(&ItemEvent) + 'static,
    {
        self.node(id)?;
        Ok(self.observers.subscribe(id, Box::new(handler)))
    }

    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        self.observers.unsubscribe(subscription)
    }

    fn property_changed(&mut self, item: ItemId, property: ItemProperty) {
        self.observers
            .notify(&ItemEvent::PropertyChanged { item, property });
    }

    fn children_changed(&mut self, item: ItemId, change: ChildrenChange) {
        debug!(%item, ?change, "children changed");
        self.observers
            .notify(&ItemEvent::ChildrenChanged { item, change });
    }

    /// Notifies only when the kind actually changes.
    pub fn set_kind(&mut self, id: ItemId, kind: ItemKind) -> DomainResult<()> {
        let old = self.node_mut(id)?.replace_kind(kind);
        if old != kind {
            self.property_changed(id, ItemProperty::Kind);
        }
        Ok(())
    }

    /// Notifies on every call, including same-value sets.
    pub fn set_name(&mut self, id: ItemId, name: impl Into<String>) -> DomainResult<()> {
        self.node_mut(id)?.replace_name(name.into());
        self.property_changed(id, ItemProperty::Name);
        Ok(())
    }

    /// Notifies only when the flag actually flips.
    pub fn set_expanded(&mut self, id: ItemId, is_expanded: bool) -> DomainResult<()> {
        let old = self.node_mut(id)?.replace_expanded(is_expanded);
        if old != is_expanded {
            self.property_changed(id, ItemProperty::IsExpanded);
        }
        Ok(())
    }

    /// Notifies on every call, including same-value sets.
    pub fn set_method(&mut self, id: ItemId, method: impl Into<String>) -> DomainResult<()> {
        self.node_mut(id)?.replace_method(method.into());
        self.property_changed(id, ItemProperty::Method);
        Ok(())
    }

    /// Notifies on every call, including same-value sets.
    pub fn set_response(
        &mut self,
        id: ItemId,
        response: Option<WorkspaceResponse>,
    ) -> DomainResult<()> {
        self.node_mut(id)?.replace_response(response);
        self.property_changed(id, ItemProperty::Response);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Child-list surface
    // ------------------------------------------------------------------

    /// Item whose child list contains `id`.
    ///
    /// Looks at the lists themselves: an unobserved owner never sets its
    /// children's parent link.
    pub fn owner_of(&self, id: ItemId) -> Option<ItemId> {
        let hint = self.get(id)?.parent();
        let listed_in = |owner: ItemId| self.get(owner).is_some_and(|o| o.children().contains(id));
        if let Some(parent) = hint.filter(|&p| listed_in(p)) {
            return Some(parent);
        }
        self.arena
            .iter()
            .find(|(_, item)| item.children().contains(id))
            .map(|(idx, _)| ItemId(idx))
    }

    /// True when `id` sits in some item's child list.
    pub fn is_attached(&self, id: ItemId) -> bool {
        self.owner_of(id).is_some()
    }

    fn check_insertable(&self, owner: ItemId, child: ItemId) -> DomainResult<()> {
        let owner_item = self.node(owner)?;
        self.node(child)?;
        if owner_item.children().contains(child) {
            return Err(DomainError::AlreadyAttached {
                child,
                parent: owner,
            });
        }
        if let Some(parent) = self.owner_of(child) {
            return Err(DomainError::AlreadyAttached { child, parent });
        }
        if self.iter_subtree(child).any(|(id, _)| id == owner) {
            return Err(DomainError::CycleDetected {
                parent: owner,
                child,
            });
        }
        Ok(())
    }

    fn attach(&mut self, owner: ItemId, child: ItemId) {
        if let Some(item) = self.arena.get_mut(child.0) {
            item.set_parent(Some(owner));
        }
    }

    fn detach(&mut self, child: ItemId) {
        if let Some(item) = self.arena.get_mut(child.0) {
            item.set_parent(None);
        }
    }

    fn observes(&self, owner: ItemId) -> bool {
        self.get(owner).is_some_and(Item::observes_children)
    }

    /// Unchecked insert shared by the public surface and cloning.
    fn splice_in(&mut self, owner: ItemId, index: usize, child: ItemId) -> DomainResult<()> {
        self.node_mut(owner)?.children_mut().insert(index, child);
        if self.observes(owner) {
            self.attach(owner, child);
        }
        self.children_changed(owner, ChildrenChange::Add { index, item: child });
        Ok(())
    }

    pub fn push_child(&mut self, owner: ItemId, child: ItemId) -> DomainResult<()> {
        self.check_insertable(owner, child)?;
        let index = self.node(owner)?.children().len();
        self.splice_in(owner, index, child)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_child(
        &mut self,
        owner: ItemId,
        index: usize,
        child: ItemId,
    ) -> DomainResult<()> {
        self.check_insertable(owner, child)?;
        let len = self.node(owner)?.children().len();
        if index > len {
            return Err(DomainError::IndexOutOfRange { index, len });
        }
        self.splice_in(owner, index, child)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn remove_child_at(&mut self, owner: ItemId, index: usize) -> DomainResult<ItemId> {
        let children = self.node_mut(owner)?.children_mut();
        let len = children.len();
        if index >= len {
            return Err(DomainError::IndexOutOfRange { index, len });
        }
        let child = children.remove(index);
        if self.observes(owner) {
            self.detach(child);
        }
        self.children_changed(owner, ChildrenChange::Remove { index, item: child });
        Ok(child)
    }

    /// Remove `child` from `owner`'s list, returning its former index.
    pub fn remove_child(&mut self, owner: ItemId, child: ItemId) -> DomainResult<usize> {
        let index = self
            .node(owner)?
            .children()
            .position(child)
            .ok_or(DomainError::NotAChild {
                parent: owner,
                child,
            })?;
        self.remove_child_at(owner, index)?;
        Ok(index)
    }

    /// Put `child` at `index`, returning the item it displaced.
    ///
    /// Replacing a child with itself keeps it attached and still raises
    /// a `Replace` with `old == new`.
    #[instrument(level = "trace", skip(self))]
    pub fn replace_child(
        &mut self,
        owner: ItemId,
        index: usize,
        child: ItemId,
    ) -> DomainResult<ItemId> {
        let len = self.node(owner)?.children().len();
        if index >= len {
            return Err(DomainError::IndexOutOfRange { index, len });
        }
        let current = self.node(owner)?.children()[index];
        if current == child {
            self.children_changed(
                owner,
                ChildrenChange::Replace {
                    index,
                    old: child,
                    new: child,
                },
            );
            return Ok(current);
        }
        self.check_insertable(owner, child)?;

        let old = self.node_mut(owner)?.children_mut().replace(index, child);
        if self.observes(owner) {
            self.detach(old);
            self.attach(owner, child);
        }
        self.children_changed(
            owner,
            ChildrenChange::Replace {
                index,
                old,
                new: child,
            },
        );
        Ok(old)
    }

    /// Move the child at `from` so it ends up at `to`.
    ///
    /// The moved child stays attached; `from == to` raises no event.
    #[instrument(level = "trace", skip(self))]
    pub fn move_child(&mut self, owner: ItemId, from: usize, to: usize) -> DomainResult<()> {
        let children = self.node_mut(owner)?.children_mut();
        let len = children.len();
        for index in [from, to] {
            if index >= len {
                return Err(DomainError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }
        let item = children.remove(from);
        children.insert(to, item);
        if self.observes(owner) {
            self.attach(owner, item);
        }
        self.children_changed(owner, ChildrenChange::Move { from, to, item });
        Ok(())
    }

    /// Empty `owner`'s child list, returning the former children in order.
    #[instrument(level = "trace", skip(self))]
    pub fn clear_children(&mut self, owner: ItemId) -> DomainResult<Vec<ItemId>> {
        let removed = self.node_mut(owner)?.children_mut().take();
        if self.observes(owner) {
            for &child in &removed {
                self.detach(child);
            }
        }
        self.children_changed(
            owner,
            ChildrenChange::Reset {
                removed: removed.clone(),
            },
        );
        Ok(removed)
    }

    /// Detach `child` from wherever it is attached and insert it under
    /// `new_parent` at `index` (appended when `None`).
    #[instrument(level = "debug", skip(self))]
    pub fn reparent(
        &mut self,
        child: ItemId,
        new_parent: ItemId,
        index: Option<usize>,
    ) -> DomainResult<()> {
        self.node(new_parent)?;
        if self.iter_subtree(child).any(|(id, _)| id == new_parent) {
            return Err(DomainError::CycleDetected {
                parent: new_parent,
                child,
            });
        }
        if let Some(old_parent) = self.owner_of(child) {
            self.remove_child(old_parent, child)?;
        }
        match index {
            Some(index) => self.insert_child(new_parent, index, child),
            None => self.push_child(new_parent, child),
        }
    }

    /// Turn on child observation for `id` and its subtree, rebuilding every
    /// parent link from the child lists.
    #[instrument(level = "debug", skip(self))]
    pub fn rewire(&mut self, id: ItemId) -> DomainResult<()> {
        self.node(id)?;
        let owners: Vec<ItemId> = self.iter_subtree(id).map(|(owner, _)| owner).collect();
        for owner in owners {
            let children: Vec<ItemId> = {
                let item = self.node_mut(owner)?;
                item.set_observe_children(true);
                item.children().iter().collect()
            };
            for child in children {
                self.attach(owner, child);
            }
        }
        Ok(())
    }

    /// Remove `id` and its whole subtree from the arena, detaching it from
    /// its parent first. Returns the number of items dropped.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: ItemId) -> DomainResult<usize> {
        self.node(id)?;
        if let Some(parent) = self.owner_of(id) {
            self.remove_child(parent, id)?;
        }
        let doomed: Vec<ItemId> = self.iter_postorder(id).map(|(node, _)| node).collect();
        for &node in &doomed {
            self.arena.remove(node.0);
            self.observers.forget(node);
        }
        debug!(%id, count = doomed.len(), "deleted subtree");
        Ok(doomed.len())
    }

    // ------------------------------------------------------------------
    // Deep clone
    // ------------------------------------------------------------------

    /// Duplicate `id` and its subtree.
    ///
    /// The copy points at the source's parent but is not inserted into that
    /// parent's child list. Copies always observe their children, so cloned
    /// children are attached to the copy whatever `observe_children` says.
    #[instrument(level = "debug", skip(self))]
    pub fn deep_clone(&mut self, id: ItemId) -> DomainResult<ItemId> {
        let clone = self.clone_subtree(id)?;
        debug!(source = %id, %clone, "cloned subtree");
        Ok(clone)
    }

    fn clone_subtree(&mut self, id: ItemId) -> DomainResult<ItemId> {
        let options = self.options;
        let source = self.node(id)?;

        let mut item = Item::new()
            .with_kind(source.kind())
            .with_name(source.name())
            .with_method(source.method())
            .with_expanded(source.is_expanded())
            .with_url(source.url.clone())
            .with_auth(source.auth.clone())
            .with_body(source.body.clone());
        item.set_parent(source.parent());
        item.replace_response(source.response().cloned());
        item.headers = source.headers.clone();
        item.chaining_rules = source.chaining_rules.clone();
        if options.clone_properties {
            item.properties = source.properties.clone();
        }
        let children: Vec<ItemId> = source.children().iter().collect();

        let copy = self.insert(item);
        for (index, child) in children.into_iter().enumerate() {
            let child_copy = self.clone_subtree(child)?;
            self.splice_in(copy, index, child_copy)?;
        }
        Ok(copy)
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Pre-order walk of `id` and its descendants.
    pub fn iter_subtree(&self, id: ItemId) -> SubtreeIterator<'_> {
        SubtreeIterator::new(self, id)
    }

    /// Post-order walk: children before their parent.
    pub fn iter_postorder(&self, id: ItemId) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, id)
    }

    /// Chain of parents from `id` upwards, nearest first.
    pub fn ancestors(&self, id: ItemId) -> Vec<ItemId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).and_then(Item::parent);
        while let Some(parent) = current {
            if chain.contains(&parent) || parent == id {
                break;
            }
            chain.push(parent);
            current = self.get(parent).and_then(Item::parent);
        }
        chain
    }

    pub fn is_ancestor_of(&self, ancestor: ItemId, id: ItemId) -> bool {
        ancestor != id && self.iter_subtree(ancestor).any(|(node, _)| node == id)
    }

    /// Levels in the subtree below and including `id`; 0 for unknown ids.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, id: ItemId) -> usize {
        match self.get(id) {
            Some(item) => {
                1 + item
                    .children()
                    .iter()
                    .map(|child| self.depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Find a descendant by a path of names, e.g. `["Users", "Get user"]`.
    /// An empty path yields `id` itself.
    pub fn find_path<S: AsRef<str>>(&self, id: ItemId, path: &[S]) -> Option<ItemId> {
        let mut current = id;
        for segment in path {
            let item = self.get(current)?;
            current = item
                .children()
                .iter()
                .find(|&child| self.get(child).is_some_and(|c| c.name() == segment.as_ref()))?;
        }
        self.get(current).map(|_| current)
    }
}

pub struct SubtreeIterator<'a> {
    tree: &'a ItemTree,
    stack: Vec<ItemId>,
}

impl<'a> SubtreeIterator<'a> {
    fn new(tree: &'a ItemTree, root: ItemId) -> Self {
        Self {
            tree,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for SubtreeIterator<'a> {
    type Item = (ItemId, &'a Item);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(item) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(item.children().iter().rev());
                return Some((current, item));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a ItemTree,
    stack: Vec<(ItemId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a ItemTree, root: ItemId) -> Self {
        Self {
            tree,
            stack: vec![(root, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (ItemId, &'a Item);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(item) = self.tree.get(current) {
                if visited {
                    return Some((current, item));
                }
                self.stack.push((current, true));
                for child in item.children().iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
