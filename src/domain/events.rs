//! Change notification for items.
//!
//! Handlers run synchronously on the mutating call, after the write,
//! in the order they subscribed.

use std::fmt;

use tracing::trace;

use crate::domain::ItemId;

/// Tracked item property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemProperty {
    Kind,
    Name,
    IsExpanded,
    Method,
    Response,
}

/// One structural edit of a child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildrenChange {
    Add { index: usize, item: ItemId },
    Remove { index: usize, item: ItemId },
    Replace { index: usize, old: ItemId, new: ItemId },
    Move { from: usize, to: usize, item: ItemId },
    /// The list was cleared; `removed` holds the former children in order.
    Reset { removed: Vec<ItemId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEvent {
    PropertyChanged { item: ItemId, property: ItemProperty },
    ChildrenChanged { item: ItemId, change: ChildrenChange },
}

impl ItemEvent {
    /// Item the event was raised on.
    pub fn item(&self) -> ItemId {
        match self {
            ItemEvent::PropertyChanged { item, .. } | ItemEvent::ChildrenChanged { item, .. } => {
                *item
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&ItemEvent)>;

struct Subscription {
    id: SubscriptionId,
    item: ItemId,
    handler: Handler,
}

/// Handler registry keyed by item.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl Observers {
    pub(crate) fn subscribe(&mut self, item: ItemId, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, item, handler });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Drop every handler registered on `item`.
    pub(crate) fn forget(&mut self, item: ItemId) {
        self.subscriptions.retain(|s| s.item != item);
    }

    pub(crate) fn notify(&mut self, event: &ItemEvent) {
        let target = event.item();
        for subscription in self.subscriptions.iter_mut().filter(|s| s.item == target) {
            trace!(subscription = ?subscription.id, ?event, "notify");
            (subscription.handler)(event);
        }
    }
}
