//! Parent bookkeeping through the child-list surface.

use std::cell::RefCell;
use std::rc::Rc;

use rstest::{fixture, rstest};

use nightingale_tree::domain::{ChildrenChange, DomainError, Item, ItemEvent, ItemId, ItemTree};
use nightingale_tree::util::testing;

struct Workspace {
    tree: ItemTree,
    root: ItemId,
    a: ItemId,
    b: ItemId,
    c: ItemId,
}

/// Root collection with three detached requests ready to attach.
#[fixture]
fn ws() -> Workspace {
    testing::init_test_setup();
    let mut tree = ItemTree::new();
    let root = tree.insert(Item::collection("Root"));
    let a = tree.insert(Item::request("a", "GET"));
    let b = tree.insert(Item::request("b", "POST"));
    let c = tree.insert(Item::request("c", "DELETE"));
    Workspace { tree, root, a, b, c }
}

fn record(tree: &mut ItemTree, id: ItemId) -> Rc<RefCell<Vec<ItemEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    tree.subscribe(id, move |e| sink.borrow_mut().push(e.clone()))
        .unwrap();
    events
}

fn parent_of(tree: &ItemTree, id: ItemId) -> Option<ItemId> {
    tree.get(id).unwrap().parent()
}

fn children_of(tree: &ItemTree, id: ItemId) -> Vec<ItemId> {
    tree.get(id).unwrap().children().iter().collect()
}

#[rstest]
fn given_append_when_done_then_child_points_to_owner(mut ws: Workspace) {
    ws.tree.push_child(ws.root, ws.a).unwrap();
    assert_eq!(parent_of(&ws.tree, ws.a), Some(ws.root));
    assert!(ws.tree.is_attached(ws.a));
}

#[rstest]
fn given_insert_at_index_then_order_and_parent_are_set(mut ws: Workspace) {
    ws.tree.push_child(ws.root, ws.a).unwrap();
    ws.tree.push_child(ws.root, ws.b).unwrap();
    ws.tree.insert_child(ws.root, 1, ws.c).unwrap();
    assert_eq!(children_of(&ws.tree, ws.root), vec![ws.a, ws.c, ws.b]);
    assert_eq!(parent_of(&ws.tree, ws.c), Some(ws.root));
}

#[rstest]
fn given_insert_past_end_then_index_error(mut ws: Workspace) {
    let err = ws.tree.insert_child(ws.root, 1, ws.a).unwrap_err();
    assert_eq!(err, DomainError::IndexOutOfRange { index: 1, len: 0 });
    assert_eq!(parent_of(&ws.tree, ws.a), None);
}

#[rstest]
fn given_remove_then_parent_is_cleared(mut ws: Workspace) {
    ws.tree.push_child(ws.root, ws.a).unwrap();
    ws.tree.push_child(ws.root, ws.b).unwrap();
    assert_eq!(ws.tree.remove_child(ws.root, ws.a).unwrap(), 0);
    assert_eq!(parent_of(&ws.tree, ws.a), None);
    assert_eq!(children_of(&ws.tree, ws.root), vec![ws.b]);

    let removed = ws.tree.remove_child_at(ws.root, 0).unwrap();
    assert_eq!(removed, ws.b);
    assert_eq!(parent_of(&ws.tree, ws.b), None);
}

#[rstest]
fn given_remove_of_stranger_then_not_a_child(mut ws: Workspace) {
    let err = ws.tree.remove_child(ws.root, ws.a).unwrap_err();
    assert_eq!(
        err,
        DomainError::NotAChild {
            parent: ws.root,
            child: ws.a
        }
    );
}

#[rstest]
fn given_replace_then_old_detached_and_new_attached(mut ws: Workspace) {
    ws.tree.push_child(ws.root, ws.a).unwrap();
    let events = record(&mut ws.tree, ws.root);

    let old = ws.tree.replace_child(ws.root, 0, ws.b).unwrap();

    assert_eq!(old, ws.a);
    assert_eq!(parent_of(&ws.tree, ws.a), None);
    assert_eq!(parent_of(&ws.tree, ws.b), Some(ws.root));
    assert_eq!(
        *events.borrow(),
        vec![ItemEvent::ChildrenChanged {
            item: ws.root,
            change: ChildrenChange::Replace {
                index: 0,
                old: ws.a,
                new: ws.b
            }
        }]
    );
}

#[rstest]
fn given_replace_with_itself_then_still_attached_with_replace_event(mut ws: Workspace) {
    ws.tree.push_child(ws.root, ws.a).unwrap();
    let events = record(&mut ws.tree, ws.root);

    assert_eq!(ws.tree.replace_child(ws.root, 0, ws.a).unwrap(), ws.a);

    assert_eq!(parent_of(&ws.tree, ws.a), Some(ws.root));
    assert_eq!(children_of(&ws.tree, ws.root), vec![ws.a]);
    assert_eq!(
        *events.borrow(),
        vec![ItemEvent::ChildrenChanged {
            item: ws.root,
            change: ChildrenChange::Replace {
                index: 0,
                old: ws.a,
                new: ws.a
            }
        }]
    );
}

#[rstest]
fn given_child_of_unobserved_owner_when_attached_elsewhere_then_rejected(mut ws: Workspace) {
    let plain = ws.tree.insert(Item::unobserved().with_name("plain"));
    ws.tree.push_child(plain, ws.a).unwrap();
    assert_eq!(parent_of(&ws.tree, ws.a), None);
    assert!(ws.tree.is_attached(ws.a));
    assert_eq!(ws.tree.owner_of(ws.a), Some(plain));

    let err = ws.tree.push_child(ws.root, ws.a).unwrap_err();
    assert_eq!(
        err,
        DomainError::AlreadyAttached {
            child: ws.a,
            parent: plain
        }
    );
    let err = ws.tree.insert_child(ws.root, 0, ws.a).unwrap_err();
    assert!(matches!(err, DomainError::AlreadyAttached { .. }));
    assert!(children_of(&ws.tree, ws.root).is_empty());
    assert_eq!(children_of(&ws.tree, plain), vec![ws.a]);
}

#[rstest]
fn given_child_of_unobserved_owner_when_reparented_then_listed_once(mut ws: Workspace) {
    let plain = ws.tree.insert(Item::unobserved().with_name("plain"));
    ws.tree.push_child(plain, ws.a).unwrap();

    ws.tree.reparent(ws.a, ws.root, None).unwrap();

    assert!(children_of(&ws.tree, plain).is_empty());
    assert_eq!(children_of(&ws.tree, ws.root), vec![ws.a]);
    assert_eq!(parent_of(&ws.tree, ws.a), Some(ws.root));
    assert_eq!(ws.tree.owner_of(ws.a), Some(ws.root));
}

#[rstest]
fn given_child_of_unobserved_owner_when_deleted_then_owner_list_is_cleaned(mut ws: Workspace) {
    let plain = ws.tree.insert(Item::unobserved().with_name("plain"));
    ws.tree.push_child(plain, ws.a).unwrap();
    ws.tree.push_child(plain, ws.b).unwrap();

    assert_eq!(ws.tree.delete(ws.a).unwrap(), 1);

    assert_eq!(children_of(&ws.tree, plain), vec![ws.b]);
    assert!(ws.tree.get(ws.a).is_none());
}

#[rstest]
fn given_move_then_child_stays_attached_with_single_event(mut ws: Workspace) {
    for id in [ws.a, ws.b, ws.c] {
        ws.tree.push_child(ws.root, id).unwrap();
    }
    let events = record(&mut ws.tree, ws.root);

    ws.tree.move_child(ws.root, 0, 2).unwrap();

    assert_eq!(children_of(&ws.tree, ws.root), vec![ws.b, ws.c, ws.a]);
    for id in [ws.a, ws.b, ws.c] {
        assert_eq!(parent_of(&ws.tree, id), Some(ws.root));
    }
    assert_eq!(
        *events.borrow(),
        vec![ItemEvent::ChildrenChanged {
            item: ws.root,
            change: ChildrenChange::Move {
                from: 0,
                to: 2,
                item: ws.a
            }
        }]
    );
}

#[rstest]
fn given_move_to_same_index_then_no_event(mut ws: Workspace) {
    ws.tree.push_child(ws.root, ws.a).unwrap();
    let events = record(&mut ws.tree, ws.root);
    ws.tree.move_child(ws.root, 0, 0).unwrap();
    assert!(events.borrow().is_empty());
    assert!(ws.tree.move_child(ws.root, 0, 1).is_err());
}

#[rstest]
fn given_clear_then_every_former_child_is_detached(mut ws: Workspace) {
    for id in [ws.a, ws.b, ws.c] {
        ws.tree.push_child(ws.root, id).unwrap();
    }
    let events = record(&mut ws.tree, ws.root);

    let removed = ws.tree.clear_children(ws.root).unwrap();

    assert_eq!(removed, vec![ws.a, ws.b, ws.c]);
    assert!(children_of(&ws.tree, ws.root).is_empty());
    for id in removed.iter() {
        assert_eq!(parent_of(&ws.tree, *id), None);
    }
    assert_eq!(
        *events.borrow(),
        vec![ItemEvent::ChildrenChanged {
            item: ws.root,
            change: ChildrenChange::Reset { removed }
        }]
    );
}

#[rstest]
fn given_each_edit_then_one_event_each(mut ws: Workspace) {
    let events = record(&mut ws.tree, ws.root);
    ws.tree.push_child(ws.root, ws.a).unwrap();
    ws.tree.insert_child(ws.root, 0, ws.b).unwrap();
    ws.tree.remove_child(ws.root, ws.a).unwrap();

    let changes: Vec<ChildrenChange> = events
        .borrow()
        .iter()
        .map(|e| match e {
            ItemEvent::ChildrenChanged { change, .. } => change.clone(),
            other => panic!("unexpected event {:?}", other),
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            ChildrenChange::Add {
                index: 0,
                item: ws.a
            },
            ChildrenChange::Add {
                index: 0,
                item: ws.b
            },
            ChildrenChange::Remove {
                index: 1,
                item: ws.a
            },
        ]
    );
}

#[rstest]
fn given_child_attached_elsewhere_then_insert_is_rejected(mut ws: Workspace) {
    let other = ws.tree.insert(Item::collection("Other"));
    ws.tree.push_child(ws.root, ws.a).unwrap();

    let err = ws.tree.push_child(other, ws.a).unwrap_err();
    assert_eq!(
        err,
        DomainError::AlreadyAttached {
            child: ws.a,
            parent: ws.root
        }
    );
    let err = ws.tree.push_child(ws.root, ws.a).unwrap_err();
    assert!(matches!(err, DomainError::AlreadyAttached { .. }));
}

#[rstest]
fn given_ancestor_inserted_below_descendant_then_cycle(mut ws: Workspace) {
    ws.tree.push_child(ws.root, ws.a).unwrap();
    ws.tree.push_child(ws.a, ws.b).unwrap();

    assert!(matches!(
        ws.tree.push_child(ws.b, ws.root),
        Err(DomainError::CycleDetected { .. })
    ));
    assert!(matches!(
        ws.tree.push_child(ws.c, ws.c),
        Err(DomainError::CycleDetected { .. })
    ));
}

#[rstest]
fn given_reparent_then_child_moves_between_owners(mut ws: Workspace) {
    let other = ws.tree.insert(Item::collection("Other"));
    ws.tree.push_child(ws.root, ws.a).unwrap();
    ws.tree.push_child(other, ws.b).unwrap();

    ws.tree.reparent(ws.a, other, Some(0)).unwrap();

    assert!(children_of(&ws.tree, ws.root).is_empty());
    assert_eq!(children_of(&ws.tree, other), vec![ws.a, ws.b]);
    assert_eq!(parent_of(&ws.tree, ws.a), Some(other));
}

#[rstest]
fn given_reparent_into_own_subtree_then_cycle_and_unchanged(mut ws: Workspace) {
    ws.tree.push_child(ws.root, ws.a).unwrap();
    ws.tree.push_child(ws.a, ws.b).unwrap();

    let err = ws.tree.reparent(ws.a, ws.b, None).unwrap_err();
    assert!(matches!(err, DomainError::CycleDetected { .. }));
    assert_eq!(children_of(&ws.tree, ws.root), vec![ws.a]);
}

#[rstest]
fn given_unobserved_owner_then_parent_links_untouched(mut ws: Workspace) {
    let plain = ws.tree.insert(Item::unobserved().with_name("plain"));
    ws.tree.push_child(plain, ws.a).unwrap();
    assert_eq!(children_of(&ws.tree, plain), vec![ws.a]);
    assert_eq!(parent_of(&ws.tree, ws.a), None);

    ws.tree.rewire(plain).unwrap();
    assert_eq!(parent_of(&ws.tree, ws.a), Some(plain));
    assert!(ws.tree.get(plain).unwrap().observes_children());

    ws.tree.remove_child(plain, ws.a).unwrap();
    assert_eq!(parent_of(&ws.tree, ws.a), None);
}

#[rstest]
fn given_unknown_item_then_not_found(mut ws: Workspace) {
    ws.tree.delete(ws.c).unwrap();
    assert_eq!(
        ws.tree.push_child(ws.root, ws.c).unwrap_err(),
        DomainError::ItemNotFound(ws.c)
    );
    assert!(ws.tree.set_name(ws.c, "gone").is_err());
}

#[rstest]
fn given_deleted_item_then_its_subscriptions_are_dropped(mut ws: Workspace) {
    ws.tree.push_child(ws.root, ws.a).unwrap();
    let events = record(&mut ws.tree, ws.a);
    ws.tree.delete(ws.a).unwrap();
    assert!(children_of(&ws.tree, ws.root).is_empty());
    assert!(events.borrow().is_empty());
}
