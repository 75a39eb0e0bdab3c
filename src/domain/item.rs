//! The workspace item: one node of the collection/request tree.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index as IndexOp;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::domain::model::{Authentication, Parameter, RequestBody, Url, WorkspaceResponse};

/// Handle of an item inside an [`ItemTree`](crate::domain::ItemTree).
///
/// Two handles are equal iff they name the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub(crate) Index);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (idx, generation) = self.0.into_raw_parts();
        write!(f, "#{}.{}", idx, generation)
    }
}

/// What an item is displayed as in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    #[default]
    None,
    Request,
    Collection,
}

/// Ordered child handles of an item.
///
/// Read-only from outside the domain: every mutation goes through
/// [`ItemTree`](crate::domain::ItemTree) so parent links stay in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildList(Vec<ItemId>);

impl ChildList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ItemId> {
        self.0.get(index).copied()
    }

    pub fn first(&self) -> Option<ItemId> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<ItemId> {
        self.0.last().copied()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.0.contains(&id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.0.iter().position(|&c| c == id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = ItemId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[ItemId] {
        &self.0
    }

    pub(crate) fn insert(&mut self, index: usize, id: ItemId) {
        self.0.insert(index, id);
    }

    pub(crate) fn remove(&mut self, index: usize) -> ItemId {
        self.0.remove(index)
    }

    pub(crate) fn replace(&mut self, index: usize, id: ItemId) -> ItemId {
        std::mem::replace(&mut self.0[index], id)
    }

    pub(crate) fn take(&mut self) -> Vec<ItemId> {
        std::mem::take(&mut self.0)
    }
}

impl IndexOp<usize> for ChildList {
    type Output = ItemId;

    fn index(&self, index: usize) -> &ItemId {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a ChildList {
    type Item = &'a ItemId;
    type IntoIter = std::slice::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A collection (folder) or request in the workspace tree.
///
/// Fields that drive change notification (`kind`, `name`, `is_expanded`,
/// `method`, `response`) and the structural fields (`parent`, `children`)
/// are only writable through [`ItemTree`](crate::domain::ItemTree).
/// The remaining payload is public and changes silently.
#[derive(Debug)]
pub struct Item {
    parent: Option<ItemId>,
    kind: ItemKind,
    name: String,
    is_expanded: bool,
    method: String,
    response: Option<WorkspaceResponse>,
    children: ChildList,
    observe_children: bool,
    pub url: Url,
    pub auth: Authentication,
    pub body: RequestBody,
    pub headers: Vec<Parameter>,
    pub chaining_rules: Vec<Parameter>,
    /// Extension data for front ends. Not part of identity, ordering or hashing.
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Default for Item {
    fn default() -> Self {
        Self::new()
    }
}

impl Item {
    /// Item whose child list keeps the children's parent links up to date.
    pub fn new() -> Self {
        Self::with_observer(true)
    }

    /// Item whose child list leaves parent links alone.
    pub fn unobserved() -> Self {
        Self::with_observer(false)
    }

    pub(crate) fn with_observer(observe_children: bool) -> Self {
        Self {
            parent: None,
            kind: ItemKind::None,
            name: String::new(),
            is_expanded: false,
            method: String::new(),
            response: None,
            children: ChildList::default(),
            observe_children,
            url: Url::default(),
            auth: Authentication::default(),
            body: RequestBody::default(),
            headers: Vec::new(),
            chaining_rules: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn collection(name: impl Into<String>) -> Self {
        Self::new().with_kind(ItemKind::Collection).with_name(name)
    }

    pub fn request(name: impl Into<String>, method: impl Into<String>) -> Self {
        Self::new()
            .with_kind(ItemKind::Request)
            .with_name(name)
            .with_method(method)
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    #[must_use]
    pub fn with_expanded(mut self, is_expanded: bool) -> Self {
        self.is_expanded = is_expanded;
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = url;
        self
    }

    #[must_use]
    pub fn with_auth(mut self, auth: Authentication) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_response(mut self, response: WorkspaceResponse) -> Self {
        self.response = Some(response);
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: Parameter) -> Self {
        self.headers.push(header);
        self
    }

    #[must_use]
    pub fn with_chaining_rule(mut self, rule: Parameter) -> Self {
        self.chaining_rules.push(rule);
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Containing item, if any.
    ///
    /// For a fresh clone this is the source's parent even though the clone
    /// is not yet in that parent's child list.
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    /// HTTP method; only meaningful for [`ItemKind::Request`].
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn response(&self) -> Option<&WorkspaceResponse> {
        self.response.as_ref()
    }

    pub fn children(&self) -> &ChildList {
        &self.children
    }

    pub fn observes_children(&self) -> bool {
        self.observe_children
    }

    /// Display order: by name, byte-wise. An absent item sorts first.
    ///
    /// Independent from `==`: distinct items with the same name compare
    /// `Equal` here while still being unequal.
    pub fn compare_to(&self, other: Option<&Item>) -> Ordering {
        match other {
            None => Ordering::Greater,
            Some(other) => self.name.cmp(&other.name),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ItemId>) {
        self.parent = parent;
    }

    pub(crate) fn set_observe_children(&mut self, observe: bool) {
        self.observe_children = observe;
    }

    pub(crate) fn replace_kind(&mut self, kind: ItemKind) -> ItemKind {
        std::mem::replace(&mut self.kind, kind)
    }

    pub(crate) fn replace_name(&mut self, name: String) -> String {
        std::mem::replace(&mut self.name, name)
    }

    pub(crate) fn replace_expanded(&mut self, is_expanded: bool) -> bool {
        std::mem::replace(&mut self.is_expanded, is_expanded)
    }

    pub(crate) fn replace_method(&mut self, method: String) -> String {
        std::mem::replace(&mut self.method, method)
    }

    pub(crate) fn replace_response(
        &mut self,
        response: Option<WorkspaceResponse>,
    ) -> Option<WorkspaceResponse> {
        std::mem::replace(&mut self.response, response)
    }

    pub(crate) fn children_mut(&mut self) -> &mut ChildList {
        &mut self.children
    }
}

/// Identity: an item equals only itself, whatever its field values.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Item {}

/// Hashes `method`, `name` and `kind`.
///
/// Changing any of them invalidates the hash; the shared borrow a hash key
/// holds keeps [`ItemTree`](crate::domain::ItemTree) setters from running
/// meanwhile.
impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.method.hash(state);
        self.name.hash(state);
        self.kind.hash(state);
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
