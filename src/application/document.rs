//! Serialized form of an item subtree.
//!
//! Documents never carry `parent`: the nesting of `children` is the only
//! structural information, and importing rebuilds parent links from it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::error_ext::{IoResultExt, JsonResultExt};
use crate::application::ApplicationResult;
use crate::domain::{
    Authentication, DomainError, DomainResult, Item, ItemId, ItemKind, ItemTree, Parameter,
    RequestBody, Url, WorkspaceResponse,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDocument {
    pub kind: ItemKind,
    pub name: String,
    pub is_expanded: bool,
    pub method: String,
    pub url: Url,
    pub auth: Authentication,
    pub body: RequestBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<WorkspaceResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Parameter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chaining_rules: Vec<Parameter>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ItemDocument>,
}

/// Snapshot `id` and its subtree.
#[instrument(level = "debug", skip(tree))]
pub fn export(tree: &ItemTree, id: ItemId) -> DomainResult<ItemDocument> {
    let item = tree.get(id).ok_or(DomainError::ItemNotFound(id))?;
    let children = item
        .children()
        .iter()
        .map(|child| export(tree, child))
        .collect::<DomainResult<Vec<_>>>()?;

    Ok(ItemDocument {
        kind: item.kind(),
        name: item.name().to_string(),
        is_expanded: item.is_expanded(),
        method: item.method().to_string(),
        url: item.url.clone(),
        auth: item.auth.clone(),
        body: item.body.clone(),
        response: item.response().cloned(),
        headers: item.headers.clone(),
        chaining_rules: item.chaining_rules.clone(),
        properties: item.properties.clone(),
        children,
    })
}

/// Build a detached subtree from `document`.
///
/// Children are appended through the child-list surface, so with the
/// tree's default options every parent link points at its container.
#[instrument(level = "debug", skip(tree, document), fields(name = %document.name))]
pub fn import(tree: &mut ItemTree, document: &ItemDocument) -> DomainResult<ItemId> {
    let mut item = Item::with_observer(tree.options().observe_children)
        .with_kind(document.kind)
        .with_name(document.name.as_str())
        .with_method(document.method.as_str())
        .with_expanded(document.is_expanded)
        .with_url(document.url.clone())
        .with_auth(document.auth.clone())
        .with_body(document.body.clone());
    if let Some(response) = &document.response {
        item = item.with_response(response.clone());
    }
    item.headers = document.headers.clone();
    item.chaining_rules = document.chaining_rules.clone();
    item.properties = document.properties.clone();

    let id = tree.insert(item);
    for child in &document.children {
        let child_id = import(tree, child)?;
        tree.push_child(id, child_id)?;
    }
    Ok(id)
}

pub fn parse_document(json: &str) -> ApplicationResult<ItemDocument> {
    serde_json::from_str(json).with_document_context("workspace document")
}

pub fn to_json(document: &ItemDocument) -> ApplicationResult<String> {
    serde_json::to_string_pretty(document).with_document_context("workspace document")
}

pub fn read_document(path: &Path) -> ApplicationResult<ItemDocument> {
    let content = fs::read_to_string(path).with_path_context("read workspace", path)?;
    debug!(path = %path.display(), bytes = content.len(), "read workspace document");
    serde_json::from_str(&content).with_document_context(&path.display().to_string())
}
