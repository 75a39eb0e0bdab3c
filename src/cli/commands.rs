use std::path::Path;

use tracing::{debug, instrument};

use crate::application::{export, import, read_document, to_json};
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::TreeSettings;
use crate::domain::ItemTree;
use crate::tree_traits::ItemTreeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = TreeSettings::load(cli.config.as_deref())?;
    match &cli.command {
        Commands::Show { file, collapsed } => _show(&settings, file, *collapsed),
        Commands::Duplicate { file, path } => _duplicate(&settings, file, path),
        Commands::Config => _config(&settings),
    }
}

/// Split `Users/Get user` into name segments, ignoring empty ones.
pub fn split_item_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[instrument(skip(settings))]
fn _show(settings: &TreeSettings, file: &Path, collapsed: bool) -> CliResult<()> {
    let document = read_document(file)?;
    let mut tree = ItemTree::with_options(settings.tree_options());
    let root = import(&mut tree, &document)?;
    debug!(items = tree.len(), depth = tree.depth(root), "imported workspace");
    output::info(&tree.to_tree_string(root, collapsed));
    Ok(())
}

#[instrument(skip(settings))]
fn _duplicate(settings: &TreeSettings, file: &Path, path: &str) -> CliResult<()> {
    let segments = split_item_path(path);
    if segments.is_empty() {
        return Err(CliError::Usage("cannot duplicate the root item".into()));
    }

    let document = read_document(file)?;
    let mut tree = ItemTree::with_options(settings.tree_options());
    let root = import(&mut tree, &document)?;

    let (name, parent_path) = segments
        .split_last()
        .ok_or_else(|| CliError::PathNotFound(path.to_string()))?;
    let parent = tree
        .find_path(root, parent_path)
        .ok_or_else(|| CliError::PathNotFound(path.to_string()))?;
    let (index, source) = tree
        .get(parent)
        .and_then(|p| {
            p.children()
                .iter()
                .enumerate()
                .find(|(_, child)| tree.get(*child).is_some_and(|c| c.name() == *name))
        })
        .ok_or_else(|| CliError::PathNotFound(path.to_string()))?;

    let copy = tree.deep_clone(source)?;
    tree.insert_child(parent, index + 1, copy)?;
    debug!(%source, %copy, "duplicated item");

    output::info(&to_json(&export(&tree, root)?)?);
    Ok(())
}

fn _config(settings: &TreeSettings) -> CliResult<()> {
    output::setting("observe_children", &settings.observe_children);
    output::setting("clone_properties", &settings.clone_properties);
    Ok(())
}
