use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::listing::{join_relative, url_for, utf8_name};
use crate::resolver::canonical_within;

/// Directory node in the navigation tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryTreeNode {
    pub name: String,
    pub url: String,
    pub children: Vec<DirectoryTreeNode>,
}

/// Build the directory tree rooted at `root`, labelling the top node `label`.
///
/// Symlinked directories appear only when their target is inside `root`.
pub fn build_tree(root: &Path, label: &str) -> DirectoryTreeNode {
    let children = match root.canonicalize() {
        Ok(root) => build_children(&root, &root, "", &mut HashSet::new()),
        Err(e) => {
            warn!("Failed to resolve root {}: {}", root.display(), e);
            Vec::new()
        }
    };

    DirectoryTreeNode {
        name: label.to_string(),
        url: "/".to_string(),
        children,
    }
}

/// Subdirectory nodes of the canonical directory `dir`, sorted by name.
///
/// `ancestors` holds the canonical directories on the current descent path so
/// a symlink pointing back up the tree is not entered again.
fn build_children(
    root: &Path,
    dir: &Path,
    base: &str,
    ancestors: &mut HashSet<PathBuf>,
) -> Vec<DirectoryTreeNode> {
    if !ancestors.insert(dir.to_path_buf()) {
        warn!("Directory cycle at {}, not descending", dir.display());
        return Vec::new();
    }

    let mut subdirs: Vec<(String, PathBuf)> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let target = canonical_within(root, &e.path())?;
                if !target.is_dir() {
                    return None;
                }
                let name = utf8_name(dir, e.file_name())?;
                Some((name, target))
            })
            .collect(),
        Err(e) => {
            warn!("Failed to read directory {}: {}", dir.display(), e);
            Vec::new()
        }
    };
    subdirs.sort_by(|a, b| a.0.cmp(&b.0));

    let nodes: Vec<DirectoryTreeNode> = subdirs
        .into_iter()
        .map(|(name, target)| {
            let relative = join_relative(base, &name);
            let children = build_children(root, &target, &relative, ancestors);
            DirectoryTreeNode {
                url: url_for("/browse", &relative),
                name,
                children,
            }
        })
        .collect();

    ancestors.remove(dir);
    nodes
}
