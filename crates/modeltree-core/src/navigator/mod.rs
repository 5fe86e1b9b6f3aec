/// Tree navigator: sequential file selection and subtree queries.
///
/// Nothing here is cached: every call flattens the tree it is given, so the
/// answer always reflects whatever the tree holds right now.
use crate::model::{ModelTree, NodeIndex};
use crate::paths::fold_case;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Which way to move through the flattened file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// Positive deltas go forward, negative ones back. Zero is no move.
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta.signum() {
            1 => Some(Self::Next),
            -1 => Some(Self::Previous),
            _ => None,
        }
    }
}

/// Fallback reference points maintained by the caller.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    /// The file most recently selected by the user.
    pub last_selected: Option<PathBuf>,
    /// The node currently highlighted in the tree view, if any.
    pub highlighted: Option<NodeIndex>,
}

/// Every file node in depth-first pre-order, roots in order.
pub fn flatten_files(tree: &ModelTree) -> Vec<NodeIndex> {
    tree.preorder().filter(|&i| !tree.node(i).is_dir).collect()
}

/// Find the first node, in pre-order, whose path matches `path` ignoring case.
pub fn find_node(tree: &ModelTree, path: &Path) -> Option<NodeIndex> {
    if path.as_os_str().is_empty() {
        return None;
    }
    let key = fold_case(path);
    tree.preorder()
        .find(|&i| fold_case(&tree.node(i).full_path) == key)
}

/// Move one file forward or backward from `current`.
///
/// The reference point is `current` if it names a listed file, otherwise the
/// context's last-selected path, otherwise the highlighted node. With no
/// reference at all, `Next` lands on the first file and `Previous` on the
/// last. Movement clamps at both ends instead of wrapping.
pub fn step(
    tree: &ModelTree,
    current: Option<&Path>,
    context: &SelectionContext,
    direction: Direction,
) -> Option<PathBuf> {
    step_node(tree, current, context, direction).map(|i| tree.node(i).full_path.clone())
}

/// Like [`step`], but returns the node moved to.
///
/// Nested roots can list the same file more than once. When the highlighted
/// node has the reference path, its own position is used, so stepping moves
/// on from the occurrence the caller is actually on.
pub fn step_node(
    tree: &ModelTree,
    current: Option<&Path>,
    context: &SelectionContext,
    direction: Direction,
) -> Option<NodeIndex> {
    let files = flatten_files(tree);
    if files.is_empty() {
        return None;
    }

    let highlighted = context
        .highlighted
        .and_then(|h| files.iter().position(|&i| i == h));

    let position_of = |path: &Path| -> Option<usize> {
        if path.as_os_str().is_empty() {
            return None;
        }
        let key = fold_case(path);
        let matches = |i: usize| fold_case(&tree.node(files[i]).full_path) == key;
        match highlighted {
            Some(h) if matches(h) => Some(h),
            _ => (0..files.len()).find(|&i| matches(i)),
        }
    };

    let reference = current
        .and_then(position_of)
        .or_else(|| context.last_selected.as_deref().and_then(position_of))
        .or(highlighted);

    let target = match (reference, direction) {
        (Some(i), Direction::Next) => (i + 1).min(files.len() - 1),
        (Some(i), Direction::Previous) => i.saturating_sub(1),
        (None, Direction::Next) => 0,
        (None, Direction::Previous) => files.len() - 1,
    };

    Some(files[target])
}

/// Ancestors of `node`, nearest first. Roots have none.
pub fn ancestors(tree: &ModelTree, node: NodeIndex) -> Vec<NodeIndex> {
    let mut out = Vec::new();
    let mut cursor = tree.node(node).parent;
    while let Some(p) = cursor {
        out.push(p);
        cursor = tree.node(p).parent;
    }
    out
}

/// Mark every ancestor of `node` as expanded. Safe to call repeatedly.
pub fn expand_ancestors(tree: &ModelTree, node: NodeIndex, expanded: &mut HashSet<NodeIndex>) {
    expanded.extend(ancestors(tree, node));
}

/// Every file path at or below the node matching `path`, in tree order.
///
/// A file path yields itself; an unknown path yields nothing.
pub fn collect_under(tree: &ModelTree, path: &Path) -> Vec<PathBuf> {
    let Some(start) = find_node(tree, path) else {
        return Vec::new();
    };
    tree.preorder_from(start)
        .filter(|&i| !tree.node(i).is_dir)
        .map(|i| tree.node(i).full_path.clone())
        .collect()
}
