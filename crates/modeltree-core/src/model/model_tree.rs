/// Arena-backed model tree spanning several root folders.
///
/// All nodes live in a single `Vec<TreeNode>`. Relationships between nodes
/// use `NodeIndex` rather than heap pointers, so the parent back-reference
/// is a plain lookup key and dropping the tree drops everything at once.
use super::tree_node::{NodeIndex, TreeNode};
use crate::paths::fold_case;
use compact_str::CompactString;
use std::path::PathBuf;

/// The complete tree produced by one rebuild.
#[derive(Debug, Clone, Default)]
pub struct ModelTree {
    /// Arena: every node in a flat vector.
    pub nodes: Vec<TreeNode>,

    /// Root node indices, one per root folder that contained models.
    pub roots: Vec<NodeIndex>,
}

impl ModelTree {
    pub fn with_capacity(estimated_nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(estimated_nodes),
            roots: Vec::new(),
        }
    }

    /// Allocate a new node in the arena and return its index.
    pub fn add_node(&mut self, node: TreeNode) -> NodeIndex {
        let idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(node);
        idx
    }

    /// Add a root folder, labelled with its own path.
    pub fn add_root(&mut self, path: PathBuf) -> NodeIndex {
        let label = CompactString::new(path.to_string_lossy());
        let idx = self.add_node(TreeNode::new_dir(label, path, None));
        self.roots.push(idx);
        idx
    }

    /// Attach `child` under `parent`, appending to the child list.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.nodes[child.idx()].parent = Some(parent);
        self.nodes[parent.idx()].children.push(child);
    }

    /// Sort every child list by name and the roots by path, ignoring case.
    ///
    /// Directories and files are interleaved; only the name decides. The
    /// sort is stable, so names that differ only by case keep insertion
    /// order. Uses an explicit stack rather than recursion so very deep
    /// folder structures cannot overflow.
    pub fn sort_by_name(&mut self) {
        let mut stack: Vec<NodeIndex> = self.roots.clone();
        while let Some(idx) = stack.pop() {
            let mut children = std::mem::take(&mut self.nodes[idx.idx()].children);
            if children.len() > 1 {
                children.sort_by_cached_key(|c| self.nodes[c.idx()].name.to_lowercase());
            }
            stack.extend(children.iter().copied());
            self.nodes[idx.idx()].children = children;
        }

        let mut roots = std::mem::take(&mut self.roots);
        roots.sort_by_cached_key(|r| fold_case(&self.nodes[r.idx()].full_path));
        self.roots = roots;
    }

    /// Depth-first pre-order walk over every node, roots in order.
    pub fn preorder(&self) -> Preorder<'_> {
        let mut stack: Vec<NodeIndex> = self.roots.clone();
        stack.reverse();
        Preorder { tree: self, stack }
    }

    /// Pre-order walk of the subtree rooted at `start`, `start` included.
    pub fn preorder_from(&self, start: NodeIndex) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![start],
        }
    }

    /// Direct children of a node, in display order.
    #[inline]
    pub fn children(&self, parent: NodeIndex) -> &[NodeIndex] {
        &self.nodes[parent.idx()].children
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> &TreeNode {
        &self.nodes[index.idx()]
    }

    /// Number of file (leaf) nodes across all roots.
    pub fn file_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_dir).count()
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator returned by [`ModelTree::preorder`].
pub struct Preorder<'a> {
    tree: &'a ModelTree,
    stack: Vec<NodeIndex>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let idx = self.stack.pop()?;
        // Reverse push so the first child is visited first.
        self.stack
            .extend(self.tree.children(idx).iter().rev().copied());
        Some(idx)
    }
}
