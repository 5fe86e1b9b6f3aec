/// A single node in the arena-allocated model tree.
///
/// Nodes are stored in a flat `Vec<TreeNode>` owned by [`ModelTree`].
/// The child list is the only owning relation; `parent` is a plain index
/// used for upward lookups and never affects lifetime.
///
/// [`ModelTree`]: super::ModelTree
use compact_str::CompactString;
use std::path::PathBuf;

/// Lightweight index into the arena `Vec<TreeNode>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a new `NodeIndex` from a `usize`, panicking if it exceeds `u32::MAX`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A root folder, intermediate directory, or recognised model file.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Display label. File and directory names for ordinary nodes; the
    /// full folder path for roots.
    pub name: CompactString,

    /// Absolute path on disk.
    pub full_path: PathBuf,

    pub is_dir: bool,

    /// Non-owning back-reference. `None` for roots.
    pub parent: Option<NodeIndex>,

    /// Owned children in display order (case-insensitive by name once the
    /// tree has been sorted).
    pub children: Vec<NodeIndex>,
}

impl TreeNode {
    /// Create a directory node. Roots are directories without a parent.
    pub fn new_dir(name: CompactString, full_path: PathBuf, parent: Option<NodeIndex>) -> Self {
        Self {
            name,
            full_path,
            is_dir: true,
            parent,
            children: Vec::new(),
        }
    }

    /// Create a file (leaf) node.
    pub fn new_file(name: CompactString, full_path: PathBuf, parent: Option<NodeIndex>) -> Self {
        Self {
            name,
            full_path,
            is_dir: false,
            parent,
            children: Vec::new(),
        }
    }
}
