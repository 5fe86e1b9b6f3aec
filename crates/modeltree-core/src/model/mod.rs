/// Data model for the model-file tree.
///
/// Re-exports the arena-allocated tree structure and supporting types.
pub mod model_tree;
pub mod tree_node;

pub use model_tree::ModelTree;
pub use tree_node::{NodeIndex, TreeNode};
