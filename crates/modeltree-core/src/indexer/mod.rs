/// Tree indexer: turns a set of root folders into one merged model tree.
///
/// Each root is walked for recognised model files (see [`walk`]). The files
/// are then threaded into an arena tree: intermediate directories are created
/// on demand and cached by case-folded path so a folder shared by many
/// models appears once. Roots without any model are left out entirely.
///
/// The tree is always rebuilt from scratch; there is no incremental update.
/// The walk runs on the calling thread, so a very large folder set stalls
/// the caller until it finishes.
pub mod classify;
pub mod walk;

pub use classify::{
    categorise_extension, FileClassifier, ModelExtensions, ModelKind, DEFAULT_MODEL_EXTENSIONS,
};
pub use walk::collect_model_paths;

use crate::error::{IndexError, WalkError};
use crate::logging::Logger;
use crate::model::{ModelTree, NodeIndex, TreeNode};
use crate::paths::{fold_case, normalize_roots};
use compact_str::CompactString;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Build a fresh tree from already-normalised root folders.
///
/// Always returns a tree, possibly empty. Walk failures from every root are
/// gathered into the accompanying [`IndexError`].
pub fn build_tree(
    roots: &[PathBuf],
    classifier: &dyn FileClassifier,
) -> (ModelTree, Option<IndexError>) {
    let mut tree = ModelTree::with_capacity(256);
    let mut errors: Vec<WalkError> = Vec::new();

    for root in roots {
        if root.as_os_str().is_empty() {
            continue;
        }
        let (model_paths, walk_errors) = collect_model_paths(root, classifier);
        errors.extend(walk_errors);
        if model_paths.is_empty() {
            debug!("No models under {}, root omitted", root.display());
            continue;
        }
        insert_root(&mut tree, root, &model_paths, &mut errors);
    }

    tree.sort_by_name();
    (tree, IndexError::from_errors(errors))
}

/// Add one root and all of its model files to `tree`.
fn insert_root(
    tree: &mut ModelTree,
    root: &Path,
    model_paths: &[PathBuf],
    errors: &mut Vec<WalkError>,
) {
    let root_idx = tree.add_root(root.to_path_buf());

    // Directory cache for this root only, keyed by case-folded full path.
    let mut dir_map: HashMap<String, NodeIndex> = HashMap::with_capacity(model_paths.len());
    dir_map.insert(fold_case(root), root_idx);

    for model_path in model_paths {
        let rel = match model_path.strip_prefix(root) {
            Ok(rel) => rel,
            Err(err) => {
                errors.push(WalkError {
                    path: Some(model_path.clone()),
                    message: err.to_string(),
                });
                continue;
            }
        };

        let parts: Vec<&std::ffi::OsStr> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();
        let Some((file_name, dirs)) = parts.split_last() else {
            continue;
        };

        let mut current = root_idx;
        let mut current_path = root.to_path_buf();
        for part in dirs {
            current_path.push(part);
            let key = fold_case(&current_path);
            current = match dir_map.get(&key) {
                Some(&idx) => idx,
                None => {
                    let idx = tree.add_node(TreeNode::new_dir(
                        CompactString::new(part.to_string_lossy()),
                        current_path.clone(),
                        Some(current),
                    ));
                    tree.add_child(current, idx);
                    dir_map.insert(key, idx);
                    idx
                }
            };
        }

        let file_idx = tree.add_node(TreeNode::new_file(
            CompactString::new(file_name.to_string_lossy()),
            model_path.clone(),
            Some(current),
        ));
        tree.add_child(current, file_idx);
    }
}

/// Owns the current tree and rebuilds it whenever the root set changes.
pub struct TreeIndexer {
    classifier: Arc<dyn FileClassifier>,
    roots: Vec<PathBuf>,
    tree: ModelTree,
    logger: Logger,
}

impl TreeIndexer {
    pub fn new(classifier: Arc<dyn FileClassifier>, logger: Option<Logger>) -> Self {
        Self {
            classifier,
            roots: Vec::new(),
            tree: ModelTree::default(),
            logger: logger.unwrap_or_default(),
        }
    }

    /// Normalise `paths`, discard the previous tree, and build a new one.
    ///
    /// The new tree replaces the old one even when some subtrees failed;
    /// the error lists what was skipped.
    pub fn set_roots<I, S>(&mut self, paths: I) -> Result<(), IndexError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let roots = normalize_roots(paths);
        self.logger.in_scope(|| {
            let start = Instant::now();
            let (tree, error) = build_tree(&roots, self.classifier.as_ref());
            info!(
                "Indexed {} roots ({} models, {} nodes) in {:?}",
                tree.roots.len(),
                tree.file_count(),
                tree.len(),
                start.elapsed()
            );
            if let Some(err) = &error {
                warn!("Tree rebuilt with {} walk errors", err.len());
            }
            self.roots = roots;
            self.tree = tree;
            match error {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }

    /// Rebuild from the current roots, e.g. after files changed on disk.
    pub fn refresh(&mut self) -> Result<(), IndexError> {
        let roots = std::mem::take(&mut self.roots);
        self.set_roots(roots)
    }

    pub fn tree(&self) -> &ModelTree {
        &self.tree
    }

    /// The normalised folders the current tree was built from, including
    /// those that turned out to hold no models.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn classifier(&self) -> &dyn FileClassifier {
        self.classifier.as_ref()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn shared_directory_is_created_once() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("chars/a.pmx"));
        touch(&tmp.path().join("chars/b.pmx"));

        let (tree, err) = build_tree(&[tmp.path().to_path_buf()], &ModelExtensions::default());
        assert!(err.is_none());

        let root = tree.roots[0];
        assert_eq!(tree.children(root).len(), 1);
        let chars = tree.children(root)[0];
        assert!(tree.node(chars).is_dir);
        assert_eq!(tree.node(chars).name.as_str(), "chars");
        assert_eq!(tree.children(chars).len(), 2);
    }

    #[test]
    fn root_without_models_is_omitted() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty");
        let full = tmp.path().join("full");
        touch(&empty.join("notes.txt"));
        touch(&full.join("m.pmd"));

        let (tree, _) = build_tree(&[empty, full.clone()], &ModelExtensions::default());
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.node(tree.roots[0]).full_path, full);
    }

    #[test]
    fn children_are_sorted_without_dir_priority() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("b.pmx"));
        touch(&tmp.path().join("A/x.pmx"));
        touch(&tmp.path().join("c/y.pmx"));

        let (tree, _) = build_tree(&[tmp.path().to_path_buf()], &ModelExtensions::default());
        let names: Vec<&str> = tree
            .children(tree.roots[0])
            .iter()
            .map(|&c| tree.node(c).name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "b.pmx", "c"]);
    }

    #[test]
    fn set_roots_replaces_previous_tree() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        touch(&first.join("one.pmx"));
        touch(&second.join("two.pmx"));

        let mut indexer = TreeIndexer::new(Arc::new(ModelExtensions::default()), None);
        indexer.set_roots([&first]).unwrap();
        assert_eq!(indexer.tree().file_count(), 1);

        indexer.set_roots([&second]).unwrap();
        assert_eq!(indexer.tree().roots.len(), 1);
        assert_eq!(indexer.tree().file_count(), 1);
        assert_eq!(indexer.tree().node(indexer.tree().roots[0]).full_path, second);
    }

    #[test]
    fn set_roots_with_nothing_valid_clears_tree() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("one.pmx"));

        let mut indexer = TreeIndexer::new(Arc::new(ModelExtensions::default()), None);
        indexer.set_roots([tmp.path()]).unwrap();
        assert!(!indexer.tree().is_empty());

        indexer.set_roots(["", "   "]).unwrap();
        assert!(indexer.tree().is_empty());
        assert!(indexer.roots().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_unicode_root_survives_refresh() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(OsStr::from_bytes(b"r\xffoot"));
        touch(&root.join("m.pmx"));

        let mut indexer = TreeIndexer::new(Arc::new(ModelExtensions::default()), None);
        indexer.set_roots([&root]).unwrap();
        assert_eq!(indexer.roots(), &[root.clone()]);
        assert_eq!(indexer.tree().file_count(), 1);

        indexer.refresh().unwrap();
        assert_eq!(indexer.roots(), &[root.clone()]);
        assert_eq!(indexer.tree().file_count(), 1);
        let file = indexer.tree().node(indexer.tree().roots[0]).children[0];
        assert_eq!(indexer.tree().node(file).full_path, root.join("m.pmx"));
    }
}
