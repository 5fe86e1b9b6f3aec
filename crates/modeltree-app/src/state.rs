/// Viewer state, owned by a single thread.
///
/// Ties the pieces together: folder selection goes through the normalizer
/// and indexer, selection and navigation through the navigator, and
/// screenshot batches through the sequencer. The batch worker reaches this
/// state only via the owner queue, where it runs [`ModelHost::load_model`].
///
/// Node indices are only valid for the tree they came from, so the
/// expansion set and the highlight are cleared on every rebuild.
use modeltree_core::batch::{BatchSequencer, ModelHost, ModelLoader};
use modeltree_core::error::{IndexError, LoadError};
use modeltree_core::indexer::{collect_model_paths, FileClassifier, TreeIndexer};
use modeltree_core::logging::Logger;
use modeltree_core::model::{ModelTree, NodeIndex};
use modeltree_core::navigator::{self, Direction, SelectionContext};
use modeltree_core::paths::same_path;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ViewerState<L: ModelLoader + 'static> {
    indexer: TreeIndexer,
    loader: L,

    // ── Active model ───────────────────────────────────
    model: Option<L::Model>,
    model_path: Option<PathBuf>,

    // ── Tree view ──────────────────────────────────────
    selection: SelectionContext,
    expanded: HashSet<NodeIndex>,

    batch: Option<Arc<BatchSequencer<Self>>>,
    logger: Logger,
}

impl<L: ModelLoader + 'static> ViewerState<L> {
    pub fn new(classifier: Arc<dyn FileClassifier>, loader: L, logger: Option<Logger>) -> Self {
        let logger = logger.unwrap_or_default();
        Self {
            indexer: TreeIndexer::new(classifier, Some(logger.clone())),
            loader,
            model: None,
            model_path: None,
            selection: SelectionContext::default(),
            expanded: HashSet::new(),
            batch: None,
            logger,
        }
    }

    /// Wire in the sequencer used by [`Self::start_screenshot_batch`].
    ///
    /// The sequencer's dispatcher must deliver to the queue this state is
    /// pumped from.
    pub fn attach_batch(&mut self, sequencer: Arc<BatchSequencer<Self>>) {
        self.batch = Some(sequencer);
    }

    // ── Folders and tree ───────────────────────────────

    /// Replace the folder set and rebuild the tree.
    ///
    /// The tree is replaced even when the walk reported errors. On success
    /// every directory starts expanded.
    pub fn set_folder_paths<I, S>(&mut self, paths: I) -> Result<(), IndexError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let result = self.indexer.set_roots(paths);
        self.after_rebuild(result.is_ok());
        result
    }

    /// Rebuild from the current folders.
    pub fn refresh(&mut self) -> Result<(), IndexError> {
        let result = self.indexer.refresh();
        self.after_rebuild(result.is_ok());
        result
    }

    fn after_rebuild(&mut self, clean: bool) {
        self.expanded.clear();
        self.selection.highlighted = None;

        let tree = self.indexer.tree();
        if clean && !tree.roots.is_empty() {
            self.expanded
                .extend(tree.preorder().filter(|&i| tree.node(i).is_dir));
        }
        if tree.roots.is_empty() && !self.indexer.roots().is_empty() {
            self.logger
                .in_scope(|| info!("No models found in the selected folders"));
        }
    }

    /// The normalised folders currently indexed.
    pub fn folder_paths(&self) -> &[PathBuf] {
        self.indexer.roots()
    }

    pub fn tree(&self) -> &ModelTree {
        self.indexer.tree()
    }

    pub fn is_expanded(&self, node: NodeIndex) -> bool {
        self.expanded.contains(&node)
    }

    /// Flip a directory open or closed. Returns the new state.
    pub fn toggle_expanded(&mut self, node: NodeIndex) -> bool {
        if self.expanded.remove(&node) {
            false
        } else {
            self.expanded.insert(node);
            true
        }
    }

    /// Expand every ancestor of the node at `path` so it becomes visible.
    /// Returns `false` if the path is not in the tree.
    pub fn expand_ancestors(&mut self, path: &Path) -> bool {
        let tree = self.indexer.tree();
        match navigator::find_node(tree, path) {
            Some(node) => {
                navigator::expand_ancestors(tree, node, &mut self.expanded);
                true
            }
            None => false,
        }
    }

    pub fn collect_under(&self, path: &Path) -> Vec<PathBuf> {
        navigator::collect_under(self.indexer.tree(), path)
    }

    // ── Selection ──────────────────────────────────────

    pub fn selection(&self) -> &SelectionContext {
        &self.selection
    }

    /// React to a click on a tree node. Directories are ignored.
    ///
    /// Returns `Ok(true)` when a file was selected and loaded.
    pub fn select_node(&mut self, node: NodeIndex) -> Result<bool, LoadError> {
        if self.indexer.tree().node(node).is_dir {
            return Ok(false);
        }
        self.select_at(node)?;
        Ok(true)
    }

    /// Select `path`: remember it, highlight and reveal it, then load it.
    ///
    /// If the highlighted node already has this path it stays highlighted;
    /// otherwise the first node with the path is. Selection state is updated
    /// before loading, so a failed load still moves the cursor.
    pub fn select_file(&mut self, path: &Path) -> Result<(), LoadError> {
        let tree = self.indexer.tree();
        let keep = self
            .selection
            .highlighted
            .filter(|&h| same_path(&tree.node(h).full_path, path));
        match keep.or_else(|| navigator::find_node(tree, path)) {
            Some(node) => self.select_at(node),
            None => {
                self.selection.last_selected = Some(path.to_path_buf());
                self.selection.highlighted = None;
                self.load_model(path)
            }
        }
    }

    /// Step to the next or previous model and select it.
    ///
    /// Returns the newly selected path, or `None` when the tree holds no
    /// files.
    pub fn navigate(&mut self, direction: Direction) -> Result<Option<PathBuf>, LoadError> {
        let target = navigator::step_node(
            self.indexer.tree(),
            self.model_path.as_deref(),
            &self.selection,
            direction,
        );
        match target {
            Some(node) => {
                self.select_at(node)?;
                Ok(Some(self.indexer.tree().node(node).full_path.clone()))
            }
            None => Ok(None),
        }
    }

    /// Make the file `node` the selection, reveal it, and load it.
    fn select_at(&mut self, node: NodeIndex) -> Result<(), LoadError> {
        let tree = self.indexer.tree();
        let path = tree.node(node).full_path.clone();
        self.selection.last_selected = Some(path.clone());
        self.selection.highlighted = Some(node);
        navigator::expand_ancestors(tree, node, &mut self.expanded);
        self.load_model(&path)
    }

    // ── Model ──────────────────────────────────────────

    pub fn model(&self) -> Option<&L::Model> {
        self.model.as_ref()
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    pub fn can_load_model_path(&self, path: &Path) -> bool {
        self.loader.can_load(path)
    }

    // ── Screenshots ────────────────────────────────────

    /// Model files a screenshot request on `path` should cover.
    ///
    /// A file covers itself. A directory covers its files in the current
    /// tree, or, when the tree has none under it, whatever a fresh walk of
    /// the directory finds.
    pub fn collect_screenshot_targets(&self, path: &Path, is_dir: bool) -> Vec<PathBuf> {
        if path.as_os_str().is_empty() {
            return Vec::new();
        }
        if !is_dir {
            return vec![path.to_path_buf()];
        }

        let from_tree = self.collect_under(path);
        if !from_tree.is_empty() {
            return from_tree;
        }

        self.logger.in_scope(|| {
            debug!("{} not in tree, walking disk", path.display());
            let (found, errors) = collect_model_paths(path, self.indexer.classifier());
            for err in &errors {
                warn!("Skipped while collecting screenshot targets: {err}");
            }
            found
        })
    }

    /// Start a screenshot batch for `path`.
    ///
    /// Returns `false` if there is nothing to capture, no sequencer is
    /// attached, or a batch is already running.
    pub fn start_screenshot_batch(&self, path: &Path, is_dir: bool) -> bool {
        let targets = self.collect_screenshot_targets(path, is_dir);
        self.logger.in_scope(|| {
            if targets.is_empty() {
                info!("No models found for screenshots under {}", path.display());
                return false;
            }
            match &self.batch {
                Some(sequencer) => sequencer.start(&targets),
                None => {
                    warn!("Screenshot batch requested but no capture service is attached");
                    false
                }
            }
        })
    }

    pub fn is_batch_running(&self) -> bool {
        self.batch.as_ref().is_some_and(|b| b.is_running())
    }
}

impl<L: ModelLoader + 'static> ModelHost for ViewerState<L> {
    /// Load `path` as the active model. The previous model stays active if
    /// loading fails.
    fn load_model(&mut self, path: &Path) -> Result<(), LoadError> {
        let loaded = self.loader.load(path);
        self.logger.in_scope(|| match &loaded {
            Ok(_) => info!("Loaded model {}", path.display()),
            Err(err) => warn!("{err}"),
        });
        self.model = Some(loaded?);
        self.model_path = Some(path.to_path_buf());
        Ok(())
    }
}
