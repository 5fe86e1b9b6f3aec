/// End-to-end indexer and navigator tests.
///
/// These run the real `jwalk`-based walk against temporary directories and
/// check the properties the tree view relies on: root ordering, one node per
/// model file, shared directories, and navigation over the result.
use modeltree_core::indexer::{build_tree, ModelExtensions, TreeIndexer};
use modeltree_core::model::ModelTree;
use modeltree_core::navigator::{self, Direction, SelectionContext};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

/// Build two roots:
///
/// ```text
/// Beta/
///   chars/
///     Miku.pmx
///     luka.PMD
///   stage.x
///   dance.vmd      (ignored)
/// alpha/
///   props/
///     chair.pmx
/// empty/
///   notes.txt      (root omitted)
/// ```
fn build_fixture(base: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let beta = base.join("Beta");
    let alpha = base.join("alpha");
    let empty = base.join("empty");
    touch(&beta.join("chars/Miku.pmx"));
    touch(&beta.join("chars/luka.PMD"));
    touch(&beta.join("stage.x"));
    touch(&beta.join("dance.vmd"));
    touch(&alpha.join("props/chair.pmx"));
    touch(&empty.join("notes.txt"));
    (alpha, beta, empty)
}

fn file_paths(tree: &ModelTree) -> Vec<PathBuf> {
    navigator::flatten_files(tree)
        .into_iter()
        .map(|i| tree.node(i).full_path.clone())
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Root order depends only on the case-folded path, not on input order.
#[test]
fn roots_sorted_regardless_of_input_order() {
    let tmp = TempDir::new().unwrap();
    let (alpha, beta, empty) = build_fixture(tmp.path());
    let classifier = ModelExtensions::default();

    for order in [
        vec![beta.clone(), alpha.clone(), empty.clone()],
        vec![empty.clone(), alpha.clone(), beta.clone()],
    ] {
        let (tree, err) = build_tree(&order, &classifier);
        assert!(err.is_none());
        let roots: Vec<&Path> = tree
            .roots
            .iter()
            .map(|&r| tree.node(r).full_path.as_path())
            .collect();
        assert_eq!(roots, vec![alpha.as_path(), beta.as_path()]);
    }
}

/// Every recognised file shows up exactly once at its relative location.
#[test]
fn every_model_appears_once_at_its_path() {
    let tmp = TempDir::new().unwrap();
    let (alpha, beta, _) = build_fixture(tmp.path());

    let (tree, _) = build_tree(&[alpha.clone(), beta.clone()], &ModelExtensions::default());

    assert_eq!(
        file_paths(&tree),
        vec![
            alpha.join("props/chair.pmx"),
            beta.join("chars/luka.PMD"),
            beta.join("chars/Miku.pmx"),
            beta.join("stage.x"),
        ]
    );
    assert_eq!(tree.file_count(), 4);

    // Every file node's parent chain ends at a root whose path prefixes it.
    for idx in navigator::flatten_files(&tree) {
        let ancestors = navigator::ancestors(&tree, idx);
        let root = *ancestors.last().unwrap();
        assert!(tree.roots.contains(&root));
        assert!(tree
            .node(idx)
            .full_path
            .starts_with(&tree.node(root).full_path));
    }
}

/// The stateful indexer normalises its input before walking.
#[test]
fn indexer_normalises_messy_input() {
    let tmp = TempDir::new().unwrap();
    let (alpha, beta, _) = build_fixture(tmp.path());

    let mut indexer = TreeIndexer::new(Arc::new(ModelExtensions::default()), None);
    indexer
        .set_roots([
            format!("  \"{}\" ", beta.display()),
            format!("{}/", alpha.display()),
            tmp.path().join("missing").display().to_string(),
            beta.display().to_string(),
        ])
        .unwrap();

    assert_eq!(indexer.roots(), &[alpha, beta]);
    assert_eq!(indexer.tree().roots.len(), 2);
}

/// Stepping through a real tree visits every file and clamps at the ends.
#[test]
fn navigation_walks_the_whole_tree() {
    let tmp = TempDir::new().unwrap();
    let (alpha, beta, _) = build_fixture(tmp.path());
    let (tree, _) = build_tree(&[alpha, beta], &ModelExtensions::default());
    let expected = file_paths(&tree);
    let ctx = SelectionContext::default();

    let mut seen = Vec::new();
    let mut current: Option<PathBuf> = None;
    for _ in 0..expected.len() + 2 {
        current = navigator::step(&tree, current.as_deref(), &ctx, Direction::Next);
        let path = current.clone().unwrap();
        if seen.last() != Some(&path) {
            seen.push(path);
        }
    }
    assert_eq!(seen, expected);

    // Forward then back returns to the start for every interior file.
    for path in &expected[1..expected.len() - 1] {
        let next = navigator::step(&tree, Some(path), &ctx, Direction::Next);
        let back = navigator::step(&tree, next.as_deref(), &ctx, Direction::Previous);
        assert_eq!(back.as_ref(), Some(path));
    }
}

/// Lookups by path ignore letter case.
#[test]
fn collect_under_ignores_case() {
    let tmp = TempDir::new().unwrap();
    let (_, beta, _) = build_fixture(tmp.path());
    let (tree, _) = build_tree(&[beta.clone()], &ModelExtensions::default());

    let upper = PathBuf::from(beta.join("CHARS").to_string_lossy().to_uppercase());
    assert_eq!(
        navigator::collect_under(&tree, &upper),
        vec![beta.join("chars/luka.PMD"), beta.join("chars/Miku.pmx")]
    );
}

/// An unreadable subdirectory is reported but its siblings still index.
#[cfg(unix)]
#[test]
fn unreadable_subtree_is_skipped_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("root");
    touch(&root.join("ok/good.pmx"));
    touch(&root.join("locked/hidden.pmx"));
    let locked = root.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Running as root ignores permission bits; nothing to test then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let (tree, err) = build_tree(&[root.clone()], &ModelExtensions::default());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(err.is_some(), "permission failure must be reported");
    assert_eq!(file_paths(&tree), vec![root.join("ok/good.pmx")]);
}
