//! ModelTree: multi-folder 3D model indexer.
//!
//! Thin binary entry point. All logic lives in the `modeltree-core`
//! and `modeltree-app` crates.
//!
//! Usage: `modeltree [--config <file.json>] <folder>...`

use anyhow::Context;
use modeltree_app::{ProbeLoader, ViewerState};
use modeltree_core::config::ViewerConfig;
use modeltree_core::indexer::FileClassifier;
use modeltree_core::logging::Logger;
use modeltree_core::model::{ModelTree, NodeIndex};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

struct Args {
    config: Option<PathBuf>,
    folders: Vec<OsString>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut config = None;
    let mut folders = Vec::new();
    let mut args = std::env::args_os().skip(1);
    while let Some(arg) = args.next() {
        if arg.to_str() == Some("--config") {
            let path = args.next().context("--config needs a file path")?;
            config = Some(PathBuf::from(path));
        } else {
            folders.push(arg);
        }
    }
    Ok(Args { config, folders })
}

/// Print the tree with two-space indentation per level.
fn print_tree(tree: &ModelTree) {
    let mut stack: Vec<(NodeIndex, usize)> = tree.roots.iter().rev().map(|&r| (r, 0)).collect();
    while let Some((idx, depth)) = stack.pop() {
        let node = tree.node(idx);
        let suffix = if node.is_dir && depth > 0 { "/" } else { "" };
        println!("{:indent$}{}{suffix}", "", node.name, indent = depth * 2);
        stack.extend(tree.children(idx).iter().rev().map(|&c| (c, depth + 1)));
    }
}

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    tracing::debug!("Batch settings: {:?}", config.batch_config());

    let classifier: Arc<dyn FileClassifier> = Arc::new(config.classifier());
    let mut state = ViewerState::new(
        Arc::clone(&classifier),
        ProbeLoader::new(classifier),
        Some(Logger::current()),
    );

    if let Err(err) = state.set_folder_paths(&args.folders) {
        for cause in &err.errors {
            eprintln!("warning: {cause}");
        }
    }

    let tree = state.tree();
    print_tree(tree);
    tracing::info!(
        "{} folders, {} models",
        state.folder_paths().len(),
        tree.file_count()
    );

    Ok(())
}
