/// Recursive discovery of model files under one root using `jwalk`.
///
/// `jwalk` reads directories in parallel on a rayon pool, but the call
/// still blocks until the whole subtree has been visited. Unreadable
/// directories come back as error entries; they are recorded and the walk
/// carries on with their siblings, so a bad subtree is skipped, not fatal.
use super::classify::FileClassifier;
use crate::error::WalkError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collect every recognised model file below `root`.
///
/// Returns the matches in walk order together with any walk failures.
pub fn collect_model_paths(
    root: &Path,
    classifier: &dyn FileClassifier,
) -> (Vec<PathBuf>, Vec<WalkError>) {
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut errors: Vec<WalkError> = Vec::new();

    if root.as_os_str().is_empty() {
        return (paths, errors);
    }

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                debug!("Walk error under {}: {err}", root.display());
                errors.push(WalkError {
                    path: err.path().map(Path::to_path_buf),
                    message: err.to_string(),
                });
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        if classifier.is_recognized_model_file(&path) {
            paths.push(path);
        }
    }

    (paths, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::ModelExtensions;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn collects_only_recognised_files() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(tmp.path().join("a.pmx"), b"").unwrap();
        fs::write(sub.join("b.PMD"), b"").unwrap();
        fs::write(sub.join("dance.vmd"), b"").unwrap();
        fs::write(sub.join("readme.txt"), b"").unwrap();

        let (mut paths, errors) = collect_model_paths(tmp.path(), &ModelExtensions::default());
        paths.sort();

        assert!(errors.is_empty());
        assert_eq!(paths, vec![tmp.path().join("a.pmx"), sub.join("b.PMD")]);
    }

    #[test]
    fn missing_root_reports_an_error() {
        let tmp = TempDir::new().unwrap();
        let (paths, errors) =
            collect_model_paths(&tmp.path().join("missing"), &ModelExtensions::default());
        assert!(paths.is_empty());
        assert!(!errors.is_empty());
    }

    #[test]
    fn empty_root_path_is_a_no_op() {
        let (paths, errors) = collect_model_paths(Path::new(""), &ModelExtensions::default());
        assert!(paths.is_empty());
        assert!(errors.is_empty());
    }
}
