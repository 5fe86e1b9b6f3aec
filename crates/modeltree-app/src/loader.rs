/// Default model loader.
///
/// The headless build has no renderer, so "loading" a model means checking
/// that the file is a recognised model on disk and recording what it is.
use modeltree_core::batch::ModelLoader;
use modeltree_core::error::LoadError;
use modeltree_core::indexer::{categorise_extension, FileClassifier, ModelKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What [`ProbeLoader`] knows about a loaded model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub path: PathBuf,
    /// `None` for extensions accepted by a custom classifier only.
    pub kind: Option<ModelKind>,
    pub size_bytes: u64,
}

/// Loader that accepts whatever the tree's classifier accepts.
#[derive(Clone)]
pub struct ProbeLoader {
    classifier: Arc<dyn FileClassifier>,
}

impl ProbeLoader {
    pub fn new(classifier: Arc<dyn FileClassifier>) -> Self {
        Self { classifier }
    }
}

impl ModelLoader for ProbeLoader {
    type Model = ModelInfo;

    fn load(&self, path: &Path) -> Result<ModelInfo, LoadError> {
        if path.as_os_str().is_empty() {
            return Err(LoadError::EmptyPath);
        }
        if !self.can_load(path) {
            return Err(LoadError::Unsupported(path.to_path_buf()));
        }

        let meta = std::fs::metadata(path).map_err(|e| LoadError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if !meta.is_file() {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                message: "not a regular file".into(),
            });
        }

        Ok(ModelInfo {
            path: path.to_path_buf(),
            kind: path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(categorise_extension),
            size_bytes: meta.len(),
        })
    }

    fn can_load(&self, path: &Path) -> bool {
        self.classifier.is_recognized_model_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modeltree_core::indexer::ModelExtensions;
    use std::fs;
    use tempfile::TempDir;

    fn loader() -> ProbeLoader {
        ProbeLoader::new(Arc::new(ModelExtensions::default()))
    }

    #[test]
    fn loads_existing_model_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Miku.PMX");
        fs::write(&path, b"PMX \x00\x00").unwrap();

        let info = loader().load(&path).unwrap();
        assert_eq!(info.kind, Some(ModelKind::Pmx));
        assert_eq!(info.size_bytes, 6);
        assert_eq!(info.path, path);
    }

    #[test]
    fn rejects_empty_unsupported_and_missing() {
        let tmp = TempDir::new().unwrap();
        let l = loader();
        assert!(matches!(l.load(Path::new("")), Err(LoadError::EmptyPath)));
        assert!(matches!(
            l.load(&tmp.path().join("motion.vmd")),
            Err(LoadError::Unsupported(_))
        ));
        assert!(matches!(
            l.load(&tmp.path().join("gone.pmd")),
            Err(LoadError::Read { .. })
        ));
    }

    #[test]
    fn directory_named_like_a_model_is_not_loadable() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("odd.x");
        fs::create_dir(&dir).unwrap();
        assert!(loader().can_load(&dir));
        assert!(matches!(loader().load(&dir), Err(LoadError::Read { .. })));
    }
}
