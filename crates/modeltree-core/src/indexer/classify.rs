/// Extension-based model file recognition.
///
/// Contents are never inspected; the extension alone decides whether a file
/// shows up in the tree.
use std::path::Path;

/// Extensions recognised out of the box, lower-case and without the dot.
pub const DEFAULT_MODEL_EXTENSIONS: [&str; 3] = ["pmx", "pmd", "x"];

/// The model formats the viewer knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Pmx,
    Pmd,
    X,
}

impl ModelKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pmx => "pmx",
            Self::Pmd => "pmd",
            Self::X => "x",
        }
    }
}

/// Map a file extension (without the dot) to a model kind, ignoring case.
pub fn categorise_extension(ext: &str) -> Option<ModelKind> {
    if ext.eq_ignore_ascii_case("pmx") {
        Some(ModelKind::Pmx)
    } else if ext.eq_ignore_ascii_case("pmd") {
        Some(ModelKind::Pmd)
    } else if ext.eq_ignore_ascii_case("x") {
        Some(ModelKind::X)
    } else {
        None
    }
}

/// Decides which files belong in the tree.
pub trait FileClassifier: Send + Sync {
    fn is_recognized_model_file(&self, path: &Path) -> bool;
}

/// Classifier backed by a list of extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelExtensions {
    /// Lower-case, dot-less.
    extensions: Vec<String>,
}

impl ModelExtensions {
    pub fn new<'a>(extensions: impl IntoIterator<Item = &'a str>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for ModelExtensions {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_EXTENSIONS)
    }
}

impl FileClassifier for ModelExtensions {
    fn is_recognized_model_file(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext))
    }
}
