/// Error types shared across the core crate.
///
/// Invalid root folders are never an error: the normalizer drops them and
/// callers treat an empty result as "nothing selected".
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A single non-fatal failure during a filesystem walk.
#[derive(Debug, Clone, Error)]
pub struct WalkError {
    /// The entry that could not be read, when the walker knows it.
    pub path: Option<PathBuf>,
    pub message: String,
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Every walk failure collected while rebuilding the tree.
///
/// The tree is still built from whatever was reachable; this only tells the
/// caller which subtrees were skipped.
#[derive(Debug, Clone, Error)]
pub struct IndexError {
    pub errors: Vec<WalkError>,
}

impl IndexError {
    /// Wrap `errors`, returning `None` when there is nothing to report.
    pub fn from_errors(errors: Vec<WalkError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

/// Failure to load one model on the owner thread.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("model path is empty")]
    EmptyPath,
    #[error("unsupported model file: {}", .0.display())]
    Unsupported(PathBuf),
    #[error("failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },
}

/// Why a single batch job did not produce a screenshot.
#[derive(Debug, Clone, Error)]
pub enum JobError {
    #[error("model load failed: {0}")]
    Load(#[from] LoadError),
    /// The owner thread dropped the load action without running it.
    #[error("owner thread is no longer accepting actions")]
    OwnerUnavailable,
    #[error("cannot derive a screenshot file name from {}", .0.display())]
    OutputPath(PathBuf),
    #[error("screenshot request rejected: {0}")]
    Submit(String),
    #[error("screenshot was not saved within {0:?}")]
    Timeout(Duration),
    #[error("screenshot failed: {0}")]
    Service(String),
    /// The job panicked; the batch carried on with the next path.
    #[error("screenshot job panicked: {0}")]
    Panicked(String),
}

/// Configuration file could not be read or parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
