/// Runtime configuration loaded from an optional JSON file.
///
/// Every key is optional; missing keys fall back to the built-in defaults,
/// which are the values the viewer has always shipped with.
use crate::batch::{BatchConfig, DEFAULT_CAPTURE_TIMEOUT, DEFAULT_POLL_INTERVAL};
use crate::error::ConfigError;
use crate::indexer::{ModelExtensions, DEFAULT_MODEL_EXTENSIONS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// How often the capture service is asked for a result.
    pub poll_interval_ms: u64,
    /// How long one screenshot may take before the job is failed.
    pub capture_timeout_secs: u64,
    /// Which viewer window the screenshots are taken from.
    pub view_index: usize,
    /// Recognised model extensions, without the leading dot.
    pub extensions: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            capture_timeout_secs: DEFAULT_CAPTURE_TIMEOUT.as_secs(),
            view_index: 0,
            extensions: DEFAULT_MODEL_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl ViewerConfig {
    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_secs(self.capture_timeout_secs),
            view_index: self.view_index,
        }
    }

    pub fn classifier(&self) -> ModelExtensions {
        ModelExtensions::new(self.extensions.iter().map(String::as_str))
    }
}
