/// Screenshot file naming.
///
/// `{model-stem}_screenshot_{YYYYMMDDHHMMSS}.png`, next to the model file.
/// Other tools pick these files up by name, so the pattern must not change.
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Derive the screenshot path for `model_path` at instant `now`.
///
/// Returns `None` when the path has no usable file stem.
pub fn capture_output_path(model_path: &Path, now: NaiveDateTime) -> Option<PathBuf> {
    let stem = model_path.file_stem()?;
    if stem.is_empty() {
        return None;
    }
    let mut file_name = stem.to_os_string();
    file_name.push(format!("_screenshot_{}.png", now.format(TIMESTAMP_FORMAT)));
    Some(model_path.with_file_name(file_name))
}
