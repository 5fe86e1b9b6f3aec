/// Root-folder normalisation: clean, filter, dedupe, and sort.
///
/// Paths typed, pasted, or dropped by the user arrive with quotes, stray
/// whitespace, and trailing separators. Everything that is not an existing
/// directory is silently discarded: an empty result simply means "no valid
/// folder selected".
use rayon::prelude::*;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Lower-cased, lossy string form of a path, used as the comparison key
/// wherever paths must match regardless of letter case.
pub fn fold_case(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// `true` when two paths differ at most by letter case.
pub fn same_path(a: &Path, b: &Path) -> bool {
    fold_case(a) == fold_case(b)
}

/// Clean one user-supplied path.
///
/// Strips surrounding whitespace and quotes, then rebuilds the path from
/// its components so separators are canonical, `.` segments vanish, and
/// trailing separators are dropped. Returns `None` when nothing is left.
pub fn clean_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    if trimmed.is_empty() {
        return None;
    }

    rebuild(Path::new(trimmed))
}

/// [`clean_path`] for raw OS strings.
///
/// Text that is not valid Unicode cannot carry typed quotes or padding, so
/// it is only rebuilt from its components, never converted.
pub fn clean_os_path(raw: &OsStr) -> Option<PathBuf> {
    match raw.to_str() {
        Some(text) => clean_path(text),
        None => rebuild(Path::new(raw)),
    }
}

fn rebuild(path: &Path) -> Option<PathBuf> {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Keep only the paths that currently exist and are directories.
///
/// The `stat` calls run in parallel; input order is preserved.
pub fn filter_directories(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths
        .into_par_iter()
        .filter(|p| std::fs::metadata(p).map(|m| m.is_dir()).unwrap_or(false))
        .collect()
}

/// Drop case-insensitive duplicates (first occurrence wins) and sort
/// ascending by the case-folded path.
pub fn dedupe_and_sort(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen: HashSet<String> = HashSet::with_capacity(paths.len());
    let mut unique: Vec<PathBuf> = paths
        .into_iter()
        .filter(|p| seen.insert(fold_case(p)))
        .collect();
    unique.sort_by_cached_key(|p| fold_case(p));
    unique
}

/// Full normalisation pipeline for a set of candidate root folders.
pub fn normalize_roots<I, S>(raw: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let cleaned: Vec<PathBuf> = raw
        .into_iter()
        .filter_map(|p| clean_os_path(p.as_ref()))
        .collect();
    dedupe_and_sort(filter_directories(cleaned))
}

/// Trim, drop blanks, and remove case-insensitive duplicates while keeping
/// the caller's order. Used for batch inputs, which must not be re-sorted.
///
/// Paths that are not valid Unicode are kept byte for byte; the case-folded
/// text is only ever used as the comparison key.
pub fn unique_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut seen: HashSet<String> = HashSet::with_capacity(paths.len());
    paths
        .iter()
        .filter_map(|p| {
            let path = p.as_ref();
            let path = match path.to_str() {
                Some(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        return None;
                    }
                    PathBuf::from(trimmed)
                }
                None => path.to_path_buf(),
            };
            if path.as_os_str().is_empty() {
                return None;
            }
            seen.insert(fold_case(&path)).then_some(path)
        })
        .collect()
}
