//! Resolution of human-given names to paths under the base directory.
//!
//! Matching is by file name, case-insensitive, searched recursively with a
//! bounded depth. Hidden directories are skipped. Results are sorted so the
//! same input always resolves to the same ordered target set.

use std::fs;
use std::path::{Path, PathBuf};

const MAX_DEPTH: usize = 8;

/// All files under `base` whose name matches `name`. A name containing a
/// path separator is tried as a direct relative path first.
pub fn resolve_files(base: &Path, name: &str) -> Vec<PathBuf> {
    if name.contains('/') {
        let candidate = base.join(name);
        if candidate.is_file() {
            return vec![candidate];
        }
    }

    let mut matches = Vec::new();
    walk(base, name, 0, &mut matches);
    matches.sort();
    matches
}

/// A directory under `base` matching `name`; the direct join wins.
pub fn resolve_dir(base: &Path, name: &str) -> Option<PathBuf> {
    let direct = base.join(name);
    if direct.is_dir() {
        return Some(direct);
    }

    let mut queue = vec![(base.to_path_buf(), 0usize)];
    while let Some((dir, depth)) = queue.pop() {
        let Ok(entries) = fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() || is_hidden(&path) {
                continue;
            }
            if file_name_matches(&path, name) {
                return Some(path);
            }
            if depth + 1 < MAX_DEPTH {
                queue.push((path, depth + 1));
            }
        }
    }
    None
}

fn walk(dir: &Path, name: &str, depth: usize, matches: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth + 1 < MAX_DEPTH && !is_hidden(&path) {
                walk(&path, name, depth + 1, matches);
            }
        } else if file_name_matches(&path, name) {
            matches.push(path);
        }
    }
}

fn file_name_matches(path: &Path, name: &str) -> bool {
    path.file_name()
        .and_then(|file_name| file_name.to_str())
        .map(|file_name| file_name.eq_ignore_ascii_case(name))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|file_name| file_name.to_str())
        .map(|file_name| file_name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{resolve_dir, resolve_files};

    #[test]
    fn finds_files_recursively_and_case_insensitively() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("docs/archive");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("Report.TXT"), "x").unwrap();
        std::fs::write(dir.path().join("report.txt"), "y").unwrap();

        let matches = resolve_files(dir.path(), "report.txt");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn relative_paths_resolve_directly() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/report.txt"), "x").unwrap();

        let matches = resolve_files(dir.path(), "docs/report.txt");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn hidden_directories_are_skipped() {
        let dir = tempdir().unwrap();
        let hidden = dir.path().join(".cache");
        std::fs::create_dir_all(&hidden).unwrap();
        std::fs::write(hidden.join("report.txt"), "x").unwrap();

        assert!(resolve_files(dir.path(), "report.txt").is_empty());
    }

    #[test]
    fn directories_resolve_by_name() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("projects/archive")).unwrap();
        let found = resolve_dir(dir.path(), "archive").unwrap();
        assert!(found.ends_with("archive"));
        assert!(resolve_dir(dir.path(), "missing").is_none());
    }
}
