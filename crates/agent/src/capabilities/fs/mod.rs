//! Filesystem capabilities: read, write, delete and move, all scoped to a
//! configured base directory. Destructive handlers plan first and commit
//! only per confirmed target.

pub mod delete;
pub mod read;
pub mod relocate;
pub mod resolver;
pub mod write;

pub use delete::DeleteFileHandler;
pub use read::ReadFileHandler;
pub use relocate::MoveFileHandler;
pub use write::WriteFileHandler;

use std::path::{Path, PathBuf};

use resolver::resolve_dir;

/// Narrows the search to a directory hint when one resolves; otherwise the
/// whole base directory is searched.
pub(crate) fn search_root(base: &Path, hint: Option<&str>) -> PathBuf {
    match hint {
        Some(hint) => resolve_dir(base, hint).unwrap_or_else(|| base.to_path_buf()),
        None => base.to_path_buf(),
    }
}
