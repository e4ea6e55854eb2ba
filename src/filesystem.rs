//! Filesystem abstraction used to look up template files.

use std::fs;
use std::io;
use std::path::Path;

/// Read-only view of a filesystem holding template files.
///
/// Implement this to resolve templates from virtual or remote storage.
pub trait FileSystem {
    /// Whether a readable file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file at `path` as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
