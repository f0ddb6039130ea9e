//! Filesystem abstraction used by template loading and the build
//!
//! The build only talks to [`FileSystem`], so it can run against the real
//! disk ([`LocalFileSystem`]) or an in-memory tree ([`MemoryFileSystem`]).

mod local;
mod memory;

use std::io;
use std::path::{Component, Path, PathBuf};

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;

/// Operations the build needs from a filesystem
///
/// Listings are sorted by path so builds are deterministic.
pub trait FileSystem {
    /// Direct child folders of `path`
    fn list_child_folders(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Files directly inside `path`
    fn list_files(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    fn read_file_text(&self, path: &Path) -> io::Result<String>;

    /// Create or overwrite a text file
    fn create_file(&mut self, path: &Path, contents: &str) -> io::Result<()>;

    /// Copy `src_file` byte for byte into `dest_folder`, keeping its name
    fn copy_file(&mut self, src_file: &Path, dest_folder: &Path) -> io::Result<()>;

    /// Create a folder and any missing parents
    fn create_folder(&mut self, path: &Path) -> io::Result<()>;

    fn delete_folder_recursive(&mut self, path: &Path) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Normalized absolute form of `path`, for comparing folder locations
    fn absolute(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(normalize(path))
    }
}

/// Final path component as a string, for extension checks and messages
pub fn file_name(path: &Path) -> io::Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no usable file name in {}", path.display()),
            )
        })
}

/// Resolve `.` and `..` components without touching the filesystem
///
/// `..` at the root stays at the root; leading `..` of a relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
