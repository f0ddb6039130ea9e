//! In-memory [`FileSystem`]

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use super::{file_name, FileSystem};

/// A folder tree held in memory
///
/// Folders are implicit parents of the files added with [`with_file`](Self::with_file).
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    folders: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent folders
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert_file(path.as_ref(), contents.into());
        self
    }

    /// Add an empty folder
    pub fn with_folder(mut self, path: impl AsRef<Path>) -> Self {
        self.insert_folder(path.as_ref());
        self
    }

    /// Contents of a file as text, if it exists and is UTF-8
    pub fn file_text(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files
            .get(path.as_ref())
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn file_bytes(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    /// All file paths, sorted
    pub fn file_paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    fn insert_folder(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.folders.insert(ancestor.to_path_buf());
        }
    }

    fn insert_file(&mut self, path: &Path, contents: Vec<u8>) {
        if let Some(parent) = path.parent() {
            self.insert_folder(parent);
        }
        self.files.insert(path.to_path_buf(), contents);
    }

    fn require_folder(&self, path: &Path) -> io::Result<()> {
        if self.folders.contains(path) {
            Ok(())
        } else {
            Err(not_found(path))
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn list_child_folders(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.require_folder(path)?;
        Ok(self
            .folders
            .iter()
            .filter(|folder| folder.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn list_files(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.require_folder(path)?;
        Ok(self
            .files
            .keys()
            .filter(|file| file.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn read_file_text(&self, path: &Path) -> io::Result<String> {
        let bytes = self.files.get(path).ok_or_else(|| not_found(path))?;
        String::from_utf8(bytes.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn create_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.require_folder(parent)?;
        }
        self.files.insert(path.to_path_buf(), contents.as_bytes().to_vec());
        Ok(())
    }

    fn copy_file(&mut self, src_file: &Path, dest_folder: &Path) -> io::Result<()> {
        self.require_folder(dest_folder)?;
        let bytes = self
            .files
            .get(src_file)
            .cloned()
            .ok_or_else(|| not_found(src_file))?;
        self.files.insert(dest_folder.join(file_name(src_file)?), bytes);
        Ok(())
    }

    fn create_folder(&mut self, path: &Path) -> io::Result<()> {
        self.insert_folder(path);
        Ok(())
    }

    fn delete_folder_recursive(&mut self, path: &Path) -> io::Result<()> {
        self.require_folder(path)?;
        self.folders.retain(|folder| !folder.starts_with(path));
        self.files.retain(|file, _| !file.starts_with(path));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.folders.contains(path) || self.files.contains_key(path)
    }
}
