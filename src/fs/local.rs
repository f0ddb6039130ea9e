//! [`FileSystem`] backed by `std::fs`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{file_name, normalize, FileSystem};

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn list(path: &Path, want_dirs: bool) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() == want_dirs {
                paths.push(entry.path());
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl FileSystem for LocalFileSystem {
    fn list_child_folders(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        Self::list(path, true)
    }

    fn list_files(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        Self::list(path, false)
    }

    fn read_file_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn create_file(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn copy_file(&mut self, src_file: &Path, dest_folder: &Path) -> io::Result<()> {
        let dest = dest_folder.join(file_name(src_file)?);
        fs::copy(src_file, dest).map(|_| ())
    }

    fn create_folder(&mut self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn delete_folder_recursive(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Relative paths are taken from the current directory; symlinks are not resolved
    fn absolute(&self, path: &Path) -> io::Result<PathBuf> {
        if path.is_absolute() {
            Ok(normalize(path))
        } else {
            Ok(normalize(&std::env::current_dir()?.join(path)))
        }
    }
}
