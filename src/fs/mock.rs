// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // List of child names
}

/// In-memory filesystem for discovery and tailing tests.
///
/// Handles returned by `open_read` read the live file contents, so bytes
/// added later via `append` show up on the next read, as with a real file.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("/"), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.entries();
        files.insert(path.clone(), MockEntry::File(content.into()));
        if let Some(parent) = path.parent() {
            Self::ensure_dir_entry(&mut files, parent);
            Self::link_child(&mut files, parent, &path);
        }
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.entries();
        Self::ensure_dir_entry(&mut files, path.as_ref());
    }

    /// Append bytes to an existing file (creating it if needed).
    pub fn append(&self, path: impl AsRef<Path>, content: &[u8]) {
        let path = path.as_ref();
        let existing = match self.entries().get(path) {
            Some(MockEntry::File(bytes)) => bytes.clone(),
            _ => Vec::new(),
        };
        let mut combined = existing;
        combined.extend_from_slice(content);
        self.add_file(path, combined);
    }

    fn link_child(files: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
            if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = path.parent() {
            if parent != path {
                Self::ensure_dir_entry(files, parent);
                Self::link_child(files, parent, path);
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        match self.entries().get(path) {
            Some(MockEntry::File(_)) => Ok(Box::new(MockReader {
                files: Arc::clone(&self.files),
                path: path.to_path_buf(),
                pos: 0,
            })),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.entries().get(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries().get(path), Some(MockEntry::Dir(_)))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_dir(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let mut files = self.entries();
        if !files.contains_key(path) {
            return Err(anyhow!("Not found: {:?}", path));
        }
        files.retain(|p, _| !p.starts_with(path));
        if let Some(parent) = path.parent() {
            if let (Some(MockEntry::Dir(children)), Some(name)) =
                (files.get_mut(parent), path.file_name().and_then(|n| n.to_str()))
            {
                children.retain(|c| c != name);
            }
        }
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.entries().get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}

/// Reader over a mock file that sees appends made after it was opened.
struct MockReader {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    path: PathBuf,
    pos: usize,
}

impl Read for MockReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        let Some(MockEntry::File(content)) = files.get(&self.path) else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file removed: {:?}", self.path),
            ));
        };
        let remaining = content.get(self.pos..).unwrap_or_default();
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}
