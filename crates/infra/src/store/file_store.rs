use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use codehouse_core::types::new_id;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_POSTS_DIR: &str = "./posts";
pub const DOCUMENT_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot list {}: {source}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One document per post under a single root directory.
#[derive(Debug, Clone)]
pub struct PostStore {
    root: PathBuf,
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new(DEFAULT_POSTS_DIR)
    }
}

impl PostStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.{DOCUMENT_EXTENSION}"))
    }

    pub fn read_document(&self, path: &Path) -> Result<Vec<u8>, StoreError> {
        fs::read(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(path.to_path_buf())
            } else {
                StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
    }

    /// Replaces the document at `path`, creating the root directory on first
    /// use. The bytes land in a staging file that is renamed over the target,
    /// so readers never observe a half-written document.
    pub fn write_document(&self, path: &Path, bytes: &[u8]) -> bool {
        match self.replace(path, bytes) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "document write failed");
                false
            }
        }
    }

    pub fn delete_document(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "document delete failed");
                false
            }
        }
    }

    fn replace(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let staging = staging_path(path);
        fs::write(&staging, bytes)?;
        if let Err(err) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(err);
        }
        Ok(())
    }
}

// Hidden and unique per write; the lister skips dot files.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", new_id()))
}
