use std::fs;

use crate::store::file_store::{PostStore, StoreError};

impl PostStore {
    /// File names of every stored document, sorted by name.
    ///
    /// Dot files and subdirectories are skipped. Symlinks are followed, so a
    /// link to a post document is listed like the document itself.
    pub fn list_documents(&self) -> Result<Vec<String>, StoreError> {
        let list_error = |source| StoreError::List {
            path: self.root().to_path_buf(),
            source,
        };
        let mut names = Vec::new();
        for entry in fs::read_dir(self.root()).map_err(list_error)? {
            let entry = entry.map_err(list_error)?;
            if !fs::metadata(entry.path()).map_err(list_error)?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }
}

/// The post id a document file name stands for: everything before the
/// first `.`.
pub fn id_from_file_name(name: &str) -> &str {
    name.split_once('.').map_or(name, |(id, _)| id)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn id_from_file_name_cuts_at_first_dot() {
        assert_eq!(id_from_file_name("abc.json"), "abc");
        assert_eq!(id_from_file_name("abc.json.bak"), "abc");
        assert_eq!(id_from_file_name("abc"), "abc");
    }

    #[test]
    fn lists_files_sorted_and_skips_hidden_and_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), b"{}").unwrap();
        fs::write(dir.path().join("a.json"), b"{}").unwrap();
        fs::write(dir.path().join(".b.json.1.tmp"), b"{}").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let store = PostStore::new(dir.path());
        assert_eq!(store.list_documents().unwrap(), vec!["a.json", "b.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_documents_are_listed() {
        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("linked.json");
        fs::write(&target, b"{}").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("linked.json")).unwrap();
        fs::write(dir.path().join("plain.json"), b"{}").unwrap();

        let store = PostStore::new(dir.path());
        assert_eq!(
            store.list_documents().unwrap(),
            vec!["linked.json", "plain.json"]
        );
    }

    #[test]
    fn missing_root_is_list_error() {
        let dir = TempDir::new().unwrap();
        let store = PostStore::new(dir.path().join("absent"));
        let err = store.list_documents().unwrap_err();
        assert!(matches!(err, StoreError::List { .. }));
    }
}
