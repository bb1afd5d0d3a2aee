//! Data directory management.
//!
//! This module handles the file system layout for DocuDB:
//!
//! ```text
//! <data_dir>/
//! ├─ <db_name>.json                    # one collection per file
//! └─ indexes/
//!    └─ <db_name>_<field>.idx          # one B+tree per indexed field
//! ```
//!
//! Index files are discovered by name: files under `indexes/` whose
//! name starts with `<db_name>_` and ends in `.idx` belong to that
//! collection, and the field name is the substring between.

use crate::error::CoreResult;
use std::fs;
use std::path::{Path, PathBuf};

const INDEXES_DIR: &str = "indexes";
const COLLECTION_EXT: &str = "json";
const INDEX_EXT: &str = ".idx";

/// The root data directory of a DocuDB deployment.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Creates a handle rooted at the given path.
    ///
    /// Nothing is created on disk until a save needs it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the collection file for a database name.
    #[must_use]
    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{COLLECTION_EXT}"))
    }

    /// Path of the index directory.
    #[must_use]
    pub fn indexes_dir(&self) -> PathBuf {
        self.root.join(INDEXES_DIR)
    }

    /// Path of the index file for a collection field.
    #[must_use]
    pub fn index_path(&self, name: &str, field: &str) -> PathBuf {
        self.indexes_dir().join(format!("{name}_{field}{INDEX_EXT}"))
    }

    /// Creates the root directory if missing.
    pub fn ensure_root(&self) -> CoreResult<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Creates the index directory if missing.
    pub fn ensure_indexes_dir(&self) -> CoreResult<()> {
        fs::create_dir_all(self.indexes_dir())?;
        Ok(())
    }

    /// Lists the indexed field names discovered for a collection.
    ///
    /// A missing index directory is not an error; it simply means no
    /// index has been created yet. Results are sorted for determinism.
    pub fn discover_indexes(&self, name: &str) -> CoreResult<Vec<String>> {
        let dir = self.indexes_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = format!("{name}_");
        let mut fields = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(rest) = file_name.strip_prefix(&prefix) {
                if let Some(field) = rest.strip_suffix(INDEX_EXT) {
                    if !field.is_empty() {
                        fields.push(field.to_string());
                    }
                }
            }
        }
        fields.sort();
        Ok(fields)
    }
}

impl Default for DataDir {
    /// The conventional `./data` root.
    fn default() -> Self {
        Self::new("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn paths_are_correct() {
        let dir = DataDir::new("/tmp/db-root");
        assert_eq!(
            dir.collection_path("users"),
            PathBuf::from("/tmp/db-root/users.json")
        );
        assert_eq!(
            dir.index_path("users", "age"),
            PathBuf::from("/tmp/db-root/indexes/users_age.idx")
        );
    }

    #[test]
    fn discovery_on_missing_dir_is_empty() {
        let temp = tempdir().unwrap();
        let dir = DataDir::new(temp.path().join("nothing-here"));
        assert!(dir.discover_indexes("users").unwrap().is_empty());
    }

    #[test]
    fn discovery_filters_by_name_and_extension() {
        let temp = tempdir().unwrap();
        let dir = DataDir::new(temp.path());
        dir.ensure_indexes_dir().unwrap();

        for file in [
            "users_age.idx",
            "users_name.idx",
            "users_notes.txt",
            "orders_total.idx",
            "users_.idx",
        ] {
            std::fs::write(dir.indexes_dir().join(file), "{}").unwrap();
        }
        std::fs::create_dir(dir.indexes_dir().join("users_sub.idx")).unwrap();

        let fields = dir.discover_indexes("users").unwrap();
        assert_eq!(fields, vec!["age", "name"]);
    }
}
