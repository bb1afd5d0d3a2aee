//! Test fixtures and collection helpers.

use docudb_core::{Collection, DataDir, Document};
use tempfile::TempDir;

/// A collection in a temporary data directory with automatic cleanup.
pub struct TestCollection {
    /// The open collection.
    pub collection: Collection,
    /// The data directory handle, for reopening.
    pub dir: DataDir,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl TestCollection {
    /// Creates an empty collection named `name` in a fresh temp dir.
    pub fn new(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let dir = DataDir::new(temp_dir.path());
        let collection = Collection::open(&dir, name).expect("failed to open collection");
        Self {
            collection,
            dir,
            _temp_dir: temp_dir,
        }
    }

    /// Creates a collection pre-seeded with the five-person dataset.
    pub fn with_people(name: &str) -> Self {
        let mut this = Self::new(name);
        for person in people() {
            this.collection.insert(person).expect("failed to insert fixture");
        }
        this
    }

    /// Drops the in-memory collection and reopens it from disk.
    pub fn reopen(&mut self) {
        let name = self.collection.name().to_string();
        self.collection = Collection::open(&self.dir, &name).expect("failed to reopen collection");
    }
}

impl std::ops::Deref for TestCollection {
    type Target = Collection;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

impl std::ops::DerefMut for TestCollection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.collection
    }
}

/// The five-person dataset used by the end-to-end scenarios.
pub fn people() -> Vec<Document> {
    [
        serde_json::json!({ "name": "Alice", "age": 25, "city": "London" }),
        serde_json::json!({ "name": "Bob", "age": 30, "city": "Paris" }),
        serde_json::json!({ "name": "Carol", "age": 22, "city": "London" }),
        serde_json::json!({ "name": "David", "age": 35, "city": "Berlin" }),
        serde_json::json!({ "name": "Eve", "age": 28, "city": "Paris" }),
    ]
    .into_iter()
    .map(|fields| Document::from_json(fields).expect("fixture is an object"))
    .collect()
}

/// Extracts the `name` field of each document, in result order.
pub fn names(docs: &[&Document]) -> Vec<String> {
    docs.iter()
        .map(|doc| {
            doc.get("name")
                .and_then(docudb_core::Value::as_str)
                .expect("fixture documents carry a name")
                .to_string()
        })
        .collect()
}
