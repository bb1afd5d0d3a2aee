//! Collections: the document store, its indexes, and the query planner.

use crate::dir::DataDir;
use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use crate::index::persistence::{deserialize_tree, serialize_tree, IndexFile};
use crate::index::{encode_key, kind_bounds, BPlusTree};
use crate::query::Query;
use crate::store::DocumentStore;
use crate::value::Value;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// A named collection of documents with secondary indexes.
///
/// A collection lives for the duration of one command: it is loaded
/// from disk (or created fresh), mutated in memory, and written back
/// wholesale by the caller before the command returns. Mutating
/// operations keep every loaded index in step with the document set;
/// persistence of the collection file itself stays explicit through
/// [`Collection::save`].
pub struct Collection {
    name: String,
    dir: DataDir,
    store: DocumentStore,
    indexes: BTreeMap<String, BPlusTree>,
}

impl Collection {
    /// Opens a collection, loading its file and every discovered index.
    ///
    /// A missing collection file simply means a new, empty collection.
    pub fn open(dir: &DataDir, name: &str) -> CoreResult<Self> {
        let path = dir.collection_path(name);
        let store = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            DocumentStore::new()
        };

        let mut collection = Self {
            name: name.to_string(),
            dir: dir.clone(),
            store,
            indexes: BTreeMap::new(),
        };
        collection.load_all_indexes()?;
        Ok(collection)
    }

    /// The collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true when the collection holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the document with the given id, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.store.get(id)
    }

    /// All documents in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<&Document> {
        self.store.iter().map(|(_, doc)| doc).collect()
    }

    /// Returns true when the field has an index.
    #[must_use]
    pub fn has_index(&self, field: &str) -> bool {
        self.indexes.contains_key(field)
    }

    /// The indexed field names, sorted.
    #[must_use]
    pub fn indexed_fields(&self) -> Vec<&str> {
        self.indexes.keys().map(String::as_str).collect()
    }

    /// Inserts a document, assigning and returning its `_id`.
    ///
    /// Any `_id` already present in the payload is overwritten. Every
    /// index on a field the document carries receives a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedKey`] when an indexed field
    /// holds an array or object, which cannot be encoded as a key.
    pub fn insert(&mut self, mut doc: Document) -> CoreResult<String> {
        let id = self.generate_id();
        doc.set_id(&id);

        for (field, tree) in &mut self.indexes {
            if let Some(value) = doc.get(field) {
                tree.insert(encode_key(value)?, id.clone());
            }
        }

        self.store.put(id.clone(), doc);
        Ok(id)
    }

    /// Finds documents matching the query.
    ///
    /// With exactly one field-level condition on an indexed field, and
    /// a predicate the index can answer (bare equality, `$eq`, `$gt`,
    /// `$lt`, `$in`), the B+tree supplies candidate ids in leaf-chain
    /// order. Everything else is a full scan in insertion order.
    #[must_use]
    pub fn find(&self, query: &Query) -> Vec<&Document> {
        if let Some(ids) = self.plan_index_ids(query) {
            let mut seen = HashSet::new();
            return ids
                .into_iter()
                .filter(|id| seen.insert(id.clone()))
                .filter_map(|id| self.store.get(&id))
                .collect();
        }

        debug!(collection = %self.name, "full scan");
        self.store
            .iter()
            .filter(|(_, doc)| query.matches(doc))
            .map(|(_, doc)| doc)
            .collect()
    }

    /// Deletes every document matching the query; returns the count.
    ///
    /// Indexes are then rebuilt from the remaining documents and
    /// rewritten to disk. True B+tree deletion is deliberately not
    /// attempted.
    pub fn delete(&mut self, query: &Query) -> CoreResult<usize> {
        let matched: Vec<String> = self
            .store
            .iter()
            .filter(|(_, doc)| query.matches(doc))
            .map(|(id, _)| id.to_string())
            .collect();

        for id in &matched {
            self.store.remove(id);
        }

        self.rebuild_all_indexes()?;
        Ok(matched.len())
    }

    /// Creates a B+tree index of the given order on a field, bulk-loads
    /// it from the current documents, and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IndexExists`] when the field is already
    /// indexed, and [`CoreError::UnsupportedKey`] when a document holds
    /// an array or object under the field.
    pub fn create_index(&mut self, field: &str, order: usize) -> CoreResult<()> {
        if self.indexes.contains_key(field) {
            return Err(CoreError::IndexExists {
                field: field.to_string(),
            });
        }

        let tree = self.build_index(field, order)?;
        self.persist_index(field, &tree)?;
        self.indexes.insert(field.to_string(), tree);
        Ok(())
    }

    /// Writes the collection file (an indented JSON object in insertion
    /// order) via a temp-file rename.
    pub fn save(&self) -> CoreResult<()> {
        self.dir.ensure_root()?;
        let contents = serde_json::to_string_pretty(&self.store)?;
        write_atomic(&self.dir.collection_path(&self.name), &contents)
    }

    /// Rewrites every index file from the in-memory trees.
    pub fn save_all_indexes(&self) -> CoreResult<()> {
        for (field, tree) in &self.indexes {
            self.persist_index(field, tree)?;
        }
        Ok(())
    }

    /// Rebuilds every index from the live document set and persists
    /// the result, preserving each tree's order.
    pub fn rebuild_all_indexes(&mut self) -> CoreResult<()> {
        let specs: Vec<(String, usize)> = self
            .indexes
            .iter()
            .map(|(field, tree)| (field.clone(), tree.order()))
            .collect();

        for (field, order) in specs {
            let tree = self.build_index(&field, order)?;
            self.persist_index(&field, &tree)?;
            self.indexes.insert(field, tree);
        }

        if !self.indexes.is_empty() {
            debug!(collection = %self.name, count = self.indexes.len(), "rebuilt indexes");
        }
        Ok(())
    }

    fn build_index(&self, field: &str, order: usize) -> CoreResult<BPlusTree> {
        let mut tree = BPlusTree::new(order);
        for (id, doc) in self.store.iter() {
            if let Some(value) = doc.get(field) {
                tree.insert(encode_key(value)?, id.to_string());
            }
        }
        Ok(tree)
    }

    fn persist_index(&self, field: &str, tree: &BPlusTree) -> CoreResult<()> {
        self.dir.ensure_indexes_dir()?;
        let contents = serde_json::to_string_pretty(&serialize_tree(tree, field))?;
        write_atomic(&self.dir.index_path(&self.name, field), &contents)
    }

    fn load_all_indexes(&mut self) -> CoreResult<()> {
        for field in self.dir.discover_indexes(&self.name)? {
            let path = self.dir.index_path(&self.name, &field);
            let file: IndexFile = serde_json::from_str(&fs::read_to_string(&path)?)?;
            self.indexes.insert(field, deserialize_tree(&file)?);
        }
        Ok(())
    }

    /// Generates `"<unix-nanoseconds>-<random 0..999999>"`, retrying
    /// against the current key set so a collision never replaces an
    /// existing document.
    fn generate_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos())
                .unwrap_or_default();
            let id = format!("{}-{}", nanos, rng.gen_range(0..1_000_000));
            if !self.store.contains(&id) {
                return id;
            }
        }
    }

    /// Attempts to answer the query through a single-field index.
    ///
    /// Returns the candidate ids in leaf-chain order, or `None` when
    /// the query needs a full scan.
    fn plan_index_ids(&self, query: &Query) -> Option<Vec<String>> {
        let conditions = query.conditions();
        if conditions.len() != 1 {
            return None;
        }
        let (field, predicate) = conditions.iter().next()?;
        if field.starts_with('$') {
            return None;
        }
        let tree = self.indexes.get(field)?;
        let ids = index_probe(tree, predicate)?;
        debug!(collection = %self.name, field = %field, hits = ids.len(), "index path");
        Some(ids)
    }
}

/// Probes one index for a predicate, or `None` when the predicate is
/// outside what the index answers with the matcher's exact semantics.
fn index_probe(tree: &BPlusTree, predicate: &Value) -> Option<Vec<String>> {
    match predicate {
        // Equality with null also matches documents missing the field,
        // which an index cannot see.
        Value::Null => None,
        Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
            Some(tree.search(&encode_key(predicate).ok()?))
        }
        Value::Object(ops) if ops.len() == 1 => {
            let (op, operand) = ops.iter().next()?;
            match (op.as_str(), operand) {
                ("$eq", Value::Null) => None,
                ("$eq", operand) if operand.is_scalar() => {
                    Some(tree.search(&encode_key(operand).ok()?))
                }
                ("$gt", operand) => {
                    // Cap the range at the operand's kind: the matcher
                    // never orders across kinds, so neither may the probe.
                    let (_, ceiling) = kind_bounds(operand)?;
                    let lo = encode_key(operand).ok()?;
                    Some(tree.range_search(Some(&lo), Some(&ceiling), false, false))
                }
                ("$lt", operand) => {
                    let (floor, _) = kind_bounds(operand)?;
                    let hi = encode_key(operand).ok()?;
                    Some(tree.range_search(Some(&floor), Some(&hi), true, false))
                }
                ("$in", Value::Array(candidates)) => {
                    let keys: Option<Vec<Vec<u8>>> = candidates
                        .iter()
                        .map(|candidate| match candidate {
                            Value::Null => None,
                            other => encode_key(other).ok(),
                        })
                        .collect();
                    Some(tree.search_in(&keys?))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Writes a file through a temporary sibling and an atomic rename.
fn write_atomic(path: &Path, contents: &str) -> CoreResult<()> {
    let mut temp = path.to_path_buf();
    temp.set_extension("tmp");
    fs::write(&temp, contents)?;
    fs::rename(&temp, path)?;
    Ok(())
}
