//! Insertion-order-preserving document store.

use crate::document::Document;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// An insertion-order-preserving mapping from document id to document.
///
/// A hash lookup runs parallel to an ordered list of ids: put, get, and
/// remove are O(1) average, iteration is O(n) in first-seen insertion
/// order. That order is exactly what the collection JSON file on disk
/// encodes, so the store serializes as a plain JSON object and
/// deserializes back without losing the ordering.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    docs: HashMap<String, Document>,
    order: Vec<String>,
}

impl DocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document under the given id.
    ///
    /// Replacement keeps the id at its original position in the order.
    pub fn put(&mut self, id: impl Into<String>, doc: Document) {
        let id = id.into();
        if !self.docs.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.docs.insert(id, doc);
    }

    /// Returns the document stored under the id, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.docs.get(id)
    }

    /// Returns true when the id is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.docs.contains_key(id)
    }

    /// Removes the document under the id; returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.docs.remove(id).is_some() {
            self.order.retain(|existing| existing != id);
            true
        } else {
            false
        }
    }

    /// Yields (id, document) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.order
            .iter()
            .filter_map(|id| self.docs.get(id).map(|doc| (id.as_str(), doc)))
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns true when the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl Serialize for DocumentStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (id, doc) in self.iter() {
            map.serialize_entry(id, doc)?;
        }
        map.end()
    }
}

struct StoreVisitor;

impl<'de> Visitor<'de> for StoreVisitor {
    type Value = DocumentStore;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object mapping document ids to documents")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut store = DocumentStore::new();
        // Entries arrive in file order, which is the insertion order
        // the serializer wrote.
        while let Some((id, doc)) = access.next_entry::<String, Document>()? {
            store.put(id, doc);
        }
        Ok(store)
    }
}

impl<'de> Deserialize<'de> for DocumentStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StoreVisitor)
    }
}
