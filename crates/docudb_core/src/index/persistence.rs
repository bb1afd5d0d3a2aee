//! Index persistence: the on-disk JSON form of a B+tree.
//!
//! An index file is an indented JSON object:
//!
//! ```text
//! {
//!   "field": "age",
//!   "order": 64,
//!   "nodes": [ { "is_leaf": ..., "keys": [...], ... }, ... ]
//! }
//! ```
//!
//! Nodes are laid out in breadth-first order, so node 0 is the root.
//! Leaves carry `values` parallel to `keys` (each entry a list of
//! document ids as byte arrays); internal nodes carry `children` as
//! indices into the `nodes` array. On load the arena is rebuilt, child
//! and parent links restored, and the leaf chain relinked by walking
//! the node array in order (all leaves sit at one depth, so their BFS
//! order is their left-to-right order).

use crate::error::{CoreError, CoreResult};
use crate::index::btree::{BPlusTree, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The serialized form of one index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFile {
    /// The indexed field name.
    pub field: String,
    /// B+tree order.
    pub order: usize,
    /// Nodes in breadth-first order; node 0 is the root.
    pub nodes: Vec<SerializedNode>,
}

/// One serialized B+tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedNode {
    /// Whether this node is a leaf.
    pub is_leaf: bool,
    /// Encoded keys, sorted.
    pub keys: Vec<Vec<u8>>,
    /// For leaves: one id list per key, ids as UTF-8 bytes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Vec<Vec<u8>>>,
    /// For internal nodes: child indices into the node array.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
}

/// Serializes a tree into its on-disk form.
#[must_use]
pub fn serialize_tree(tree: &BPlusTree, field: &str) -> IndexFile {
    // First pass: assign each node its breadth-first position.
    let mut bfs: Vec<NodeId> = vec![tree.root_id()];
    let mut position = vec![usize::MAX; tree.node_count()];
    position[tree.root_id()] = 0;
    let mut queue = VecDeque::from([tree.root_id()]);
    while let Some(id) = queue.pop_front() {
        for &child in &tree.node(id).children {
            position[child] = bfs.len();
            bfs.push(child);
            queue.push_back(child);
        }
    }

    let nodes = bfs
        .iter()
        .map(|&id| {
            let node = tree.node(id);
            SerializedNode {
                is_leaf: node.is_leaf,
                keys: node.keys.clone(),
                values: node
                    .values
                    .iter()
                    .map(|ids| ids.iter().map(|id| id.as_bytes().to_vec()).collect())
                    .collect(),
                children: node.children.iter().map(|&c| position[c]).collect(),
            }
        })
        .collect();

    IndexFile {
        field: field.to_string(),
        order: tree.order(),
        nodes,
    }
}

/// Rebuilds a tree from its on-disk form.
///
/// # Errors
///
/// Returns [`CoreError::InvalidIndexFile`] when the node layout is
/// inconsistent (bad child indices, mismatched key/value arity, an
/// order of zero, or non-UTF-8 document ids).
pub fn deserialize_tree(file: &IndexFile) -> CoreResult<BPlusTree> {
    if file.order == 0 {
        return Err(CoreError::invalid_index_file("order must be positive"));
    }
    if file.nodes.is_empty() {
        return Ok(BPlusTree::new(file.order));
    }

    let mut nodes = Vec::with_capacity(file.nodes.len());
    for serialized in &file.nodes {
        let mut node = if serialized.is_leaf {
            Node::leaf()
        } else {
            Node::internal()
        };
        node.keys = serialized.keys.clone();

        if serialized.is_leaf {
            if serialized.values.len() != serialized.keys.len() {
                return Err(CoreError::invalid_index_file(
                    "leaf keys and values are not parallel",
                ));
            }
            for ids in &serialized.values {
                let mut list = Vec::with_capacity(ids.len());
                for raw in ids {
                    let id = String::from_utf8(raw.clone()).map_err(|_| {
                        CoreError::invalid_index_file("document id is not valid UTF-8")
                    })?;
                    list.push(id);
                }
                node.values.push(list);
            }
        }
        nodes.push(node);
    }

    // Restore child and parent links. BFS layout puts children strictly
    // after their parent, which also rules out cycles.
    for (index, serialized) in file.nodes.iter().enumerate() {
        if serialized.is_leaf {
            continue;
        }
        if serialized.children.len() != serialized.keys.len() + 1 {
            return Err(CoreError::invalid_index_file(
                "internal node must have one more child than keys",
            ));
        }
        for &child in &serialized.children {
            if child <= index || child >= nodes.len() {
                return Err(CoreError::invalid_index_file(format!(
                    "child index {child} out of place"
                )));
            }
            nodes[index].children.push(child);
            nodes[child].parent = Some(index);
        }
    }

    // Relink the leaf chain left to right.
    let mut prev_leaf: Option<NodeId> = None;
    for index in 0..nodes.len() {
        if nodes[index].is_leaf {
            if let Some(prev) = prev_leaf {
                nodes[prev].next = Some(index);
            }
            prev_leaf = Some(index);
        }
    }

    Ok(BPlusTree::from_parts(file.order, nodes, 0))
}
