//! # DocuDB Core
//!
//! Core database engine for DocuDB.
//!
//! This crate provides:
//! - A dynamic document value model with JSON interop
//! - An insertion-order-preserving document store
//! - A disk-persistable B+tree secondary index
//! - A JSON-shaped query language with a planner that chooses
//!   between an index lookup and a full scan
//! - Collection persistence (one indented-JSON file per collection,
//!   one `.idx` file per index)
//!
//! The engine is single-threaded and synchronous: a command loads a
//! collection from disk, mutates it in memory, and writes it back
//! wholesale before returning. Front-ends (CLI, TCP server) live in
//! sibling crates and only deliver already-decoded structures here.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod dir;
mod document;
mod error;
pub mod index;
pub mod query;
mod store;
mod value;

pub use collection::Collection;
pub use dir::DataDir;
pub use document::{Document, ID_FIELD};
pub use error::{CoreError, CoreResult};
pub use index::{encode_key, BPlusTree, DEFAULT_ORDER};
pub use query::Query;
pub use store::DocumentStore;
pub use value::Value;

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
