//! # DocuDB Server
//!
//! Optional TCP front-end for the DocuDB engine.
//!
//! Clients speak newline-delimited JSON: one [`protocol::Request`] per
//! line in, one [`protocol::Response`] per line out. Each connection
//! gets its own thread; within a request the handler opens the target
//! collection, applies the command, and writes the collection back,
//! holding a per-database mutex so two connections cannot interleave
//! a load/save cycle on the same file.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod handler;
pub mod protocol;
mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::RequestHandler;
pub use server::Server;
