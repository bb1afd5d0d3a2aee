//! Request handling: decoded requests in, responses out.

use crate::protocol::{Command, Request, Response};
use docudb_core::{Collection, CoreError, CoreResult, DataDir, Document, Query, DEFAULT_ORDER};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Executes requests against the engine.
///
/// The handler is sans-IO: it knows nothing about sockets, which keeps
/// it unit-testable. Mutation is serialized per database name so that
/// concurrent connections cannot interleave a load/save cycle on the
/// same collection file.
pub struct RequestHandler {
    dir: DataDir,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RequestHandler {
    /// Creates a handler serving collections under the given data dir.
    #[must_use]
    pub fn new(dir: DataDir) -> Self {
        Self {
            dir,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Runs one request to completion; errors become failure responses.
    pub fn handle(&self, request: &Request) -> Response {
        let lock = self.lock_for(&request.db);
        let _guard = lock.lock();

        match self.execute(request) {
            Ok(result) => Response::success(result),
            Err(error) => Response::failure(error.to_string()),
        }
    }

    fn lock_for(&self, db: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(db.to_string()).or_default())
    }

    fn execute(&self, request: &Request) -> CoreResult<serde_json::Value> {
        match request.command {
            Command::Insert => {
                let payload = required_payload(request)?;
                let document = Document::from_json(payload.clone())?;

                let mut collection = Collection::open(&self.dir, &request.db)?;
                let id = collection.insert(document)?;
                collection.save()?;
                collection.save_all_indexes()?;

                Ok(serde_json::json!({ "id": id }))
            }
            Command::Find => {
                let query = match &request.payload {
                    Some(payload) => Query::from_json(payload.clone())?,
                    None => Query::empty(),
                };

                let collection = Collection::open(&self.dir, &request.db)?;
                let results = collection.find(&query);
                Ok(serde_json::to_value(results)?)
            }
            Command::Delete => {
                let payload = required_payload(request)?;
                let query = Query::from_json(payload.clone())?;

                let mut collection = Collection::open(&self.dir, &request.db)?;
                let deleted = collection.delete(&query)?;
                collection.save()?;

                Ok(serde_json::json!({ "deleted": deleted }))
            }
            Command::CreateIndex => {
                let payload = required_payload(request)?;
                let field = payload.as_str().ok_or_else(|| {
                    CoreError::malformed_input("create_index payload must be a field name string")
                })?;

                let mut collection = Collection::open(&self.dir, &request.db)?;
                collection.create_index(field, DEFAULT_ORDER)?;

                Ok(serde_json::json!({ "field": field }))
            }
        }
    }
}

fn required_payload(request: &Request) -> CoreResult<&serde_json::Value> {
    request
        .payload
        .as_ref()
        .ok_or_else(|| CoreError::malformed_input("missing payload"))
}
