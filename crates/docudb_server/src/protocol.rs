//! Wire protocol: newline-delimited JSON requests and responses.

use serde::{Deserialize, Serialize};

/// A command a client may ask the server to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Insert a document; `payload` is the document object.
    Insert,
    /// Find documents; `payload` is the query object (defaults to `{}`).
    Find,
    /// Delete documents; `payload` is the query object.
    Delete,
    /// Create an index; `payload` is the field name as a JSON string.
    CreateIndex,
}

/// One client request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Target database (collection) name.
    pub db: String,
    /// The command to run.
    pub command: Command,
    /// Command payload; meaning depends on the command.
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// One server response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Whether the command succeeded.
    pub ok: bool,
    /// Command result when `ok` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error message when `ok` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// A success response carrying a result.
    #[must_use]
    pub fn success(result: serde_json::Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    /// A failure response carrying an error message.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_decode() {
        let request: Request = serde_json::from_str(
            r#"{"db": "users", "command": "find", "payload": {"age": {"$gt": 20}}}"#,
        )
        .unwrap();
        assert_eq!(request.db, "users");
        assert_eq!(request.command, Command::Find);
        assert!(request.payload.is_some());
    }

    #[test]
    fn payload_is_optional() {
        let request: Request =
            serde_json::from_str(r#"{"db": "users", "command": "find"}"#).unwrap();
        assert!(request.payload.is_none());
    }

    #[test]
    fn unknown_command_rejected() {
        let result = serde_json::from_str::<Request>(r#"{"db": "users", "command": "drop"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn response_encode() {
        let encoded = serde_json::to_value(Response::success(json!({"deleted": 2}))).unwrap();
        assert_eq!(encoded, json!({"ok": true, "result": {"deleted": 2}}));

        let encoded = serde_json::to_value(Response::failure("boom")).unwrap();
        assert_eq!(encoded, json!({"ok": false, "error": "boom"}));
    }
}
