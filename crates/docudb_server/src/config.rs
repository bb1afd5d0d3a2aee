//! Server configuration.

use crate::error::{ServerError, ServerResult};
use std::env;
use std::path::PathBuf;

/// Environment variable naming the bind host.
pub const ENV_HOST: &str = "DB_HOST";
/// Environment variable naming the bind port.
pub const ENV_PORT: &str = "DB_PORT";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Configuration for the DocuDB TCP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Root data directory served by this process.
    pub data_dir: PathBuf,
}

impl ServerConfig {
    /// Creates a configuration with the given bind host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            data_dir: PathBuf::from("data"),
        }
    }

    /// Reads `DB_HOST` and `DB_PORT` from the environment, falling back
    /// to `127.0.0.1:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidEnv`] when `DB_PORT` is set but
    /// not a valid port number.
    pub fn from_env() -> ServerResult<Self> {
        let host = env::var(ENV_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var(ENV_PORT) {
            Ok(raw) => raw.parse().map_err(|_| ServerError::InvalidEnv {
                name: ENV_PORT,
                value: raw,
            })?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self::new(host, port))
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// The `host:port` string to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}
