//! DocuDB server binary.
//!
//! Reads `DB_HOST` / `DB_PORT` from the environment and serves the
//! `./data` directory over newline-delimited JSON.

use docudb_server::{Server, ServerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    Server::new(config).run()?;
    Ok(())
}
