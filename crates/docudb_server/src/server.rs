//! TCP accept loop and per-connection request pump.

use crate::config::ServerConfig;
use crate::handler::RequestHandler;
use crate::protocol::{Request, Response};
use docudb_core::DataDir;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// The DocuDB TCP server.
///
/// Each accepted connection runs on its own thread and is served one
/// request at a time: read a line, decode, execute, write a line.
pub struct Server {
    config: ServerConfig,
    handler: Arc<RequestHandler>,
}

impl Server {
    /// Creates a server from a configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let handler = Arc::new(RequestHandler::new(DataDir::new(&config.data_dir)));
        Self { config, handler }
    }

    /// Binds the listener and serves connections until the process exits.
    ///
    /// # Errors
    ///
    /// Returns an error when the address cannot be bound.
    pub fn run(&self) -> std::io::Result<()> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)?;
        info!(%addr, "server listening");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let handler = Arc::clone(&self.handler);
                    thread::spawn(move || serve_connection(stream, &handler));
                }
                Err(error) => warn!(%error, "accept failed"),
            }
        }
        Ok(())
    }
}

fn serve_connection(stream: TcpStream, handler: &RequestHandler) {
    let peer = stream
        .peer_addr()
        .map_or_else(|_| "unknown".to_string(), |addr| addr.to_string());
    info!(%peer, "client connected");

    let reader = match stream.try_clone() {
        Ok(clone) => BufReader::new(clone),
        Err(error) => {
            warn!(%peer, %error, "stream clone failed");
            return;
        }
    };
    let mut writer = stream;

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                warn!(%peer, %error, "read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handler.handle(&request),
            Err(error) => Response::failure(format!("malformed request: {error}")),
        };

        let encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(%peer, %error, "encode failed");
                break;
            }
        };
        if writer
            .write_all(encoded.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .is_err()
        {
            break;
        }
    }

    info!(%peer, "client disconnected");
}
