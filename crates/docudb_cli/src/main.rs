//! DocuDB CLI
//!
//! Command-line front-end for the DocuDB engine.
//!
//! # Commands
//!
//! - `insert` - Insert a JSON document into a database
//! - `find` - Query documents with a JSON query
//! - `delete` - Delete documents matching a JSON query
//! - `create_index` - Create a B+tree index on a field
//!
//! ```text
//! docudb my_database insert '{"name": "Alice", "age": 25}'
//! docudb my_database find '{"age": {"$gt": 20}}'
//! docudb my_database delete '{"name": {"$like": "A%"}}'
//! docudb my_database create_index age
//! ```

mod commands;

use clap::{Parser, Subcommand};
use docudb_core::DataDir;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// DocuDB command-line database tool.
#[derive(Parser)]
#[command(name = "docudb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database (collection) name
    db_name: String,

    /// Root data directory
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert a JSON document
    Insert {
        /// The document as a JSON object
        document: String,
    },

    /// Find documents matching a JSON query
    Find {
        /// The query as a JSON object
        query: String,
    },

    /// Delete documents matching a JSON query
    Delete {
        /// The query as a JSON object
        query: String,
    },

    /// Create a B+tree index on a field
    #[command(name = "create_index")]
    CreateIndex {
        /// The field to index
        field: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let dir = DataDir::new(cli.data_dir);

    match cli.command {
        Commands::Insert { document } => {
            commands::insert::run(&dir, &cli.db_name, &document)?;
        }
        Commands::Find { query } => {
            commands::find::run(&dir, &cli.db_name, &query)?;
        }
        Commands::Delete { query } => {
            commands::delete::run(&dir, &cli.db_name, &query)?;
        }
        Commands::CreateIndex { field } => {
            commands::create_index::run(&dir, &cli.db_name, &field)?;
        }
    }

    Ok(())
}
