//! Create-index command implementation.

use docudb_core::{Collection, CoreResult, DataDir, DEFAULT_ORDER};

/// Runs the create_index command with the default B+tree order.
pub fn run(dir: &DataDir, db_name: &str, field: &str) -> CoreResult<()> {
    let mut collection = Collection::open(dir, db_name)?;
    collection.create_index(field, DEFAULT_ORDER)?;

    println!("Index created successfully on field '{field}'.");
    Ok(())
}
