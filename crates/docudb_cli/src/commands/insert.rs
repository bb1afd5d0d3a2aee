//! Insert command implementation.

use docudb_core::{Collection, CoreResult, DataDir, Document};

/// Runs the insert command: parse, stamp an id, store, persist.
pub fn run(dir: &DataDir, db_name: &str, payload: &str) -> CoreResult<()> {
    let document = Document::parse(payload)?;

    let mut collection = Collection::open(dir, db_name)?;
    let id = collection.insert(document)?;
    collection.save()?;
    collection.save_all_indexes()?;

    println!("Document inserted successfully. ID: {id}");
    Ok(())
}
