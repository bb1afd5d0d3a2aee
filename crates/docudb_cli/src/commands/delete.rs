//! Delete command implementation.

use docudb_core::{Collection, CoreResult, DataDir, Query};

/// Runs the delete command: match, drop, rebuild indexes, persist.
pub fn run(dir: &DataDir, db_name: &str, source: &str) -> CoreResult<()> {
    let query = Query::parse(source)?;

    let mut collection = Collection::open(dir, db_name)?;
    let deleted = collection.delete(&query)?;
    collection.save()?;

    println!("Deleted {deleted} document(s).");
    Ok(())
}
