//! Find command implementation.

use docudb_core::{Collection, CoreResult, DataDir, Query};

/// Runs the find command and prints the results as indented JSON.
pub fn run(dir: &DataDir, db_name: &str, source: &str) -> CoreResult<()> {
    let query = Query::parse(source)?;

    let collection = Collection::open(dir, db_name)?;
    let results = collection.find(&query);

    if results.is_empty() {
        println!("[]");
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
