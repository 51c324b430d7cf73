//! Import command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::open_db;

pub fn cmd_import(db_path: &Path, file: &Path) -> Result<usize> {
    println!("📥 Importing service records from {}...", file.display());

    let db = open_db(db_path)?;
    let reader =
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;

    let imported = tally_core::import_records_csv(&db, reader).context("Import failed")?;
    info!(imported, file = %file.display(), "CSV import complete");

    println!("✅ Imported {} records", imported);
    Ok(imported)
}
