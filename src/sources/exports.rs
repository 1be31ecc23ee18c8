// exports.rs
use crate::domain::ListingRecord;
use crate::errors::{QualifierError, Result};
use std::path::Path;
use tracing::info;

/// Reads every `<prefix>*.csv` export (in glob order) into one list.
pub fn read_all(prefix: &str) -> Result<Vec<ListingRecord>> {
    let pattern = format!("{prefix}*.csv");
    let paths = glob::glob(&pattern)
        .map_err(|e| QualifierError::Config(format!("Bad input pattern {pattern}: {e}")))?;

    let mut records = Vec::new();
    let mut files = 0;
    for entry in paths {
        let path = entry.map_err(|e| QualifierError::Io(e.to_string()))?;
        info!("Loading: {}", path.display());
        records.extend(read_file(&path)?);
        files += 1;
    }

    if files == 0 {
        return Err(QualifierError::Config(format!("No input files match {pattern}")));
    }

    Ok(records)
}

/// Parses one export. Short rows and missing columns become empty fields.
pub fn read_file(path: &Path) -> Result<Vec<ListingRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| QualifierError::Csv(format!("Could not read {}: {e}", path.display())))?;

    let mut records = Vec::new();
    for row in reader.deserialize::<ListingRecord>() {
        let record =
            row.map_err(|e| QualifierError::Csv(format!("Could not parse {}: {e}", path.display())))?;
        records.push(record);
    }
    Ok(records)
}
