use crate::domain::Bucket;
use crate::errors::{QualifierError, Result};
use crate::pipeline::Buckets;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

const HEADERS: [&str; 8] = [
    "Name", "Address", "Website", "Phone", "Reviews", "Rating", "Verified", "Category",
];

// reviews and rating
const NUMERIC_COLUMNS: [usize; 2] = [4, 5];

/// Writes one worksheet per bucket (Flagged, Empty, Review) to `path`.
pub fn export_buckets_xlsx(buckets: &Buckets, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    for bucket in Bucket::ALL {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(bucket.sheet_name())
            .map_err(|e| QualifierError::Xlsx(format!("Failed to name sheet: {}", e)))?;
        write_bucket(worksheet, bucket, buckets)?;
    }

    workbook
        .save(path)
        .map_err(|e| QualifierError::Xlsx(format!("Failed to save workbook: {}", e)))?;

    Ok(())
}

fn write_bucket(worksheet: &mut Worksheet, bucket: Bucket, buckets: &Buckets) -> Result<()> {
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                QualifierError::Xlsx(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, record) in buckets.get(bucket).iter().enumerate() {
        let r = (i + 1) as u32;

        for (col, value) in record.sheet_row().iter().enumerate() {
            let number = if NUMERIC_COLUMNS.contains(&col) {
                value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
            } else {
                None
            };

            match number {
                Some(n) => worksheet.write_number(r, col as u16, n),
                None => worksheet.write_string(r, col as u16, value),
            }
            .map_err(|e| {
                QualifierError::Xlsx(format!(
                    "Failed to write {} row {}: {}",
                    bucket.sheet_name(),
                    r,
                    e
                ))
            })?;
        }
    }

    Ok(())
}
