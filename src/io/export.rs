//! Export the activity feed to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::portfolio::ActivityEvent;

/// Write the activity feed (newest first, as given) to a CSV file.
pub fn write_activity_csv(path: &Path, events: &[ActivityEvent]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(file, "date,item_id,item,price,url")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for event in events {
        writeln!(
            file,
            "{},{},{},{:.2},{}",
            event.at.format("%Y-%m-%dT%H:%M:%S"),
            event.item_id,
            csv_field(&event.item_name),
            event.price,
            csv_field(event.url.as_deref().unwrap_or("")),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Quote a field when it would break the row.
fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
