//! # Report Writer
//!
//! Writes ranked rows as `label;total` lines, one per row, no header.

use std::path::Path;

use tally_core::ReportRow;
use tracing::info;

use crate::delimited::create_writer;
use crate::error::{IoError, IoResult};

/// Writes `rows` to `path` in the given order, replacing any existing file.
///
/// Returns the number of rows written.
pub fn write_report<R: ReportRow>(rows: &[R], path: &Path) -> IoResult<usize> {
    let mut writer = create_writer(path)?;

    for row in rows {
        let total = row.rendered_total();
        writer
            .write_record([row.label(), total.as_str()])
            .map_err(|e| IoError::csv(path, e))?;
    }
    writer.flush().map_err(|e| IoError::io(path, e))?;

    info!(path = %path.display(), rows = rows.len(), "Report written");
    Ok(rows.len())
}
