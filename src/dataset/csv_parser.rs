// SPDX-License-Identifier: GPL-3.0-only

//! Header-row CSV parsing
//!
//! The first record names the columns. Cells are kept verbatim (no
//! trimming) because identifiers are matched exactly.

use crate::dataset::Table;
use crate::errors::{DatasetError, DatasetResult};
use tracing::{debug, warn};

/// Parse CSV text into a [`Table`]
///
/// Rows may be shorter or longer than the header: short rows get absent
/// trailing cells, long rows lose their surplus cells.
pub fn parse_csv(content: &str) -> DatasetResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(DatasetError::NoColumns);
    }

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > columns.len() {
            warn!(
                row = index + 1,
                cells = record.len(),
                columns = columns.len(),
                "Row has more cells than the header, extra cells ignored"
            );
        }
        rows.push(record.iter().map(|cell| Some(cell.to_string())).collect());
    }

    debug!(columns = columns.len(), rows = rows.len(), "Parsed CSV dataset");
    Table::new(columns, rows)
}
