// SPDX-License-Identifier: GPL-3.0-only

//! Asset lookup
//!
//! Resolves a decoded identifier to the first table row whose key cell is
//! exactly equal to it, then turns that row into display items.

use crate::dataset::{CellValue, Row, Table};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Outcome of one lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    /// First row whose key cell equals the identifier
    Found(Row),
    /// No row matched; carries the identifier as decoded
    NotFound(String),
}

/// Lookup could not run at all
///
/// Rendered differently from a [`ResolutionResult::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No table was loaded
    #[error("no dataset available")]
    NoDataset,
    /// The configured key column is not a column of the table
    #[error("key column \"{column}\" is not in the dataset (columns: {})", .available.join(", "))]
    MissingKeyColumn {
        column: String,
        available: Vec<String>,
    },
}

/// One line of a found asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DisplayItem {
    Link { label: String, url: String },
    Text { label: String, value: String },
}

impl DisplayItem {
    /// Column name the item came from
    pub fn label(&self) -> &str {
        match self {
            DisplayItem::Link { label, .. } | DisplayItem::Text { label, .. } => label,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            DisplayItem::Link { url, .. } => Some(url),
            DisplayItem::Text { .. } => None,
        }
    }
}

impl std::fmt::Display for DisplayItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayItem::Link { label, url } => write!(f, "{}: {}", label, url),
            DisplayItem::Text { label, value } => write!(f, "{}: {}", label, value),
        }
    }
}

/// How a single cell is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass<'a> {
    /// Column missing from the row
    Absent,
    /// Present but empty
    Empty,
    /// Starts with `http://` or `https://`
    Link(&'a str),
    /// Any other non-empty value
    Text(&'a str),
}

/// Classify one cell; the prefix check is literal and case-sensitive
pub fn classify(cell: CellValue<'_>) -> CellClass<'_> {
    match cell {
        CellValue::Absent => CellClass::Absent,
        CellValue::Empty => CellClass::Empty,
        CellValue::Value(v) if v.starts_with("http://") || v.starts_with("https://") => {
            CellClass::Link(v)
        }
        CellValue::Value(v) => CellClass::Text(v),
    }
}

/// Look up `identifier` in the key column of `table`
///
/// Exact, case-sensitive comparison with no trimming; first row wins.
/// A row whose key cell is absent never matches.
pub fn resolve(
    identifier: &str,
    table: Option<&Table>,
    key_column: &str,
) -> Result<ResolutionResult, ResolveError> {
    let table = table.ok_or(ResolveError::NoDataset)?;

    if !table.has_column(key_column) {
        return Err(ResolveError::MissingKeyColumn {
            column: key_column.to_string(),
            available: table.columns().to_vec(),
        });
    }

    let found = table
        .rows()
        .iter()
        .position(|row| row.get(key_column).as_str() == Some(identifier));

    match found {
        Some(index) => {
            debug!(identifier, row = index, "Asset found");
            Ok(ResolutionResult::Found(table.rows()[index].clone()))
        }
        None => {
            debug!(identifier, rows = table.row_count(), "Asset not found");
            Ok(ResolutionResult::NotFound(identifier.to_string()))
        }
    }
}

/// Display items for a found row
///
/// Columns are walked in table order, the key column is skipped, and
/// empty or absent cells produce nothing.
pub fn display_items(row: &Row, key_column: &str) -> Vec<DisplayItem> {
    row.iter()
        .filter(|(column, _)| *column != key_column)
        .filter_map(|(column, cell)| match classify(cell) {
            CellClass::Link(url) => Some(DisplayItem::Link {
                label: column.to_string(),
                url: url.to_string(),
            }),
            CellClass::Text(value) => Some(DisplayItem::Text {
                label: column.to_string(),
                value: value.to_string(),
            }),
            CellClass::Absent | CellClass::Empty => None,
        })
        .collect()
}
