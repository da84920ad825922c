// SPDX-License-Identifier: MPL-2.0

//! In-memory tabular dataset
//!
//! The dataset is a header-row table loaded once at startup and never
//! mutated afterwards. Rows share the table's column list, so every row
//! answers lookups for the same set of column names.
//!
//! - [`csv_parser`]: header-row CSV parsing into a [`Table`]
//! - [`provider`]: fetching CSV text from a URL or a local file

pub mod csv_parser;
pub mod provider;

pub use csv_parser::parse_csv;
pub use provider::{DatasetSource, load_table, load_table_blocking};

use crate::errors::{DatasetError, DatasetResult};
use std::sync::Arc;

/// Value of one cell as seen through a column lookup
///
/// `Absent` means the row has no value for the column (unknown column, or a
/// short row); `Empty` means the cell exists but holds an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue<'a> {
    Absent,
    Empty,
    Value(&'a str),
}

impl<'a> CellValue<'a> {
    fn from_option(value: Option<&'a str>) -> Self {
        match value {
            None => CellValue::Absent,
            Some("") => CellValue::Empty,
            Some(v) => CellValue::Value(v),
        }
    }

    /// Cell text, with `Empty` as `""` and `Absent` as `None`
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            CellValue::Absent => None,
            CellValue::Empty => Some(""),
            CellValue::Value(v) => Some(v),
        }
    }
}

/// One data row, keyed by the table's column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Option<String>>,
}

impl Row {
    /// Create a row over `columns`
    ///
    /// Missing trailing values become absent cells and surplus values are
    /// dropped, so the row always has exactly one slot per column.
    pub fn new(columns: Arc<[String]>, mut values: Vec<Option<String>>) -> Self {
        values.resize(columns.len(), None);
        Self { columns, values }
    }

    /// Look up a cell by column name (case-sensitive)
    pub fn get(&self, column: &str) -> CellValue<'_> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|index| CellValue::from_option(self.values[index].as_deref()))
            .unwrap_or(CellValue::Absent)
    }

    /// Column names in declaration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Iterate `(column, cell)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, CellValue<'_>)> {
        self.columns
            .iter()
            .zip(self.values.iter())
            .map(|(column, value)| (column.as_str(), CellValue::from_option(value.as_deref())))
    }
}

/// Read-only table of rows with a fixed, non-empty column list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from a header and raw row values
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> DatasetResult<Self> {
        if columns.is_empty() {
            return Err(DatasetError::NoColumns);
        }

        let columns: Arc<[String]> = Arc::from(columns);
        let rows = rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&columns), values))
            .collect();

        Ok(Self { columns, rows })
    }

    /// Build a table where every given cell is present
    pub fn from_cells(columns: &[&str], rows: &[&[&str]]) -> DatasetResult<Self> {
        Self::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| Some(cell.to_string())).collect())
                .collect(),
        )
    }

    /// Column names in declaration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in table order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `column` is one of the table's columns (case-sensitive)
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}
