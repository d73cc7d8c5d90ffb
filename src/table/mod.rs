//! Assembly of the output tables.
//!
//! Two views are produced from the loaded site documents:
//! - pooled statistics with cohorts as columns
//! - raw site statistics with sites as columns, one table per cohort

pub mod assembler;
pub mod universe;

pub use assembler::{PooledTable, TableAssembler};
pub use universe::field_universe;

use crate::utils::config::INDEX_COLUMN;

/// A rendered table: one labelled row per variable
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Column headers, excluding the index column
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<String>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<String>) {
        self.rows.push(TableRow {
            label: label.into(),
            cells,
        });
    }

    /// Look up a cell by row label and column header
    pub fn cell(&self, label: &str, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|row| row.label == label)
            .and_then(|row| row.cells.get(col))
            .map(String::as_str)
    }

    /// Header row, index column first
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(INDEX_COLUMN)
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }

    /// (variables, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }
}
