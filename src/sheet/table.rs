//! In-memory table of string cells built from normalized CSV text.

use crate::helpers::csv::tokenize_line;

/// An ordered sequence of rows, each an ordered sequence of string cells.
/// Built once per source file and immutable afterwards.
#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table from already-normalized text, one tokenized row per
    /// line. Carriage returns left over from CRLF line endings are stripped
    /// here, before tokenizing.
    pub fn parse(text: &str) -> Table {
        Table {
            rows: text.lines().map(tokenize_line).collect(),
        }
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Table {
        Table { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the trimmed cell at (row, col), or None when out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(|cell| cell.trim())
    }
}
